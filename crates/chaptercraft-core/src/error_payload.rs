//! Decoding of backend error bodies.
//!
//! The backend reports failures in three shapes under `detail` (or, for the
//! relayed services, `error` / `message`): a plain string, a list of field-level
//! errors, or an arbitrary object. They are decoded once here into
//! [`ErrorPayload`] and flattened into a single display string.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One field-level validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FieldErrorRepr")]
pub struct FieldError {
    /// Location of the offending field, e.g. `["body", "title"]`.
    pub loc: Vec<String>,
    pub msg: String,
    pub kind: Option<String>,
}

impl FieldError {
    /// Name of the field the error points at (last `loc` segment).
    pub fn field(&self) -> Option<&str> {
        self.loc
            .iter()
            .rev()
            .map(String::as_str)
            .find(|segment| *segment != "body" && *segment != "query")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldErrorRepr {
    Detailed {
        #[serde(default)]
        loc: Vec<Value>,
        msg: String,
        #[serde(rename = "type", default)]
        kind: Option<String>,
    },
    Bare(String),
}

impl From<FieldErrorRepr> for FieldError {
    fn from(repr: FieldErrorRepr) -> Self {
        match repr {
            FieldErrorRepr::Detailed { loc, msg, kind } => FieldError {
                loc: loc
                    .into_iter()
                    .map(|segment| match segment {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
                msg,
                kind,
            },
            FieldErrorRepr::Bare(msg) => FieldError {
                loc: Vec::new(),
                msg,
                kind: None,
            },
        }
    }
}

/// A decoded error payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    Message(String),
    FieldErrors(Vec<FieldError>),
    Unstructured(Map<String, Value>),
}

/// Keys inspected, in order, for the payload inside an error body.
const PAYLOAD_KEYS: [&str; 3] = ["detail", "error", "message"];

impl ErrorPayload {
    /// Decode a raw response body.
    ///
    /// Returns `None` for an empty body. A body that is not JSON is kept as a
    /// plain message.
    pub fn from_body(body: &str) -> Option<Self> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return None;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => Self::from_value(value),
            Err(_) => Some(ErrorPayload::Message(trimmed.to_string())),
        }
    }

    /// Decode an already parsed JSON body.
    pub fn from_value(value: Value) -> Option<Self> {
        let inner = match value {
            Value::Object(mut map) => {
                match PAYLOAD_KEYS.iter().find_map(|key| map.remove(*key)) {
                    Some(inner) => inner,
                    None => return Some(ErrorPayload::Unstructured(map)),
                }
            }
            other => other,
        };

        match inner {
            Value::Null => None,
            other => serde_json::from_value(other).ok(),
        }
    }

    /// Flatten the payload into one line suitable for a notification.
    pub fn display_message(&self) -> String {
        match self {
            ErrorPayload::Message(message) => message.clone(),
            ErrorPayload::FieldErrors(errors) => errors
                .iter()
                .map(|e| match e.field() {
                    Some(field) => format!("{}: {}", field, e.msg),
                    None => e.msg.clone(),
                })
                .collect::<Vec<_>>()
                .join("; "),
            ErrorPayload::Unstructured(map) => PAYLOAD_KEYS
                .iter()
                .chain(["msg"].iter())
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
        }
    }
}
