//! Error types module
//!
//! This module provides the error type used throughout the Chaptercraft client.
//! Every failure, whether caught locally before a request is sent or reported by
//! the backend, is unified under the `AppError` enum. Nothing here is fatal to the
//! process: callers turn an `AppError` into a visible message and carry on.

use std::io;

use crate::constants::DEFAULT_ERROR_MESSAGE;
use crate::error_payload::ErrorPayload;

/// Convenience alias used across the client crates.
pub type AppResult<T> = Result<T, AppError>;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a rejected token
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to the user.
pub trait ErrorMetadata {
    /// HTTP status the error corresponds to (0 when no request was made)
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether repeating the same action may succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// User-facing message
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Rejected locally before any network call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success response from the backend.
    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered 2xx but the body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A relayed payment-processor call reported failure.
    #[error("Stripe error: {0}")]
    StripeError(String),

    /// A relayed AI provider call reported failure.
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::UnexpectedResponse(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        // Surface the first human message rather than the derive's debug layout.
        let message = err
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| format!("Validation error: {}", err));
        AppError::InvalidInput(message)
    }
}

impl AppError {
    /// Build an error from a non-success HTTP status and its raw body.
    ///
    /// 401 and 404 get their own variants; everything else keeps the status,
    /// including a server-side 413, which is not a local validation failure.
    /// The message is extracted from the body on a best-effort basis and falls
    /// back to [`DEFAULT_ERROR_MESSAGE`].
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = ErrorPayload::from_body(body)
            .map(|payload| payload.display_message())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());

        match status {
            401 => AppError::Unauthorized(message),
            404 => AppError::NotFound(message),
            _ => AppError::Api { status, message },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// True for errors raised before any request left the process.
    pub fn is_local_validation(&self) -> bool {
        matches!(
            self,
            AppError::InvalidInput(_)
                | AppError::PayloadTooLarge(_)
                | AppError::UnsupportedFileType(_)
        )
    }

    /// Get the error type name
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::UnsupportedFileType(_) => "UnsupportedFileType",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::NotFound(_) => "NotFound",
            AppError::Api { .. } => "Api",
            AppError::Transport(_) => "Transport",
            AppError::UnexpectedResponse(_) => "UnexpectedResponse",
            AppError::StripeError(_) => "StripeError",
            AppError::Generation(_) => "Generation",
            AppError::Session(_) => "Session",
            AppError::Config(_) => "Config",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }

    /// Emit this error through `tracing` at its configured level.
    pub fn log(&self, context: &str) {
        match self.log_level() {
            LogLevel::Debug => tracing::debug!(error = %self, code = self.error_code(), "{}", context),
            LogLevel::Warn => tracing::warn!(error = %self, code = self.error_code(), "{}", context),
            LogLevel::Error => {
                tracing::error!(error = %self.detailed_message(), code = self.error_code(), "{}", context)
            }
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (u16, &'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (
            0,
            "INVALID_INPUT",
            false,
            Some("Check the form fields and try again"),
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            0,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Choose a smaller file"),
            LogLevel::Debug,
        ),
        AppError::UnsupportedFileType(_) => (
            0,
            "UNSUPPORTED_FILE_TYPE",
            false,
            Some("Upload a TXT, PDF or DOCX file"),
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            401,
            "UNAUTHORIZED",
            false,
            Some("Sign in again"),
            LogLevel::Warn,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            LogLevel::Debug,
        ),
        AppError::Api { status, .. } => (
            *status,
            "API_ERROR",
            *status >= 500,
            Some("Retry after a short delay"),
            if *status >= 500 {
                LogLevel::Error
            } else {
                LogLevel::Warn
            },
        ),
        AppError::Transport(_) => (
            0,
            "TRANSPORT_ERROR",
            true,
            Some("Check your connection and retry"),
            LogLevel::Warn,
        ),
        AppError::UnexpectedResponse(_) => (
            0,
            "UNEXPECTED_RESPONSE",
            false,
            Some("Contact support if this error persists"),
            LogLevel::Error,
        ),
        AppError::StripeError(_) => (
            0,
            "STRIPE_ERROR",
            true,
            Some("Retry payment after a short delay"),
            LogLevel::Error,
        ),
        AppError::Generation(_) => (
            0,
            "GENERATION_ERROR",
            true,
            Some("Retry generation after a short delay"),
            LogLevel::Warn,
        ),
        AppError::Session(_) => (
            0,
            "SESSION_ERROR",
            false,
            Some("Sign in again"),
            LogLevel::Warn,
        ),
        AppError::Config(_) => (
            0,
            "CONFIG_ERROR",
            false,
            Some("Check CHAPTERCRAFT_* environment variables"),
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            0,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg)
            | AppError::PayloadTooLarge(ref msg)
            | AppError::UnsupportedFileType(ref msg)
            | AppError::Unauthorized(ref msg)
            | AppError::NotFound(ref msg)
            | AppError::StripeError(ref msg)
            | AppError::Generation(ref msg) => msg.clone(),
            AppError::Api { message, .. } => message.clone(),
            AppError::Transport(_) => "Could not reach the server".to_string(),
            AppError::UnexpectedResponse(_) => DEFAULT_ERROR_MESSAGE.to_string(),
            AppError::Session(ref msg) => msg.clone(),
            AppError::Config(ref msg) => msg.clone(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                DEFAULT_ERROR_MESSAGE.to_string()
            }
        }
    }
}
