use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use validator::Validate;

/// Subscription tier of a user. Unknown tiers read as `Free`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Pro,
    Premium,
    Lifetime,
    Admin,
}

impl SubscriptionTier {
    pub fn is_paid(&self) -> bool {
        !matches!(self, SubscriptionTier::Free)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, SubscriptionTier::Admin)
    }
}

impl From<String> for SubscriptionTier {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pro" => SubscriptionTier::Pro,
            "premium" => SubscriptionTier::Premium,
            "lifetime" => SubscriptionTier::Lifetime,
            "admin" => SubscriptionTier::Admin,
            _ => SubscriptionTier::Free,
        }
    }
}

impl Display for SubscriptionTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SubscriptionTier::Free => write!(f, "free"),
            SubscriptionTier::Pro => write!(f, "pro"),
            SubscriptionTier::Premium => write!(f, "premium"),
            SubscriptionTier::Lifetime => write!(f, "lifetime"),
            SubscriptionTier::Admin => write!(f, "admin"),
        }
    }
}

/// The signed-in user as returned by login/register and persisted locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default, alias = "user_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub subscription_tier: SubscriptionTier,
    /// Bearer credential; empty when the backend issued none.
    #[serde(default)]
    pub access_token: String,
}

impl SessionUser {
    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }

    pub fn has_token(&self) -> bool {
        !self.access_token.trim().is_empty()
    }

    /// Identifier used for owner-scoped routes; falls back to the email.
    pub fn owner_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.email)
    }
}

/// Request DTO for signing in
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request DTO for registering a new account
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Full name must be between 1 and 255 characters"
    ))]
    pub full_name: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}
