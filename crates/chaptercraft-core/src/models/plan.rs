use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::AppError;

/// How a plan is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingPeriod {
    Monthly,
    Yearly,
    Lifetime,
}

/// Plan pricing information, in cents. In practice only one price is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanPricing {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub monthly_amount_cents: Option<i64>,
    #[serde(default)]
    pub yearly_amount_cents: Option<i64>,
    #[serde(default)]
    pub lifetime_amount_cents: Option<i64>,
}

fn default_currency() -> String {
    "usd".to_string()
}

/// A subscription plan or lifetime tier offered on the pricing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pricing: PlanPricing,
    /// Feature flags (`true`/`false`) and counters (`books_per_month`, ...).
    #[serde(default)]
    pub features: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub spots_claimed: Option<u32>,
    #[serde(default)]
    pub spots_total: Option<u32>,
}

impl SubscriptionPlan {
    /// The billing period and its amount, monthly winning over yearly over lifetime.
    pub fn price(&self) -> Option<(BillingPeriod, i64)> {
        let p = &self.pricing;
        p.monthly_amount_cents
            .map(|c| (BillingPeriod::Monthly, c))
            .or_else(|| p.yearly_amount_cents.map(|c| (BillingPeriod::Yearly, c)))
            .or_else(|| p.lifetime_amount_cents.map(|c| (BillingPeriod::Lifetime, c)))
    }

    pub fn is_lifetime(&self) -> bool {
        matches!(self.price(), Some((BillingPeriod::Lifetime, _)))
    }

    /// Remaining spots for capacity-limited tiers.
    pub fn spots_remaining(&self) -> Option<u32> {
        match (self.spots_claimed, self.spots_total) {
            (Some(claimed), Some(total)) => Some(total.saturating_sub(claimed)),
            _ => None,
        }
    }

    pub fn is_sold_out(&self) -> bool {
        self.spots_remaining() == Some(0)
    }

    /// Enabled boolean features, in name order.
    pub fn enabled_features(&self) -> Vec<&str> {
        self.features
            .iter()
            .filter(|(_, v)| v.as_bool() == Some(true))
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// A numeric capacity such as `books_per_month`.
    pub fn limit(&self, name: &str) -> Option<i64> {
        self.features.get(name).and_then(serde_json::Value::as_i64)
    }
}

/// Format cents as a price label, e.g. `$39.00`.
pub fn format_cents(cents: i64, currency: &str) -> String {
    let symbol = match currency.to_lowercase().as_str() {
        "usd" => "$",
        "eur" => "€",
        "gbp" => "£",
        _ => "",
    };
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    if symbol.is_empty() {
        format!("{}{}.{:02} {}", sign, abs / 100, abs % 100, currency.to_uppercase())
    } else {
        format!("{}{}{}.{:02}", sign, symbol, abs / 100, abs % 100)
    }
}

/// Payment-processor configuration relayed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripeConfig {
    #[serde(default)]
    pub publishable_key: String,
    #[serde(default)]
    pub plans: Vec<SubscriptionPlan>,
}

impl StripeConfig {
    pub fn plan(&self, id: &str) -> Option<&SubscriptionPlan> {
        self.plans.iter().find(|p| p.id == id)
    }
}

/// Request DTO for creating a checkout session
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub plan_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Result of creating a checkout session. Failures are reported in-band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub session_url: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A checkout that can be followed: where to send the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirect {
    pub session_id: String,
    pub url: String,
}

impl CheckoutSession {
    pub fn into_redirect(self) -> Result<CheckoutRedirect, AppError> {
        match (self.success, self.session_id, self.session_url) {
            (true, Some(session_id), Some(url)) if !url.is_empty() => {
                Ok(CheckoutRedirect { session_id, url })
            }
            _ => Err(AppError::StripeError(self.error.unwrap_or_else(|| {
                "Checkout session could not be created".to_string()
            }))),
        }
    }
}

/// Checkout session details for the success page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDetails {
    pub id: String,
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl SessionDetails {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }

    pub fn plan_name(&self) -> Option<&str> {
        self.metadata.get("plan_name").map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub session: Option<SessionDetails>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SessionStatus {
    pub fn into_details(self) -> Result<SessionDetails, AppError> {
        match (self.success, self.session) {
            (true, Some(session)) => Ok(session),
            _ => Err(AppError::StripeError(
                self.error
                    .unwrap_or_else(|| "Checkout session not available".to_string()),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PortalRequest {
    pub return_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalSession {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub portal_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PortalSession {
    pub fn into_url(self) -> Result<String, AppError> {
        match (self.success, self.portal_url) {
            (true, Some(url)) if !url.is_empty() => Ok(url),
            _ => Err(AppError::StripeError(
                self.error
                    .unwrap_or_else(|| "Customer portal is not available".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(json: &str) -> SubscriptionPlan {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_lifetime_plan_with_capacity() {
        let p = plan(
            r#"{"id":"pro-lifetime","name":"Pro Lifetime",
                "pricing":{"lifetime_amount_cents":25000},
                "features":{"books_per_month":12,"priority_support":true,"onboarding":false},
                "spots_claimed":98,"spots_total":100}"#,
        );
        assert!(p.is_lifetime());
        assert_eq!(p.price(), Some((BillingPeriod::Lifetime, 25000)));
        assert_eq!(p.spots_remaining(), Some(2));
        assert!(!p.is_sold_out());
        assert_eq!(p.enabled_features(), vec!["priority_support"]);
        assert_eq!(p.limit("books_per_month"), Some(12));
    }

    #[test]
    fn test_monthly_plan_without_capacity() {
        let p = plan(r#"{"id":"monthly","name":"Monthly Plan","pricing":{"monthly_amount_cents":3900}}"#);
        assert_eq!(p.price(), Some((BillingPeriod::Monthly, 3900)));
        assert_eq!(p.spots_remaining(), None);
        assert!(!p.is_sold_out());
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(3900, "usd"), "$39.00");
        assert_eq!(format_cents(99705, "eur"), "€997.05");
        assert_eq!(format_cents(150, "jpy"), "1.50 JPY");
    }

    #[test]
    fn test_checkout_failure_in_band() {
        let session: CheckoutSession =
            serde_json::from_str(r#"{"success":false,"error":"Invalid plan ID: gold"}"#).unwrap();
        match session.into_redirect() {
            Err(AppError::StripeError(msg)) => assert_eq!(msg, "Invalid plan ID: gold"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_session_status_paid() {
        let status: SessionStatus = serde_json::from_str(
            r#"{"success":true,"session":{"id":"cs_1","payment_status":"paid","amount_total":3900,
                "currency":"usd","metadata":{"plan_id":"monthly","plan_name":"Monthly Plan"}}}"#,
        )
        .unwrap();
        let details = status.into_details().unwrap();
        assert!(details.is_paid());
        assert_eq!(details.plan_name(), Some("Monthly Plan"));
    }
}
