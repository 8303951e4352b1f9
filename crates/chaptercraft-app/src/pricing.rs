//! Pricing page and checkout hook
//!
//! The client only dispatches redirects: it asks the backend for a checkout or
//! portal URL and hands it to the shell. Payment state lives elsewhere.

use chaptercraft_api_client::ApiClient;
use chaptercraft_core::models::{
    format_cents, BillingPeriod, CheckoutRedirect, SessionDetails, StripeConfig, SubscriptionPlan,
};
use chaptercraft_core::{AppError, AppResult};

/// One plan as shown on the pricing page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanCard {
    pub id: String,
    pub name: String,
    pub price_label: Option<String>,
    pub features: Vec<String>,
    pub availability: Option<String>,
    pub sold_out: bool,
}

impl PlanCard {
    fn from_plan(plan: &SubscriptionPlan) -> Self {
        let price_label = plan.price().map(|(period, cents)| {
            let amount = format_cents(cents, &plan.pricing.currency);
            match period {
                BillingPeriod::Monthly => format!("{}/month", amount),
                BillingPeriod::Yearly => format!("{}/year", amount),
                BillingPeriod::Lifetime => format!("{} once", amount),
            }
        });

        let mut features: Vec<String> = plan
            .features
            .iter()
            .filter_map(|(name, value)| match value.as_i64() {
                Some(n) => Some(format!("{}: {}", humanize(name), n)),
                None => (value.as_bool() == Some(true)).then(|| humanize(name)),
            })
            .collect();
        features.sort();

        let availability = match (plan.spots_remaining(), plan.spots_total) {
            (Some(left), Some(total)) => Some(format!("{} of {} spots left", left, total)),
            _ => None,
        };

        Self {
            id: plan.id.clone(),
            name: plan.name.clone(),
            price_label,
            features,
            availability,
            sold_out: plan.is_sold_out(),
        }
    }
}

/// `priority_support` → `Priority support`
fn humanize(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct PricingView {
    config: StripeConfig,
}

impl PricingView {
    pub async fn load(client: &ApiClient) -> AppResult<Self> {
        let config = client.stripe_config().await?;
        tracing::debug!(plans = config.plans.len(), "Plan catalog loaded");
        Ok(Self { config })
    }

    pub fn publishable_key(&self) -> &str {
        &self.config.publishable_key
    }

    pub fn cards(&self) -> Vec<PlanCard> {
        self.config.plans.iter().map(PlanCard::from_plan).collect()
    }

    /// Create a checkout session for `plan_id` and return where to send the user.
    pub async fn checkout(
        &self,
        client: &ApiClient,
        plan_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> AppResult<CheckoutRedirect> {
        if let Some(plan) = self.config.plan(plan_id) {
            if plan.is_sold_out() {
                return Err(AppError::InvalidInput(format!("{} is sold out", plan.name)));
            }
        }
        client
            .create_checkout_session(plan_id, success_url, cancel_url)
            .await
    }
}

/// What the payment success page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSummary {
    pub paid: bool,
    pub plan_name: Option<String>,
    pub amount_label: Option<String>,
    pub email: Option<String>,
}

pub async fn payment_summary(client: &ApiClient, session_id: &str) -> AppResult<PaymentSummary> {
    let details: SessionDetails = client.retrieve_session(session_id).await?;
    let currency = details.currency.clone().unwrap_or_else(|| "usd".to_string());

    Ok(PaymentSummary {
        paid: details.is_paid(),
        plan_name: details.plan_name().map(str::to_string),
        amount_label: details.amount_total.map(|c| format_cents(c, &currency)),
        email: details.customer_email.clone(),
    })
}
