//! Payment-processor relay: plan catalog, checkout, session lookup and portal.
//!
//! The backend owns all payment state. These calls only produce URLs to send
//! the user to, or read back what the processor recorded.

use chaptercraft_core::models::{
    CheckoutRedirect, CheckoutRequest, CheckoutSession, PortalRequest, PortalSession,
    SessionDetails, SessionStatus, StripeConfig,
};
use chaptercraft_core::AppResult;

use crate::{api_path, segment, ApiClient};

impl ApiClient {
    /// Publishable key and plan catalog.
    pub async fn stripe_config(&self) -> AppResult<StripeConfig> {
        self.get(&api_path("/stripe/config"), &[]).await
    }

    pub async fn create_checkout_session(
        &self,
        plan_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> AppResult<CheckoutRedirect> {
        let request = CheckoutRequest {
            plan_id: plan_id.to_string(),
            success_url: success_url.to_string(),
            cancel_url: cancel_url.to_string(),
        };
        let session: CheckoutSession = self
            .post_json(&api_path("/stripe/create-checkout-session"), &[], &request)
            .await?;
        let redirect = session.into_redirect()?;
        tracing::info!(plan_id = %plan_id, session_id = %redirect.session_id, "Checkout session created");
        Ok(redirect)
    }

    pub async fn retrieve_session(&self, session_id: &str) -> AppResult<SessionDetails> {
        let status: SessionStatus = self
            .get(&api_path(&format!("/stripe/session/{}", segment(session_id))), &[])
            .await?;
        status.into_details()
    }

    pub async fn create_portal_session(&self, return_url: &str) -> AppResult<String> {
        let request = PortalRequest {
            return_url: return_url.to_string(),
        };
        let portal: PortalSession = self
            .post_json(&api_path("/stripe/create-portal-session"), &[], &request)
            .await?;
        portal.into_url()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::client_for;
    use chaptercraft_core::AppError;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_checkout_returns_redirect() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/stripe/create-checkout-session")
            .match_body(Matcher::Json(json!({
                "plan_id": "monthly",
                "success_url": "https://app.test/success",
                "cancel_url": "https://app.test/pricing"
            })))
            .with_status(200)
            .with_body(
                r#"{"success":true,"session_id":"cs_1","session_url":"https://checkout.stripe.com/c/cs_1",
                    "plan_id":"monthly","plan_name":"Monthly Plan","amount":3900}"#,
            )
            .create_async()
            .await;

        let redirect = client_for(&server)
            .create_checkout_session("monthly", "https://app.test/success", "https://app.test/pricing")
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(redirect.session_id, "cs_1");
        assert_eq!(redirect.url, "https://checkout.stripe.com/c/cs_1");
    }

    #[tokio::test]
    async fn test_checkout_failure_in_band() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/stripe/create-checkout-session")
            .with_status(200)
            .with_body(r#"{"success":false,"error":"Invalid plan ID: gold"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .create_checkout_session("gold", "s", "c")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StripeError(_)));
    }

    #[tokio::test]
    async fn test_portal_and_session() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/stripe/create-portal-session")
            .with_status(200)
            .with_body(r#"{"success":true,"portal_url":"https://billing.stripe.com/p/1"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/stripe/session/cs_1")
            .with_status(200)
            .with_body(r#"{"success":true,"session":{"id":"cs_1","payment_status":"unpaid"}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        assert_eq!(
            client.create_portal_session("https://app.test/dashboard").await.unwrap(),
            "https://billing.stripe.com/p/1"
        );
        let details = client.retrieve_session("cs_1").await.unwrap();
        assert!(!details.is_paid());
    }
}
