//! Minimal Stripe REST client: Checkout Session creation only.

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use super::catalog::Product;
use super::PaymentError;

pub const DEFAULT_STRIPE_API_URL: &str = "https://api.stripe.com";

/// Metadata tag set on payment intents created through checkout, so their webhook is not
/// counted a second time.
pub(crate) const CHECKOUT_SOURCE: &str = "checkout";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    api_url: String,
}

impl StripeClient {
    pub fn new(http: reqwest::Client, secret_key: String) -> Self {
        Self {
            http,
            secret_key,
            api_url: DEFAULT_STRIPE_API_URL.to_string(),
        }
    }

    /// Points the client at another API root (a mock server in tests).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Creates a one-off card payment session for `product`. Success and cancel URLs are
    /// built from `public_base_url`.
    #[instrument(skip(self, product, email), fields(product = %product.slug))]
    pub async fn create_checkout_session(
        &self,
        product: &Product,
        email: Option<&str>,
        public_base_url: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        let base = public_base_url.trim_end_matches('/');
        let mut form: Vec<(&str, String)> = vec![
            ("mode", "payment".to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            ("line_items[0][price_data][currency]", "usd".to_string()),
            (
                "line_items[0][price_data][unit_amount]",
                product.price_cents().to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                product.name.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][description]",
                format!("Complete access to {} system", product.name),
            ),
            (
                "success_url",
                format!("{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}", base),
            ),
            ("cancel_url", format!("{}/checkout/{}", base, product.slug)),
            ("metadata[product_name]", product.slug.to_string()),
            (
                "payment_intent_data[metadata][source]",
                CHECKOUT_SOURCE.to_string(),
            ),
            (
                "payment_intent_data[metadata][product_name]",
                product.slug.to_string(),
            ),
        ];
        if let Some(email) = email.filter(|e| !e.trim().is_empty()) {
            form.push(("customer_email", email.trim().to_string()));
            form.push(("metadata[customer_email]", email.trim().to_string()));
        }

        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.api_url))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| status.to_string());
            error!(status = status.as_u16(), message = %message, "Stripe rejected checkout session");
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let session: CheckoutSession = response.json().await?;
        info!(session_id = %session.id, "Checkout session created");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::find_product;

    #[tokio::test]
    async fn test_create_checkout_session_posts_form() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/checkout/sessions")
            .match_header("authorization", "Bearer sk_test_123")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded(
                    "line_items[0][price_data][unit_amount]".into(),
                    "29700".into(),
                ),
                mockito::Matcher::UrlEncoded("customer_email".into(), "a@b.co".into()),
                mockito::Matcher::UrlEncoded(
                    "cancel_url".into(),
                    "https://shop.test/checkout/omni-bot-premium".into(),
                ),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "cs_test_1", "url": "https://checkout.stripe.com/c/cs_test_1"}"#)
            .create_async()
            .await;

        let client = StripeClient::new(reqwest::Client::new(), "sk_test_123".to_string())
            .with_api_url(server.url());
        let product = find_product("omni-bot-premium").unwrap();
        let session = client
            .create_checkout_session(product, Some("a@b.co"), "https://shop.test/")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(session.id, "cs_test_1");
        assert_eq!(
            session.url.as_deref(),
            Some("https://checkout.stripe.com/c/cs_test_1")
        );
    }

    #[tokio::test]
    async fn test_create_checkout_session_surfaces_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/checkout/sessions")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"message": "Invalid API Key provided"}}"#)
            .create_async()
            .await;

        let client = StripeClient::new(reqwest::Client::new(), "bad".to_string())
            .with_api_url(server.url());
        let product = find_product("marshall-empire").unwrap();
        let err = client
            .create_checkout_session(product, None, "http://localhost:5000")
            .await
            .unwrap_err();

        match err {
            PaymentError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid API Key provided");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
