//! Stripe REST client implementation.
//!
//! Uses `reqwest` directly with bearer auth and a pinned `Stripe-Version`.
//! Nothing is cached: every call goes to Stripe.

use std::sync::Arc;

use price_cart_core::{CheckoutSessionRequest, PriceId};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::config::StripeConfig;
use crate::stripe::StripeError;
use crate::stripe::conversions::checkout_session_form;
use crate::stripe::types::{CheckoutSession, ErrorResponse, List, ListPrices, Price};

/// Number of body characters kept in error logs.
const LOG_BODY_CHARS: usize = 500;

// =============================================================================
// StripeClient
// =============================================================================

/// Client for the Stripe REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct StripeClient {
    inner: Arc<StripeClientInner>,
}

struct StripeClientInner {
    client: reqwest::Client,
    api_base: Url,
    api_version: String,
    secret_key: SecretString,
}

impl StripeClient {
    /// Create a new Stripe client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StripeConfig) -> Result<Self, StripeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("price-cart/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(StripeClientInner {
                client,
                api_base: config.api_base.clone(),
                api_version: config.api_version.clone(),
                secret_key: config.secret_key.clone(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, StripeError> {
        Ok(self.inner.api_base.join(path)?)
    }

    /// Attach auth headers, send, and decode the response.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StripeError> {
        let response = request
            .bearer_auth(self.inner.secret_key.expose_secret())
            .header("Stripe-Version", &self.inner.api_version)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(StripeError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let error = serde_json::from_str::<ErrorResponse>(&response_text)
                .map(|envelope| envelope.error)
                .ok();
            let message = error
                .as_ref()
                .and_then(|e| e.message.clone())
                .unwrap_or_else(|| response_text.chars().take(200).collect());

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(StripeError::NotFound(message));
            }

            tracing::error!(
                status = %status,
                body = %response_text.chars().take(LOG_BODY_CHARS).collect::<String>(),
                "Stripe API returned non-success status"
            );
            return Err(StripeError::Api {
                status: status.as_u16(),
                kind: error
                    .and_then(|e| e.kind)
                    .unwrap_or_else(|| "unknown".to_string()),
                message,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(LOG_BODY_CHARS).collect::<String>(),
                "Failed to parse Stripe response"
            );
            StripeError::Parse(e)
        })
    }

    // =========================================================================
    // Price Methods
    // =========================================================================

    /// List prices.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body does not parse.
    #[instrument(skip(self))]
    pub async fn list_prices(&self, params: &ListPrices) -> Result<List<Price>, StripeError> {
        let mut url = self.endpoint("v1/prices")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("active", if params.active { "true" } else { "false" });
            query.append_pair("limit", &params.limit.to_string());
            if params.expand_product {
                query.append_pair("expand[]", "data.product");
            }
        }

        let prices: List<Price> = self.execute(self.inner.client.get(url)).await?;
        tracing::debug!(count = prices.data.len(), "Listed prices");
        Ok(prices)
    }

    /// Get a single price with its product expanded.
    ///
    /// # Errors
    ///
    /// Returns [`StripeError::NotFound`] for unknown ids, or another error if
    /// the API request fails.
    #[instrument(skip(self), fields(price_id = %id))]
    pub async fn get_price(&self, id: &PriceId) -> Result<Price, StripeError> {
        let mut url = self.endpoint(&format!("v1/prices/{id}"))?;
        url.query_pairs_mut().append_pair("expand[]", "product");

        self.execute(self.inner.client.get(url)).await
    }

    // =========================================================================
    // Checkout Methods
    // =========================================================================

    /// Create a hosted checkout session.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Stripe rejects the
    /// session.
    #[instrument(skip(self, request), fields(line_items = request.line_items.len()))]
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, StripeError> {
        let url = self.endpoint("v1/checkout/sessions")?;
        let form = checkout_session_form(request);

        let session: CheckoutSession = self
            .execute(self.inner.client.post(url).form(&form))
            .await?;
        tracing::info!(session_id = %session.id, "Created checkout session");
        Ok(session)
    }
}
