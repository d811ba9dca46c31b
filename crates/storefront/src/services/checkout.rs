//! Hosted checkout sessions.
//!
//! Session creation is retried once when the failure is transient
//! (transport error, rate limit, 5xx). Anything else is returned to the
//! caller, which must surface it to the visitor.

use std::time::Duration;

use price_cart_core::CheckoutSessionRequest;
use tracing::instrument;

use crate::stripe::{CheckoutSession, StripeClient, StripeError};

/// Total attempts for one checkout, including the first.
pub const MAX_SESSION_ATTEMPTS: u32 = 2;

const RETRY_DELAY: Duration = Duration::from_millis(250);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Create a checkout session, retrying once on transient failures.
///
/// # Errors
///
/// Returns the last error if every attempt fails, or the first error if it
/// is not retryable.
#[instrument(skip(stripe, request), fields(line_items = request.line_items.len()))]
pub async fn open_session(
    stripe: &StripeClient,
    request: &CheckoutSessionRequest,
) -> Result<CheckoutSession, StripeError> {
    let mut attempt = 1;

    loop {
        match stripe.create_checkout_session(request).await {
            Ok(session) => return Ok(session),
            Err(e) if e.is_retryable() && attempt < MAX_SESSION_ATTEMPTS => {
                let delay = retry_delay(&e);
                tracing::warn!(
                    error = %e,
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Checkout session creation failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn retry_delay(error: &StripeError) -> Duration {
    match error {
        StripeError::RateLimited(seconds) => Duration::from_secs(*seconds).min(MAX_RETRY_DELAY),
        _ => RETRY_DELAY,
    }
}

/// Where to send the browser once a session exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutRedirect {
    /// Stripe returned the hosted page URL; redirect straight to it.
    Hosted(String),
    /// Only a session id; hand off to Stripe.js `redirectToCheckout`.
    StripeJs {
        session_id: String,
        publishable_key: String,
    },
}

impl CheckoutRedirect {
    /// Pick the redirect for a freshly created session.
    #[must_use]
    pub fn for_session(session: CheckoutSession, publishable_key: &str) -> Self {
        match session.url.filter(|url| !url.is_empty()) {
            Some(url) => Self::Hosted(url),
            None => Self::StripeJs {
                session_id: session.id,
                publishable_key: publishable_key.to_string(),
            },
        }
    }
}
