//! Stripe REST API client.
//!
//! # Architecture
//!
//! - Plain `reqwest` calls against the REST API (no generated SDK)
//! - Stripe is the source of truth for prices: no local sync, no caching
//! - Wire types in [`types`] stay close to Stripe's JSON; [`conversions`]
//!   maps them to the core domain
//!
//! # Endpoints
//!
//! - `GET /v1/prices` - active prices with the product expanded
//! - `GET /v1/prices/{id}` - single price lookup for add-to-cart
//! - `POST /v1/checkout/sessions` - hosted checkout session
//!
//! # Example
//!
//! ```rust,ignore
//! use price_cart_storefront::stripe::{ListPrices, StripeClient};
//!
//! let client = StripeClient::new(&config.stripe)?;
//! let prices = client.list_prices(&ListPrices::active(10)).await?;
//! ```

mod client;
pub mod conversions;
pub mod types;

pub use client::StripeClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to Stripe.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe answered with an error object.
    #[error("Stripe API error ({status} {kind}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Stripe error type (e.g. `invalid_request_error`).
        kind: String,
        /// Human-readable message from Stripe.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found (or not sellable).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Stripe.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Response parsed but is missing data the storefront needs.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl StripeError {
    /// Whether repeating the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited(_) => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Parse(_) | Self::NotFound(_) | Self::Malformed(_) | Self::InvalidUrl(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripe_error_display() {
        let err = StripeError::NotFound("price_123".to_string());
        assert_eq!(err.to_string(), "Not found: price_123");

        let err = StripeError::Api {
            status: 400,
            kind: "invalid_request_error".to_string(),
            message: "No such price: 'price_123'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Stripe API error (400 invalid_request_error): No such price: 'price_123'"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let err = StripeError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_retryable() {
        assert!(StripeError::RateLimited(1).is_retryable());
        assert!(
            StripeError::Api {
                status: 503,
                kind: "api_error".to_string(),
                message: String::new(),
            }
            .is_retryable()
        );
        assert!(
            !StripeError::Api {
                status: 400,
                kind: "invalid_request_error".to_string(),
                message: String::new(),
            }
            .is_retryable()
        );
        assert!(!StripeError::Malformed("x".to_string()).is_retryable());
        assert!(!StripeError::NotFound("x".to_string()).is_retryable());
    }
}
