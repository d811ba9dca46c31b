//! Application state shared across handlers.

use std::sync::Arc;

use price_cart_core::CartObserver;

use crate::config::StorefrontConfig;
use crate::services::TracingCartObserver;
use crate::stripe::{StripeClient, StripeError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It holds only immutable
/// shared resources; carts live in each visitor's session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    stripe: StripeClient,
    observer: Box<dyn CartObserver + Send + Sync>,
}

impl AppState {
    /// Create a new application state with the logging cart observer.
    ///
    /// # Errors
    ///
    /// Returns an error if the Stripe HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StripeError> {
        Self::with_observer(config, TracingCartObserver)
    }

    /// Create a new application state with a custom cart observer.
    ///
    /// # Errors
    ///
    /// Returns an error if the Stripe HTTP client cannot be built.
    pub fn with_observer(
        config: StorefrontConfig,
        observer: impl CartObserver + Send + Sync + 'static,
    ) -> Result<Self, StripeError> {
        let stripe = StripeClient::new(&config.stripe)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                stripe,
                observer: Box::new(observer),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Stripe API client.
    #[must_use]
    pub fn stripe(&self) -> &StripeClient {
        &self.inner.stripe
    }

    /// Get the cart observer.
    #[must_use]
    pub fn observer(&self) -> &(dyn CartObserver + Send + Sync) {
        self.inner.observer.as_ref()
    }
}
