//! Create a hosted checkout session from the command line.

use std::io::Write;
use std::str::FromStr;

use price_cart_core::{
    CheckoutError, CheckoutSessionRequest, LineItemSource, PriceId, PriceIdError,
};
use price_cart_storefront::config::StripeConfig;
use price_cart_storefront::services::checkout::open_session;
use price_cart_storefront::stripe::StripeClient;
use thiserror::Error;
use tracing::info;

/// Errors parsing an `--item` argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemArgError {
    #[error("invalid price id: {0}")]
    PriceId(#[from] PriceIdError),

    #[error("invalid quantity {0:?}: expected a whole number")]
    Quantity(String),
}

/// One `--item PRICE_ID[:QUANTITY]` argument.
///
/// Zero and negative quantities are accepted here and dropped by the
/// checkout transformation, like a cart line at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemArg {
    pub price: PriceId,
    pub quantity: i64,
}

impl FromStr for ItemArg {
    type Err = ItemArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (price, quantity) = match s.split_once(':') {
            Some((price, quantity)) => (
                price,
                quantity
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ItemArgError::Quantity(quantity.to_string()))?,
            ),
            None => (s, 1),
        };

        Ok(Self {
            price: PriceId::parse(price.trim())?,
            quantity,
        })
    }
}

/// Items given on the command line.
struct ItemList(Vec<ItemArg>);

impl LineItemSource for ItemList {
    fn checkout_lines(&self) -> impl Iterator<Item = (&PriceId, i64)> {
        self.0.iter().map(|item| (&item.price, item.quantity))
    }
}

/// Build the session request for the given items.
fn session_request(
    items: Vec<ItemArg>,
    return_url: &url::Url,
    config: &StripeConfig,
) -> Result<CheckoutSessionRequest, CheckoutError> {
    CheckoutSessionRequest::for_page(
        return_url.as_str(),
        &ItemList(items),
        &config.payment_method_types,
    )
}

/// Create a checkout session and print its id and hosted URL.
///
/// # Errors
///
/// Returns an error if every quantity is zero or less (no request is made),
/// the Stripe settings are invalid, or session creation fails after the
/// retry.
pub async fn create(
    items: Vec<ItemArg>,
    return_url: &url::Url,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = StripeConfig::from_env()?;
    let request = session_request(items, return_url, &config)?;

    info!(line_items = request.line_items.len(), "Creating checkout session");

    let client = StripeClient::new(&config)?;
    let session = open_session(&client, &request).await?;

    let mut out = std::io::stdout().lock();
    writeln!(out, "session: {}", session.id)?;
    match session.url {
        Some(url) => writeln!(out, "url:     {url}")?,
        None => writeln!(out, "url:     (none; redirect with Stripe.js using the session id)")?,
    }

    Ok(())
}
