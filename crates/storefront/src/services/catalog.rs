//! Catalog loading.
//!
//! The catalog is fetched from Stripe on every page request. A failure or a
//! malformed price fails the whole load; no partial catalog is returned.

use price_cart_core::{CatalogItem, PriceId};
use tracing::instrument;

use crate::stripe::conversions::catalog_item;
use crate::stripe::{ListPrices, StripeClient, StripeError};

/// Load up to `limit` active prices as catalog items.
///
/// # Errors
///
/// Returns an error if Stripe is unreachable or any price is malformed.
#[instrument(skip(stripe))]
pub async fn load_catalog(stripe: &StripeClient, limit: u8) -> Result<Vec<CatalogItem>, StripeError> {
    let prices = stripe.list_prices(&ListPrices::active(limit)).await?;

    prices.data.into_iter().map(catalog_item).collect()
}

/// Look up one sellable item by price id.
///
/// Used to validate ids posted by add-to-cart forms and to capture the
/// current unit price.
///
/// # Errors
///
/// Returns [`StripeError::NotFound`] for unknown or inactive prices.
#[instrument(skip(stripe), fields(price_id = %id))]
pub async fn find_item(stripe: &StripeClient, id: &PriceId) -> Result<CatalogItem, StripeError> {
    let price = stripe.get_price(id).await?;

    if !price.active {
        return Err(StripeError::NotFound(format!("price {id} is not active")));
    }

    catalog_item(price)
}
