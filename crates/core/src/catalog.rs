//! Display-ready catalog items.

use serde::{Deserialize, Serialize};

use crate::types::{Money, PriceId};

/// A purchasable price as shown on the storefront.
///
/// Built fresh from the provider on every catalog fetch and never mutated
/// afterwards. Checkout refers to the item only by `id`; `unit_price` is for
/// display and cart totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Provider price identifier.
    pub id: PriceId,
    /// Product name (empty when the provider has none).
    pub name: String,
    /// Unit price, two-place decimal.
    pub unit_price: Money,
    /// First product image, if the product has any.
    pub image: Option<String>,
    /// Quantity shown next to the item. Always 0 when loaded.
    pub quantity: i64,
}

impl CatalogItem {
    /// Create a catalog item with a zero starting quantity.
    #[must_use]
    pub fn new(id: PriceId, name: impl Into<String>, unit_price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            image: None,
            quantity: 0,
        }
    }

    /// Attach a display image. Empty URLs are treated as no image.
    #[must_use]
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image.filter(|url| !url.trim().is_empty());
        self
    }
}
