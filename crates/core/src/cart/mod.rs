//! Cart state.
//!
//! Two cart contracts live here, and they are deliberately different types:
//!
//! - [`Cart`] keys entries by price id and deletes an entry when it is
//!   removed or its quantity drops to zero. The main storefront page uses it.
//! - [`TallyCart`] keeps a plain list of price/quantity lines. Removing
//!   decrements and keeps the line, never going below zero. The quick-buy
//!   page uses it.
//!
//! Neither cart prevents a non-positive quantity from being stored; the
//! checkout transformer filters those out (see [`crate::checkout`]).

mod events;
mod tally;

pub use events::{CartEvent, CartObserver, NoopObserver};
pub use tally::{TallyCart, TallyLine};

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use crate::types::{Money, PriceId};

/// Largest quantity a single line may be set to from a form.
///
/// Matches Stripe's per-line-item quantity limit.
pub const MAX_LINE_QUANTITY: i64 = 999_999;

/// One line of a [`Cart`].
///
/// Keeps the unit price next to the quantity so the cart can total itself
/// without another catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub id: PriceId,
    pub name: String,
    pub unit_price: Money,
    pub image: Option<String>,
    pub quantity: i64,
}

impl CartEntry {
    fn from_item(item: &CatalogItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.unit_price,
            image: item.image.clone(),
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// Keyed cart with delete-on-remove semantics.
///
/// Entries keep insertion order and are unique by [`PriceId`]. Every
/// mutation returns a [`CartEvent`] describing what changed, which callers
/// may hand to a [`CartObserver`].
///
/// ```
/// use price_cart_core::{Cart, CatalogItem, Money, PriceId};
///
/// let item = CatalogItem::new(
///     PriceId::parse("price_a").unwrap(),
///     "Widget",
///     Money::from_minor_units(999).unwrap(),
/// );
///
/// let mut cart = Cart::new();
/// cart.add_item(&item);
/// cart.add_item(&item);
///
/// assert_eq!(cart.total_unique_items(), 1);
/// assert_eq!(cart.cart_total().to_string(), "19.98");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add one unit of `item`.
    ///
    /// Increments the existing entry for the item's id, or appends a new
    /// entry with quantity 1. The quantity saturates at `i64::MAX`.
    pub fn add_item(&mut self, item: &CatalogItem) -> CartEvent {
        if let Some(entry) = self.entry_mut(&item.id) {
            entry.quantity = entry.quantity.saturating_add(1);
            return CartEvent::ItemUpdated(entry.clone());
        }

        let entry = CartEntry::from_item(item);
        self.entries.push(entry.clone());
        CartEvent::ItemAdded(entry)
    }

    /// Delete the entry for `id` regardless of its quantity.
    ///
    /// Returns `None` if the id is not in the cart.
    pub fn remove_item(&mut self, id: &PriceId) -> Option<CartEvent> {
        let index = self.entries.iter().position(|entry| &entry.id == id)?;
        let removed = self.entries.remove(index);
        Some(CartEvent::ItemRemoved(removed.id))
    }

    /// Set the quantity of `id` directly.
    ///
    /// A quantity of zero or less deletes the entry. Returns `None` if the
    /// id is not in the cart.
    pub fn update_item_quantity(&mut self, id: &PriceId, quantity: i64) -> Option<CartEvent> {
        if quantity <= 0 {
            return self.remove_item(id);
        }

        let entry = self.entry_mut(id)?;
        entry.quantity = quantity;
        Some(CartEvent::ItemUpdated(entry.clone()))
    }

    /// Remove every entry.
    pub fn empty_cart(&mut self) -> CartEvent {
        let removed = self.entries.len();
        self.entries.clear();
        CartEvent::Emptied { removed }
    }

    /// Returns `true` if the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn total_unique_items(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all entry quantities, saturating at `i64::MAX`.
    #[must_use]
    pub fn total_items(&self) -> i64 {
        self.entries
            .iter()
            .fold(0_i64, |total, entry| total.saturating_add(entry.quantity))
    }

    /// Sum of unit price times quantity over all entries.
    #[must_use]
    pub fn cart_total(&self) -> Money {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Returns `true` if `id` has an entry.
    #[must_use]
    pub fn in_cart(&self, id: &PriceId) -> bool {
        self.entries.iter().any(|entry| &entry.id == id)
    }

    /// Look up the entry for `id`.
    #[must_use]
    pub fn get_item(&self, id: &PriceId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    fn entry_mut(&mut self, id: &PriceId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|entry| &entry.id == id)
    }
}
