//! Append-only price tally used by the quick-buy page.

use serde::{Deserialize, Serialize};

use crate::types::PriceId;

/// A price id and how many units of it were tallied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyLine {
    pub price: PriceId,
    pub quantity: i64,
}

/// Cart that only ever grows its list of lines.
///
/// Adding finds the existing line for a price and increments it, or appends
/// a new line at quantity 1. Removing decrements a line only while its
/// quantity is positive; the line stays in the list at zero.
///
/// ```
/// use price_cart_core::{PriceId, TallyCart};
///
/// let price = PriceId::parse("price_a").unwrap();
/// let mut tally = TallyCart::new();
///
/// tally.add(&price);
/// tally.remove(&price);
/// tally.remove(&price);
///
/// assert_eq!(tally.quantity_of(&price), Some(0));
/// assert!(tally.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyCart {
    lines: Vec<TallyLine>,
}

impl TallyCart {
    /// Create an empty tally.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Count one more unit of `price`. Returns the new quantity, which
    /// saturates at `i64::MAX`.
    pub fn add(&mut self, price: &PriceId) -> i64 {
        if let Some(line) = self.lines.iter_mut().find(|line| &line.price == price) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }

        self.lines.push(TallyLine {
            price: price.clone(),
            quantity: 1,
        });
        1
    }

    /// Count one fewer unit of `price` if its quantity is positive.
    ///
    /// Returns the quantity after the call, or `None` if `price` was never
    /// added. The line is kept even at zero.
    pub fn remove(&mut self, price: &PriceId) -> Option<i64> {
        let line = self.lines.iter_mut().find(|line| &line.price == price)?;
        if line.quantity > 0 {
            line.quantity -= 1;
        }
        Some(line.quantity)
    }

    /// Current quantity of `price`, if it has a line.
    #[must_use]
    pub fn quantity_of(&self, price: &PriceId) -> Option<i64> {
        self.lines
            .iter()
            .find(|line| &line.price == price)
            .map(|line| line.quantity)
    }

    /// All lines, including those at zero.
    #[must_use]
    pub fn lines(&self) -> &[TallyLine] {
        &self.lines
    }

    /// Returns `true` if no line has a positive quantity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.quantity <= 0)
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
