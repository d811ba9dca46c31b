//! Money amounts using decimal arithmetic.
//!
//! Stripe reports amounts as integers in the currency's minor unit (cents for
//! USD). The storefront displays and sums them as two-place decimals.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing [`Money`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyError {
    /// Prices are never negative.
    #[error("amount cannot be negative (got {0} minor units)")]
    Negative(i64),
}

/// A non-negative amount in the currency's standard unit (dollars, not cents).
///
/// Always carries exactly two decimal places, so `Display` renders `9.99`,
/// `5.00` and `0.00`.
///
/// ```
/// use price_cart_core::Money;
///
/// let price = Money::from_minor_units(999).unwrap();
/// assert_eq!(price.to_string(), "9.99");
/// assert_eq!(price.times(2).to_string(), "19.98");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero in any currency.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Convert an integer amount of minor units (e.g. cents) to `Money`.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Negative`] for amounts below zero.
    pub fn from_minor_units(minor: i64) -> Result<Self, MoneyError> {
        if minor < 0 {
            return Err(MoneyError::Negative(minor));
        }
        Ok(Self(Decimal::new(minor, 2)))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity.
    ///
    /// Non-positive quantities contribute nothing. Saturates at
    /// `Decimal::MAX` instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: i64) -> Self {
        if quantity <= 0 {
            return Self::ZERO;
        }
        Self(self.0.saturating_mul(Decimal::from(quantity)).round_dp(2))
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
