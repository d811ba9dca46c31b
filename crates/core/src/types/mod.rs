//! Core types for Price Cart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;

pub use id::{PriceId, PriceIdError};
pub use price::{Money, MoneyError};
