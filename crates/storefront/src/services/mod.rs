//! Business logic services for storefront.
//!
//! # Services
//!
//! - `catalog` - Load display-ready items from Stripe prices
//! - `checkout` - Open hosted checkout sessions (with one retry)
//! - `cart_events` - Log and breadcrumb cart mutations

pub mod cart_events;
pub mod catalog;
pub mod checkout;

pub use cart_events::TracingCartObserver;
