//! Price Cart Core - Cart state and checkout types.
//!
//! This crate provides the domain model shared by the Price Cart components:
//! - `storefront` - Public storefront backed by Stripe prices
//! - `cli` - Command-line tools for inspecting the catalog and checkout
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no sessions. Carts are plain owned values; whoever holds one
//! decides where it lives.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for price identifiers and money
//! - [`catalog`] - Display-ready catalog items
//! - [`cart`] - The keyed [`Cart`] and the append-only [`TallyCart`]
//! - [`checkout`] - Line item extraction and checkout session requests

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;

pub use cart::{
    Cart, CartEntry, CartEvent, CartObserver, MAX_LINE_QUANTITY, NoopObserver, TallyCart,
    TallyLine,
};
pub use catalog::CatalogItem;
pub use checkout::{
    CheckoutError, CheckoutLineItem, CheckoutMode, CheckoutSessionRequest, LineItemSource,
    PaymentMethodType, line_items,
};
pub use types::*;
