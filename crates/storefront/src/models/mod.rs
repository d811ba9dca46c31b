//! Domain models for storefront.
//!
//! Carts themselves are core types; this module holds what the storefront
//! keeps in the visitor's session around them.

pub mod session;

pub use session::{Notice, NoticeLevel, keys as session_keys};
