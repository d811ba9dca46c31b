//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                   - Catalog and cart
//!
//! # Cart (form posts, all redirect back to /)
//! POST /cart/add           - Add one unit of a price
//! POST /cart/update        - Set a quantity (<= 0 removes)
//! POST /cart/remove        - Remove an entry
//! POST /cart/empty         - Remove everything
//!
//! # Checkout
//! POST /checkout           - Open a hosted checkout session for the cart
//!
//! # Quick buy (tally cart, all redirect back to /classic)
//! GET  /classic            - Catalog with add/remove buttons
//! POST /classic/add        - Count one more unit
//! POST /classic/remove     - Count one fewer unit (never below zero)
//! POST /classic/checkout   - Open a hosted checkout session for the tally
//! ```

pub mod cart;
pub mod checkout;
pub mod classic;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update_quantity))
        .route("/remove", post(cart::remove))
        .route("/empty", post(cart::empty))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::checkout_cart))
        // Quick-buy page
        .route("/classic", get(classic::show))
        .route("/classic/add", post(classic::add))
        .route("/classic/remove", post(classic::remove))
        .route("/classic/checkout", post(classic::checkout))
}
