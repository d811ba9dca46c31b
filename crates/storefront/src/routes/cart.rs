//! Cart route handlers.
//!
//! Every handler loads the visitor's [`Cart`] from the session, applies one
//! mutation, writes it back and redirects to the home page. Failures never
//! surface as error pages: the cart is left as it was and a notice explains
//! what happened.

use axum::{Form, extract::State, response::Redirect};
use price_cart_core::{Cart, CartEvent, CatalogItem, MAX_LINE_QUANTITY, PriceId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::models::session::{flash, update};
use crate::models::{Notice, session_keys};
use crate::services::catalog::find_item;
use crate::state::AppState;
use crate::stripe::StripeError;

const HOME: &str = "/";

/// Form carrying a single price id.
#[derive(Debug, Deserialize)]
pub struct PriceForm {
    pub price_id: String,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityForm {
    pub price_id: String,
    pub quantity: String,
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse a posted price id.
pub(crate) fn parse_price_id(raw: &str) -> Result<PriceId, Notice> {
    PriceId::parse(raw.trim()).map_err(|e| {
        tracing::warn!(price_id = raw, error = %e, "Rejected posted price id");
        Notice::error("That item is not available.")
    })
}

/// Parse a posted quantity.
///
/// Zero and negative values are accepted (they remove the entry); anything
/// above [`MAX_LINE_QUANTITY`] is rejected.
pub(crate) fn parse_quantity(raw: &str) -> Result<i64, Notice> {
    let Ok(quantity) = raw.trim().parse::<i64>() else {
        tracing::warn!(quantity = raw, "Rejected posted quantity");
        return Err(Notice::error("Quantity must be a whole number."));
    };

    if quantity > MAX_LINE_QUANTITY {
        tracing::warn!(quantity, "Rejected oversized quantity");
        return Err(Notice::error(format!(
            "Quantity can be at most {MAX_LINE_QUANTITY}."
        )));
    }

    Ok(quantity)
}

/// Resolve a posted price id to a sellable catalog item.
///
/// Unknown and inactive prices are rejected, as are lookups that fail
/// because Stripe is unreachable.
pub(crate) async fn lookup_item(state: &AppState, raw: &str) -> Result<CatalogItem, Notice> {
    let id = parse_price_id(raw)?;

    find_item(state.stripe(), &id).await.map_err(|e| match e {
        StripeError::NotFound(_) => {
            tracing::warn!(price_id = %id, "Price not found or inactive");
            Notice::error("That item is not available.")
        }
        e => {
            tracing::error!(price_id = %id, error = %e, "Price lookup failed");
            Notice::error("We couldn't reach the store. Please try again.")
        }
    })
}

/// Apply `mutation` to the session cart and report the event.
async fn mutate_cart<F>(state: &AppState, session: &Session, mutation: F)
where
    F: FnOnce(&mut Cart) -> Option<CartEvent> + Send,
{
    match update(session, session_keys::CART, mutation).await {
        Ok(Some(event)) => state.observer().on_event(&event),
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "Failed to update cart in session");
            flash(
                session,
                Notice::error("Your cart could not be updated. Please try again."),
            )
            .await;
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Add one unit of a price to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PriceForm>,
) -> Redirect {
    match lookup_item(&state, &form.price_id).await {
        Ok(item) => mutate_cart(&state, &session, |cart| Some(cart.add_item(&item))).await,
        Err(notice) => flash(&session, notice).await,
    }

    Redirect::to(HOME)
}

/// Set the quantity of a cart entry. Zero or less removes it.
#[instrument(skip(state, session))]
pub async fn update_quantity(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateQuantityForm>,
) -> Redirect {
    let id = match parse_price_id(&form.price_id) {
        Ok(id) => id,
        Err(notice) => {
            flash(&session, notice).await;
            return Redirect::to(HOME);
        }
    };

    let quantity = match parse_quantity(&form.quantity) {
        Ok(quantity) => quantity,
        Err(notice) => {
            flash(&session, notice).await;
            return Redirect::to(HOME);
        }
    };

    mutate_cart(&state, &session, |cart| {
        cart.update_item_quantity(&id, quantity)
    })
    .await;

    Redirect::to(HOME)
}

/// Remove an entry from the cart regardless of its quantity.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PriceForm>,
) -> Redirect {
    match parse_price_id(&form.price_id) {
        Ok(id) => mutate_cart(&state, &session, |cart| cart.remove_item(&id)).await,
        Err(notice) => flash(&session, notice).await,
    }

    Redirect::to(HOME)
}

/// Remove every entry from the cart.
#[instrument(skip(state, session))]
pub async fn empty(State(state): State<AppState>, session: Session) -> Redirect {
    mutate_cart(&state, &session, |cart| Some(cart.empty_cart())).await;

    Redirect::to(HOME)
}
