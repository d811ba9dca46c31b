//! Quick-buy page.
//!
//! Uses the [`TallyCart`]: each button press counts one unit up or down and
//! lines stay in the tally at zero. Zero lines are dropped only when the
//! checkout request is built.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{Redirect, Response},
};
use price_cart_core::TallyCart;
use tower_sessions::Session;
use tracing::instrument;

use super::cart::{PriceForm, lookup_item, parse_price_id};
use super::checkout::start_checkout;
use super::home::CatalogItemView;
use crate::error::Result;
use crate::middleware::CspNonce;
use crate::models::session::{flash, load, take_notice, update};
use crate::models::{Notice, session_keys};
use crate::services::catalog::load_catalog;
use crate::state::AppState;

const CLASSIC: &str = "/classic";

/// Quick-buy page template.
#[derive(Template, WebTemplate)]
#[template(path = "classic.html")]
pub struct ClassicTemplate {
    pub products: Vec<CatalogItemView>,
    pub notice: Option<Notice>,
}

/// Display the catalog with tally buttons.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<ClassicTemplate> {
    let catalog = load_catalog(state.stripe(), state.config().stripe.catalog_limit).await?;
    let tally: TallyCart = load(&session, session_keys::TALLY).await?;
    let notice = take_notice(&session).await;

    let products = catalog
        .iter()
        .map(|item| CatalogItemView::new(item, tally.quantity_of(&item.id).unwrap_or(0)))
        .collect();

    Ok(ClassicTemplate { products, notice })
}

/// Count one more unit of a price.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PriceForm>,
) -> Redirect {
    let item = match lookup_item(&state, &form.price_id).await {
        Ok(item) => item,
        Err(notice) => {
            flash(&session, notice).await;
            return Redirect::to(CLASSIC);
        }
    };

    match update(&session, session_keys::TALLY, |tally: &mut TallyCart| {
        tally.add(&item.id)
    })
    .await
    {
        Ok(quantity) => tracing::info!(price_id = %item.id, quantity, "Tally incremented"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to update tally in session");
            flash(&session, Notice::error("Your cart could not be updated. Please try again."))
                .await;
        }
    }

    Redirect::to(CLASSIC)
}

/// Count one fewer unit of a price. Never goes below zero.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<PriceForm>) -> Redirect {
    let id = match parse_price_id(&form.price_id) {
        Ok(id) => id,
        Err(notice) => {
            flash(&session, notice).await;
            return Redirect::to(CLASSIC);
        }
    };

    match update(&session, session_keys::TALLY, |tally: &mut TallyCart| {
        tally.remove(&id)
    })
    .await
    {
        Ok(Some(quantity)) => tracing::info!(price_id = %id, quantity, "Tally decremented"),
        Ok(None) => tracing::debug!(price_id = %id, "Price not in tally"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to update tally in session");
            flash(&session, Notice::error("Your cart could not be updated. Please try again."))
                .await;
        }
    }

    Redirect::to(CLASSIC)
}

/// Check out the tally.
#[instrument(skip(state, session, nonce))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> Response {
    start_checkout::<TallyCart>(&state, &session, nonce, session_keys::TALLY, CLASSIC).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use price_cart_core::{CatalogItem, Money, PriceId};

    use super::*;

    #[test]
    fn test_classic_template_shows_cost_and_count() {
        let item = CatalogItem::new(
            PriceId::parse("price_a").unwrap(),
            "Consulting hour",
            Money::from_minor_units(5000).unwrap(),
        );
        let html = ClassicTemplate {
            products: vec![CatalogItemView::new(&item, 2)],
            notice: None,
        }
        .render()
        .unwrap();

        assert!(html.contains("Consulting hour"));
        assert!(html.contains("Cost: $50.00"));
        assert!(html.contains("In cart: 2"));
        assert!(html.contains(r#"action="/classic/remove""#));
    }
}
