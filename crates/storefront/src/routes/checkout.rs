//! Checkout route handlers.
//!
//! Turns the session cart into a hosted checkout session. Quantities of zero
//! or less never reach Stripe; a cart with nothing left to buy never makes a
//! request at all. The cart is not cleared once a session exists, so a
//! cancelled payment returns to the same cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use price_cart_core::{Cart, CheckoutError, CheckoutSessionRequest, LineItemSource};
use serde::de::DeserializeOwned;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::middleware::CspNonce;
use crate::models::session::{flash, load};
use crate::models::{Notice, session_keys};
use crate::services::checkout::{CheckoutRedirect, open_session};
use crate::state::AppState;

/// Stripe.js hand-off page, used when Stripe returns no hosted URL.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/redirect.html")]
pub struct StripeRedirectTemplate {
    pub session_id: String,
    pub publishable_key: String,
    pub return_path: String,
    pub nonce: String,
}

/// Start checkout for the cart stored under `key`, returning to `page_path`.
///
/// Shared by the home page and the quick-buy page.
pub(crate) async fn start_checkout<S>(
    state: &AppState,
    session: &Session,
    nonce: String,
    key: &str,
    page_path: &str,
) -> Response
where
    S: LineItemSource + DeserializeOwned + Default + Send + Sync,
{
    let cart: S = match load(session, key).await {
        Ok(cart) => cart,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read cart from session");
            flash(
                session,
                Notice::error("We couldn't read your cart. Please try again."),
            )
            .await;
            return Redirect::to(page_path).into_response();
        }
    };

    let page_url = state.config().page_url(page_path);
    let request = match CheckoutSessionRequest::for_page(
        &page_url,
        &cart,
        &state.config().stripe.payment_method_types,
    ) {
        Ok(request) => request,
        Err(CheckoutError::EmptyCart) => {
            tracing::info!("Checkout requested with an empty cart");
            flash(session, Notice::info("Your cart is empty.")).await;
            return Redirect::to(page_path).into_response();
        }
    };

    add_breadcrumb("checkout", "Checkout started", Some(&[("page", page_path)]));

    match open_session(state.stripe(), &request).await {
        Ok(checkout) => match CheckoutRedirect::for_session(
            checkout,
            &state.config().stripe.publishable_key,
        ) {
            CheckoutRedirect::Hosted(url) => Redirect::to(&url).into_response(),
            CheckoutRedirect::StripeJs {
                session_id,
                publishable_key,
            } => StripeRedirectTemplate {
                session_id,
                publishable_key,
                return_path: page_path.to_string(),
                nonce,
            }
            .into_response(),
        },
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(
                error = %e,
                sentry_event_id = %event_id,
                "Checkout session creation failed"
            );
            flash(
                session,
                Notice::error("We couldn't start checkout. Your cart is unchanged, please try again."),
            )
            .await;
            Redirect::to(page_path).into_response()
        }
    }
}

/// Check out the home page cart.
#[instrument(skip(state, session, nonce))]
pub async fn checkout_cart(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> Response {
    start_checkout::<Cart>(&state, &session, nonce, session_keys::CART, "/").await
}
