//! End-to-end storefront flows against the fake Stripe API.
//!
//! Run with: cargo test -p price-cart-integration-tests

use price_cart_integration_tests::{
    FakeStripe, TEST_PUBLISHABLE_KEY, TEST_SECRET_KEY, TestApp, hosted_url, location, price,
};
use reqwest::StatusCode;

async fn shop() -> (FakeStripe, TestApp) {
    let stripe = FakeStripe::start(vec![
        price(
            "price_widget",
            "Widget",
            Some(999),
            &["https://files.stripe.com/widget.png"],
        ),
        price("price_gadget", "Gadget", Some(500), &[]),
    ])
    .await;
    let app = TestApp::spawn(&stripe).await;
    (stripe, app)
}

async fn add(app: &TestApp, price_id: &str) {
    let response = app.post_form("/cart/add", &[("price_id", price_id)]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_home_lists_catalog_with_decimal_prices() {
    let (_stripe, app) = shop().await;

    let html = app.page("/").await;

    assert!(html.contains("Widget"));
    assert!(html.contains("$9.99"));
    assert!(html.contains("$5.00"));
    assert!(html.contains("https://files.stripe.com/widget.png"));
    assert!(html.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_catalog_failure_is_a_bad_gateway() {
    let (stripe, app) = shop().await;
    stripe.set_catalog_down(true);

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(response.text().await.unwrap_or_default(), "External service error");
}

#[tokio::test]
async fn test_malformed_price_fails_the_whole_catalog() {
    let stripe = FakeStripe::start(vec![
        price("price_widget", "Widget", Some(999), &[]),
        price("price_free", "Free sample", None, &[]),
    ])
    .await;
    let app = TestApp::spawn(&stripe).await;

    assert_eq!(app.get("/").await.status(), StatusCode::BAD_GATEWAY);
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_adding_twice_increments_one_entry() {
    let (_stripe, app) = shop().await;

    add(&app, "price_widget").await;
    add(&app, "price_widget").await;

    let html = app.page("/").await;
    assert!(html.contains("Cart (1 - $19.98)"));
    assert!(html.contains("2 x Widget"));
    assert!(html.contains("Add again"));
}

#[tokio::test]
async fn test_cart_total_sums_lines() {
    let (_stripe, app) = shop().await;

    add(&app, "price_widget").await;
    add(&app, "price_widget").await;
    add(&app, "price_gadget").await;

    let html = app.page("/").await;
    assert!(html.contains("Cart (2 - $24.98)"));
}

#[tokio::test]
async fn test_unknown_price_is_rejected_with_notice() {
    let (_stripe, app) = shop().await;

    add(&app, "price_missing").await;

    let html = app.page("/").await;
    assert!(html.contains("That item is not available."));
    assert!(html.contains("Your cart is empty"));

    // The notice is shown once
    assert!(!app.page("/").await.contains("That item is not available."));
}

#[tokio::test]
async fn test_update_to_zero_and_remove_delete_entries() {
    let (_stripe, app) = shop().await;

    add(&app, "price_widget").await;
    add(&app, "price_gadget").await;

    app.post_form(
        "/cart/update",
        &[("price_id", "price_widget"), ("quantity", "0")],
    )
    .await;
    let html = app.page("/").await;
    assert!(!html.contains("x Widget"));
    assert!(html.contains("1 x Gadget"));

    app.post_form("/cart/remove", &[("price_id", "price_gadget")])
        .await;
    assert!(app.page("/").await.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_oversized_quantity_is_rejected_and_cart_still_renders() {
    let (_stripe, app) = shop().await;

    add(&app, "price_widget").await;
    let response = app
        .post_form(
            "/cart/update",
            &[("price_id", "price_widget"), ("quantity", "9223372036854775807")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = app.page("/").await;
    assert!(html.contains("Quantity can be at most 999999."));
    assert!(html.contains("1 x Widget"));

    add(&app, "price_widget").await;
    assert!(app.page("/").await.contains("2 x Widget"));
}

#[tokio::test]
async fn test_empty_cart_clears_everything() {
    let (_stripe, app) = shop().await;

    add(&app, "price_widget").await;
    add(&app, "price_gadget").await;

    let response = app.post_form("/cart/empty", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert!(app.page("/").await.contains("Your cart is empty"));
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_empty_checkout_makes_no_session_call() {
    let (stripe, app) = shop().await;

    let response = app.post_form("/checkout", &[]).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(stripe.session_requests().is_empty());
    assert!(app.page("/").await.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_checkout_redirects_to_hosted_page() {
    let (stripe, app) = shop().await;

    add(&app, "price_widget").await;
    add(&app, "price_widget").await;
    add(&app, "price_gadget").await;

    let response = app.post_form("/checkout", &[]).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), hosted_url(1));

    let requests = stripe.session_requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(
        request.line_items(),
        vec![
            ("price_widget".to_string(), "2".to_string()),
            ("price_gadget".to_string(), "1".to_string()),
        ]
    );
    assert_eq!(request.field("mode"), Some("payment"));
    assert_eq!(request.field("payment_method_types[0]"), Some("card"));
    assert_eq!(request.field("success_url"), Some(app.url("/").as_str()));
    assert_eq!(request.field("cancel_url"), Some(app.url("/").as_str()));
    assert_eq!(
        request.authorization.as_deref(),
        Some(format!("Bearer {TEST_SECRET_KEY}").as_str())
    );

    // The cart is kept so a cancelled payment returns to it
    assert!(app.page("/").await.contains("2 x Widget"));
}

#[tokio::test]
async fn test_checkout_retries_once_then_succeeds() {
    let (stripe, app) = shop().await;
    stripe.fail_next_sessions(1);

    add(&app, "price_widget").await;
    let response = app.post_form("/checkout", &[]).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), hosted_url(2));
    assert_eq!(stripe.session_requests().len(), 2);
}

#[tokio::test]
async fn test_checkout_failure_keeps_cart_and_shows_notice() {
    let (stripe, app) = shop().await;
    stripe.fail_next_sessions(2);

    add(&app, "price_widget").await;
    let response = app.post_form("/checkout", &[]).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert_eq!(stripe.session_requests().len(), 2);

    let html = app.page("/").await;
    assert!(html.contains("Your cart is unchanged"));
    assert!(html.contains("1 x Widget"));
}

#[tokio::test]
async fn test_checkout_without_hosted_url_hands_off_to_stripe_js() {
    let (stripe, app) = shop().await;
    stripe.omit_session_url();

    add(&app, "price_widget").await;
    let response = app.post_form("/checkout", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    let csp = response
        .headers()
        .get("content-security-policy")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let html = response.text().await.unwrap_or_default();

    assert!(html.contains(r#"data-session-id="cs_test_1""#));
    assert!(html.contains(&format!(r#"data-publishable-key="{TEST_PUBLISHABLE_KEY}""#)));
    assert!(!html.contains(TEST_SECRET_KEY));
    assert!(csp.contains("https://js.stripe.com"));
    assert!(csp.contains("'nonce-"));
}

// ============================================================================
// Quick buy (tally cart)
// ============================================================================

#[tokio::test]
async fn test_classic_remove_clamps_at_zero_and_checkout_filters_zeros() {
    let (stripe, app) = shop().await;

    for price_id in ["price_widget", "price_widget", "price_gadget"] {
        let response = app
            .post_form("/classic/add", &[("price_id", price_id)])
            .await;
        assert_eq!(location(&response), "/classic");
    }
    for _ in 0..2 {
        app.post_form("/classic/remove", &[("price_id", "price_gadget")])
            .await;
    }

    let html = app.page("/classic").await;
    assert!(html.contains("In cart: 2"));
    assert!(html.contains("In cart: 0"));

    let response = app.post_form("/classic/checkout", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), hosted_url(1));

    let requests = stripe.session_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].line_items(),
        vec![("price_widget".to_string(), "2".to_string())]
    );
    assert_eq!(
        requests[0].field("success_url"),
        Some(app.url("/classic").as_str())
    );
}

#[tokio::test]
async fn test_classic_all_zero_tally_is_empty() {
    let (stripe, app) = shop().await;

    app.post_form("/classic/add", &[("price_id", "price_gadget")])
        .await;
    app.post_form("/classic/remove", &[("price_id", "price_gadget")])
        .await;

    let response = app.post_form("/classic/checkout", &[]).await;

    assert_eq!(location(&response), "/classic");
    assert!(stripe.session_requests().is_empty());
    assert!(app.page("/classic").await.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_carts_are_per_visitor() {
    let (_stripe, app) = shop().await;
    add(&app, "price_widget").await;

    let other = app.new_visitor();
    assert!(other.page("/").await.contains("Your cart is empty"));
    assert!(app.page("/").await.contains("1 x Widget"));
}
