//! Integration test harness for Price Cart.
//!
//! Starts the real storefront router on an ephemeral port, pointed at an
//! in-process fake of the Stripe REST API. Tests drive the storefront with a
//! cookie-keeping `reqwest` client that does not follow redirects, then
//! inspect what the fake received.
//!
//! ```rust,ignore
//! let stripe = FakeStripe::start(vec![price("price_a", "Widget", Some(999), &[])]).await;
//! let app = TestApp::spawn(&stripe).await;
//!
//! app.post_form("/cart/add", &[("price_id", "price_a")]).await;
//! assert!(app.page("/").await.contains("1 x Widget"));
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use price_cart_core::PaymentMethodType;
use price_cart_storefront::config::{SentryConfig, StorefrontConfig, StripeConfig};
use price_cart_storefront::router;
use price_cart_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

/// Secret key the storefront under test is configured with.
pub const TEST_SECRET_KEY: &str = "sk_test_4eC39HqLyjWDarjtT1zdp7dc";

/// Publishable key the storefront under test is configured with.
pub const TEST_PUBLISHABLE_KEY: &str = "pk_test_TYooMQauvdEDq54NiTphI7jx";

/// Hosted page URL returned by the fake for session `cs_test_{n}`.
#[must_use]
pub fn hosted_url(n: usize) -> String {
    format!("https://checkout.stripe.com/c/pay/cs_test_{n}")
}

/// A Stripe price object with its product expanded.
#[must_use]
pub fn price(id: &str, name: &str, unit_amount: Option<i64>, images: &[&str]) -> Value {
    json!({
        "id": id,
        "object": "price",
        "active": true,
        "currency": "usd",
        "unit_amount": unit_amount,
        "product": {
            "id": format!("prod_{id}"),
            "object": "product",
            "name": name,
            "images": images,
        },
    })
}

// =============================================================================
// Fake Stripe
// =============================================================================

/// One `POST /v1/checkout/sessions` as received by the fake.
#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub form: Vec<(String, String)>,
    pub authorization: Option<String>,
}

impl SessionRequest {
    /// First value posted for `key`.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All `(price, quantity)` line items, in index order.
    #[must_use]
    pub fn line_items(&self) -> Vec<(String, String)> {
        (0..)
            .map_while(|i| {
                let price = self.field(&format!("line_items[{i}][price]"))?;
                let quantity = self.field(&format!("line_items[{i}][quantity]"))?;
                Some((price.to_string(), quantity.to_string()))
            })
            .collect()
    }
}

#[derive(Default)]
struct FakeStripeInner {
    prices: Vec<Value>,
    catalog_down: bool,
    session_failures: u32,
    omit_session_url: bool,
    session_requests: Vec<SessionRequest>,
}

/// In-process stand-in for the Stripe REST API.
#[derive(Clone)]
pub struct FakeStripe {
    addr: SocketAddr,
    inner: Arc<Mutex<FakeStripeInner>>,
}

impl FakeStripe {
    /// Serve `prices` on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(prices: Vec<Value>) -> Self {
        let inner = Arc::new(Mutex::new(FakeStripeInner {
            prices,
            ..FakeStripeInner::default()
        }));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake Stripe");
        let addr = listener.local_addr().expect("Fake Stripe has no address");

        let fake = Self { addr, inner };

        let app = Router::new()
            .route("/v1/prices", get(list_prices))
            .route("/v1/prices/{id}", get(get_price))
            .route("/v1/checkout/sessions", post(create_session))
            .with_state(fake.clone());

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        fake
    }

    fn lock(&self) -> MutexGuard<'_, FakeStripeInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Base URL to configure as `STRIPE_API_BASE`.
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a URL.
    #[must_use]
    pub fn api_base(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("Invalid fake Stripe URL")
    }

    /// Make `GET /v1/prices` answer 500.
    pub fn set_catalog_down(&self, down: bool) {
        self.lock().catalog_down = down;
    }

    /// Answer the next `n` session requests with 500.
    pub fn fail_next_sessions(&self, n: u32) {
        self.lock().session_failures = n;
    }

    /// Create sessions without a hosted `url`.
    pub fn omit_session_url(&self) {
        self.lock().omit_session_url = true;
    }

    /// Every session request received so far.
    #[must_use]
    pub fn session_requests(&self) -> Vec<SessionRequest> {
        self.lock().session_requests.clone()
    }
}

fn stripe_error(status: StatusCode, kind: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": { "type": kind, "message": message } })),
    )
        .into_response()
}

async fn list_prices(State(fake): State<FakeStripe>) -> Response {
    let inner = fake.lock();
    if inner.catalog_down {
        return stripe_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "api_error",
            "Something went wrong",
        );
    }

    Json(json!({
        "object": "list",
        "data": inner.prices,
        "has_more": false,
    }))
    .into_response()
}

async fn get_price(State(fake): State<FakeStripe>, Path(id): Path<String>) -> Response {
    let inner = fake.lock();
    inner
        .prices
        .iter()
        .find(|price| price["id"] == id.as_str())
        .map_or_else(
            || {
                stripe_error(
                    StatusCode::NOT_FOUND,
                    "invalid_request_error",
                    &format!("No such price: '{id}'"),
                )
            },
            |price| Json(price.clone()).into_response(),
        )
}

async fn create_session(
    State(fake): State<FakeStripe>,
    headers: HeaderMap,
    Form(form): Form<Vec<(String, String)>>,
) -> Response {
    let mut inner = fake.lock();
    inner.session_requests.push(SessionRequest {
        form,
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    });

    if inner.session_failures > 0 {
        inner.session_failures -= 1;
        return stripe_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "api_error",
            "Something went wrong",
        );
    }

    let n = inner.session_requests.len();
    let url = (!inner.omit_session_url).then(|| hosted_url(n));

    Json(json!({
        "id": format!("cs_test_{n}"),
        "object": "checkout.session",
        "url": url,
    }))
    .into_response()
}

// =============================================================================
// Storefront under test
// =============================================================================

/// A running storefront and a browser-like client for it.
pub struct TestApp {
    pub base_url: Url,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Start the storefront against `stripe`.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be bound or the state cannot be built.
    pub async fn spawn(stripe: &FakeStripe) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind storefront");
        let addr = listener.local_addr().expect("Storefront has no address");
        let base_url =
            Url::parse(&format!("http://{addr}/")).expect("Invalid storefront URL");

        let config = StorefrontConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: base_url.clone(),
            stripe: StripeConfig {
                api_base: stripe.api_base(),
                api_version: "2020-08-27".to_string(),
                secret_key: SecretString::from(TEST_SECRET_KEY),
                publishable_key: TEST_PUBLISHABLE_KEY.to_string(),
                catalog_limit: 10,
                payment_method_types: vec![PaymentMethodType::Card],
                timeout: Duration::from_secs(5),
            },
            sentry: SentryConfig::default(),
        };

        let app = router(AppState::new(config).expect("Failed to build app state"));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url,
            client: browser(),
        }
    }

    /// Same storefront, fresh cookie jar.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: browser(),
        }
    }

    /// Absolute URL for a storefront path.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not join onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        self.base_url
            .join(path.trim_start_matches('/'))
            .expect("Invalid path")
    }

    /// GET a page.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    /// GET a page, assert 200 and return its body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the page is not 200.
    pub async fn page(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK, "GET {path}");
        response.text().await.expect("Failed to read body")
    }

    /// POST a form without following the redirect.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }
}

/// Client that keeps cookies and does not follow redirects.
fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// `Location` header of a redirect.
///
/// # Panics
///
/// Panics if the response has no `Location` header.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("Response has no Location header")
        .to_string()
}
