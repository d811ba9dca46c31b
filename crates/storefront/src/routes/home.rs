//! Home page: live catalog plus the visitor's cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use price_cart_core::{Cart, CartEntry, CatalogItem};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::session::{load, take_notice};
use crate::models::{Notice, session_keys};
use crate::services::catalog::load_catalog;
use crate::state::AppState;

/// Catalog item display data for templates.
#[derive(Clone)]
pub struct CatalogItemView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: Option<String>,
    /// Units of this price already chosen.
    pub quantity: i64,
}

impl CatalogItemView {
    /// Build the view with the quantity already chosen for this price.
    #[must_use]
    pub fn new(item: &CatalogItem, quantity: i64) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            price: format_price(&item.unit_price),
            image: item.image.clone(),
            quantity,
        }
    }

    /// Whether the visitor already has this price in their cart.
    #[must_use]
    pub const fn in_cart(&self) -> bool {
        self.quantity > 0
    }
}

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub quantity: i64,
    pub unit_price: String,
    pub line_price: String,
    /// Quantity posted by the "-" button.
    pub decrement: i64,
    /// Quantity posted by the "+" button.
    pub increment: i64,
}

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            name: entry.name.clone(),
            image: entry.image.clone(),
            quantity: entry.quantity,
            unit_price: format_price(&entry.unit_price),
            line_price: format_price(&entry.line_total()),
            decrement: entry.quantity.saturating_sub(1),
            increment: entry.quantity.saturating_add(1),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub unique_items: usize,
    pub item_count: i64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.entries().iter().map(CartItemView::from).collect(),
            total: format_price(&cart.cart_total()),
            unique_items: cart.total_unique_items(),
            item_count: cart.total_items(),
        }
    }
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Format an amount for display.
pub(crate) fn format_price(amount: &price_cart_core::Money) -> String {
    format!("${amount}")
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<CatalogItemView>,
    pub cart: CartView,
    pub notice: Option<Notice>,
}

/// Display the catalog and cart.
///
/// The catalog is fetched from Stripe on every render; if that fails the
/// page fails with a 502.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<HomeTemplate> {
    let catalog = load_catalog(state.stripe(), state.config().stripe.catalog_limit).await?;
    let cart: Cart = load(&session, session_keys::CART).await?;
    let notice = take_notice(&session).await;

    let products = catalog
        .iter()
        .map(|item| {
            let quantity = cart.get_item(&item.id).map_or(0, |entry| entry.quantity);
            CatalogItemView::new(item, quantity)
        })
        .collect();

    Ok(HomeTemplate {
        products,
        cart: CartView::from(&cart),
        notice,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use price_cart_core::{Money, PriceId};

    use super::*;

    fn item(id: &str, minor: i64) -> CatalogItem {
        CatalogItem::new(
            PriceId::parse(id).unwrap(),
            "Widget",
            Money::from_minor_units(minor).unwrap(),
        )
    }

    #[test]
    fn test_cart_view_totals_and_buttons() {
        let mut cart = Cart::new();
        cart.add_item(&item("price_a", 999));
        cart.add_item(&item("price_a", 999));
        cart.add_item(&item("price_b", 500));

        let view = CartView::from(&cart);
        assert_eq!(view.total, "$24.98");
        assert_eq!(view.unique_items, 2);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.items[0].decrement, 1);
        assert_eq!(view.items[0].increment, 3);
        assert_eq!(view.items[0].line_price, "$19.98");
    }

    #[test]
    fn test_catalog_item_view_marks_in_cart() {
        let view = CatalogItemView::new(&item("price_a", 500), 0);
        assert_eq!(view.price, "$5.00");
        assert!(!view.in_cart());
        assert!(CatalogItemView::new(&item("price_a", 500), 2).in_cart());
    }

    #[test]
    fn test_home_template_renders_empty_cart() {
        let template = HomeTemplate {
            products: vec![CatalogItemView::new(&item("price_a", 999), 0)],
            cart: CartView::from(&Cart::new()),
            notice: Some(Notice::info("Your cart is empty.")),
        };

        let html = template.render().unwrap();
        assert!(html.contains("Your cart is empty"));
        assert!(html.contains("$9.99"));
        assert!(html.contains("Add to Cart"));
        assert!(html.contains(r#"value="price_a""#));
    }
}
