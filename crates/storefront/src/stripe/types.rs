//! Wire types for the Stripe REST API.
//!
//! Only the fields the storefront reads are modelled. Anything Stripe may
//! omit or null is an `Option` so that malformed data is reported by the
//! conversion layer instead of failing deep inside serde.

use serde::Deserialize;

/// A page of list results.
#[derive(Debug, Clone, Deserialize)]
pub struct List<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

/// A field Stripe returns either as an id or, when requested through
/// `expand[]`, as the full object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    Object(Box<T>),
    Id(String),
}

/// A Stripe price.
#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    pub id: String,
    #[serde(default)]
    pub active: bool,
    /// Amount in minor units. `null` for tiered or customer-chosen prices.
    pub unit_amount: Option<i64>,
    #[serde(default)]
    pub currency: String,
    pub product: Expandable<Product>,
}

/// A Stripe product.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

/// A created checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Session handle passed to `redirectToCheckout`.
    pub id: String,
    /// Hosted payment page, when Stripe returns one.
    #[serde(default)]
    pub url: Option<String>,
}

/// Error envelope returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

/// Stripe error object.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

/// Query for `GET /v1/prices`.
#[derive(Debug, Clone, Copy)]
pub struct ListPrices {
    pub active: bool,
    pub limit: u8,
    pub expand_product: bool,
}

impl ListPrices {
    /// Active prices with their products expanded.
    #[must_use]
    pub const fn active(limit: u8) -> Self {
        Self {
            active: true,
            limit,
            expand_product: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_with_expanded_product() {
        let json = r#"{
            "id": "price_1",
            "object": "price",
            "active": true,
            "unit_amount": 999,
            "currency": "usd",
            "product": {
                "id": "prod_1",
                "object": "product",
                "name": "Widget",
                "images": ["https://files.stripe.com/widget.png"]
            }
        }"#;

        let price: Price = serde_json::from_str(json).unwrap();

        assert_eq!(price.unit_amount, Some(999));
        let Expandable::Object(product) = price.product else {
            panic!("product should be expanded");
        };
        assert_eq!(product.name.as_deref(), Some("Widget"));
    }

    #[test]
    fn test_price_with_product_id() {
        let json = r#"{"id": "price_1", "unit_amount": null, "product": "prod_1"}"#;

        let price: Price = serde_json::from_str(json).unwrap();

        assert!(price.unit_amount.is_none());
        assert!(matches!(price.product, Expandable::Id(ref id) if id == "prod_1"));
    }

    #[test]
    fn test_error_response() {
        let json = r#"{"error": {"type": "invalid_request_error", "code": "resource_missing", "message": "No such price"}}"#;

        let response: ErrorResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.error.kind.as_deref(), Some("invalid_request_error"));
        assert_eq!(response.error.code.as_deref(), Some("resource_missing"));
    }
}
