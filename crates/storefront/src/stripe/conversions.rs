//! Conversions between Stripe wire types and the core domain.

use price_cart_core::{CatalogItem, CheckoutSessionRequest, Money, PriceId};

use super::StripeError;
use super::types::{Expandable, Price};

/// Map a price (with its product expanded) to a catalog item.
///
/// # Errors
///
/// Returns [`StripeError::Malformed`] if the id is not a valid price id,
/// the amount is missing or negative, or the product was not expanded.
/// A product without images is not an error; the item just has no image.
pub fn catalog_item(price: Price) -> Result<CatalogItem, StripeError> {
    let id = PriceId::parse(&price.id)
        .map_err(|e| StripeError::Malformed(format!("price id {:?}: {e}", price.id)))?;

    let minor_units = price
        .unit_amount
        .ok_or_else(|| StripeError::Malformed(format!("price {id} has no unit_amount")))?;
    let unit_price = Money::from_minor_units(minor_units)
        .map_err(|e| StripeError::Malformed(format!("price {id}: {e}")))?;

    let product = match price.product {
        Expandable::Object(product) => product,
        Expandable::Id(product_id) => {
            return Err(StripeError::Malformed(format!(
                "price {id} product {product_id} was not expanded"
            )));
        }
    };

    let image = product.images.unwrap_or_default().into_iter().next();

    Ok(CatalogItem::new(id, product.name.unwrap_or_default(), unit_price).with_image(image))
}

/// Form body for `POST /v1/checkout/sessions`.
///
/// Stripe expects bracketed keys for nested and list parameters, e.g.
/// `line_items[0][price]`.
#[must_use]
pub fn checkout_session_form(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
        ("mode".to_string(), request.mode.as_str().to_string()),
    ];

    for (i, method) in request.payment_method_types.iter().enumerate() {
        form.push((
            format!("payment_method_types[{i}]"),
            method.as_str().to_string(),
        ));
    }

    for (i, item) in request.line_items.iter().enumerate() {
        form.push((
            format!("line_items[{i}][price]"),
            item.price.as_str().to_string(),
        ));
        form.push((
            format!("line_items[{i}][quantity]"),
            item.quantity.to_string(),
        ));
    }

    form
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use price_cart_core::{
        CheckoutLineItem, CheckoutMode, PaymentMethodType, TallyCart,
    };

    use super::*;
    use crate::stripe::types::Product;

    fn price(id: &str, unit_amount: Option<i64>, images: Option<Vec<&str>>) -> Price {
        Price {
            id: id.to_string(),
            active: true,
            unit_amount,
            currency: "usd".to_string(),
            product: Expandable::Object(Box::new(Product {
                id: "prod_1".to_string(),
                name: Some("Widget".to_string()),
                images: images.map(|urls| urls.into_iter().map(String::from).collect()),
            })),
        }
    }

    #[test]
    fn test_catalog_item_maps_amount_and_image() {
        let item = catalog_item(price("price_1", Some(999), Some(vec!["https://img/1.png", "https://img/2.png"]))).unwrap();

        assert_eq!(item.id.as_str(), "price_1");
        assert_eq!(item.name, "Widget");
        assert_eq!(item.unit_price.to_string(), "9.99");
        assert_eq!(item.image.as_deref(), Some("https://img/1.png"));
        assert_eq!(item.quantity, 0);
    }

    #[test]
    fn test_empty_images_yield_no_image() {
        let item = catalog_item(price("price_1", Some(500), Some(vec![]))).unwrap();
        assert!(item.image.is_none());
        assert_eq!(item.unit_price.to_string(), "5.00");
    }

    #[test]
    fn test_missing_images_yield_no_image() {
        let item = catalog_item(price("price_1", Some(500), None)).unwrap();
        assert!(item.image.is_none());
    }

    #[test]
    fn test_missing_unit_amount_is_malformed() {
        let err = catalog_item(price("price_1", None, None)).unwrap_err();
        assert!(matches!(err, StripeError::Malformed(_)));
    }

    #[test]
    fn test_negative_unit_amount_is_malformed() {
        let err = catalog_item(price("price_1", Some(-100), None)).unwrap_err();
        assert!(matches!(err, StripeError::Malformed(_)));
    }

    #[test]
    fn test_unexpanded_product_is_malformed() {
        let mut p = price("price_1", Some(100), None);
        p.product = Expandable::Id("prod_1".to_string());

        let err = catalog_item(p).unwrap_err();
        assert!(matches!(err, StripeError::Malformed(_)));
    }

    #[test]
    fn test_checkout_session_form() {
        let request = CheckoutSessionRequest {
            success_url: "https://shop.test/".to_string(),
            cancel_url: "https://shop.test/".to_string(),
            line_items: vec![
                CheckoutLineItem {
                    price: PriceId::parse("price_a").unwrap(),
                    quantity: 2,
                },
                CheckoutLineItem {
                    price: PriceId::parse("price_b").unwrap(),
                    quantity: 1,
                },
            ],
            payment_method_types: vec![PaymentMethodType::Card],
            mode: CheckoutMode::Payment,
        };

        let form = checkout_session_form(&request);
        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("success_url"), Some("https://shop.test/"));
        assert_eq!(get("cancel_url"), Some("https://shop.test/"));
        assert_eq!(get("mode"), Some("payment"));
        assert_eq!(get("payment_method_types[0]"), Some("card"));
        assert_eq!(get("line_items[0][price]"), Some("price_a"));
        assert_eq!(get("line_items[0][quantity]"), Some("2"));
        assert_eq!(get("line_items[1][price]"), Some("price_b"));
        assert_eq!(get("line_items[1][quantity]"), Some("1"));
        assert_eq!(get("line_items[2][price]"), None);
    }

    #[test]
    fn test_form_only_carries_positive_lines() {
        let p1 = PriceId::parse("p1").unwrap();
        let p2 = PriceId::parse("p2").unwrap();
        let mut tally = TallyCart::new();
        tally.add(&p1);
        tally.add(&p1);
        tally.add(&p2);
        tally.remove(&p2);

        let request = CheckoutSessionRequest::for_page("https://shop.test/", &tally, &[]).unwrap();
        let form = checkout_session_form(&request);

        let line_keys: Vec<&str> = form
            .iter()
            .filter(|(k, _)| k.starts_with("line_items"))
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(line_keys, ["line_items[0][price]", "line_items[0][quantity]"]);
    }
}
