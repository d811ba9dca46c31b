//! Turning cart contents into a checkout session request.
//!
//! # Flow
//!
//! 1. Read `(price id, quantity)` pairs from any [`LineItemSource`]
//! 2. Drop pairs whose quantity is zero or negative
//! 3. Fail with [`CheckoutError::EmptyCart`] if nothing is left
//! 4. Wrap the line items in a [`CheckoutSessionRequest`]
//!
//! Submitting the request and redirecting the browser are the storefront's
//! job; this module never performs I/O.

use serde::{Deserialize, Serialize};

use crate::cart::{Cart, TallyCart};
use crate::types::PriceId;

/// Errors from the checkout transformation.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutError {
    /// No line had a positive quantity.
    #[error("cart is empty")]
    EmptyCart,
}

/// A price and a strictly positive quantity, ready to send to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLineItem {
    pub price: PriceId,
    pub quantity: u64,
}

/// Anything that can list `(price id, quantity)` pairs for checkout.
pub trait LineItemSource {
    /// Every stored pair, including non-positive quantities.
    fn checkout_lines(&self) -> impl Iterator<Item = (&PriceId, i64)>;
}

impl LineItemSource for Cart {
    fn checkout_lines(&self) -> impl Iterator<Item = (&PriceId, i64)> {
        self.entries()
            .iter()
            .map(|entry| (&entry.id, entry.quantity))
    }
}

impl LineItemSource for TallyCart {
    fn checkout_lines(&self) -> impl Iterator<Item = (&PriceId, i64)> {
        self.lines().iter().map(|line| (&line.price, line.quantity))
    }
}

/// Build the line items for a checkout, keeping only positive quantities.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] when no line has a positive quantity.
///
/// ```
/// use price_cart_core::{PriceId, TallyCart, line_items};
///
/// let p1 = PriceId::parse("p1").unwrap();
/// let p2 = PriceId::parse("p2").unwrap();
///
/// let mut tally = TallyCart::new();
/// tally.add(&p1);
/// tally.add(&p1);
/// tally.add(&p2);
/// tally.remove(&p2);
///
/// let items = line_items(&tally).unwrap();
/// assert_eq!(items.len(), 1);
/// assert_eq!(items[0].price, p1);
/// assert_eq!(items[0].quantity, 2);
/// ```
pub fn line_items<S>(source: &S) -> Result<Vec<CheckoutLineItem>, CheckoutError>
where
    S: LineItemSource + ?Sized,
{
    let items: Vec<CheckoutLineItem> = source
        .checkout_lines()
        .filter_map(|(price, quantity)| {
            u64::try_from(quantity)
                .ok()
                .filter(|quantity| *quantity > 0)
                .map(|quantity| CheckoutLineItem {
                    price: price.clone(),
                    quantity,
                })
        })
        .collect();

    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    Ok(items)
}

/// Payment method types accepted on the hosted page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    #[default]
    Card,
    Link,
    UsBankAccount,
    SepaDebit,
}

impl PaymentMethodType {
    /// Wire name used by the provider.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Link => "link",
            Self::UsBankAccount => "us_bank_account",
            Self::SepaDebit => "sepa_debit",
        }
    }
}

impl std::str::FromStr for PaymentMethodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "card" => Ok(Self::Card),
            "link" => Ok(Self::Link),
            "us_bank_account" => Ok(Self::UsBankAccount),
            "sepa_debit" => Ok(Self::SepaDebit),
            other => Err(format!("unsupported payment method type: {other}")),
        }
    }
}

/// Checkout session mode. The storefront only sells one-time purchases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutMode {
    #[default]
    Payment,
}

impl CheckoutMode {
    /// Wire name used by the provider.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
        }
    }
}

/// Everything needed to open a hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSessionRequest {
    pub success_url: String,
    pub cancel_url: String,
    pub line_items: Vec<CheckoutLineItem>,
    pub payment_method_types: Vec<PaymentMethodType>,
    pub mode: CheckoutMode,
}

impl CheckoutSessionRequest {
    /// Build a one-time payment request that returns to `page_url` on both
    /// success and cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] when `source` has no line with a
    /// positive quantity.
    pub fn for_page<S>(
        page_url: &str,
        source: &S,
        payment_method_types: &[PaymentMethodType],
    ) -> Result<Self, CheckoutError>
    where
        S: LineItemSource + ?Sized,
    {
        let line_items = line_items(source)?;
        let payment_method_types = if payment_method_types.is_empty() {
            vec![PaymentMethodType::default()]
        } else {
            payment_method_types.to_vec()
        };

        Ok(Self {
            success_url: page_url.to_owned(),
            cancel_url: page_url.to_owned(),
            line_items,
            payment_method_types,
            mode: CheckoutMode::Payment,
        })
    }
}
