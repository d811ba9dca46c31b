//! Cart event logging.

use price_cart_core::{CartEvent, CartObserver};

use crate::error::add_breadcrumb;

/// Observer that logs cart mutations and records them as Sentry breadcrumbs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCartObserver;

impl CartObserver for TracingCartObserver {
    fn on_event(&self, event: &CartEvent) {
        match event {
            CartEvent::ItemAdded(entry) => {
                tracing::info!(price_id = %entry.id, "Item added to cart");
                add_breadcrumb("cart", "Item added", Some(&[("price_id", entry.id.as_str())]));
            }
            CartEvent::ItemUpdated(entry) => {
                let quantity = entry.quantity.to_string();
                tracing::info!(price_id = %entry.id, quantity = entry.quantity, "Cart item updated");
                add_breadcrumb(
                    "cart",
                    "Item updated",
                    Some(&[("price_id", entry.id.as_str()), ("quantity", quantity.as_str())]),
                );
            }
            CartEvent::ItemRemoved(id) => {
                tracing::info!(price_id = %id, "Item removed from cart");
                add_breadcrumb("cart", "Item removed", Some(&[("price_id", id.as_str())]));
            }
            CartEvent::Emptied { removed } => {
                tracing::info!(removed, "Cart emptied");
                add_breadcrumb("cart", "Cart emptied", None);
            }
        }
    }
}
