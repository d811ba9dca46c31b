//! Cart change notifications.

use crate::cart::CartEntry;
use crate::types::PriceId;

/// What a cart mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A new entry was created with quantity 1.
    ItemAdded(CartEntry),
    /// An existing entry's quantity changed.
    ItemUpdated(CartEntry),
    /// An entry was deleted.
    ItemRemoved(PriceId),
    /// Every entry was cleared.
    Emptied {
        /// Number of entries removed.
        removed: usize,
    },
}

/// Receives cart events after a mutation has been applied.
///
/// Observers are advisory. The cart never waits on them and nothing about
/// cart state depends on whether one ran.
pub trait CartObserver {
    /// Called once per applied mutation.
    fn on_event(&self, event: &CartEvent);
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CartObserver for NoopObserver {
    fn on_event(&self, _event: &CartEvent) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::cart::Cart;
    use crate::catalog::CatalogItem;
    use crate::types::Money;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<CartEvent>>);

    impl CartObserver for Recorder {
        fn on_event(&self, event: &CartEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    #[test]
    fn test_observer_sees_each_mutation() {
        let item = CatalogItem::new(PriceId::parse("p1").unwrap(), "Widget", Money::ZERO);
        let recorder = Recorder::default();
        let mut cart = Cart::new();

        recorder.on_event(&cart.add_item(&item));
        recorder.on_event(&cart.add_item(&item));
        if let Some(event) = cart.remove_item(&item.id) {
            recorder.on_event(&event);
        }

        let events = recorder.0.borrow();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], CartEvent::ItemAdded(_)));
        assert!(matches!(events[1], CartEvent::ItemUpdated(_)));
        assert_eq!(events[2], CartEvent::ItemRemoved(item.id.clone()));
    }

    #[test]
    fn test_noop_observer_leaves_cart_alone() {
        let item = CatalogItem::new(PriceId::parse("p1").unwrap(), "Widget", Money::ZERO);
        let mut cart = Cart::new();

        NoopObserver.on_event(&cart.add_item(&item));

        assert_eq!(cart.total_unique_items(), 1);
    }
}
