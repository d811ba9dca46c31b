//! Session-related types.
//!
//! Each visitor's cart is stored in their session and read, mutated and
//! written back within a single request. Nothing here outlives the session.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tower_sessions::Session;

/// Severity of a one-shot notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

impl NoticeLevel {
    /// CSS modifier for the notice banner.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// Message shown once on the next page render, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    /// Informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for the main page's keyed cart.
    pub const CART: &str = "cart";

    /// Key for the quick-buy page's tally.
    pub const TALLY: &str = "tally";

    /// Key for the pending one-shot notice.
    pub const NOTICE: &str = "notice";
}

/// Read a value from the session, falling back to its default when absent.
///
/// # Errors
///
/// Returns an error if the session store fails or the stored value does not
/// deserialize.
pub async fn load<T>(session: &Session, key: &str) -> Result<T, tower_sessions::session::Error>
where
    T: DeserializeOwned + Default,
{
    Ok(session.get::<T>(key).await?.unwrap_or_default())
}

/// Write a value to the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn store<T>(
    session: &Session,
    key: &str,
    value: &T,
) -> Result<(), tower_sessions::session::Error>
where
    T: Serialize + Sync,
{
    session.insert(key, value).await
}

/// Load a value, apply `f` to it and write it back.
///
/// Nothing is written if loading fails.
///
/// This is not atomic across requests. Each request works on its own copy
/// of the session record, which is persisted when the response is sent, so
/// two overlapping posts from one visitor are last-write-wins and one of the
/// two mutations can be lost. Within a single request, calls see each
/// other's writes.
///
/// # Errors
///
/// Returns an error if the session store fails on either side.
pub async fn update<T, R, F>(
    session: &Session,
    key: &str,
    f: F,
) -> Result<R, tower_sessions::session::Error>
where
    T: Serialize + DeserializeOwned + Default + Send + Sync,
    F: FnOnce(&mut T) -> R + Send,
    R: Send,
{
    let mut value: T = load(session, key).await?;
    let result = f(&mut value);
    store(session, key, &value).await?;
    Ok(result)
}

/// Queue a notice for the next page render.
pub async fn flash(session: &Session, notice: Notice) {
    if let Err(e) = session.insert(keys::NOTICE, &notice).await {
        tracing::warn!("Failed to store notice in session: {e}");
    }
}

/// Take the pending notice, if any.
pub async fn take_notice(session: &Session) -> Option<Notice> {
    session
        .remove::<Notice>(keys::NOTICE)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to read notice from session: {e}");
            None
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use price_cart_core::{Cart, CatalogItem, Money, PriceId, TallyCart};

    use super::*;
    use crate::middleware::session::session_store;

    fn session() -> Session {
        Session::new(None, Arc::new(session_store()), None)
    }

    #[tokio::test]
    async fn test_load_defaults_when_absent() {
        let session = session();
        let cart: Cart = load(&session, keys::CART).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_store_then_load_cart() {
        let session = session();
        let mut cart = Cart::new();
        cart.add_item(&CatalogItem::new(
            PriceId::parse("price_a").unwrap(),
            "Widget",
            Money::from_minor_units(999).unwrap(),
        ));

        store(&session, keys::CART, &cart).await.unwrap();
        let loaded: Cart = load(&session, keys::CART).await.unwrap();

        assert_eq!(loaded, cart);
    }

    #[tokio::test]
    async fn test_update_writes_back() {
        let session = session();
        let price = PriceId::parse("price_a").unwrap();

        let quantity = update(&session, keys::TALLY, |tally: &mut TallyCart| tally.add(&price))
            .await
            .unwrap();
        assert_eq!(quantity, 1);

        let tally: TallyCart = load(&session, keys::TALLY).await.unwrap();
        assert_eq!(tally.quantity_of(&price), Some(1));
    }

    #[tokio::test]
    async fn test_updates_in_one_request_compose() {
        let session = session();
        let price = PriceId::parse("price_a").unwrap();

        update(&session, keys::TALLY, |tally: &mut TallyCart| tally.add(&price))
            .await
            .unwrap();
        let quantity = update(&session, keys::TALLY, |tally: &mut TallyCart| tally.add(&price))
            .await
            .unwrap();

        assert_eq!(quantity, 2);
    }

    #[tokio::test]
    async fn test_notice_is_taken_once() {
        let session = session();
        flash(&session, Notice::info("Your cart is empty.")).await;

        assert_eq!(
            take_notice(&session).await,
            Some(Notice::info("Your cart is empty."))
        );
        assert_eq!(take_notice(&session).await, None);
    }
}
