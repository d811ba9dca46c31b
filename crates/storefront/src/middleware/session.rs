//! Session middleware configuration.
//!
//! Sessions live in a bounded in-memory `moka` cache. A cart lives exactly as
//! long as its session: restarting the server, letting the session expire or
//! being evicted once the store is full discards it.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "price_cart_session";

/// Session expiry after inactivity, in seconds (2 hours).
const SESSION_EXPIRY_SECONDS: i64 = 2 * 60 * 60;

/// Most sessions held at once. The least recently used are evicted first.
const MAX_SESSIONS: u64 = 10_000;

/// Create the bounded session store.
///
/// Records are dropped once their expiry date passes, so idle sessions do
/// not accumulate.
#[must_use]
pub fn session_store() -> MokaStore {
    MokaStore::new(Some(MAX_SESSIONS))
}

/// Create the session layer backed by [`session_store`].
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    // Only mark the cookie Secure when served over HTTPS
    let is_secure = config.base_url.scheme() == "https";

    SessionManagerLayer::new(session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::SessionStore;
    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};

    use super::*;

    #[tokio::test]
    async fn test_store_round_trips_live_record() {
        let store = session_store();
        let record = Record {
            id: Id::default(),
            data: HashMap::from([("cart".to_string(), serde_json::json!({"entries": []}))]),
            expiry_date: OffsetDateTime::now_utc() + Duration::hours(1),
        };

        store.save(&record).await.unwrap();

        let loaded = store.load(&record.id).await.unwrap().unwrap();
        assert_eq!(loaded.data, record.data);

        store.delete(&record.id).await.unwrap();
        assert!(store.load(&record.id).await.unwrap().is_none());
    }
}
