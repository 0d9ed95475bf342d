//! Short-lived cache of rendered shortcode HTML.
//!
//! [`Cache`] owns entry freshness: values are stored as JSON
//! `{"html": ..., "timestamp": ...}` in a [`CacheStore`], and a read of an
//! entry older than the TTL removes it and reports a miss. The cache is
//! best-effort. Store failures and undecodable values are logged and treated
//! as misses so a broken store never breaks page rendering.

pub mod clock;
pub mod error;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::StoreError;
pub use store::{CacheStore, MemoryStore, MokaStore};

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Constructor)]
pub struct CacheEntry {
    pub html: String,
    /// Epoch milliseconds at which the entry was produced.
    pub timestamp: i64,
}

impl CacheEntry {
    pub fn is_fresh(&self, now_millis: i64, ttl: Duration) -> bool {
        now_millis - self.timestamp < ttl.as_millis() as i64
    }
}

#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl Cache {
    pub fn new(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self { store, clock, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("cache read for '{}' failed, treating as miss: {}", key, e);
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("discarding undecodable cache entry '{}': {}", key, e);
                self.remove(key).await;
                return None;
            }
        };

        if entry.is_fresh(self.now_millis(), self.ttl) {
            debug!("cache hit for '{}'", key);
            Some(entry)
        } else {
            debug!("cache entry '{}' expired", key);
            self.remove(key).await;
            None
        }
    }

    pub async fn set(&self, key: &str, entry: CacheEntry) {
        if let Err(e) = self.try_set(key, &entry).await {
            warn!("cache write for '{}' failed: {}", key, e);
        }
    }

    async fn try_set(&self, key: &str, entry: &CacheEntry) -> Result<(), StoreError> {
        let raw = serde_json::to_string(entry)?;
        self.store.set(key, raw).await
    }

    pub async fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove(key).await {
            warn!("cache removal of '{}' failed: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("disabled".to_string()))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disabled".to_string()))
        }
    }

    fn cache_with(store: Arc<MemoryStore>, clock: Arc<ManualClock>) -> Cache {
        Cache::new(store, clock, DEFAULT_TTL)
    }

    #[tokio::test]
    async fn test_round_trip_within_ttl() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(1_000));
        let cache = cache_with(store.clone(), clock.clone());

        cache
            .set("sc-1-Travel-3", CacheEntry::new("<p>hi</p>".into(), 1_000))
            .await;
        clock.advance(DEFAULT_TTL - Duration::from_millis(1));

        let entry = cache.get("sc-1-Travel-3").await.unwrap();
        assert_eq!(entry.html, "<p>hi</p>");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_removed() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(1_000));
        let cache = cache_with(store.clone(), clock.clone());

        cache
            .set("sc-1-Travel-3", CacheEntry::new("<p>hi</p>".into(), 1_000))
            .await;
        clock.advance(DEFAULT_TTL);

        assert_eq!(cache.get("sc-1-Travel-3").await, None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        store.set("k", "not json".to_string()).await.unwrap();
        store
            .set("partial", r#"{"html":"x"}"#.to_string())
            .await
            .unwrap();
        let cache = cache_with(store.clone(), Arc::new(ManualClock::new(0)));

        assert_eq!(cache.get("k").await, None);
        assert_eq!(cache.get("partial").await, None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_broken_store_degrades_to_miss() {
        let cache = Cache::new(
            Arc::new(BrokenStore),
            Arc::new(ManualClock::new(0)),
            DEFAULT_TTL,
        );

        cache.set("k", CacheEntry::new("x".into(), 0)).await;
        assert_eq!(cache.get("k").await, None);
        cache.remove("k").await;
    }

    #[test]
    fn test_entry_serialization_shape() {
        let entry = CacheEntry::new("<b>x</b>".into(), 42);
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"html":"<b>x</b>","timestamp":42}"#
        );
    }
}
