//! Bounded, TTL-based in-memory cache for resolved upstream lookups.
//!
//! Schedule fetches and stat resolutions are memoized here so repeated
//! dashboard refreshes within the revalidation window do not hammer the
//! stats API. Entries expire after a configurable TTL and the map is
//! capacity-bounded: when full, the oldest entry is evicted. Both knobs
//! come from configuration.
//!
//! The random recent-form term is never cached, only resolved stat and
//! schedule values, which are idempotent given identical inputs.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Thread-safe cache with per-entry expiry and oldest-first eviction.
#[derive(Clone)]
pub struct TtlCache<K, V> {
    inner: Arc<RwLock<HashMap<K, Entry<V>>>>,
    ttl: Duration,
    capacity: usize,
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        TtlCache {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Fetch a live (non-expired) entry.
    pub async fn get(&self, key: &K) -> Option<V> {
        let inner = self.inner.read().await;
        inner
            .get(key)
            .filter(|e| e.inserted_at.elapsed() < self.ttl)
            .map(|e| e.value.clone())
    }

    /// Insert an entry, purging expired ones and evicting the oldest live
    /// entry if the cache is still at capacity afterwards.
    pub async fn insert(&self, key: K, value: V) {
        let mut inner = self.inner.write().await;
        inner.retain(|_, e| e.inserted_at.elapsed() < self.ttl);

        if inner.len() >= self.capacity && !inner.contains_key(&key) {
            if let Some(oldest) = inner
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone())
            {
                debug!("cache at capacity ({}), evicting {:?}", self.capacity, oldest);
                inner.remove(&oldest);
            }
        }

        inner.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently held, expired or not.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_inserted_value() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60), 8);
        cache.insert("a".to_string(), 1).await;
        assert_eq!(cache.get(&"a".to_string()).await, Some(1));
        assert_eq!(cache.get(&"b".to_string()).await, None);
    }

    #[tokio::test]
    async fn expired_entries_are_not_returned() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_millis(20), 8);
        cache.insert("a".to_string(), 1).await;
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get(&"a".to_string()).await, None);
    }

    #[tokio::test]
    async fn capacity_is_never_exceeded() {
        let cache: TtlCache<u32, u32> = TtlCache::new(Duration::from_secs(60), 3);
        for i in 0..10 {
            cache.insert(i, i).await;
        }
        assert!(cache.len().await <= 3);
        // Most recent entries survive
        assert_eq!(cache.get(&9).await, Some(9));
    }

    #[tokio::test]
    async fn eviction_drops_the_oldest_entry() {
        let cache: TtlCache<&'static str, u32> = TtlCache::new(Duration::from_secs(60), 2);
        cache.insert("first", 1).await;
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("second", 2).await;
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("third", 3).await;

        assert_eq!(cache.get(&"first").await, None);
        assert_eq!(cache.get(&"second").await, Some(2));
        assert_eq!(cache.get(&"third").await, Some(3));
    }

    #[tokio::test]
    async fn reinserting_existing_key_does_not_evict_others() {
        let cache: TtlCache<&'static str, u32> = TtlCache::new(Duration::from_secs(60), 2);
        cache.insert("a", 1).await;
        cache.insert("b", 2).await;
        cache.insert("a", 10).await;
        assert_eq!(cache.get(&"a").await, Some(10));
        assert_eq!(cache.get(&"b").await, Some(2));
    }
}
