// src/services/cache.rs
// DOCUMENTATION: In-memory cache for Overpass fetch results
// PURPOSE: Avoid repeat upstream calls for identical search tuples

use crate::models::CreateResourceRequest;
use crate::services::overpass_query::SearchCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Cache entry with expiration
#[derive(Clone, Debug)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Exact-tuple key identifying one fetch
/// DOCUMENTATION: Coordinates and radius are keyed by their raw bit
/// patterns; only a bit-identical repeat of the call is a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchKey {
    category: SearchCategory,
    lat_bits: u64,
    lon_bits: u64,
    radius_bits: u64,
}

impl FetchKey {
    pub fn new(category: SearchCategory, lat: f64, lon: f64, radius_km: f64) -> Self {
        Self {
            category,
            lat_bits: lat.to_bits(),
            lon_bits: lon.to_bits(),
            radius_bits: radius_km.to_bits(),
        }
    }
}

/// Bounded TTL cache for parsed fetch results
/// DOCUMENTATION: Thread-safe; shared across all request handlers
pub struct FetchCache {
    store: Arc<RwLock<HashMap<FetchKey, CacheEntry<Vec<CreateResourceRequest>>>>>,
    ttl: Duration,
    max_entries: usize,
}

impl FetchCache {
    /// Create new cache with the given TTL and capacity
    pub fn new(ttl_seconds: u64, max_entries: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::from_secs(ttl_seconds),
            max_entries,
        }
    }

    /// Get cached results for a fetch tuple
    pub async fn get(&self, key: &FetchKey) -> Option<Vec<CreateResourceRequest>> {
        let store = self.store.read().await;

        if let Some(entry) = store.get(key) {
            if !entry.is_expired() {
                log::debug!("Cache HIT for {:?}", key);
                return Some(entry.data.clone());
            } else {
                log::debug!("Cache EXPIRED for {:?}", key);
            }
        } else {
            log::debug!("Cache MISS for {:?}", key);
        }

        None
    }

    /// Store results for a fetch tuple
    /// DOCUMENTATION: When full, expired entries are dropped first, then
    /// the entries closest to expiry until the new one fits
    pub async fn insert(&self, key: FetchKey, value: Vec<CreateResourceRequest>) {
        let mut store = self.store.write().await;

        if store.len() >= self.max_entries && !store.contains_key(&key) {
            store.retain(|_, entry| !entry.is_expired());

            while store.len() >= self.max_entries {
                let oldest = store
                    .iter()
                    .min_by_key(|(_, entry)| entry.expires_at)
                    .map(|(key, _)| *key);
                match oldest {
                    Some(evict) => {
                        log::debug!("Cache full, evicting {:?}", evict);
                        store.remove(&evict);
                    }
                    None => break,
                }
            }
        }

        store.insert(key, CacheEntry::new(value, self.ttl));
        log::debug!("Cache SET ({} entries)", store.len());
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let after_count = store.len();

        if before_count > after_count {
            log::info!(
                "Cache cleanup: removed {} expired entries ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        let total = store.len();
        let expired = store.values().filter(|e| e.is_expired()).count();

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }
}

/// Cache statistics
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired entries
pub fn start_cleanup_task(cache: Arc<FetchCache>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_resources(name: &str) -> Vec<CreateResourceRequest> {
        vec![CreateResourceRequest {
            name: name.to_string(),
            type_: "LIBRARY".to_string(),
            address: "1515 Young St".to_string(),
            location: [-96.7970, 32.7767],
        }]
    }

    #[tokio::test]
    async fn test_cache_set_get() {
        let cache = FetchCache::new(60, 16);
        let key = FetchKey::new(SearchCategory::All, 32.7767, -96.7970, 5.0);

        cache.insert(key, sample_resources("Central Library")).await;
        let result = cache.get(&key).await;

        assert_eq!(result.unwrap()[0].name, "Central Library");
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache = FetchCache::new(1, 16); // 1 second TTL
        let key = FetchKey::new(SearchCategory::Library, 32.0, -96.0, 2.0);

        cache.insert(key, sample_resources("Short Lived")).await;

        // Should exist immediately
        assert!(cache.get(&key).await.is_some());

        // Wait for expiration
        tokio::time::sleep(Duration::from_secs(2)).await;

        // Should be expired
        assert!(cache.get(&key).await.is_none());
    }

    #[test]
    fn test_key_is_exact_tuple() {
        let key1 = FetchKey::new(SearchCategory::All, 32.7767, -96.7970, 5.0);
        let key2 = FetchKey::new(SearchCategory::All, 32.7767, -96.7970, 5.0);
        let key3 = FetchKey::new(SearchCategory::All, 32.7767, -96.7970, 5.0004);
        let key4 = FetchKey::new(SearchCategory::Food, 32.7767, -96.7970, 5.0);

        assert_eq!(key1, key2); // Identical arguments share a key
        assert_ne!(key1, key3); // Any coordinate/radius change misses
        assert_ne!(key1, key4); // Category is part of the key
    }

    #[tokio::test]
    async fn test_eviction_drops_earliest_expiring_entry() {
        let cache = FetchCache::new(60, 2);
        let key1 = FetchKey::new(SearchCategory::All, 1.0, 1.0, 1.0);
        let key2 = FetchKey::new(SearchCategory::All, 2.0, 2.0, 1.0);
        let key3 = FetchKey::new(SearchCategory::All, 3.0, 3.0, 1.0);

        cache.insert(key1, sample_resources("first")).await;
        cache.insert(key2, sample_resources("second")).await;
        cache.insert(key3, sample_resources("third")).await;

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 2);

        assert!(cache.get(&key1).await.is_none());
        assert!(cache.get(&key2).await.is_some());
        assert!(cache.get(&key3).await.is_some());
    }

    #[tokio::test]
    async fn test_cache_cleanup() {
        let cache = FetchCache::new(1, 16);

        cache
            .insert(
                FetchKey::new(SearchCategory::All, 1.0, 1.0, 1.0),
                sample_resources("one"),
            )
            .await;
        cache
            .insert(
                FetchKey::new(SearchCategory::All, 2.0, 2.0, 1.0),
                sample_resources("two"),
            )
            .await;

        tokio::time::sleep(Duration::from_secs(2)).await;

        cache.cleanup().await;

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.active_entries, 0);
    }

    #[test]
    fn test_stats_reflect_store_contents() {
        tokio_test::block_on(async {
            let cache = FetchCache::new(60, 16);

            cache
                .insert(
                    FetchKey::new(SearchCategory::Healthcare, 1.0, 1.0, 1.0),
                    sample_resources("one"),
                )
                .await;

            let stats = cache.stats().await;
            assert_eq!(stats.total_entries, 1);
            assert_eq!(stats.expired_entries, 0);
            assert_eq!(stats.active_entries, 1);
        });
    }
}
