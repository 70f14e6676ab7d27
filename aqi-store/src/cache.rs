//! Time-boxed cache over a [`ByteStore`].
//!
//! Entries are stored as `{"timestamp": <ms>, "data": <payload>}` under
//! `<namespace>:<identifier>`. Bumping a namespace's version tag orphans every
//! entry written in the old format. Reads and writes never fail: a storage or
//! decoding problem reads as a miss, and a failed write is dropped.

use crate::backend::ByteStore;
use chrono::Utc;
use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;

/// Time-to-live shared by every namespace: six hours.
pub const CACHE_TTL_MS: i64 = 1000 * 60 * 60 * 6;

/// A versioned key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace(&'static str);

impl Namespace {
    /// Daily records fetched from upstream.
    pub const DAILY: Namespace = Namespace("aqi-cache-v1");
    /// Annual series derived from daily records.
    pub const SERIES: Namespace = Namespace("aqi-series-v1");

    pub fn prefix(&self) -> &'static str {
        self.0
    }

    pub fn key(&self, id: &str) -> String {
        format!("{}:{}", self.0, id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    timestamp: i64,
    data: T,
}

/// TTL cache; cheap to share behind an `Arc`.
#[derive(Clone)]
pub struct TimedCache {
    store: Arc<dyn ByteStore>,
    ttl_ms: i64,
}

impl TimedCache {
    pub fn new(store: Arc<dyn ByteStore>) -> Self {
        TimedCache {
            store,
            ttl_ms: CACHE_TTL_MS,
        }
    }

    pub fn with_ttl_ms(mut self, ttl_ms: i64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    /// Fresh payload for `id`, or `None`. A `None` id disables the lookup.
    pub fn read<T: DeserializeOwned>(&self, namespace: Namespace, id: Option<&str>) -> Option<T> {
        self.read_at(namespace, id, Utc::now().timestamp_millis())
    }

    /// Like [`TimedCache::read`], evaluated at `now_ms`.
    pub fn read_at<T: DeserializeOwned>(
        &self,
        namespace: Namespace,
        id: Option<&str>,
        now_ms: i64,
    ) -> Option<T> {
        let key = namespace.key(id?);
        let bytes = match self.store.get(&key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                debug!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };
        let entry: CacheEntry<T> = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Ignoring undecodable cache entry {}: {}", key, e);
                return None;
            }
        };
        if now_ms - entry.timestamp > self.ttl_ms {
            debug!("Evicting expired cache entry {}", key);
            if let Err(e) = self.store.remove(&key) {
                debug!("Cache eviction failed for {}: {}", key, e);
            }
            return None;
        }
        Some(entry.data)
    }

    /// Best-effort write; failures are logged and dropped.
    pub fn write<T: Serialize>(&self, namespace: Namespace, id: Option<&str>, data: &T) {
        self.write_at(namespace, id, data, Utc::now().timestamp_millis())
    }

    pub fn write_at<T: Serialize>(
        &self,
        namespace: Namespace,
        id: Option<&str>,
        data: &T,
        now_ms: i64,
    ) {
        let Some(id) = id else {
            return;
        };
        let key = namespace.key(id);
        let entry = CacheEntry {
            timestamp: now_ms,
            data,
        };
        let result = serde_json::to_vec(&entry)
            .map_err(crate::error::StoreError::from)
            .and_then(|bytes| self.store.set(&key, &bytes));
        if let Err(e) = result {
            debug!("Cache write failed for {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::MemoryStore,
        error::{Result, StoreError},
    };

    struct BrokenStore;

    impl ByteStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(StoreError::Poisoned)
        }
        fn set(&self, _key: &str, _value: &[u8]) -> Result<()> {
            Err(StoreError::Poisoned)
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(StoreError::Poisoned)
        }
    }

    #[test]
    fn fresh_entries_are_returned() {
        let cache = TimedCache::new(Arc::new(MemoryStore::default()));
        cache.write_at(Namespace::DAILY, Some("dusit-2024"), &"payload", 1_000);
        let hit: Option<String> =
            cache.read_at(Namespace::DAILY, Some("dusit-2024"), 1_000 + CACHE_TTL_MS);
        assert_eq!(hit.as_deref(), Some("payload"));
    }

    #[test]
    fn expired_entries_are_evicted() {
        let store = Arc::new(MemoryStore::default());
        let cache = TimedCache::new(store.clone());
        cache.write_at(Namespace::DAILY, Some("dusit-2024"), &42, 1_000);
        assert_eq!(store.len(), 1);
        let hit: Option<i32> =
            cache.read_at(Namespace::DAILY, Some("dusit-2024"), 1_001 + CACHE_TTL_MS);
        assert_eq!(hit, None);
        assert!(store.is_empty());
    }

    #[test]
    fn namespaces_are_independent() {
        let cache = TimedCache::new(Arc::new(MemoryStore::default()));
        cache.write(Namespace::DAILY, Some("dusit-2024"), &1);
        cache.write(Namespace::SERIES, Some("dusit-2024"), &2);
        assert_eq!(cache.read::<i32>(Namespace::DAILY, Some("dusit-2024")), Some(1));
        assert_eq!(cache.read::<i32>(Namespace::SERIES, Some("dusit-2024")), Some(2));
        assert_eq!(Namespace::SERIES.key("x"), "aqi-series-v1:x");
    }

    #[test]
    fn missing_key_disables_caching() {
        let store = Arc::new(MemoryStore::default());
        let cache = TimedCache::new(store.clone());
        cache.write(Namespace::DAILY, None, &1);
        assert!(store.is_empty());
        assert_eq!(cache.read::<i32>(Namespace::DAILY, None), None);
    }

    #[test]
    fn storage_failures_are_swallowed() {
        let cache = TimedCache::new(Arc::new(BrokenStore));
        cache.write(Namespace::DAILY, Some("dusit-2024"), &1);
        assert_eq!(cache.read::<i32>(Namespace::DAILY, Some("dusit-2024")), None);
    }

    #[test]
    fn undecodable_entries_read_as_miss() {
        let store = Arc::new(MemoryStore::default());
        store.set("aqi-cache-v1:dusit-2024", b"not json").unwrap();
        let cache = TimedCache::new(store);
        assert_eq!(cache.read::<i32>(Namespace::DAILY, Some("dusit-2024")), None);
    }
}
