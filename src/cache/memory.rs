use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use serde_json::Value;

use super::{CacheBackend, CacheError};

/// Capacity used when none is configured.
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// A cached value with its own time to live.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    pub value: Arc<Value>,
    pub ttl: Duration,
}

impl CachedEntry {
    pub fn new(value: Value, ttl: Duration) -> Self {
        Self {
            value: Arc::new(value),
            ttl,
        }
    }
}

/// Expires each entry after the TTL it was stored with; a rewrite restarts it.
struct EntryTtl;

impl Expiry<String, CachedEntry> for EntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &CachedEntry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CachedEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process cache backend, bounded in size. Expired entries are reclaimed
/// by moka's housekeeping whether or not they are read again.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, CachedEntry>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_entries: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_entries)
                .expire_after(EntryTtl)
                .build(),
        }
    }

    /// Approximate number of live entries; exact after [`MemoryCache::sync`].
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs pending evictions and expirations now.
    pub async fn sync(&self) {
        self.entries.run_pending_tasks().await;
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Arc<Value>>, CacheError> {
        Ok(self.entries.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), CachedEntry::new(value, ttl)).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.remove(key).await.is_some())
    }

    async fn clear(&self, prefix: &str) -> Result<bool, CacheError> {
        let keys: Vec<Arc<String>> = self
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key)
            .collect();
        for key in keys {
            self.entries.invalidate(key.as_str()).await;
        }
        Ok(true)
    }
}
