//! Read-through response cache.
//!
//! ```text
//! handler → CacheGateway::get(key) → hit  → value
//!                                  → miss → compute() → store → value
//! ```
//!
//! Values are stored as JSON so one backend serves every payload type. A
//! computed `None` is stored as `null` and served as a hit afterwards.
//! Concurrent misses on the same key each run their own `compute`; there is
//! no request coalescing.

pub mod keys;
pub mod memory;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryCache;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache backend error: {0}")]
    Backend(String),
}

/// Storage behind the gateway: get / set-with-TTL / delete / clear.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Arc<Value>>, CacheError>;

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), CacheError>;

    /// Returns whether an entry was removed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Drops every entry whose key starts with `prefix`.
    async fn clear(&self, prefix: &str) -> Result<bool, CacheError>;
}

/// Cache-aside wrapper that namespaces keys under a fixed prefix.
#[derive(Clone)]
pub struct CacheGateway {
    backend: Arc<dyn CacheBackend>,
    prefix: String,
    default_ttl: Duration,
}

impl CacheGateway {
    pub fn new(backend: Arc<dyn CacheBackend>, prefix: impl Into<String>, default_ttl: Duration) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
            default_ttl,
        }
    }

    /// Gateway over a fresh in-process backend.
    pub fn in_memory(prefix: impl Into<String>, default_ttl: Duration) -> Self {
        Self::new(Arc::new(MemoryCache::new()), prefix, default_ttl)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Returns the cached value for `key`, or runs `compute`, stores its result
    /// for `ttl` (the gateway default when `None`), and returns it.
    ///
    /// A failing `compute` caches nothing. A stored value that no longer
    /// decodes as `T` is treated as a miss and overwritten.
    pub async fn get<T, E, F, Fut>(&self, key: &str, ttl: Option<Duration>, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = self.namespaced(key);

        if let Some(stored) = self.backend.get(&key).await? {
            match T::deserialize(stored.as_ref()) {
                Ok(value) => {
                    tracing::debug!(key = %key, "cache hit");
                    return Ok(value);
                }
                Err(e) => tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry"),
            }
        }

        tracing::debug!(key = %key, "cache miss");
        let value = compute().await?;
        let encoded = serde_json::to_value(&value).map_err(CacheError::from)?;
        self.backend
            .set(&key, encoded, ttl.unwrap_or(self.default_ttl))
            .await?;
        Ok(value)
    }

    /// Evicts `key`. Deleting an absent key returns `false`.
    pub async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let key = self.namespaced(key);
        let removed = self.backend.delete(&key).await?;
        tracing::debug!(key = %key, removed, "cache delete");
        Ok(removed)
    }

    /// Drops every entry under this gateway's prefix.
    pub async fn clear(&self) -> Result<bool, CacheError> {
        tracing::info!(prefix = %self.prefix, "Clearing cache");
        self.backend.clear(&self.prefix).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn gateway() -> CacheGateway {
        CacheGateway::in_memory("app_api_", Duration::from_secs(3600))
    }

    async fn counted(gateway: &CacheGateway, key: &str, calls: &AtomicUsize, value: Option<i64>) -> Option<i64> {
        gateway
            .get::<_, CacheError, _, _>(key, None, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn second_get_within_ttl_is_served_from_cache() {
        let gateway = gateway();
        let calls = AtomicUsize::new(0);

        assert_eq!(counted(&gateway, "product_1", &calls, Some(5)).await, Some(5));
        assert_eq!(counted(&gateway, "product_1", &calls, Some(6)).await, Some(5));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn null_results_are_cached() {
        let gateway = gateway();
        let calls = AtomicUsize::new(0);

        assert_eq!(counted(&gateway, "product_99", &calls, None).await, None);
        assert_eq!(counted(&gateway, "product_99", &calls, Some(1)).await, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn delete_forces_recompute() {
        let gateway = gateway();
        let calls = AtomicUsize::new(0);

        counted(&gateway, "client_7_users", &calls, Some(1)).await;
        assert!(gateway.delete("client_7_users").await.unwrap());
        assert!(!gateway.delete("client_7_users").await.unwrap());

        assert_eq!(counted(&gateway, "client_7_users", &calls, Some(2)).await, Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn compute_failure_propagates_and_caches_nothing() {
        #[derive(Debug)]
        enum Failure {
            Compute,
            Cache,
        }
        impl From<CacheError> for Failure {
            fn from(_: CacheError) -> Self {
                Failure::Cache
            }
        }

        let gateway = gateway();
        let result = gateway
            .get::<i64, Failure, _, _>("product_1", None, || async { Err(Failure::Compute) })
            .await;
        assert!(matches!(result, Err(Failure::Compute)));

        let calls = AtomicUsize::new(0);
        assert_eq!(counted(&gateway, "product_1", &calls, Some(3)).await, Some(3));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn explicit_ttl_overrides_default() {
        let gateway = gateway();
        let calls = AtomicUsize::new(0);
        let short = Some(Duration::from_millis(10));

        for _ in 0..2 {
            gateway
                .get::<_, CacheError, _, _>("products_list_1_10_id_ASC", short, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(1)
                })
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(30)).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn clear_drops_everything_under_prefix() {
        let gateway = gateway();
        let calls = AtomicUsize::new(0);
        counted(&gateway, "client_1", &calls, Some(1)).await;
        counted(&gateway, "client_2", &calls, Some(2)).await;

        assert!(gateway.clear().await.unwrap());
        counted(&gateway, "client_1", &calls, Some(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    struct BrokenBackend;

    #[async_trait]
    impl CacheBackend for BrokenBackend {
        async fn get(&self, _: &str) -> Result<Option<Arc<Value>>, CacheError> {
            Err(CacheError::Backend("connection refused".into()))
        }
        async fn set(&self, _: &str, _: Value, _: Duration) -> Result<(), CacheError> {
            Err(CacheError::Backend("connection refused".into()))
        }
        async fn delete(&self, _: &str) -> Result<bool, CacheError> {
            Err(CacheError::Backend("connection refused".into()))
        }
        async fn clear(&self, _: &str) -> Result<bool, CacheError> {
            Err(CacheError::Backend("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn backend_faults_propagate() {
        let gateway = CacheGateway::new(Arc::new(BrokenBackend), "app_api_", Duration::from_secs(1));
        let calls = AtomicUsize::new(0);
        let result = gateway
            .get::<i64, CacheError, _, _>("product_1", None, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            })
            .await;
        assert!(matches!(result, Err(CacheError::Backend(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(gateway.delete("product_1").await.is_err());
    }
}
