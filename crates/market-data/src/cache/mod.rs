//! TTL cache store with a pluggable backend and an in-process fallback.
//!
//! The cache is a performance optimization, never a correctness dependency:
//! every backend failure is converted to cache-miss behavior at this
//! boundary, and a dead networked backend degrades the store to the
//! in-process fallback for the rest of the process lifetime. Callers of
//! [`CacheStore::get_value`] and [`CacheStore::set_value`] never see an
//! error.

mod backend;
mod memory;
mod redis_backend;
mod ttl;

pub mod key;

pub use backend::{BackendError, CacheBackend};
pub use memory::MemoryBackend;
pub use redis_backend::RedisBackend;
pub use ttl::{CacheDomain, TtlPolicy};

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Cache statistics snapshot.
#[derive(Clone, Debug, Serialize)]
pub struct CacheStats {
    /// Active backend name ("redis" or "memory")
    pub backend: &'static str,
    /// Live keys in the active backend
    pub key_count: usize,
    /// Lookups answered from cache since startup
    pub hit_count: u64,
    /// Lookups that fell through since startup
    pub miss_count: u64,
}

/// Cache store fronting a primary backend with an in-process fallback.
pub struct CacheStore {
    primary: Option<Arc<dyn CacheBackend>>,
    fallback: Arc<MemoryBackend>,
    degraded: AtomicBool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStore {
    /// Store over the in-process backend only.
    pub fn in_memory() -> Self {
        Self {
            primary: None,
            fallback: Arc::new(MemoryBackend::new()),
            degraded: AtomicBool::new(false),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Store over an explicit primary backend, with the in-process fallback
    /// standing by for degradation.
    pub fn with_backend(primary: Arc<dyn CacheBackend>) -> Self {
        Self {
            primary: Some(primary),
            ..Self::in_memory()
        }
    }

    /// Build a store from an optional connection string.
    ///
    /// `None`, or a connection that fails to verify, selects the in-process
    /// backend; the connection failure is logged once here rather than on
    /// every subsequent operation.
    pub async fn from_redis_url(redis_url: Option<&str>) -> Self {
        match redis_url {
            Some(url) => match RedisBackend::connect(url).await {
                Ok(backend) => Self::with_backend(Arc::new(backend)),
                Err(e) => {
                    warn!("cache backend unavailable, using in-process cache: {}", e);
                    Self::in_memory()
                }
            },
            None => Self::in_memory(),
        }
    }

    fn active(&self) -> Arc<dyn CacheBackend> {
        match &self.primary {
            Some(primary) if !self.degraded.load(Ordering::Relaxed) => primary.clone(),
            _ => self.fallback.clone(),
        }
    }

    /// Latch the store onto the fallback backend. Logged exactly once.
    fn degrade(&self, context: &str, error: &BackendError) {
        if self
            .degraded
            .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            warn!(
                "cache backend failed during {}, degrading to in-process cache: {}",
                context, error
            );
        }
    }

    /// Fetch and deserialize a cached value. Expired or unparsable entries
    /// are misses; backend failures degrade and retry on the fallback.
    pub async fn get_value<T: DeserializeOwned>(&self, cache_key: &str) -> Option<T> {
        let payload = match self.active().get(cache_key).await {
            Ok(payload) => payload,
            Err(e) => {
                self.degrade("get", &e);
                self.fallback.get(cache_key).await.ok().flatten()
            }
        };

        let payload = match payload {
            Some(payload) => payload,
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            Err(e) => {
                // A payload written by an older build; treat as absent.
                debug!("dropping undecodable cache entry {}: {}", cache_key, e);
                let _ = self.active().delete(cache_key).await;
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Serialize and store a value with the given TTL. Returns whether the
    /// write succeeded; failures are absorbed.
    pub async fn set_value<T: Serialize>(
        &self,
        cache_key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> bool {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                debug!("failed to serialize cache entry {}: {}", cache_key, e);
                return false;
            }
        };

        let ttl = Duration::from_secs(ttl_seconds.max(1));
        match self.active().set(cache_key, &payload, ttl).await {
            Ok(()) => true,
            Err(e) => {
                self.degrade("set", &e);
                self.fallback.set(cache_key, &payload, ttl).await.is_ok()
            }
        }
    }

    /// Remove one key.
    pub async fn delete(&self, cache_key: &str) -> bool {
        match self.active().delete(cache_key).await {
            Ok(removed) => removed,
            Err(e) => {
                self.degrade("delete", &e);
                self.fallback.delete(cache_key).await.unwrap_or(false)
            }
        }
    }

    /// Remove every key matching a `*`-wildcard glob; returns the count.
    pub async fn clear_pattern(&self, pattern: &str) -> usize {
        match self.active().delete_matching(pattern).await {
            Ok(removed) => removed,
            Err(e) => {
                self.degrade("clear_pattern", &e);
                self.fallback
                    .delete_matching(pattern)
                    .await
                    .unwrap_or(0)
            }
        }
    }

    /// Current statistics.
    pub async fn stats(&self) -> CacheStats {
        let active = self.active();
        let key_count = active.key_count().await.unwrap_or(0);
        CacheStats {
            backend: active.name(),
            key_count,
            hit_count: self.hits.load(Ordering::Relaxed),
            miss_count: self.misses.load(Ordering::Relaxed),
        }
    }
}
