//! Cache backend trait.
//!
//! Backends store serialized JSON payloads under string keys with a TTL.
//! They may fail — the store above them is responsible for converting every
//! failure into cache-miss behavior and for degrading to the in-process
//! fallback when the networked backend dies.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors a backend can report. These never escape the cache store.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Cache backend connection failed: {0}")]
    Connection(String),

    #[error("Cache backend operation failed: {0}")]
    Operation(String),
}

/// A key-value store with per-entry expiration.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short backend identifier for stats and logs ("redis", "memory").
    fn name(&self) -> &'static str;

    /// Fetch a payload. Expired entries are reported as `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Store a payload with an absolute expiry of now + `ttl`.
    /// Overwrites unconditionally.
    async fn set(&self, key: &str, payload: &str, ttl: Duration) -> Result<(), BackendError>;

    /// Remove one key. Returns whether a live entry was removed.
    async fn delete(&self, key: &str) -> Result<bool, BackendError>;

    /// Remove every key matching a `*`-wildcard glob. Returns the count
    /// removed. The pattern `*` clears everything.
    async fn delete_matching(&self, pattern: &str) -> Result<usize, BackendError>;

    /// Number of live keys.
    async fn key_count(&self) -> Result<usize, BackendError>;
}
