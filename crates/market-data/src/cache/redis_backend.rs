//! Networked cache backend over Redis.
//!
//! Expiry is delegated to the server (`SET ... EX`), so lazy eviction and
//! sweeping are a non-issue here. The connection is verified with a PING at
//! construction; a backend that cannot connect is never handed to the store.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::debug;

use super::backend::{BackendError, CacheBackend};

/// Redis-backed cache store.
pub struct RedisBackend {
    conn: MultiplexedConnection,
}

impl RedisBackend {
    /// Connect and verify the connection with a PING.
    pub async fn connect(url: &str) -> Result<Self, BackendError> {
        let client = redis::Client::open(url)
            .map_err(|e| BackendError::Connection(format!("invalid redis url: {}", e)))?;

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        debug!("redis cache backend connected");
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let mut conn = self.conn.clone();
        conn.get(key)
            .await
            .map_err(|e| BackendError::Operation(e.to_string()))
    }

    async fn set(&self, key: &str, payload: &str, ttl: Duration) -> Result<(), BackendError> {
        let mut conn = self.conn.clone();
        // EX requires a positive expiry.
        let seconds = ttl.as_secs().max(1);
        conn.set_ex(key, payload, seconds)
            .await
            .map_err(|e| BackendError::Operation(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<bool, BackendError> {
        let mut conn = self.conn.clone();
        let removed: usize = conn
            .del(key)
            .await
            .map_err(|e| BackendError::Operation(e.to_string()))?;
        Ok(removed > 0)
    }

    async fn delete_matching(&self, pattern: &str) -> Result<usize, BackendError> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn
            .keys(pattern)
            .await
            .map_err(|e| BackendError::Operation(e.to_string()))?;

        if keys.is_empty() {
            return Ok(0);
        }

        let removed: usize = conn
            .del(keys)
            .await
            .map_err(|e| BackendError::Operation(e.to_string()))?;
        Ok(removed)
    }

    async fn key_count(&self) -> Result<usize, BackendError> {
        let mut conn = self.conn.clone();
        redis::cmd("DBSIZE")
            .query_async::<_, usize>(&mut conn)
            .await
            .map_err(|e| BackendError::Operation(e.to_string()))
    }
}
