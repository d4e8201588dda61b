//! In-process cache backend.
//!
//! A concurrent map with lazy eviction: an expired entry encountered during
//! lookup is purged on the spot, so correctness never depends on a
//! background sweep. [`MemoryBackend::purge_expired`] exists for callers
//! that want a periodic memory bound anyway.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use super::backend::{BackendError, CacheBackend};

#[derive(Clone, Debug)]
struct MemoryEntry {
    payload: String,
    stored_at: Instant,
    ttl: Duration,
}

impl MemoryEntry {
    fn is_expired(&self) -> bool {
        self.stored_at.elapsed() > self.ttl
    }
}

/// Concurrent in-process backend, used standalone or as the degradation
/// target when the networked backend is unavailable.
#[derive(Default)]
pub struct MemoryBackend {
    entries: DashMap<String, MemoryEntry>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry. Returns the count removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn backdate(&self, key: &str, by: Duration) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.stored_at -= by;
        }
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.payload.clone())),
            Some(_) => {}
            None => return Ok(None),
        }
        // Expired: lazy eviction, after the read guard above is released.
        self.entries.remove(key);
        Ok(None)
    }

    async fn set(&self, key: &str, payload: &str, ttl: Duration) -> Result<(), BackendError> {
        self.entries.insert(
            key.to_string(),
            MemoryEntry {
                payload: payload.to_string(),
                stored_at: Instant::now(),
                ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, BackendError> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn delete_matching(&self, pattern: &str) -> Result<usize, BackendError> {
        let matching: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| glob_match(pattern, entry.key()))
            .map(|entry| entry.key().clone())
            .collect();
        let mut removed = 0;
        for key in matching {
            if self.entries.remove(&key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn key_count(&self) -> Result<usize, BackendError> {
        Ok(self.entries.len())
    }
}

/// Match `text` against a glob where `*` matches any run of characters.
/// No other metacharacters are supported, mirroring the subset the
/// networked backend's KEYS command is used with.
fn glob_match(pattern: &str, text: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == text;
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let mut pos = 0;

    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            // Anchored prefix.
            if !text.starts_with(part) {
                return false;
            }
            pos = part.len();
        } else if i == parts.len() - 1 {
            // Anchored suffix.
            let remaining = &text[pos..];
            return remaining.len() >= part.len() && remaining.ends_with(part);
        } else {
            match text[pos..].find(part) {
                Some(idx) => pos += idx + part.len(),
                None => return false,
            }
        }
    }

    true
}
