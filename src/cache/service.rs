//! Fail-open cache service.
//!
//! Every backend failure is logged and reported as a miss (reads), `false`
//! (writes) or `0` (invalidation). Nothing here ever returns an error.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{CacheBackend, ServiceStats};

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    errors: AtomicU64,
    invalidated: AtomicU64,
}

/// Cache handle injected into the finder.
///
/// Clones share the backend and the counters. A service built with
/// [`CacheService::disabled`] turns every call into a no-op.
#[derive(Clone)]
pub struct CacheService {
    backend: Option<Arc<dyn CacheBackend>>,
    counters: Arc<Counters>,
}

impl CacheService {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend: Some(backend),
            counters: Arc::default(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            backend: None,
            counters: Arc::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Looks up and decodes a value. Any failure is a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let backend = self.backend.as_ref()?;

        let raw = match backend.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Err(err) => {
                self.record_error();
                warn!(backend = backend.name(), key, error = %err, "cache get failed; treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            Err(err) => {
                self.record_error();
                warn!(backend = backend.name(), key, error = %err, "cached value undecodable; treating as miss");
                None
            }
        }
    }

    /// Encodes and stores a value. Returns whether the write landed.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) -> bool {
        if !self.is_enabled() {
            return false;
        }
        match serde_json::to_string(value) {
            Ok(payload) => self.set_raw(key, payload, ttl).await,
            Err(err) => {
                self.record_error();
                warn!(key, error = %err, "failed to encode cache value");
                false
            }
        }
    }

    /// Stores an already-encoded payload. Returns whether the write landed.
    pub async fn set_raw(&self, key: &str, payload: String, ttl: Duration) -> bool {
        let Some(backend) = self.backend.as_ref() else {
            return false;
        };

        match backend.set(key, payload, ttl).await {
            Ok(()) => {
                self.counters.writes.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(err) => {
                self.record_error();
                warn!(backend = backend.name(), key, error = %err, "cache set failed");
                false
            }
        }
    }

    /// Deletes one key. Returns whether it existed.
    pub async fn delete(&self, key: &str) -> bool {
        let Some(backend) = self.backend.as_ref() else {
            return false;
        };

        match backend.delete(key).await {
            Ok(removed) => removed,
            Err(err) => {
                self.record_error();
                warn!(backend = backend.name(), key, error = %err, "cache delete failed");
                false
            }
        }
    }

    /// Deletes every key under `prefix`. Returns the number removed.
    pub async fn delete_by_prefix(&self, prefix: &str) -> usize {
        let Some(backend) = self.backend.as_ref() else {
            return 0;
        };

        match backend.delete_by_prefix(prefix).await {
            Ok(removed) => {
                self.counters
                    .invalidated
                    .fetch_add(removed as u64, Ordering::Relaxed);
                debug!(backend = backend.name(), prefix, removed, "cache prefix deleted");
                removed
            }
            Err(err) => {
                self.record_error();
                warn!(backend = backend.name(), prefix, error = %err, "cache prefix delete failed");
                0
            }
        }
    }

    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            enabled: self.is_enabled(),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            writes: self.counters.writes.load(Ordering::Relaxed),
            errors: self.counters.errors.load(Ordering::Relaxed),
            invalidated: self.counters.invalidated.load(Ordering::Relaxed),
        }
    }

    fn record_error(&self) {
        self.counters.errors.fetch_add(1, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("backend", &self.backend.as_ref().map(|b| b.name()))
            .field("stats", &self.stats())
            .finish()
    }
}
