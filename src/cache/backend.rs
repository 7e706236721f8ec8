//! Cache backend contract.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheError;

/// Raw key-value operations a cache backend must provide.
///
/// Backends report failures honestly; [`super::CacheService`] is the layer
/// that turns them into misses.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short name used in logs and stats.
    fn name(&self) -> &'static str;

    /// Gets a live value by key.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores a value that expires after `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Deletes one key. Returns whether it existed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Deletes every key starting with `prefix`. Returns the number removed.
    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize, CacheError>;
}
