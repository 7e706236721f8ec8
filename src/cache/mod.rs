//! Cache Module
//!
//! Fail-open cache service over pluggable backends: an in-memory TTL/LRU
//! cache and, with the `redis` feature, Redis.

mod backend;
mod entry;
mod memory;
#[cfg(feature = "redis")]
mod redis_backend;
mod service;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use backend::CacheBackend;
pub use entry::CacheEntry;
pub use memory::MemoryCache;
#[cfg(feature = "redis")]
pub use redis_backend::RedisCache;
pub use service::CacheService;
pub use stats::{CacheStats, ServiceStats};
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 512;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 4 * 1024 * 1024; // 4 MB
