//! Configuration Module
//!
//! Loads service configuration from environment variables. Only the binary
//! reads this; the finder receives its cache service and TTL by injection.

use std::env;
use std::time::Duration;

use crate::finder::{CacheWrites, FinderConfig};

/// Which cache backend the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackendKind {
    /// In-process TTL/LRU cache
    Memory,
    /// Redis (requires the `redis` feature)
    Redis,
}

impl CacheBackendKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "redis" => Some(Self::Redis),
            _ => None,
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether list results are cached at all
    pub cache_enabled: bool,
    /// Cache backend selection
    pub cache_backend: CacheBackendKind,
    /// Redis connection URL
    pub cache_url: String,
    /// Maximum number of entries the in-memory cache can hold
    pub cache_max_entries: usize,
    /// TTL in seconds for cached pages; also the staleness upper bound
    pub cache_default_ttl: u64,
    /// In-memory sweep interval in seconds
    pub cache_cleanup_interval: u64,
    /// Write cache entries from a spawned task instead of inline
    pub cache_background_writes: bool,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_ENABLED` - Enable list caching (default: true)
    /// - `CACHE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `CACHE_URL` - Redis URL (default: redis://127.0.0.1:6379)
    /// - `CACHE_MAX_ENTRIES` - In-memory capacity (default: 10000)
    /// - `CACHE_DEFAULT_TTL` - Page TTL in seconds (default: 300)
    /// - `CACHE_CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 30)
    /// - `CACHE_BACKGROUND_WRITES` - Spawn cache writes (default: true)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_enabled: env_bool("CACHE_ENABLED").unwrap_or(defaults.cache_enabled),
            cache_backend: env::var("CACHE_BACKEND")
                .ok()
                .and_then(|v| CacheBackendKind::parse(&v))
                .unwrap_or(defaults.cache_backend),
            cache_url: env::var("CACHE_URL").unwrap_or(defaults.cache_url),
            cache_max_entries: env_parse("CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.cache_max_entries),
            cache_default_ttl: env_parse("CACHE_DEFAULT_TTL")
                .unwrap_or(defaults.cache_default_ttl),
            cache_cleanup_interval: env_parse("CACHE_CLEANUP_INTERVAL")
                .unwrap_or(defaults.cache_cleanup_interval),
            cache_background_writes: env_bool("CACHE_BACKGROUND_WRITES")
                .unwrap_or(defaults.cache_background_writes),
            server_port: env_parse("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Page TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_default_ttl)
    }

    /// Finder settings derived from the cache variables.
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig {
            ttl: self.cache_ttl(),
            writes: if self.cache_background_writes {
                CacheWrites::Background
            } else {
                CacheWrites::Inline
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_backend: CacheBackendKind::Memory,
            cache_url: "redis://127.0.0.1:6379".to_string(),
            cache_max_entries: 10_000,
            cache_default_ttl: 300,
            cache_cleanup_interval: 30,
            cache_background_writes: true,
            server_port: 3000,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_bool(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|v| parse_bool(&v))
}

/// Parses the boolean spellings accepted in env vars and query strings.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
