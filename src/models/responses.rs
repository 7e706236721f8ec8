//! Response DTOs for the listing API
//!
//! Defines the structure of outgoing HTTP response bodies other than list
//! pages and created/updated documents.

use serde::Serialize;
use uuid::Uuid;

use crate::cache::{CacheStats, ServiceStats};

/// Response body for `DELETE /{entity}/:id`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: Uuid,
}

impl DeleteResponse {
    pub fn new(entity: &str, id: Uuid) -> Self {
        Self {
            message: format!("Deleted {} document {}", entity, id),
            id,
        }
    }
}

/// Response body for `DELETE /cache/:entity`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub entity: String,
    /// Cached pages dropped
    pub removed: usize,
}

impl InvalidateResponse {
    pub fn new(entity: impl Into<String>, removed: usize) -> Self {
        Self {
            entity: entity.into(),
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
///
/// `backend` is only present for the in-memory cache, which keeps its own
/// entry-level counters.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub cache: ServiceStats,
    /// Hit rate (hits / (hits + misses)) as seen by the finder
    pub hit_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<CacheStats>,
}

impl StatsResponse {
    pub fn new(cache: ServiceStats, backend: Option<CacheStats>) -> Self {
        Self {
            hit_rate: cache.hit_rate(),
            cache,
            backend,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Whether list pages are being cached
    pub cache_enabled: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy(cache_enabled: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            cache_enabled,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_response_serialize() {
        let id = Uuid::new_v4();
        let json = serde_json::to_string(&DeleteResponse::new("jobs", id)).unwrap();
        assert!(json.contains(&id.to_string()));
        assert!(json.contains("Deleted jobs"));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let cache = ServiceStats {
            enabled: true,
            hits: 80,
            misses: 20,
            ..ServiceStats::default()
        };
        let resp = StatsResponse::new(cache, None);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);

        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("backend").is_none());
        assert_eq!(json["cache"]["hits"], 80);
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = StatsResponse::new(ServiceStats::default(), Some(CacheStats::new()));
        assert_eq!(resp.hit_rate, 0.0);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["backend"]["total_entries"], 0);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy(true)).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
        assert!(json.contains("\"cache_enabled\":true"));
    }

    #[test]
    fn test_error_response_serialize() {
        let json = serde_json::to_string(&ErrorResponse::new("query failed")).unwrap();
        assert_eq!(json, r#"{"error":"query failed"}"#);
    }
}
