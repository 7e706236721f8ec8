//! API Handlers
//!
//! HTTP request handlers. Listing handlers are generic over [`Listing`] and
//! mounted once per entity.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

#[cfg(feature = "redis")]
use crate::cache::RedisCache;
use crate::cache::{CacheService, MemoryCache};
use crate::config::{CacheBackendKind, Config};
use crate::entities::ENTITY_TAGS;
use crate::error::{ApiError, Result};
use crate::finder::{CachedFinder, FinderConfig, Listing, PageEnvelope, RawQuery};
use crate::models::{DeleteResponse, HealthResponse, InvalidateResponse, StatsResponse};
use crate::store::DocumentStore;
use crate::writer::ListingWriter;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub finder: CachedFinder,
    pub writer: ListingWriter,
    /// Set when pages are cached in-process; exposes entry-level stats
    pub memory_cache: Option<MemoryCache>,
}

impl AppState {
    /// Wires a finder and writer over one store and cache service.
    pub fn new(store: Arc<dyn DocumentStore>, cache: CacheService, config: FinderConfig) -> Self {
        let finder = CachedFinder::new(cache, store.clone(), config);
        let writer = ListingWriter::new(store, finder.clone());
        Self {
            finder,
            writer,
            memory_cache: None,
        }
    }

    /// Same as [`AppState::new`] with an in-process cache.
    pub fn with_memory_cache(
        store: Arc<dyn DocumentStore>,
        memory: MemoryCache,
        config: FinderConfig,
    ) -> Self {
        let cache = CacheService::new(Arc::new(memory.clone()));
        Self {
            memory_cache: Some(memory),
            ..Self::new(store, cache, config)
        }
    }

    /// Builds the state described by `config` over `store`.
    ///
    /// An unreachable Redis, or a binary built without the `redis` feature,
    /// disables caching instead of failing startup.
    pub async fn from_config(config: &Config, store: Arc<dyn DocumentStore>) -> Self {
        let finder_config = config.finder_config();
        if !config.cache_enabled {
            info!("List caching disabled by configuration");
            return Self::new(store, CacheService::disabled(), finder_config);
        }

        match config.cache_backend {
            CacheBackendKind::Memory => {
                info!(max_entries = config.cache_max_entries, "Using in-memory list cache");
                Self::with_memory_cache(
                    store,
                    MemoryCache::new(config.cache_max_entries),
                    finder_config,
                )
            }
            CacheBackendKind::Redis => {
                let cache = redis_cache(&config.cache_url).await;
                Self::new(store, cache, finder_config)
            }
        }
    }
}

#[cfg(feature = "redis")]
async fn redis_cache(url: &str) -> CacheService {
    match RedisCache::connect(url).await {
        Ok(redis) => {
            info!("Using Redis list cache");
            CacheService::new(Arc::new(redis))
        }
        Err(err) => {
            warn!(error = %err, "Redis unavailable, list caching disabled");
            CacheService::disabled()
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn redis_cache(_url: &str) -> CacheService {
    warn!("Built without the redis feature, list caching disabled");
    CacheService::disabled()
}

/// Handler for GET /{entity}
///
/// Repeated keys (`?tags=a&tags=b`) are kept as repeated values.
pub async fn list_handler<L: Listing>(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<PageEnvelope<L::Item>>> {
    let raw: RawQuery = params.into_iter().collect();
    let page = state.finder.execute::<L>(&raw).await?;
    Ok(Json(page))
}

/// Handler for POST /{entity}/search
///
/// Same as the GET listing with the bag sent as a JSON object.
pub async fn search_handler<L: Listing>(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<PageEnvelope<L::Item>>> {
    let Json(bag) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    if !bag.is_object() {
        return Err(ApiError::InvalidRequest(
            "search body must be a JSON object".to_string(),
        ));
    }
    let page = state.finder.execute::<L>(&RawQuery::from_json(&bag)).await?;
    Ok(Json(page))
}

/// Handler for POST /{entity}
pub async fn create_handler<L: Listing>(
    State(state): State<AppState>,
    body: std::result::Result<Json<L::Item>, JsonRejection>,
) -> Result<(StatusCode, Json<L::Item>)> {
    let Json(item) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let created = state.writer.create::<L>(item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for PUT /{entity}/:id
pub async fn update_handler<L: Listing>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: std::result::Result<Json<L::Item>, JsonRejection>,
) -> Result<Json<L::Item>> {
    let Json(item) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let updated = state.writer.update::<L>(id, item).await?;
    Ok(Json(updated))
}

/// Handler for DELETE /{entity}/:id
pub async fn delete_handler<L: Listing>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    state.writer.delete::<L>(id).await?;
    Ok(Json(DeleteResponse::new(L::TAG, id)))
}

/// Handler for DELETE /cache/:entity
///
/// Drops every cached page of one entity without touching the store.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Json<InvalidateResponse>> {
    let Some(tag) = ENTITY_TAGS.iter().find(|tag| **tag == entity) else {
        return Err(ApiError::NotFound(format!("Unknown entity: {}", entity)));
    };
    let removed = state.finder.invalidate(tag).await;
    Ok(Json(InvalidateResponse::new(*tag, removed)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let backend = match &state.memory_cache {
        Some(memory) => Some(memory.stats().await),
        None => None,
    };
    Json(StatsResponse::new(state.finder.cache().stats(), backend))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.finder.cache().is_enabled()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Job, JobListing};
    use crate::finder::CacheWrites;
    use crate::store::MemoryStore;
    use std::time::Duration;

    fn test_state() -> AppState {
        AppState::with_memory_cache(
            Arc::new(MemoryStore::new()),
            MemoryCache::new(100),
            FinderConfig {
                ttl: Duration::from_secs(60),
                writes: CacheWrites::Inline,
            },
        )
    }

    fn job_body() -> Job {
        serde_json::from_value(serde_json::json!({
            "title": "Rust Engineer",
            "company": "Acme",
            "employmentType": "full_time",
            "isApproved": true,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_from_config_backends() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());

        let memory = AppState::from_config(&Config::default(), store.clone()).await;
        assert!(memory.finder.cache().is_enabled());
        assert!(memory.memory_cache.is_some());

        let disabled = Config {
            cache_enabled: false,
            ..Config::default()
        };
        let state = AppState::from_config(&disabled, store).await;
        assert!(!state.finder.cache().is_enabled());
        assert!(state.memory_cache.is_none());
    }

    #[tokio::test]
    async fn test_create_and_list_handler() {
        let state = test_state();

        let (status, Json(created)) =
            create_handler::<JobListing>(State(state.clone()), Ok(Json(job_body())))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(page) = list_handler::<JobListing>(State(state), Query(Vec::new()))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].id, created.id);
    }

    #[tokio::test]
    async fn test_search_handler_reads_json_bag() {
        let state = test_state();
        create_handler::<JobListing>(State(state.clone()), Ok(Json(job_body())))
            .await
            .unwrap();

        let bag = serde_json::json!({"keyword": "rust", "limit": 5});
        let Json(page) = search_handler::<JobListing>(State(state.clone()), Ok(Json(bag)))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.limit, 5);

        let err = search_handler::<JobListing>(State(state), Ok(Json(serde_json::json!([1]))))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let state = test_state();
        let err = delete_handler::<JobListing>(State(state), Path(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Store(_)));
    }

    #[tokio::test]
    async fn test_invalidate_unknown_entity() {
        let state = test_state();
        let err = invalidate_handler(State(state.clone()), Path("users".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let Json(resp) = invalidate_handler(State(state), Path("jobs".to_string()))
            .await
            .unwrap();
        assert_eq!(resp.removed, 0);
    }

    #[tokio::test]
    async fn test_stats_handler_includes_backend() {
        let state = test_state();
        list_handler::<JobListing>(State(state.clone()), Query(Vec::new()))
            .await
            .unwrap();

        let Json(stats) = stats_handler(State(state)).await;
        assert_eq!(stats.cache.misses, 1);
        assert_eq!(stats.cache.writes, 1);
        assert_eq!(stats.backend.map(|b| b.total_entries), Some(1));
    }
}
