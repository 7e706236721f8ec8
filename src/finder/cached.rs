//! Cached Finder: cache-aside list queries plus prefix invalidation.
//!
//! Reads take no locks. Concurrent misses on one key each query the store
//! and each write the cache; a read that started before a writer's commit
//! can repopulate a key after the writer invalidated it. Both are accepted:
//! the TTL bounds how long such a page can stay stale.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::CacheService;
use crate::error::FinderError;
use crate::store::{DocumentStore, FindOptions};

use super::{key, ListRequest, Listing, PageEnvelope, RawQuery};

/// How a freshly computed page reaches the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheWrites {
    /// Spawned task; the response does not wait for the write
    Background,
    /// Awaited before returning
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinderConfig {
    /// Lifetime of cached pages and the staleness upper bound
    pub ttl: Duration,
    pub writes: CacheWrites,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            writes: CacheWrites::Background,
        }
    }
}

/// Answers list requests for any [`Listing`].
#[derive(Clone)]
pub struct CachedFinder {
    cache: CacheService,
    store: Arc<dyn DocumentStore>,
    config: FinderConfig,
}

impl CachedFinder {
    pub fn new(cache: CacheService, store: Arc<dyn DocumentStore>, config: FinderConfig) -> Self {
        Self {
            cache,
            store,
            config,
        }
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    pub fn config(&self) -> FinderConfig {
        self.config
    }

    /// Lists one page of `L`.
    ///
    /// Cache hits are returned unchanged. On a miss the page slice and the
    /// total are read concurrently, so under concurrent writes they may
    /// disagree. Store failures propagate; cache failures never do.
    pub async fn execute<L: Listing>(
        &self,
        raw: &RawQuery,
    ) -> Result<PageEnvelope<L::Item>, FinderError> {
        let request = ListRequest::<L>::normalize(raw);
        let cache_key = key::derive(&request);

        if let Some(envelope) = self.cache.get::<PageEnvelope<L::Item>>(&cache_key).await {
            debug!(entity = L::TAG, key = %cache_key, "list cache hit");
            return Ok(envelope);
        }
        debug!(entity = L::TAG, key = %cache_key, "list cache miss");

        let envelope = self.query_store(&request).await?;
        self.populate(cache_key, &envelope).await;
        Ok(envelope)
    }

    /// Drops every cached page of `entity_tag`.
    ///
    /// Writers call this after their mutation commits, never before.
    pub async fn invalidate(&self, entity_tag: &str) -> usize {
        let removed = self.cache.delete_by_prefix(&key::key_prefix(entity_tag)).await;
        info!(entity = entity_tag, removed, "list cache invalidated");
        removed
    }

    pub async fn invalidate_listing<L: Listing>(&self) -> usize {
        self.invalidate(L::TAG).await
    }

    async fn query_store<L: Listing>(
        &self,
        request: &ListRequest<L>,
    ) -> Result<PageEnvelope<L::Item>, FinderError> {
        let predicate = L::build_predicate(&request.filters);
        let options = FindOptions {
            sort: request.sort_spec(),
            skip: request.offset(),
            limit: request.limit,
        };

        let (documents, total) = tokio::try_join!(
            self.store.find(L::TAG, &predicate, &options),
            self.store.count(L::TAG, &predicate),
        )?;

        let data = documents
            .into_iter()
            .map(serde_json::from_value::<L::Item>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| FinderError::Decode(e.to_string()))?;

        Ok(PageEnvelope::new(data, request.page, request.limit, total))
    }

    async fn populate<T: serde::Serialize>(&self, cache_key: String, envelope: &PageEnvelope<T>) {
        if !self.cache.is_enabled() {
            return;
        }

        let payload = match serde_json::to_string(envelope) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(key = %cache_key, error = %err, "failed to encode page for cache");
                return;
            }
        };

        let ttl = self.config.ttl;
        match self.config.writes {
            CacheWrites::Inline => {
                self.cache.set_raw(&cache_key, payload, ttl).await;
            }
            CacheWrites::Background => {
                let cache = self.cache.clone();
                tokio::spawn(async move {
                    if !cache.set_raw(&cache_key, payload, ttl).await {
                        debug!(key = %cache_key, "background cache write dropped");
                    }
                });
            }
        }
    }
}

impl std::fmt::Debug for CachedFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedFinder")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}
