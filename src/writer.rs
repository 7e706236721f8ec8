//! Listing writes.
//!
//! Every mutation commits to the store first and then drops the entity's
//! cached pages. A failed mutation leaves the cache untouched.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::error::StoreError;
use crate::finder::{CachedFinder, Document, Listing};
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct ListingWriter {
    store: Arc<dyn DocumentStore>,
    finder: CachedFinder,
}

impl ListingWriter {
    pub fn new(store: Arc<dyn DocumentStore>, finder: CachedFinder) -> Self {
        Self { store, finder }
    }

    pub async fn create<L: Listing>(&self, item: L::Item) -> Result<L::Item, StoreError> {
        let id = item.id();
        self.store
            .insert(L::TAG, &id.to_string(), encode(&item)?)
            .await?;
        let invalidated = self.finder.invalidate(L::TAG).await;
        info!(entity = L::TAG, %id, invalidated, "document created");
        Ok(item)
    }

    /// Replaces the document stored under `id`. The id in the path wins
    /// over any id in the body.
    pub async fn update<L: Listing>(&self, id: Uuid, mut item: L::Item) -> Result<L::Item, StoreError> {
        item.set_id(id);
        self.store
            .replace(L::TAG, &id.to_string(), encode(&item)?)
            .await?;
        let invalidated = self.finder.invalidate(L::TAG).await;
        info!(entity = L::TAG, %id, invalidated, "document updated");
        Ok(item)
    }

    pub async fn delete<L: Listing>(&self, id: Uuid) -> Result<(), StoreError> {
        self.store.remove(L::TAG, &id.to_string()).await?;
        let invalidated = self.finder.invalidate(L::TAG).await;
        info!(entity = L::TAG, %id, invalidated, "document deleted");
        Ok(())
    }
}

fn encode<T: Document>(item: &T) -> Result<Value, StoreError> {
    serde_json::to_value(item).map_err(|e| StoreError::Encoding(e.to_string()))
}

impl std::fmt::Debug for ListingWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingWriter")
            .field("finder", &self.finder)
            .finish()
    }
}
