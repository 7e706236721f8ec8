//! Document store contract.
//!
//! The finder only needs filtered, sorted, paginated reads and exact counts.
//! Writers additionally insert, replace and remove whole documents.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::finder::{Predicate, SortSpec};

/// Paging and ordering for one `find` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: SortSpec,
    pub skip: u64,
    pub limit: u32,
}

/// Document database reached by the finder and writers.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents in `collection` matching `predicate`, ordered and sliced.
    async fn find(
        &self,
        collection: &str,
        predicate: &Predicate,
        options: &FindOptions,
    ) -> Result<Vec<Value>, StoreError>;

    /// Exact number of documents matching `predicate`.
    async fn count(&self, collection: &str, predicate: &Predicate) -> Result<u64, StoreError>;

    /// Inserts a new document. Fails with `Conflict` if the id exists.
    async fn insert(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError>;

    /// Replaces an existing document. Fails with `NotFound` if absent.
    async fn replace(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError>;

    /// Removes a document. Fails with `NotFound` if absent.
    async fn remove(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}
