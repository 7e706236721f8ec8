//! Per-entity contract the finder is generic over.

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use super::{Predicate, RawQuery, SortToken};

/// A stored document with a stable identifier.
pub trait Document: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn set_id(&mut self, id: Uuid);
}

/// Typed, closed filter set for one listing.
pub trait ListingFilters: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// Coerces the raw bag. Never fails; defaults fill scoping fields.
    fn from_raw(raw: &RawQuery) -> Self;

    /// Canonical text for one of the listing's `KEY_FIELDS`, or `None`
    /// when the filter is absent.
    fn key_value(&self, field: &str) -> Option<String>;
}

/// One listable entity (jobs, blogs, feedback).
pub trait Listing: Send + Sync + 'static {
    /// Entity tag: store collection name and cache key namespace.
    const TAG: &'static str;

    /// Bumped whenever `KEY_FIELDS` or key encoding changes.
    const KEY_VERSION: u32;

    /// Filter fields folded into cache keys, in key order.
    const KEY_FIELDS: &'static [&'static str];

    const DEFAULT_LIMIT: u32;
    const MAX_LIMIT: u32;

    type Item: Document;
    type Filters: ListingFilters;
    type Sort: SortToken;

    /// Filter Builder: pure and total.
    fn build_predicate(filters: &Self::Filters) -> Predicate;
}
