//! Finder Module
//!
//! The cached, filtered, paginated query layer shared by every listing:
//! raw parameters are normalized into a [`ListRequest`], turned into a cache
//! key, answered from the cache when possible and from the document store
//! otherwise.

mod cached;
mod envelope;
pub mod key;
mod listing;
mod predicate;
mod raw;
mod request;
pub mod sort;

#[cfg(test)]
mod property_tests;

pub use cached::{CacheWrites, CachedFinder, FinderConfig};
pub use envelope::PageEnvelope;
pub use listing::{Document, Listing, ListingFilters};
pub use predicate::{literal_pattern, Predicate};
pub use raw::{RawQuery, MAX_TEXT_CHARS};
pub use request::ListRequest;
pub use sort::{SortOrder, SortSpec, SortToken};
