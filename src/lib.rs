//! Board Finder - cached, filtered, paginated listings for a job board
//!
//! Jobs, blog posts and feedback share one query layer: filters are built
//! from a raw parameter bag, pages are read cache-aside through a fail-open
//! cache service, and writers invalidate an entity's pages by key prefix.

pub mod api;
pub mod cache;
pub mod config;
pub mod entities;
pub mod error;
pub mod finder;
pub mod models;
pub mod store;
pub mod tasks;
pub mod writer;

pub use api::{create_router, AppState};
pub use config::Config;
pub use finder::{CachedFinder, PageEnvelope, RawQuery};
pub use tasks::spawn_cleanup_task;
pub use writer::ListingWriter;
