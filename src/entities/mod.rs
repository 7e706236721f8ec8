//! Entities Module
//!
//! The listings served by the finder. Each one pairs a stored document type
//! with a closed filter struct, a Filter Builder, a sort token set and the
//! ordered field list folded into its cache keys.

mod blogs;
mod feedback;
mod jobs;

pub use blogs::{BlogFilters, BlogListing, BlogPost, BlogSort, PostStatus};
pub use feedback::{
    Feedback, FeedbackCategory, FeedbackFilters, FeedbackListing, FeedbackSort, FeedbackStatus,
};
pub use jobs::{EmploymentType, Job, JobFilters, JobListing, JobSort, JobStatus};

use crate::finder::Listing;

/// Tags of every listing, in route order.
pub const ENTITY_TAGS: &[&str] = &[JobListing::TAG, BlogListing::TAG, FeedbackListing::TAG];

/// Canonical spelling for enum-like parameters: `Full-Time` → `full_time`.
fn normalize_token(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

/// Joins a set-like list for a cache key, or `None` when empty.
fn key_list(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(","))
    }
}
