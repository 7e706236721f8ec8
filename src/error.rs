//! Error types for the listing service
//!
//! Cache failures never leave the cache layer; store failures surface as
//! failed list requests. `ApiError` maps everything onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Failures reported by a cache backend.
///
/// These are always recovered by [`crate::cache::CacheService`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Backend could not be reached
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// Backend rejected or failed the operation
    #[error("Cache operation failed: {0}")]
    Operation(String),

    /// Entry violates the backend's key or value limits
    #[error("Invalid cache entry: {0}")]
    InvalidEntry(String),
}

// == Store Error Enum ==
/// Failures reported by the document store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Predicate could not be evaluated
    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),

    /// No document with this id
    #[error("Document not found: {0}")]
    NotFound(String),

    /// A document with this id already exists
    #[error("Document already exists: {0}")]
    Conflict(String),

    /// Document could not be converted to or from its stored form
    #[error("Document encoding error: {0}")]
    Encoding(String),
}

// == Finder Error Enum ==
/// Failure of a list request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FinderError {
    /// Page or count query failed
    #[error("Store query failed: {0}")]
    Store(#[from] StoreError),

    /// A stored document did not match the listing's item shape
    #[error("Failed to decode listing item: {0}")]
    Decode(String),
}

// == API Error Enum ==
/// Errors returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// List request failed
    #[error(transparent)]
    Query(#[from] FinderError),

    /// Write request failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Unknown entity or document
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Query(err) => {
                error!(error = %err, "list request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "query failed".to_string())
            }
            ApiError::Store(StoreError::NotFound(id)) => {
                (StatusCode::NOT_FOUND, format!("Document not found: {}", id))
            }
            ApiError::Store(StoreError::Conflict(id)) => {
                (StatusCode::CONFLICT, format!("Document already exists: {}", id))
            }
            ApiError::Store(err) => {
                error!(error = %err, "write request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "write failed".to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
