//! Response models for the listing API
//!
//! List responses are the finder's `PageEnvelope` serialized as-is; the DTOs
//! here cover writes, cache administration and service status.

pub mod responses;

pub use responses::{
    DeleteResponse, ErrorResponse, HealthResponse, InvalidateResponse, StatsResponse,
};
