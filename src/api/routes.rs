//! API Routes
//!
//! Configures the Axum router: one route group per listing plus the cache
//! administration and status endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::entities::{BlogListing, FeedbackListing, JobListing};
use crate::finder::Listing;

use super::handlers::{
    create_handler, delete_handler, health_handler, invalidate_handler, list_handler,
    search_handler, stats_handler, update_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(listing_routes::<JobListing>())
        .merge(listing_routes::<BlogListing>())
        .merge(listing_routes::<FeedbackListing>())
        .route("/cache/:entity", delete(invalidate_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Read and write routes for one listing, mounted under its tag.
fn listing_routes<L: Listing>() -> Router<AppState> {
    let collection = format!("/{}", L::TAG);
    Router::new()
        .route(
            &collection,
            get(list_handler::<L>).post(create_handler::<L>),
        )
        .route(&format!("{}/search", collection), post(search_handler::<L>))
        .route(
            &format!("{}/:id", collection),
            put(update_handler::<L>).delete(delete_handler::<L>),
        )
}
