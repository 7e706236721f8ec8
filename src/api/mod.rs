//! API Module
//!
//! HTTP handlers and routing for the listing service.
//!
//! # Endpoints
//! - `GET /{entity}` - List one page (query string filter bag)
//! - `POST /{entity}/search` - List one page (JSON filter bag)
//! - `POST /{entity}` - Create a document
//! - `PUT /{entity}/:id` - Replace a document
//! - `DELETE /{entity}/:id` - Delete a document
//! - `DELETE /cache/:entity` - Drop an entity's cached pages
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint
//!
//! `{entity}` is one of `jobs`, `blogs`, `feedback`.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
