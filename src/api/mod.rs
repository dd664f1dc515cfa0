//! API Module
//!
//! HTTP handlers and routing for the dashboard gateway.
//!
//! # Endpoints
//! - `GET /dashboard` - Cached-or-fresh dashboard dataset
//! - `POST /dashboard/refresh` - Rate-limited forced refresh
//! - `GET /dashboard/summary` - Record counts and provenance
//! - `GET /cache/stats` - Cache statistics
//! - `DELETE /cache` - Clear every cached entry
//! - `DELETE /cache/:key` - Clear one entry
//! - `GET /cache/:key/age` - Age of one entry
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
