//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    age_handler, clear_all_handler, clear_handler, dashboard_handler, health_handler,
    refresh_handler, stats_handler, summary_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin, the dashboard front-end is served elsewhere
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route("/dashboard/refresh", post(refresh_handler))
        .route("/dashboard/summary", get(summary_handler))
        .route("/cache", delete(clear_all_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache/:key", delete(clear_handler))
        .route("/cache/:key/age", get(age_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
