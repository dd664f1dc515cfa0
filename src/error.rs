//! Error types for the dashboard gateway
//!
//! Each layer gets its own thiserror enum. Only `ApiError` knows about HTTP
//! responses; the others stay transport-agnostic.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Fetch Error Enum ==
/// Failure of a single logical request made through the fetcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The backend answered 404; never retried
    #[error("Resource not found: {url}")]
    NotFound { url: String },

    /// Any other 4xx answer; never retried
    #[error("HTTP {status}: {status_text}")]
    Client { status: u16, status_text: String },

    /// 5xx answer; retried
    #[error("Server error HTTP {status}: {status_text}")]
    Server { status: u16, status_text: String },

    /// The attempt did not finish before its deadline; retried
    #[error("timeout after {millis}ms")]
    Timeout { millis: u64 },

    /// Connection or transport failure; retried
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx body that is not valid JSON
    #[error("Invalid JSON body: {0}")]
    Decode(String),

    /// The request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether another attempt may succeed where this one failed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::Server { .. } | FetchError::Timeout { .. } | FetchError::Network(_)
        )
    }
}

// == Store Error Enum ==
/// Failure inside a durable storage tier. Never escapes the cache manager.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage quota exceeded")]
    QuotaExceeded,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

// == Dashboard Error Enum ==
/// Hard failure of a dashboard load with no cached dataset to fall back on.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("All {0} dashboard endpoints failed")]
    AllEndpointsFailed(usize),

    #[error("Could not build endpoint URL: {0}")]
    Endpoint(#[from] FetchError),
}

// == API Error Enum ==
/// Errors surfaced by the gateway's HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The refresh quota is used up
    #[error("Too many refresh requests, try again in {wait_secs} seconds")]
    RateLimited { wait_secs: u64 },

    /// Cache key not present
    #[error("Key not found: {0}")]
    NotFound(String),

    /// No fresh data and nothing cached
    #[error("Dashboard data unavailable: {0}")]
    Unavailable(#[from] DashboardError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ApiError::RateLimited { wait_secs } => {
                let body = Json(json!({
                    "error": message,
                    "retry_after_secs": wait_secs
                }));
                (StatusCode::TOO_MANY_REQUESTS, body).into_response()
            }
            ApiError::NotFound(_) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Unavailable(_) => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the gateway handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
