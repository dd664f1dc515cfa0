//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::cache::{CacheManager, DurableStore, FileStore, MemoryStore};
use crate::config::Config;
use crate::dashboard::{DashboardDataset, DashboardService};
use crate::error::{ApiError, FetchError, Result};
use crate::fetch::{FetchClient, RetryPolicy};
use crate::models::{AgeResponse, ClearResponse, HealthResponse, StatsResponse, SummaryResponse};
use crate::rate_limit::RateLimiter;

/// Application state shared across all handlers.
///
/// The cache lives inside the dashboard service; the limiter only guards
/// user-initiated refreshes.
#[derive(Clone)]
pub struct AppState {
    pub service: DashboardService,
    pub limiter: Arc<Mutex<RateLimiter>>,
}

impl AppState {
    /// Creates a new AppState from a service and a limiter.
    pub fn new(service: DashboardService, limiter: RateLimiter) -> Self {
        Self {
            service,
            limiter: Arc::new(Mutex::new(limiter)),
        }
    }

    /// Builds the cache, fetcher and limiter described by the configuration.
    pub fn from_config(config: &Config) -> std::result::Result<Self, FetchError> {
        let durable: Box<dyn DurableStore> = match &config.cache_dir {
            Some(dir) => {
                info!("Durable cache tier at {}", dir.display());
                Box::new(FileStore::new(dir.clone()))
            }
            None => Box::new(MemoryStore::new()),
        };
        let cache = CacheManager::new(config.default_ttl(), Some(durable));

        let policy = RetryPolicy {
            retries: config.fetch_retries,
            timeout: config.fetch_timeout(),
            ..RetryPolicy::default()
        };
        let fetcher = FetchClient::new(&config.api_base_url, policy)?;

        let service = DashboardService::new(fetcher, Arc::new(RwLock::new(cache)));
        let limiter = RateLimiter::new(config.rate_limit_max, config.rate_limit_window());
        Ok(Self::new(service, limiter))
    }

    pub fn cache(&self) -> &Arc<RwLock<CacheManager>> {
        self.service.cache()
    }
}

/// Handler for GET /dashboard
///
/// Serves the cached dataset, fetching only when nothing valid is cached.
pub async fn dashboard_handler(State(state): State<AppState>) -> Result<Json<DashboardDataset>> {
    let dataset = state.service.load_dashboard_data(false).await?;
    Ok(Json(dataset))
}

/// Handler for POST /dashboard/refresh
///
/// Forces a reload if the refresh quota allows it; otherwise reports how long
/// the user has to wait.
pub async fn refresh_handler(State(state): State<AppState>) -> Result<Json<DashboardDataset>> {
    {
        let mut limiter = state.limiter.lock().await;
        if !limiter.can_make_request() {
            return Err(ApiError::RateLimited {
                wait_secs: limiter.wait_secs(),
            });
        }
    }

    let dataset = state.service.load_dashboard_data(true).await?;
    Ok(Json(dataset))
}

/// Handler for GET /dashboard/summary
pub async fn summary_handler(State(state): State<AppState>) -> Result<Json<SummaryResponse>> {
    let dataset = state.service.load_dashboard_data(false).await?;
    Ok(Json(SummaryResponse::from(&dataset)))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache().read().await;
    Json(StatsResponse::from(cache.stats()))
}

/// Handler for DELETE /cache
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.service.with_cache(|cache| cache.clear_all()).await;
    Json(ClearResponse::all())
}

/// Handler for DELETE /cache/:key
pub async fn clear_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ClearResponse> {
    let target = key.clone();
    state.service.with_cache(move |cache| cache.clear(&target)).await;
    Json(ClearResponse::key(key))
}

/// Handler for GET /cache/:key/age
pub async fn age_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AgeResponse>> {
    let target = key.clone();
    let age = state
        .service
        .with_cache(move |cache| cache.age(&target))
        .await
        .ok_or_else(|| ApiError::NotFound(key.clone()))?;

    Ok(Json(AgeResponse::new(key, age.as_millis() as u64)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
