//! Dashboard loading: cache check, concurrent fan-out, stale fallback

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{DashboardDataset, Resource};
use crate::cache::CacheManager;
use crate::error::DashboardError;
use crate::fetch::{FetchClient, RequestOptions};

/// Cache key the dataset is stored under
pub const DASHBOARD_CACHE_KEY: &str = "dashboard_data";

/// Produces dashboard datasets from the backend and the shared cache.
///
/// Concurrent loads are not de-duplicated; each one fetches and overwrites the
/// cached dataset, last write wins.
#[derive(Clone)]
pub struct DashboardService {
    fetcher: FetchClient,
    cache: Arc<RwLock<CacheManager>>,
}

impl DashboardService {
    pub fn new(fetcher: FetchClient, cache: Arc<RwLock<CacheManager>>) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &Arc<RwLock<CacheManager>> {
        &self.cache
    }

    pub fn fetcher(&self) -> &FetchClient {
        &self.fetcher
    }

    /// Runs `f` against the cache on the blocking pool.
    ///
    /// Any call that may reach the durable tier goes through here, since a
    /// `FileStore` does synchronous file I/O.
    pub async fn with_cache<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CacheManager) -> R + Send + 'static,
        R: Send + 'static,
    {
        let cache = Arc::clone(&self.cache);
        let task = tokio::task::spawn_blocking(move || {
            let mut guard = cache.blocking_write();
            f(&mut *guard)
        });
        match task.await {
            Ok(result) => result,
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }

    /// Returns the cached dataset unless `force_refresh` is set or nothing is
    /// cached, in which case all endpoints are fetched concurrently.
    ///
    /// Individual endpoint failures become empty containers. A hard failure
    /// falls back to the cached dataset marked stale, and only errors if
    /// nothing is cached.
    pub async fn load_dashboard_data(
        &self,
        force_refresh: bool,
    ) -> Result<DashboardDataset, DashboardError> {
        if !force_refresh {
            if let Some(mut cached) = self.cached().await {
                debug!("Serving dashboard from cache");
                cached.from_cache = true;
                cached.stale = false;
                return Ok(cached);
            }
        }

        match self.fetch_fresh().await {
            Ok(dataset) => {
                let stored = dataset.clone();
                self.with_cache(move |cache| {
                    let ttl = cache.default_ttl();
                    cache.set_as(DASHBOARD_CACHE_KEY, &stored, ttl);
                })
                .await;
                Ok(dataset)
            }
            Err(e) => match self.cached().await {
                Some(mut cached) => {
                    warn!("Dashboard refresh failed, serving stale data: {}", e);
                    cached.from_cache = true;
                    cached.stale = true;
                    Ok(cached)
                }
                None => {
                    warn!("Dashboard refresh failed with nothing cached: {}", e);
                    Err(e)
                }
            },
        }
    }

    async fn cached(&self) -> Option<DashboardDataset> {
        self.with_cache(|cache| cache.get_as::<DashboardDataset>(DASHBOARD_CACHE_KEY))
            .await
    }

    async fn fetch_fresh(&self) -> Result<DashboardDataset, DashboardError> {
        let targets = Resource::ALL
            .into_iter()
            .map(|resource| -> Result<_, DashboardError> {
                Ok((resource, self.fetcher.url_for(resource.path())?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let policy = *self.fetcher.policy();
        let options = RequestOptions::get();
        let fetches = targets.into_iter().map(|(resource, url)| {
            let options = &options;
            async move {
                let result = self
                    .fetcher
                    .fetch_with_retry(url.as_str(), options, policy.retries, policy.timeout)
                    .await;
                (resource, result)
            }
        });

        let mut bodies = HashMap::new();
        let mut failed = 0;
        for (resource, result) in join_all(fetches).await {
            match result {
                Ok(body) => {
                    bodies.insert(resource, body);
                }
                Err(e) => {
                    warn!("Failed to load {}, using empty default: {}", resource, e);
                    failed += 1;
                }
            }
        }

        if failed == Resource::ALL.len() {
            return Err(DashboardError::AllEndpointsFailed(failed));
        }

        info!(
            "Loaded dashboard data ({} of {} endpoints)",
            Resource::ALL.len() - failed,
            Resource::ALL.len()
        );
        Ok(DashboardDataset::assemble(bodies))
    }
}
