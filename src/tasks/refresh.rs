//! Auto-refresh Task
//!
//! Background task that periodically reloads the dashboard so the cache stays
//! warm between user visits. It is not subject to the user refresh limiter.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::dashboard::DashboardService;

/// Spawns a background task that forces a dashboard reload every `interval`.
///
/// The first reload happens one full interval after spawning. Failures are
/// logged and the loop keeps going; a failed reload leaves the cached dataset
/// in place. A zero `interval` disables auto-refresh: the task logs and
/// finishes immediately.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_refresh_task(state.service.clone(), Duration::from_secs(300));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_refresh_task(service: DashboardService, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        if interval.is_zero() {
            info!("Dashboard auto-refresh disabled (zero interval)");
            return;
        }

        info!(
            "Starting dashboard auto-refresh with interval of {} seconds",
            interval.as_secs()
        );

        let mut ticker = tokio::time::interval(interval);
        // Skip the immediate first tick
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match service.load_dashboard_data(true).await {
                Ok(dataset) if dataset.stale => {
                    warn!("Auto-refresh failed, cache still holds the previous dataset");
                }
                Ok(_) => debug!("Auto-refresh completed"),
                Err(e) => warn!("Auto-refresh failed: {}", e),
            }
        }
    })
}
