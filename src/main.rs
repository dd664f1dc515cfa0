//! School Dashboard - data gateway for the school management dashboard
//!
//! Serves the aggregated dashboard dataset to the browser front-end and keeps
//! it fresh in the background.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use school_dashboard::api::create_router;
use school_dashboard::{spawn_refresh_task, AppState, Config};

/// Main entry point for the dashboard gateway.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build cache, fetcher and rate limiter
/// 4. Start the background auto-refresh task (unless disabled)
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "school_dashboard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting School Dashboard gateway");

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={}, port={}, default_ttl={}s, retries={}, timeout={}ms, rate_limit={}/{}s, refresh_interval={}s",
        config.api_base_url,
        config.server_port,
        config.default_ttl,
        config.fetch_retries,
        config.fetch_timeout_ms,
        config.rate_limit_max,
        config.rate_limit_window,
        config.refresh_interval
    );

    let state = AppState::from_config(&config).context("Invalid backend configuration")?;
    info!("Dashboard service initialized");

    let refresh_handle = if config.refresh_interval > 0 {
        let handle = spawn_refresh_task(
            state.service.clone(),
            Duration::from_secs(config.refresh_interval),
        );
        info!("Background auto-refresh task started");
        Some(handle)
    } else {
        info!("Background auto-refresh disabled");
        None
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(refresh_handle))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the refresh task and allows graceful shutdown.
async fn shutdown_signal(refresh_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = refresh_handle {
        handle.abort();
        warn!("Auto-refresh task aborted");
    }
}
