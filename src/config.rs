//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use directories::ProjectDirs;
use tracing::warn;

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the school REST backend (should end with `/`)
    pub api_base_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Default cache TTL in seconds
    pub default_ttl: u64,
    /// Directory for the durable cache tier, None = memory-backed durable tier
    pub cache_dir: Option<PathBuf>,
    /// Attempts per backend request
    pub fetch_retries: u32,
    /// Per-attempt timeout in milliseconds
    pub fetch_timeout_ms: u64,
    /// Refreshes allowed per window
    pub rate_limit_max: usize,
    /// Rate limit window in seconds
    pub rate_limit_window: u64,
    /// Auto-refresh interval in seconds, 0 disables
    pub refresh_interval: u64,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Default location of the durable tier (`~/.cache/school-dashboard` on Linux).
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "school-dashboard").map(|dirs| dirs.cache_dir().to_path_buf())
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Backend base URL (default: http://localhost:8080/api/)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_TTL` - Default cache TTL in seconds (default: 300)
    /// - `CACHE_DIR` - Durable cache directory (default: XDG cache dir)
    /// - `FETCH_RETRIES` - Attempts per request (default: 3)
    /// - `FETCH_TIMEOUT_MS` - Per-attempt timeout (default: 10000)
    /// - `RATE_LIMIT_MAX` - Refreshes per window, at least 1 (default: 10)
    /// - `RATE_LIMIT_WINDOW` - Window in seconds (default: 60)
    /// - `REFRESH_INTERVAL` - Auto-refresh seconds, 0 disables (default: 300)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            cache_dir: env::var("CACHE_DIR")
                .ok()
                .map(PathBuf::from)
                .or(defaults.cache_dir),
            fetch_retries: env_or("FETCH_RETRIES", defaults.fetch_retries),
            fetch_timeout_ms: env_or("FETCH_TIMEOUT_MS", defaults.fetch_timeout_ms),
            rate_limit_max: env_or("RATE_LIMIT_MAX", defaults.rate_limit_max),
            rate_limit_window: env_or("RATE_LIMIT_WINDOW", defaults.rate_limit_window),
            refresh_interval: env_or("REFRESH_INTERVAL", defaults.refresh_interval),
        }
        .normalized()
    }

    /// Raises values that would make the gateway unusable to their minimum.
    fn normalized(mut self) -> Self {
        if self.rate_limit_max == 0 {
            warn!("RATE_LIMIT_MAX of 0 would reject every refresh, using 1");
            self.rate_limit_max = 1;
        }
        self
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api/".to_string(),
            server_port: 3000,
            default_ttl: 300,
            cache_dir: default_cache_dir(),
            fetch_retries: 3,
            fetch_timeout_ms: 10_000,
            rate_limit_max: 10,
            rate_limit_window: 60,
            refresh_interval: 300,
        }
    }
}
