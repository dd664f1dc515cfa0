//! Response DTOs for the dashboard gateway API
//!
//! Defines the structure of outgoing HTTP response bodies. The dashboard
//! dataset itself is served as-is.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::dashboard::{DashboardDataset, DashboardTotals};

/// Response body for GET /dashboard/summary
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    /// Record counts per collection
    pub totals: DashboardTotals,
    /// When the underlying data was fetched
    pub last_update: DateTime<Utc>,
    pub from_cache: bool,
    pub stale: bool,
}

impl From<&DashboardDataset> for SummaryResponse {
    fn from(dataset: &DashboardDataset) -> Self {
        Self {
            totals: dataset.totals(),
            last_update: dataset.last_update,
            from_cache: dataset.from_cache,
            stale: dataset.stale,
        }
    }
}

/// Response body for DELETE /cache and DELETE /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// The cleared key, None when the whole cache was cleared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ClearResponse {
    pub fn key(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' cleared", key),
            key: Some(key),
        }
    }

    pub fn all() -> Self {
        Self {
            message: "Cache cleared".to_string(),
            key: None,
        }
    }
}

/// Response body for GET /cache/:key/age
#[derive(Debug, Clone, Serialize)]
pub struct AgeResponse {
    pub key: String,
    /// Milliseconds since the entry was created
    pub age_ms: u64,
}

impl AgeResponse {
    pub fn new(key: impl Into<String>, age_ms: u64) -> Self {
        Self {
            key: key.into(),
            age_ms,
        }
    }
}

/// Response body for the stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Reads answered from memory
    pub hits: u64,
    /// Reads answered by the durable tier
    pub durable_hits: u64,
    /// Reads with no valid entry
    pub misses: u64,
    /// Swallowed durable-tier failures
    pub durable_errors: u64,
    /// Current number of entries in memory
    pub total_entries: usize,
    pub durable_enabled: bool,
    /// (hits + durable_hits) / all reads
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            durable_hits: stats.durable_hits,
            misses: stats.misses,
            durable_errors: stats.durable_errors,
            total_entries: stats.total_entries,
            durable_enabled: stats.durable_enabled,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_summary_from_dataset() {
        let mut dataset = DashboardDataset::assemble(HashMap::new());
        dataset.from_cache = true;
        dataset.stale = true;

        let summary = SummaryResponse::from(&dataset);
        assert_eq!(summary.totals.students, 0);
        assert!(summary.from_cache);
        assert!(summary.stale);
        assert_eq!(summary.last_update, dataset.last_update);
    }

    #[test]
    fn test_clear_response_serialize() {
        let json = serde_json::to_string(&ClearResponse::key("dashboard_data")).unwrap();
        assert!(json.contains("dashboard_data"));
        assert!(json.contains("cleared"));

        let json = serde_json::to_string(&ClearResponse::all()).unwrap();
        assert!(!json.contains("\"key\""));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 6,
            durable_hits: 2,
            misses: 2,
            ..CacheStats::default()
        };
        let resp = StatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = StatsResponse::from(CacheStats::new());
        assert_eq!(resp.hit_rate, 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
