//! School Dashboard - data gateway for the school management dashboard
//!
//! Aggregates the backend's student, teacher, room, schedule, subject and
//! section endpoints into one dataset, backed by a two-tier TTL cache, a
//! retrying fetcher and a refresh rate limiter.

pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod models;
pub mod rate_limit;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use dashboard::{DashboardDataset, DashboardService};
pub use tasks::spawn_refresh_task;
