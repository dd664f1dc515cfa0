//! Dashboard Module
//!
//! Aggregates the twelve backend endpoints into one dataset, consulting the
//! cache before and after.

mod dataset;
mod resource;
mod service;

pub use dataset::{ChartData, DashboardDataset, DashboardTotals};
pub use resource::{coerce_array, coerce_object, Resource, Shape};
pub use service::{DashboardService, DASHBOARD_CACHE_KEY};
