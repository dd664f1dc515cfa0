//! Response models for the dashboard gateway API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing HTTP response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{AgeResponse, ClearResponse, HealthResponse, StatsResponse, SummaryResponse};
