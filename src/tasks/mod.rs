//! Background Tasks Module
//!
//! Contains background tasks that run alongside the gateway.

pub mod refresh;

pub use refresh::spawn_refresh_task;
