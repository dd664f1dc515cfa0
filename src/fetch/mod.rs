//! Fetch Module
//!
//! Resilient JSON requests against the school REST backend: per-attempt
//! timeouts, bounded retries and exponential backoff.

mod client;
mod retry;

pub use client::{FetchClient, RequestOptions};
pub use retry::{RetryPolicy, DEFAULT_RETRIES, DEFAULT_TIMEOUT};
