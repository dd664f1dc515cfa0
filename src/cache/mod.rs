//! Cache Module
//!
//! Two-tier TTL cache: an in-memory map mirrored into a durable key/value store.

use std::time::Duration;

mod durable;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use durable::{DurableStore, FileStore, MemoryStore};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheManager;

// == Public Constants ==
/// Prefix for every durable key this cache writes
pub const CACHE_PREFIX: &str = "school_dash_cache_";

/// TTL used when the caller does not pick one
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
