//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.
//! The same shape is stored in memory and serialized into the durable tier.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// A cached payload with its creation and expiry instants.
///
/// `expiry = timestamp + ttl` at creation. Entries are never mutated, only
/// replaced wholesale by a later `set`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The stored payload
    pub data: Value,
    /// Instant after which the entry is invalid
    pub expiry: DateTime<Utc>,
    /// Creation instant
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    pub fn new(data: Value, ttl: Duration) -> Self {
        let timestamp = Utc::now();
        // An out-of-range TTL saturates to "never expires in practice"
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expiry = timestamp
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            data,
            expiry,
            timestamp,
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its expiry instant.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expiry
    }

    // == Age ==
    /// Time elapsed since the entry was created, zero if the clock went backwards.
    pub fn age(&self) -> Duration {
        (Utc::now() - self.timestamp).to_std().unwrap_or_default()
    }

    /// Remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        (self.expiry - Utc::now()).to_std().unwrap_or_default()
    }
}
