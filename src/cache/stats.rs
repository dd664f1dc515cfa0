//! Cache Statistics Module
//!
//! Tracks how reads were served and how often the durable tier misbehaved.

use serde::Serialize;

// == Cache Stats ==
/// Cache performance counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Reads served from the memory tier
    pub hits: u64,
    /// Reads served by hydrating from the durable tier
    pub durable_hits: u64,
    /// Reads that found no valid entry in either tier
    pub misses: u64,
    /// Durable-tier reads, writes or parses that failed and were swallowed
    pub durable_errors: u64,
    /// Current number of entries in the memory tier
    pub total_entries: usize,
    /// Whether a durable tier is attached
    pub durable_enabled: bool,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Share of reads answered from either tier, 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        let served = self.hits + self.durable_hits;
        let total = served + self.misses;
        if total == 0 {
            0.0
        } else {
            served as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_durable_hit(&mut self) {
        self.durable_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_durable_error(&mut self) {
        self.durable_errors += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
