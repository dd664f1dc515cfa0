//! Cache Manager Module
//!
//! Two-tier TTL cache: an authoritative in-memory map mirrored into an optional
//! durable store. Durable-tier failures are logged and counted, never returned.

use std::collections::HashMap;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, DurableStore, CACHE_PREFIX, DEFAULT_TTL};

const PROBE_KEY: &str = "__probe__";

// == Cache Manager ==
/// Process-wide TTL cache for arbitrarily shaped JSON payloads.
pub struct CacheManager {
    /// Fast tier, authoritative when it holds an unexpired entry
    memory: HashMap<String, CacheEntry>,
    /// Slow tier, None when absent or when the startup probe failed
    durable: Option<Box<dyn DurableStore>>,
    stats: CacheStats,
    default_ttl: Duration,
}

impl CacheManager {
    // == Constructor ==
    /// Creates a cache, probing `durable` once before adopting it.
    pub fn new(default_ttl: Duration, durable: Option<Box<dyn DurableStore>>) -> Self {
        let durable = durable.filter(|store| match probe(store.as_ref()) {
            Ok(()) => true,
            Err(e) => {
                warn!("Durable cache tier unavailable, running memory-only: {}", e);
                false
            }
        });

        let stats = CacheStats {
            durable_enabled: durable.is_some(),
            ..CacheStats::default()
        };

        Self {
            memory: HashMap::new(),
            durable,
            stats,
            default_ttl,
        }
    }

    /// Memory-only cache with the default TTL.
    pub fn memory_only() -> Self {
        Self::new(DEFAULT_TTL, None)
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn has_durable_tier(&self) -> bool {
        self.durable.is_some()
    }

    fn namespaced(key: &str) -> String {
        format!("{}{}", CACHE_PREFIX, key)
    }

    // == Set ==
    /// Stores `data` under `key` for `ttl`, replacing any previous entry.
    ///
    /// The memory write always happens; the durable mirror is best effort.
    pub fn set(&mut self, key: &str, data: Value, ttl: Duration) -> bool {
        let entry = CacheEntry::new(data, ttl);
        let serialized = match serde_json::to_string(&entry) {
            Ok(raw) => Some(raw),
            Err(e) => {
                warn!("Failed to serialize cache entry '{}': {}", key, e);
                None
            }
        };

        self.memory.insert(key.to_string(), entry);
        self.stats.set_total_entries(self.memory.len());

        if let (Some(store), Some(raw)) = (self.durable.as_ref(), serialized) {
            if let Err(e) = store.set_item(&Self::namespaced(key), &raw) {
                warn!("Failed to persist cache entry '{}': {}", key, e);
                self.stats.record_durable_error();
            }
        }

        true
    }

    /// `set` with the cache's default TTL.
    pub fn set_default(&mut self, key: &str, data: Value) -> bool {
        let ttl = self.default_ttl;
        self.set(key, data, ttl)
    }

    /// Serializes `data` and stores it. Returns false if it cannot be represented as JSON.
    pub fn set_as<T: Serialize>(&mut self, key: &str, data: &T, ttl: Duration) -> bool {
        match serde_json::to_value(data) {
            Ok(value) => self.set(key, value, ttl),
            Err(e) => {
                warn!("Cannot cache '{}': {}", key, e);
                false
            }
        }
    }

    // == Get ==
    /// Returns the payload for `key` if either tier holds an unexpired entry.
    ///
    /// Expired entries are evicted here. A durable hit repopulates memory.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        if let Some(entry) = self.memory.get(key) {
            if !entry.is_expired() {
                self.stats.record_hit();
                return Some(entry.data.clone());
            }
            self.memory.remove(key);
            self.stats.set_total_entries(self.memory.len());
        }

        match self.read_durable(key) {
            Some(entry) => {
                debug!("Hydrated '{}' from durable tier", key);
                let data = entry.data.clone();
                self.memory.insert(key.to_string(), entry);
                self.stats.set_total_entries(self.memory.len());
                self.stats.record_durable_hit();
                Some(data)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// `get` followed by deserialization into `T`.
    pub fn get_as<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("Cached value for '{}' has an unexpected shape: {}", key, e);
                None
            }
        }
    }

    // == Has ==
    /// True iff `get(key)` would return a value.
    pub fn has(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Reads, parses and validates the durable entry for `key`.
    fn read_durable(&mut self, key: &str) -> Option<CacheEntry> {
        let full_key = Self::namespaced(key);
        let store = self.durable.as_ref()?;

        let raw = match store.get_item(&full_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read cache entry '{}' from durable tier: {}", key, e);
                self.stats.record_durable_error();
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to parse durable cache entry '{}': {}", key, e);
                self.stats.record_durable_error();
                return None;
            }
        };

        if entry.is_expired() {
            if let Err(e) = store.remove_item(&full_key) {
                warn!("Failed to evict expired entry '{}': {}", key, e);
                self.stats.record_durable_error();
            }
            return None;
        }

        Some(entry)
    }

    // == Clear ==
    /// Removes `key` from both tiers.
    pub fn clear(&mut self, key: &str) {
        self.memory.remove(key);
        self.stats.set_total_entries(self.memory.len());

        if let Some(store) = self.durable.as_ref() {
            if let Err(e) = store.remove_item(&Self::namespaced(key)) {
                warn!("Failed to remove '{}' from durable tier: {}", key, e);
                self.stats.record_durable_error();
            }
        }
    }

    /// Removes every entry this cache created, leaving foreign durable keys alone.
    pub fn clear_all(&mut self) {
        self.memory.clear();
        self.stats.set_total_entries(0);

        let Some(store) = self.durable.as_ref() else {
            return;
        };

        let keys = match store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Failed to enumerate durable tier: {}", e);
                self.stats.record_durable_error();
                return;
            }
        };

        let mut failures = 0;
        for key in keys.iter().filter(|k| k.starts_with(CACHE_PREFIX)) {
            if let Err(e) = store.remove_item(key) {
                warn!("Failed to remove '{}' from durable tier: {}", key, e);
                failures += 1;
            }
        }
        self.stats.durable_errors += failures;
    }

    // == Age ==
    /// Time since the entry for `key` was created, in whichever tier holds it.
    ///
    /// Expired entries count as absent, as in `get`. Does not evict or hydrate.
    pub fn age(&self, key: &str) -> Option<Duration> {
        if let Some(entry) = self.memory.get(key) {
            if !entry.is_expired() {
                return Some(entry.age());
            }
        }

        let store = self.durable.as_ref()?;
        let raw = match store.get_item(&Self::namespaced(key)) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read cache entry '{}' from durable tier: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) if entry.is_expired() => None,
            Ok(entry) => Some(entry.age()),
            Err(e) => {
                warn!("Failed to parse durable cache entry '{}': {}", key, e);
                None
            }
        }
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.memory.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::memory_only()
    }
}

fn probe(store: &dyn DurableStore) -> Result<(), crate::error::StoreError> {
    let key = CacheManager::namespaced(PROBE_KEY);
    store.set_item(&key, PROBE_KEY)?;
    store.remove_item(&key)
}
