//! Cache metrics.
//!
//! Every backend tracks the same count-based counters through
//! [`CoreCacheMetrics`] and reports them through the [`CacheMetrics`] trait.
//! Entries are unit-weight, so there is no byte accounting; a hit, a miss, an
//! insertion, and an eviction each count one.
//!
//! # Why BTreeMap over HashMap?
//!
//! Reported metrics use `BTreeMap` so they always appear in a consistent
//! order: test assertions, logs, and serialized exports stay reproducible.
//! With a handful of keys the O(log n) lookup cost is irrelevant.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Counters common to all cache backends.
#[derive(Debug, Default, Clone)]
pub struct CoreCacheMetrics {
    /// Total number of `get` requests made to the cache.
    pub requests: u64,
    /// Number of `get` requests that found the key resident.
    pub cache_hits: u64,
    /// Number of `get` requests that failed with `NotFound`.
    pub cache_misses: u64,
    /// Number of new entries admitted into the cache.
    pub insertions: u64,
    /// Number of entries removed to keep the resident count within capacity.
    pub evictions: u64,
}

impl CoreCacheMetrics {
    /// Creates a zeroed metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a `get` that found its key.
    #[inline]
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a `get` that missed.
    #[inline]
    pub fn record_miss(&mut self) {
        self.requests += 1;
        self.cache_misses += 1;
    }

    /// Records the admission of a new entry.
    #[inline]
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records a capacity-triggered eviction.
    #[inline]
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Fraction of requests served from the cache, or 0.0 before the first
    /// request.
    pub fn hit_ratio(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.requests as f64
        }
    }

    /// Converts the counters to a `BTreeMap` for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();
        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("hit_ratio".to_string(), self.hit_ratio());
        metrics
    }
}

/// Common interface for reading metrics off a cache.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Returns a short name identifying the backend.
    fn algorithm_name(&self) -> &'static str;
}
