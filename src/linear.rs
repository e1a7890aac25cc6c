//! Linear priority array LRU backend.
//!
//! The baseline reference implementation: a single key index in which every
//! entry carries an integer priority in `[0, capacity]`. `capacity` means
//! "just touched" and `0` means "about to be evicted". Touching an entry
//! lifts it to `capacity` and slides every entry above its old priority down
//! by one, which preserves a strict total order because priorities are unique
//! before every update.
//!
//! # Performance Characteristics
//!
//! - Get: O(n)
//! - Set: O(n)
//!
//! Every operation scans all resident entries, so this backend only makes
//! sense for very small capacities or as an oracle to test the faster
//! backends against. The scan is iterative, never recursive, so behavior is
//! independent of stack limits.
//!
//! # Thread Safety
//!
//! Not thread-safe. Wrap the cache in a synchronization primitive such as
//! `Mutex` for concurrent access.

extern crate alloc;

use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use crate::traits::Cache;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// A resident entry: the cached value and its recency priority.
struct Slot<V> {
    value: V,
    /// Unique within the cache; `capacity` = newest, `0` = evict next.
    priority: usize,
}

/// LRU cache backed by a priority-annotated map, O(n) per operation.
///
/// # Examples
///
/// ```
/// use lru_rs::{Cache, LinearLruCache};
///
/// let mut cache = LinearLruCache::new(2).unwrap();
/// cache.set("apple", 1);
/// cache.set("banana", 2);
/// assert_eq!(cache.get(&"apple"), Ok(&1));
///
/// // "banana" is now the least recently touched and gets evicted.
/// let evicted = cache.set("cherry", 3);
/// assert_eq!(evicted, Some(("banana", 2)));
/// ```
pub struct LinearLruCache<K, V, S = DefaultHashBuilder> {
    capacity: NonZeroUsize,
    slots: HashMap<K, Slot<V>, S>,
    metrics: CoreCacheMetrics,
}

impl<K: Hash + Eq + Clone, V> LinearLruCache<K, V> {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Fails with [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        Self::init(CacheConfig { capacity })
    }

    /// Creates a cache from a validated configuration.
    pub fn init(config: CacheConfig) -> Result<Self, CacheError> {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LinearLruCache<K, V, S> {
    /// Creates a cache with the given configuration and hash builder.
    pub fn with_hasher(config: CacheConfig, hash_builder: S) -> Result<Self, CacheError> {
        let capacity = config.validate()?;
        Ok(LinearLruCache {
            capacity,
            slots: HashMap::with_capacity_and_hasher(capacity.get(), hash_builder),
            metrics: CoreCacheMetrics::new(),
        })
    }

    /// Returns a reference to the value for `key` and marks it as the most
    /// recently used entry.
    pub fn get<Q>(&mut self, key: &Q) -> Result<&V, CacheError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let cap = self.capacity.get();
        let touched = match self.slots.get_mut(key) {
            Some(slot) => {
                let p = slot.priority;
                slot.priority = cap;
                p
            }
            None => {
                self.metrics.record_miss();
                return Err(CacheError::NotFound);
            }
        };

        // Slide every entry that was newer than the touched one down by one
        // slot; uniqueness of priorities is preserved.
        for (k, slot) in self.slots.iter_mut() {
            if k.borrow() == key {
                continue;
            }
            if slot.priority > touched {
                slot.priority -= 1;
            }
        }

        self.metrics.record_hit();
        self.slots
            .get(key)
            .map(|slot| &slot.value)
            .ok_or(CacheError::NotFound)
    }

    /// Inserts or overwrites the entry for `key`, marking it as the most
    /// recently used. Returns the evicted entry, if the insert pushed one
    /// out.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        let cap = self.capacity.get();
        // A new key enters with old priority 0, so every resident entry
        // slides down by one.
        let touched = match self.slots.get_mut(&key) {
            Some(slot) => {
                let p = slot.priority;
                slot.value = value;
                slot.priority = cap;
                p
            }
            None => {
                self.slots.insert(
                    key.clone(),
                    Slot {
                        value,
                        priority: cap,
                    },
                );
                self.metrics.record_insertion();
                0
            }
        };

        let mut doomed: Option<K> = None;
        for (k, slot) in self.slots.iter_mut() {
            if *k == key {
                continue;
            }
            if slot.priority > touched {
                slot.priority -= 1;
            }
            if slot.priority == 0 {
                // Priorities are unique before the update, so at most one
                // entry can bottom out.
                debug_assert!(doomed.is_none(), "two entries reached priority 0");
                doomed = Some(k.clone());
            }
        }

        let doomed = doomed?;
        let slot = self.slots.remove(&doomed)?;
        self.metrics.record_eviction();
        Some((doomed, slot.value))
    }

    /// Returns whether `key` is resident without changing its priority.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.slots.contains_key(key)
    }

    /// Number of resident entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no entries are resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Maximum number of resident entries.
    #[inline]
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Validates the backend's internal invariants.
    ///
    /// Checks the capacity bound, the priority range, and priority
    /// uniqueness (the strict total order over resident entries).
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) -> Result<(), crate::error::InvariantError> {
        use crate::error::InvariantError;
        use alloc::format;
        use alloc::vec::Vec;

        let cap = self.capacity.get();
        if self.slots.len() > cap {
            return Err(InvariantError::new(format!(
                "resident count {} exceeds capacity {cap}",
                self.slots.len()
            )));
        }
        let mut priorities: Vec<usize> = self.slots.values().map(|s| s.priority).collect();
        priorities.sort_unstable();
        for pair in priorities.windows(2) {
            if pair[0] == pair[1] {
                return Err(InvariantError::new(format!(
                    "duplicate priority {}",
                    pair[0]
                )));
            }
        }
        if let Some(&max) = priorities.last() {
            if max > cap {
                return Err(InvariantError::new(format!(
                    "priority {max} outside [0, {cap}]"
                )));
            }
        }
        Ok(())
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> Cache<K, V> for LinearLruCache<K, V, S> {
    fn get<Q>(&mut self, key: &Q) -> Result<&V, CacheError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        LinearLruCache::get(self, key)
    }

    fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        LinearLruCache::set(self, key, value)
    }

    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        LinearLruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LinearLruCache::len(self)
    }

    fn capacity(&self) -> NonZeroUsize {
        LinearLruCache::capacity(self)
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> CacheMetrics for LinearLruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU-linear"
    }
}

impl<K, V, S> fmt::Debug for LinearLruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearLruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut cache = LinearLruCache::new(2).unwrap();
        assert_eq!(cache.set("apple", 1), None);
        assert_eq!(cache.get(&"apple"), Ok(&1));
        assert_eq!(cache.get(&"banana"), Err(CacheError::NotFound));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            LinearLruCache::<&str, i32>::new(0).unwrap_err(),
            CacheError::InvalidCapacity { got: 0 }
        );
    }

    #[test]
    fn test_eviction_picks_least_recently_touched() {
        let mut cache = LinearLruCache::new(2).unwrap();
        cache.set("apple", 1);
        cache.set("banana", 2);
        assert_eq!(cache.get(&"apple"), Ok(&1));

        let evicted = cache.set("cherry", 3);
        assert_eq!(evicted, Some(("banana", 2)));
        assert_eq!(cache.get(&"apple"), Ok(&1));
        assert_eq!(cache.get(&"cherry"), Ok(&3));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_overwrite_refreshes_without_eviction() {
        let mut cache = LinearLruCache::new(2).unwrap();
        cache.set(1, 100);
        cache.set(2, 200);
        assert_eq!(cache.set(1, 10), None);
        assert_eq!(cache.len(), 2);

        // 1 was just refreshed, so inserting a new key drops 2.
        let evicted = cache.set(3, 300);
        assert_eq!(evicted, Some((2, 200)));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_contains_does_not_touch() {
        let mut cache = LinearLruCache::new(2).unwrap();
        cache.set(1, 100);
        cache.set(2, 200);
        // 1 is the eviction candidate; contains must not refresh it.
        assert!(cache.contains(&1));
        let evicted = cache.set(3, 300);
        assert_eq!(evicted, Some((1, 100)));
    }

    #[test]
    fn test_priorities_stay_unique_under_churn() {
        let mut cache = LinearLruCache::new(4).unwrap();
        for i in 0..20 {
            cache.set(i % 7, i);
            cache.check_invariants().unwrap();
            let _ = cache.get(&((i + 3) % 7));
            cache.check_invariants().unwrap();
            assert!(cache.len() <= 4);
        }
    }

    #[test]
    fn test_metrics_counts() {
        let mut cache = LinearLruCache::new(2).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        let _ = cache.get(&"a");
        let _ = cache.get(&"missing");
        cache.set("c", 3);

        let metrics = CacheMetrics::metrics(&cache);
        assert_eq!(metrics.get("cache_hits"), Some(&1.0));
        assert_eq!(metrics.get("cache_misses"), Some(&1.0));
        assert_eq!(metrics.get("insertions"), Some(&3.0));
        assert_eq!(metrics.get("evictions"), Some(&1.0));
        assert_eq!(cache.algorithm_name(), "LRU-linear");
    }
}
