//! Indexed min-heap LRU backend.
//!
//! Recency is tracked with a global `time_step` counter that increments on
//! every `get` and every `set`, so each touch stamps its entry with a fresh,
//! unique timestamp and the ordering is tie-free by construction. The heap is
//! an array-backed binary min-heap keyed on those stamps: the root is always
//! the least recently used entry. A key index maps each key to its value and
//! its current heap position, and every swap during heapify refreshes the
//! recorded positions of both slots involved. That back-pointer bookkeeping
//! is the backend's principal correctness risk, which is why
//! [`HeapLruCache::check_invariants`] exists and the tests run it after every
//! heapify-triggering operation.
//!
//! Touching an entry can only make it younger, so a touched slot only ever
//! moves toward the leaves. The fix-up after a touch is therefore a sift-down
//! and nothing else; a generic bidirectional fix-up could silently mask an
//! index desync as a no-op, so none is provided. For the same reason a fresh
//! insert, which always carries the newest stamp, goes to the end of the
//! array without any sift-up.
//!
//! # Performance Characteristics
//!
//! - Get: O(log n)
//! - Set: O(log n)
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
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::num::NonZeroUsize;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// A heap slot: the key plus the stamp of its last touch.
struct HeapSlot<K> {
    key: K,
    /// Strictly increasing across touches; smallest stamp = LRU.
    stamp: u64,
}

/// An index entry: the cached value plus the key's current heap position.
struct IndexedValue<V> {
    value: V,
    /// Back-pointer into the heap array; refreshed on every swap.
    pos: usize,
}

/// LRU cache backed by an indexed min-heap of timestamps, O(log n) per
/// operation.
///
/// # Examples
///
/// ```
/// use lru_rs::{Cache, HeapLruCache};
///
/// let mut cache = HeapLruCache::new(2).unwrap();
/// cache.set("apple", 1);
/// cache.set("banana", 2);
/// assert_eq!(cache.get(&"apple"), Ok(&1));
///
/// // "banana" holds the oldest stamp and gets replaced at the root.
/// let evicted = cache.set("cherry", 3);
/// assert_eq!(evicted, Some(("banana", 2)));
/// ```
pub struct HeapLruCache<K, V, S = DefaultHashBuilder> {
    capacity: NonZeroUsize,
    /// Array-backed binary min-heap ordered by ascending stamp.
    heap: Vec<HeapSlot<K>>,
    index: HashMap<K, IndexedValue<V>, S>,
    /// Incremented once per `get` and once per `set`; never reused.
    time_step: u64,
    metrics: CoreCacheMetrics,
}

impl<K: Hash + Eq + Clone, V> HeapLruCache<K, V> {
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

impl<K: Hash + Eq + Clone, V, S: BuildHasher> HeapLruCache<K, V, S> {
    /// Creates a cache with the given configuration and hash builder.
    pub fn with_hasher(config: CacheConfig, hash_builder: S) -> Result<Self, CacheError> {
        let capacity = config.validate()?;
        Ok(HeapLruCache {
            capacity,
            heap: Vec::with_capacity(capacity.get()),
            index: HashMap::with_capacity_and_hasher(capacity.get(), hash_builder),
            time_step: 0,
            metrics: CoreCacheMetrics::new(),
        })
    }

    /// Records the heap position `i` in the index entry of the key stored
    /// there.
    fn refresh_pos(&mut self, i: usize) {
        let key = self.heap[i].key.clone();
        match self.index.get_mut(&key) {
            Some(item) => item.pos = i,
            None => debug_assert!(false, "heap slot key missing from index"),
        }
    }

    /// Restores the min-heap property downward from position `i`, keeping
    /// the index's back-pointers in sync on every swap.
    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            let mut smallest = i;
            if left < len && self.heap[left].stamp < self.heap[smallest].stamp {
                smallest = left;
            }
            if right < len && self.heap[right].stamp < self.heap[smallest].stamp {
                smallest = right;
            }
            if smallest == i {
                return;
            }
            self.heap.swap(i, smallest);
            self.refresh_pos(i);
            self.refresh_pos(smallest);
            i = smallest;
        }
    }

    /// Evicts the root (the LRU entry) and replaces it with a new entry
    /// stamped with the current time step.
    fn replace_root(&mut self, key: K, value: V) -> Option<(K, V)> {
        let old = mem::replace(
            &mut self.heap[0],
            HeapSlot {
                key: key.clone(),
                stamp: self.time_step,
            },
        );
        let evicted = self.index.remove(&old.key)?;
        self.index.insert(key, IndexedValue { value, pos: 0 });
        self.sift_down(0);
        self.metrics.record_eviction();
        Some((old.key, evicted.value))
    }

    /// Returns a reference to the value for `key` and marks it as the most
    /// recently used entry.
    pub fn get<Q>(&mut self, key: &Q) -> Result<&V, CacheError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let pos = match self.index.get(key) {
            Some(item) => item.pos,
            None => {
                self.metrics.record_miss();
                return Err(CacheError::NotFound);
            }
        };

        // The fresh stamp is the largest in the heap, so the entry can only
        // move toward the leaves.
        self.heap[pos].stamp = self.time_step;
        self.sift_down(pos);
        self.time_step += 1;

        self.metrics.record_hit();
        self.index
            .get(key)
            .map(|item| &item.value)
            .ok_or(CacheError::NotFound)
    }

    /// Inserts or overwrites the entry for `key`, marking it as the most
    /// recently used. Returns the evicted entry, if the insert pushed one
    /// out.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        let mut evicted = None;

        if let Some(pos) = self.index.get(&key).map(|item| item.pos) {
            if let Some(item) = self.index.get_mut(&key) {
                item.value = value;
            }
            self.heap[pos].stamp = self.time_step;
            self.sift_down(pos);
        } else if self.heap.len() == self.capacity.get() {
            evicted = self.replace_root(key, value);
            self.metrics.record_insertion();
        } else {
            // A fresh insert carries the newest stamp, so appending at the
            // end preserves the heap property without a sift-up.
            self.heap.push(HeapSlot {
                key: key.clone(),
                stamp: self.time_step,
            });
            self.index.insert(
                key,
                IndexedValue {
                    value,
                    pos: self.heap.len() - 1,
                },
            );
            self.metrics.record_insertion();
        }

        self.time_step += 1;
        evicted
    }

    /// Returns whether `key` is resident without changing its stamp.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.contains_key(key)
    }

    /// Number of resident entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if no entries are resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Maximum number of resident entries.
    #[inline]
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Validates the backend's internal invariants.
    ///
    /// Checks the capacity bound, heap/index set agreement, back-pointer
    /// accuracy, the min-heap property, and stamp uniqueness (stamps are
    /// always below the current time step).
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) -> Result<(), crate::error::InvariantError> {
        use crate::error::InvariantError;
        use alloc::format;

        let cap = self.capacity.get();
        if self.heap.len() > cap {
            return Err(InvariantError::new(format!(
                "heap holds {} entries, capacity is {cap}",
                self.heap.len()
            )));
        }
        if self.heap.len() != self.index.len() {
            return Err(InvariantError::new(format!(
                "heap has {} entries but index has {}",
                self.heap.len(),
                self.index.len()
            )));
        }
        for (i, slot) in self.heap.iter().enumerate() {
            match self.index.get(&slot.key) {
                Some(item) if item.pos == i => {}
                Some(item) => {
                    return Err(InvariantError::new(format!(
                        "back-pointer desync: heap position {i} recorded as {}",
                        item.pos
                    )));
                }
                None => {
                    return Err(InvariantError::new("heap slot key missing from index"));
                }
            }
            if slot.stamp >= self.time_step && self.time_step > 0 {
                return Err(InvariantError::new(format!(
                    "stamp {} not below time step {}",
                    slot.stamp, self.time_step
                )));
            }
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            if left < self.heap.len() && self.heap[left].stamp <= slot.stamp {
                return Err(InvariantError::new(format!(
                    "heap property violated between {i} and {left}"
                )));
            }
            if right < self.heap.len() && self.heap[right].stamp <= slot.stamp {
                return Err(InvariantError::new(format!(
                    "heap property violated between {i} and {right}"
                )));
            }
        }
        Ok(())
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> Cache<K, V> for HeapLruCache<K, V, S> {
    fn get<Q>(&mut self, key: &Q) -> Result<&V, CacheError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        HeapLruCache::get(self, key)
    }

    fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        HeapLruCache::set(self, key, value)
    }

    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        HeapLruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        HeapLruCache::len(self)
    }

    fn capacity(&self) -> NonZeroUsize {
        HeapLruCache::capacity(self)
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> CacheMetrics for HeapLruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU-heap"
    }
}

impl<K, V, S> fmt::Debug for HeapLruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapLruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.index.len())
            .field("time_step", &self.time_step)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut cache = HeapLruCache::new(2).unwrap();
        assert_eq!(cache.set("apple", 1), None);
        assert_eq!(cache.get(&"apple"), Ok(&1));
        assert_eq!(cache.get(&"banana"), Err(CacheError::NotFound));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            HeapLruCache::<&str, i32>::new(0).unwrap_err(),
            CacheError::InvalidCapacity { got: 0 }
        );
    }

    #[test]
    fn test_replace_root_evicts_lru() {
        let mut cache = HeapLruCache::new(2).unwrap();
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
    fn test_overwrite_refreshes_stamp() {
        let mut cache = HeapLruCache::new(2).unwrap();
        cache.set(1, 100);
        cache.set(2, 200);
        assert_eq!(cache.set(1, 10), None);
        cache.check_invariants().unwrap();

        // 2 is now the root and gets evicted.
        let evicted = cache.set(3, 300);
        assert_eq!(evicted, Some((2, 200)));
        assert_eq!(cache.get(&1), Ok(&10));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_contains_does_not_touch() {
        let mut cache = HeapLruCache::new(2).unwrap();
        cache.set(1, 100);
        cache.set(2, 200);
        assert!(cache.contains(&1));
        let evicted = cache.set(3, 300);
        assert_eq!(evicted, Some((1, 100)));
    }

    #[test]
    fn test_back_pointers_survive_churn() {
        let mut cache = HeapLruCache::new(5).unwrap();
        for i in 0..50u32 {
            cache.set(i % 11, i);
            cache.check_invariants().unwrap();
            let _ = cache.get(&((i + 4) % 11));
            cache.check_invariants().unwrap();
            assert!(cache.len() <= 5);
        }
    }

    #[test]
    fn test_stamps_are_unique() {
        let mut cache = HeapLruCache::new(3).unwrap();
        cache.set(1, 1);
        cache.set(2, 2);
        cache.set(3, 3);
        let _ = cache.get(&1);
        let _ = cache.get(&2);
        let mut stamps: Vec<u64> = cache.heap.iter().map(|s| s.stamp).collect();
        stamps.sort_unstable();
        stamps.dedup();
        assert_eq!(stamps.len(), 3);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_metrics_counts() {
        let mut cache = HeapLruCache::new(2).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        let _ = cache.get(&"a");
        let _ = cache.get(&"missing");
        cache.set("c", 3);

        let metrics = CacheMetrics::metrics(&cache);
        assert_eq!(metrics.get("cache_hits"), Some(&1.0));
        assert_eq!(metrics.get("cache_misses"), Some(&1.0));
        assert_eq!(metrics.get("evictions"), Some(&1.0));
        assert_eq!(cache.algorithm_name(), "LRU-heap");
    }
}
