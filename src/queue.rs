//! Doubly-linked queue LRU backend.
//!
//! The reason the other two backends exist is to be compared against this
//! one: a sentinel-node doubly linked list keeps entries ordered from most
//! recently used (front) to least recently used (back), and a key index maps
//! each key to a raw pointer at its list node. Touching an entry unlinks its
//! node through that handle and relinks it at the front, with no traversal;
//! eviction pops the back node. Every operation is O(1) worst case.
//!
//! The list is the sole owner of its nodes. The index holds non-owning
//! pointers used purely for lookup, and every code path that unlinks a node
//! either frees it after removing its key from the index (eviction) or
//! relinks it immediately (touch), so the index never holds a dangling
//! handle.
//!
//! # Performance Characteristics
//!
//! - Get: O(1)
//! - Set: O(1)
//!
//! # Thread Safety
//!
//! Not thread-safe. A cache instance is designed for exclusive use by one
//! logical owner; wrap it in a synchronization primitive such as `Mutex` for
//! concurrent access. `Send` and `Sync` are implemented so that an
//! externally locked instance can cross threads.

extern crate alloc;

use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::list::{List, Node};
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

/// LRU cache backed by a doubly linked queue, O(1) per operation.
///
/// # Examples
///
/// ```
/// use lru_rs::{Cache, QueueLruCache};
///
/// let mut cache = QueueLruCache::new(2).unwrap();
/// cache.set("apple", 1);
/// cache.set("banana", 2);
/// assert_eq!(cache.get(&"apple"), Ok(&1));
///
/// // "banana" sits at the back of the queue and gets evicted.
/// let evicted = cache.set("cherry", 3);
/// assert_eq!(evicted, Some(("banana", 2)));
/// ```
pub struct QueueLruCache<K, V, S = DefaultHashBuilder> {
    capacity: NonZeroUsize,
    list: List<(K, V)>,
    index: HashMap<K, *mut Node<(K, V)>, S>,
    metrics: CoreCacheMetrics,
}

// SAFETY: the cache owns all data; the raw pointers in `index` point only to
// nodes owned by `list`, which lives and dies with the cache. Sending the
// whole cache to another thread moves both together.
unsafe impl<K: Send, V: Send, S: Send> Send for QueueLruCache<K, V, S> {}

// SAFETY: all mutation requires `&mut self`; shared references expose no
// interior mutability, so they cannot race.
unsafe impl<K: Send, V: Send, S: Sync> Sync for QueueLruCache<K, V, S> {}

impl<K: Hash + Eq + Clone, V> QueueLruCache<K, V> {
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

impl<K: Hash + Eq + Clone, V, S: BuildHasher> QueueLruCache<K, V, S> {
    /// Creates a cache with the given configuration and hash builder.
    pub fn with_hasher(config: CacheConfig, hash_builder: S) -> Result<Self, CacheError> {
        let capacity = config.validate()?;
        Ok(QueueLruCache {
            capacity,
            list: List::new(capacity),
            index: HashMap::with_capacity_and_hasher(capacity.get(), hash_builder),
            metrics: CoreCacheMetrics::new(),
        })
    }

    /// Returns a reference to the value for `key` and moves its node to the
    /// front of the queue.
    pub fn get<Q>(&mut self, key: &Q) -> Result<&V, CacheError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = match self.index.get(key).copied() {
            Some(node) => node,
            None => {
                self.metrics.record_miss();
                return Err(CacheError::NotFound);
            }
        };
        self.metrics.record_hit();
        // SAFETY: node came from our index, which only holds pointers to
        // live nodes in `list`.
        unsafe {
            self.list.move_to_front(node);
            let (_, value) = (*node).value();
            Ok(value)
        }
    }

    /// Inserts or overwrites the entry for `key`, moving it to the front of
    /// the queue. Returns the evicted entry, if the insert pushed one out.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&node) = self.index.get(&key) {
            // SAFETY: node came from our index and is live.
            unsafe {
                self.list.move_to_front(node);
                drop(self.list.update(node, (key, value)));
            }
            return None;
        }

        let mut evicted = None;
        if self.index.len() >= self.capacity.get() {
            if let Some(node) = self.list.remove_last() {
                // SAFETY: remove_last only returns non-sigil nodes.
                let (old_key, old_value) = unsafe { node.into_value() };
                self.index.remove(&old_key);
                self.metrics.record_eviction();
                evicted = Some((old_key, old_value));
            }
        }

        if let Some(node) = self.list.add((key.clone(), value)) {
            self.index.insert(key, node);
            self.metrics.record_insertion();
        }

        evicted
    }

    /// Returns whether `key` is resident without reordering the queue.
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

    /// Validates the backend's internal invariants: the capacity bound and
    /// the list/index agreement on the resident count.
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) -> Result<(), crate::error::InvariantError> {
        use crate::error::InvariantError;
        use alloc::format;

        if self.index.len() > self.capacity.get() {
            return Err(InvariantError::new(format!(
                "resident count {} exceeds capacity {}",
                self.index.len(),
                self.capacity
            )));
        }
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index has {} entries but list has {}",
                self.index.len(),
                self.list.len()
            )));
        }
        Ok(())
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> Cache<K, V> for QueueLruCache<K, V, S> {
    fn get<Q>(&mut self, key: &Q) -> Result<&V, CacheError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        QueueLruCache::get(self, key)
    }

    fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        QueueLruCache::set(self, key, value)
    }

    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        QueueLruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        QueueLruCache::len(self)
    }

    fn capacity(&self) -> NonZeroUsize {
        QueueLruCache::capacity(self)
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> CacheMetrics for QueueLruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU-queue"
    }
}

impl<K, V, S> fmt::Debug for QueueLruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueLruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.index.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_round_trip() {
        let mut cache = QueueLruCache::new(2).unwrap();
        assert_eq!(cache.set("apple", 1), None);
        assert_eq!(cache.get(&"apple"), Ok(&1));
        assert_eq!(cache.get(&"banana"), Err(CacheError::NotFound));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            QueueLruCache::<&str, i32>::new(0).unwrap_err(),
            CacheError::InvalidCapacity { got: 0 }
        );
    }

    #[test]
    fn test_eviction_pops_back_of_queue() {
        let mut cache = QueueLruCache::new(2).unwrap();
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
    fn test_overwrite_moves_to_front() {
        let mut cache = QueueLruCache::new(2).unwrap();
        cache.set(1, 100);
        cache.set(2, 200);
        assert_eq!(cache.set(1, 10), None);
        assert_eq!(cache.len(), 2);

        let evicted = cache.set(3, 300);
        assert_eq!(evicted, Some((2, 200)));
        assert_eq!(cache.get(&1), Ok(&10));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_contains_does_not_touch() {
        let mut cache = QueueLruCache::new(2).unwrap();
        cache.set(1, 100);
        cache.set(2, 200);
        assert!(cache.contains(&1));
        assert!(!cache.contains(&3));
        let evicted = cache.set(3, 300);
        assert_eq!(evicted, Some((1, 100)));
    }

    #[test]
    fn test_borrowed_key_lookup() {
        let mut cache = QueueLruCache::new(2).unwrap();
        cache.set("apple".to_string(), 1);
        assert_eq!(cache.get("apple"), Ok(&1));
        assert!(cache.contains("apple"));
        assert!(!cache.contains("banana"));
    }

    #[test]
    fn test_capacity_bound_under_churn() {
        let mut cache = QueueLruCache::new(3).unwrap();
        for i in 0..100u32 {
            cache.set(i % 10, i);
            cache.check_invariants().unwrap();
            assert!(cache.len() <= 3);
        }
    }

    #[test]
    fn test_metrics_counts() {
        let mut cache = QueueLruCache::new(2).unwrap();
        cache.set("a", 1);
        cache.set("b", 2);
        let _ = cache.get(&"a");
        let _ = cache.get(&"missing");
        cache.set("c", 3);

        let metrics = CacheMetrics::metrics(&cache);
        assert_eq!(metrics.get("requests"), Some(&2.0));
        assert_eq!(metrics.get("cache_hits"), Some(&1.0));
        assert_eq!(metrics.get("evictions"), Some(&1.0));
        assert_eq!(cache.algorithm_name(), "LRU-queue");
    }

    #[test]
    fn test_drop_frees_all_entries() {
        let mut cache = QueueLruCache::new(16).unwrap();
        for i in 0..16 {
            cache.set(i, alloc::vec![0u8; 64]);
        }
        drop(cache);
    }
}
