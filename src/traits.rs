//! The uniform cache contract.
//!
//! [`Cache`] is implemented by all three backends
//! ([`LinearLruCache`](crate::LinearLruCache),
//! [`HeapLruCache`](crate::HeapLruCache),
//! [`QueueLruCache`](crate::QueueLruCache)) so callers can swap backends
//! without touching call sites, and tests can drive all three through the
//! same deterministic operation sequence and compare results.
//!
//! The contract, for every backend:
//!
//! | Operation | Result | Side effect |
//! |-----------|--------|-------------|
//! | `get` | `&V` or `CacheError::NotFound` | refreshes recency on hit |
//! | `set` | evicted `(K, V)` pair, if any | inserts or overwrites, refreshes recency, evicts at most one entry |
//! | `contains` | `bool` | none — never alters recency |

use crate::error::CacheError;
use core::borrow::Borrow;
use core::hash::Hash;
use core::num::NonZeroUsize;

/// A bounded cache with least-recently-used eviction.
///
/// Keys must be `Clone` because every backend stores the key both in its key
/// index and in its recency structure.
pub trait Cache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Returns a reference to the value for `key` and marks the entry as the
    /// most recently used, or fails with [`CacheError::NotFound`].
    fn get<Q>(&mut self, key: &Q) -> Result<&V, CacheError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    /// Inserts or overwrites the entry for `key` and marks it as the most
    /// recently used.
    ///
    /// Inserting a new key while at full capacity evicts exactly one entry,
    /// the least recently touched one, which is returned.
    fn set(&mut self, key: K, value: V) -> Option<(K, V)>;

    /// Returns whether `key` is resident without touching its recency.
    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    /// Number of resident entries. Never exceeds `capacity`.
    fn len(&self) -> usize;

    /// Returns true if no entries are resident.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident entries, fixed at construction.
    fn capacity(&self) -> NonZeroUsize;
}
