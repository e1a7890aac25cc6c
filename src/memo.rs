//! Function memoization on top of the cache.
//!
//! [`Memo`] stores the results of a pure function keyed by its argument. The
//! key is the full argument value; a function of several arguments is
//! memoized over a tuple. (Rust has no named arguments, so there is nothing
//! to canonicalize: two calls hit the same entry exactly when their argument
//! values compare equal.)
//!
//! Two backing-store policies exist:
//!
//! - [`Memo::unbounded`] keeps every result forever in a plain map.
//! - [`Memo::bounded`] stores results in a [`QueueLruCache`] and silently
//!   evicts the least recently used ones, recomputing them if they are
//!   needed again.
//!
//! The memoized function must be referentially transparent: the same
//! arguments always produce the same result, with no observable side
//! effects. The memoizer cannot detect or enforce this; with a bounded
//! store, any impurity becomes visible the first time an evicted entry is
//! recomputed.
//!
//! # Recursive functions
//!
//! The closure passed to [`Memo::call`] receives a handle back to the
//! memoizer, so recursive functions can memoize their sub-calls:
//!
//! ```
//! use lru_rs::Memo;
//!
//! fn fib(memo: &mut Memo<u64, u128>, n: u64) -> u128 {
//!     memo.call(n, |m, n| {
//!         if n < 2 { 1 } else { fib(m, n - 1) + fib(m, n - 2) }
//!     })
//! }
//!
//! let mut memo = Memo::bounded(10).unwrap();
//! assert_eq!(fib(&mut memo, 10), 89);
//! ```


use crate::error::CacheError;
use crate::queue::QueueLruCache;
use core::fmt;
use core::hash::Hash;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Result store behind a memoizer: either unbounded or an LRU cache.
enum MemoStore<A, R> {
    /// Never evicts.
    Unbounded(HashMap<A, R>),
    /// Evicts least recently used results past the configured capacity.
    Bounded(QueueLruCache<A, R>),
}

/// A memoizer for a referentially transparent function from `A` to `R`.
///
/// Results are cloned out of the store, so `R` is typically cheap to clone
/// (numbers, small structs, `Rc`/`Arc` handles).
pub struct Memo<A, R> {
    store: MemoStore<A, R>,
}

impl<A: Hash + Eq + Clone, R: Clone> Memo<A, R> {
    /// Creates a memoizer that never evicts.
    pub fn unbounded() -> Self {
        Memo {
            store: MemoStore::Unbounded(HashMap::new()),
        }
    }

    /// Creates a memoizer backed by an LRU cache of the given capacity.
    ///
    /// Fails with [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn bounded(capacity: usize) -> Result<Self, CacheError> {
        Ok(Memo {
            store: MemoStore::Bounded(QueueLruCache::new(capacity)?),
        })
    }

    /// Returns the memoized result for `arg`, invoking `f` only on a store
    /// miss.
    ///
    /// On a hit the cached value is returned without calling `f` (for a
    /// bounded store, the hit also refreshes the entry's recency). On a miss
    /// the result is computed, stored, and returned. `f` receives `self` so
    /// it can recurse through the memoizer.
    pub fn call<F>(&mut self, arg: A, f: F) -> R
    where
        F: Fn(&mut Self, A) -> R,
    {
        if let Some(hit) = self.lookup(&arg) {
            return hit;
        }
        let result = f(self, arg.clone());
        self.insert(arg, result.clone());
        result
    }

    /// Number of results currently resident in the store.
    pub fn resident(&self) -> usize {
        match &self.store {
            MemoStore::Unbounded(map) => map.len(),
            MemoStore::Bounded(cache) => cache.len(),
        }
    }

    fn lookup(&mut self, arg: &A) -> Option<R> {
        match &mut self.store {
            MemoStore::Unbounded(map) => map.get(arg).cloned(),
            MemoStore::Bounded(cache) => cache.get(arg).ok().cloned(),
        }
    }

    fn insert(&mut self, arg: A, result: R) {
        match &mut self.store {
            MemoStore::Unbounded(map) => {
                map.insert(arg, result);
            }
            MemoStore::Bounded(cache) => {
                cache.set(arg, result);
            }
        }
    }
}

impl<A, R> fmt::Debug for Memo<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let policy = match &self.store {
            MemoStore::Unbounded(_) => "unbounded",
            MemoStore::Bounded(_) => "bounded",
        };
        f.debug_struct("Memo").field("policy", &policy).finish()
    }
}
