#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Backend Selection Guide
//!
//! | Backend | Recency structure | Get / Set | Use when |
//! |---------|-------------------|-----------|----------|
//! | [`LinearLruCache`] | priority integers, full scan | O(n) | capacity is tiny, or you want an oracle |
//! | [`HeapLruCache`] | indexed min-heap of timestamps | O(log n) | you want array storage without pointers |
//! | [`QueueLruCache`] | doubly-linked queue | O(1) | the default choice |
//!
//! The three backends implement the same [`Cache`] trait and are observably
//! interchangeable: given the same operation sequence they return the same
//! values and evict the same keys, in the same order.
//!
//! ## Example
//!
//! ```
//! use lru_rs::{Cache, HeapLruCache};
//!
//! let mut cache = HeapLruCache::new(2).unwrap();
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.get(&"a").unwrap();   // "a" becomes most recently used
//! cache.set("c", 3);          // "b" evicted (least recently used)
//! assert!(cache.get(&"b").is_err());
//! ```
//!
//! ## Modules
//!
//! - [`linear`]: O(n) linear priority array backend
//! - [`heap`]: O(log n) indexed min-heap backend
//! - [`queue`]: O(1) doubly-linked queue backend
//! - [`memo`]: memoizer built on the cache
//! - [`config`]: shared cache configuration
//! - [`error`]: error types
//! - [`metrics`]: count-based cache metrics
//! - [`traits`]: the uniform cache contract

#![no_std]

#[cfg(any(feature = "std", not(feature = "hashbrown")))]
extern crate std;

/// Error types for cache operations, construction, and invariant checks.
pub mod error;

/// Shared cache configuration and its validation.
pub mod config;

/// The uniform contract implemented by all three backends.
pub mod traits;

/// Count-based metrics tracked by every backend.
pub mod metrics;

/// Doubly linked list with in-place reordering.
///
/// Internal infrastructure for the queue backend; exposes unsafe raw
/// pointer operations and should not be used directly.
pub(crate) mod list;

/// Linear priority array backend, O(n) per operation.
pub mod linear;

/// Indexed min-heap backend, O(log n) per operation.
pub mod heap;

/// Doubly-linked queue backend, O(1) per operation.
pub mod queue;

/// Memoization of pure functions over an unbounded or LRU result store.
pub mod memo;

// Re-export the cache types
pub use heap::HeapLruCache;
pub use linear::LinearLruCache;
pub use queue::QueueLruCache;

// Re-export the memoizer
pub use memo::Memo;

// Re-export the shared surface
pub use config::CacheConfig;
pub use error::{CacheError, InvariantError};
pub use metrics::CacheMetrics;
pub use traits::Cache;
