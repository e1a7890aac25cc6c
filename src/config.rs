//! Cache configuration.
//!
//! Every backend is configured by the same [`CacheConfig`]: a plain struct
//! with public fields, created directly at the call site. Validation happens
//! once, when a cache is constructed from the config, so an invalid capacity
//! is rejected with [`CacheError::InvalidCapacity`](crate::CacheError::InvalidCapacity)
//! before anything is allocated.
//!
//! # Examples
//!
//! ```
//! use lru_rs::config::CacheConfig;
//! use lru_rs::QueueLruCache;
//!
//! let config = CacheConfig { capacity: 1000 };
//! let cache: QueueLruCache<String, i32> = QueueLruCache::init(config).unwrap();
//!
//! // Zero capacity is rejected at construction.
//! let bad = QueueLruCache::<String, i32>::init(CacheConfig { capacity: 0 });
//! assert!(bad.is_err());
//! ```

use crate::error::CacheError;
use core::fmt;
use core::num::NonZeroUsize;

/// Configuration shared by all LRU backends.
///
/// The capacity is the maximum number of resident entries; entries are
/// unit-weight, so there is no separate size limit. It is fixed for the
/// lifetime of the cache.
#[derive(Clone, Copy)]
pub struct CacheConfig {
    /// Maximum number of key-value pairs the cache can hold. Must be at
    /// least 1.
    pub capacity: usize,
}

impl CacheConfig {
    /// Validates the configuration, returning the capacity as a
    /// `NonZeroUsize` so backends never have to re-check it.
    pub fn validate(&self) -> Result<NonZeroUsize, CacheError> {
        NonZeroUsize::new(self.capacity).ok_or(CacheError::InvalidCapacity { got: self.capacity })
    }
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_capacity() {
        let config = CacheConfig { capacity: 3 };
        assert_eq!(config.validate().unwrap().get(), 3);
    }

    #[test]
    fn test_validate_zero_capacity() {
        let config = CacheConfig { capacity: 0 };
        assert_eq!(
            config.validate().unwrap_err(),
            CacheError::InvalidCapacity { got: 0 }
        );
    }
}
