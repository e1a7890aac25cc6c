//! Error types shared by all cache backends.
//!
//! Two things can go wrong from the outside: asking for a key that is not
//! resident ([`CacheError::NotFound`]) and constructing a cache with a
//! capacity of zero ([`CacheError::InvalidCapacity`]). Neither leaves a cache
//! in a broken state; after any error the instance remains fully usable.
//!
//! [`InvariantError`] is different: it is only produced by the debug/test-only
//! `check_invariants` methods on the backends and signals an internal
//! bookkeeping bug, not a caller mistake.

extern crate alloc;

use alloc::string::String;
use core::fmt;

/// Error returned by fallible cache operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// `get` was called with a key that is not currently resident.
    ///
    /// Absence is often expected (compute-then-insert); this is not retried
    /// or logged by the cache itself.
    NotFound,
    /// A cache was constructed with a non-positive capacity.
    ///
    /// Fatal to construction only; nothing was built.
    InvalidCapacity {
        /// The rejected capacity value.
        got: usize,
    },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::NotFound => f.write_str("key not found in cache"),
            CacheError::InvalidCapacity { got } => {
                write!(f, "cache capacity must be at least 1, got {got}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CacheError {}

/// Error returned when an internal cache invariant is violated.
///
/// Produced by the debug-only `check_invariants` methods on the backends.
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvariantError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_display_not_found() {
        assert_eq!(CacheError::NotFound.to_string(), "key not found in cache");
    }

    #[test]
    fn test_display_invalid_capacity() {
        let err = CacheError::InvalidCapacity { got: 0 };
        assert!(err.to_string().contains("got 0"));
    }

    #[test]
    fn test_invariant_error_message() {
        let err = InvariantError::new("index and heap disagree on length");
        assert_eq!(err.message(), "index and heap disagree on length");
        assert_eq!(err.to_string(), err.message());
    }
}
