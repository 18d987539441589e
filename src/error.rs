//! Error types for the weakcache library.
//!
//! ## Key Components
//!
//! - [`EmptyPathError`]: Returned when a lookup, insert or resolve is given a
//!   key path with no elements.
//! - [`InvariantError`]: Returned when internal trie invariants are violated
//!   (`check_invariants` methods used by tests and fuzzing).
//! - [`ConfigError`]: Returned when cache configuration parameters are invalid
//!   (e.g. a zero sweep threshold).
//!
//! Factory failures are not represented here: [`WeakMemo::try_resolve`]
//! hands the factory's own error back unchanged, and only requires that the
//! error type can absorb an [`EmptyPathError`].
//!
//! [`WeakMemo::try_resolve`]: crate::memo::WeakMemo::try_resolve
//!
//! ## Example Usage
//!
//! ```
//! use weakcache::builder::WeakMemoBuilder;
//! use weakcache::error::{ConfigError, EmptyPathError};
//! use weakcache::memo::WeakMemo;
//!
//! // Fallible constructor for user-configurable parameters
//! let memo: Result<WeakMemo<u32>, ConfigError> = WeakMemoBuilder::new().try_build();
//! assert!(memo.is_ok());
//!
//! // A zero threshold is caught without panicking
//! let bad = WeakMemoBuilder::new().sweep_threshold(0).try_build::<u32>();
//! assert!(bad.is_err());
//!
//! // Empty paths are rejected before the factory runs
//! let memo: WeakMemo<u32> = WeakMemo::new();
//! assert_eq!(memo.resolve(|| unreachable!(), &[]), Err(EmptyPathError));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// EmptyPathError
// ---------------------------------------------------------------------------

/// Error returned when a key path has no elements.
///
/// A path identifies a slot by walking one trie level per key, so a path of
/// length zero names no slot at all. Operations reject it up front and leave
/// the cache untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EmptyPathError;

impl fmt::Display for EmptyPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key path must contain at least one key object")
    }
}

impl std::error::Error for EmptyPathError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal trie invariants are violated.
///
/// Produced by [`TrieNode::check_invariants`](crate::ds::trie::TrieNode::check_invariants)
/// and [`WeakMemo::check_invariants`](crate::memo::WeakMemo::check_invariants).
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

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`WeakMemoBuilder::try_build`](crate::builder::WeakMemoBuilder::try_build).
/// Carries a human-readable description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use weakcache::builder::WeakMemoBuilder;
///
/// let err = WeakMemoBuilder::new()
///     .sweep_threshold(0)
///     .try_build::<u64>()
///     .unwrap_err();
/// assert!(err.to_string().contains("sweep_threshold"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
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

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
