//! Builder for tuning a [`WeakMemo`].
//!
//! The only knob is the sweep threshold: how many entries a trie node may
//! accumulate before it drops the entries of dead key objects on its next
//! growth. Lower values reclaim sooner at the cost of more frequent scans.
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use weakcache::builder::WeakMemoBuilder;
//! use weakcache::path;
//!
//! let memo = WeakMemoBuilder::new().sweep_threshold(8).build::<u32>();
//! let key = Rc::new(());
//! assert_eq!(memo.resolve(|| 1, path![key]), Ok(1));
//! assert_eq!(memo.sweep_policy().min_threshold(), 8);
//! ```

use crate::ds::trie::{DEFAULT_SWEEP_THRESHOLD, SweepPolicy};
use crate::error::ConfigError;
use crate::memo::WeakMemo;

/// Builder for creating [`WeakMemo`] instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeakMemoBuilder {
    sweep_threshold: usize,
}

impl WeakMemoBuilder {
    /// Creates a builder with the default sweep threshold.
    pub fn new() -> Self {
        Self {
            sweep_threshold: DEFAULT_SWEEP_THRESHOLD,
        }
    }

    /// Entries a node holds before it first sweeps expired keys.
    pub fn sweep_threshold(mut self, entries: usize) -> Self {
        self.sweep_threshold = entries;
        self
    }

    /// Builds the cache. A zero threshold is raised to 1.
    pub fn build<V>(self) -> WeakMemo<V> {
        WeakMemo::with_policy(SweepPolicy::new(self.sweep_threshold))
    }

    /// Builds the cache, rejecting a zero threshold.
    pub fn try_build<V>(self) -> Result<WeakMemo<V>, ConfigError> {
        if self.sweep_threshold == 0 {
            return Err(ConfigError::new("sweep_threshold must be > 0"));
        }
        Ok(self.build())
    }
}

impl Default for WeakMemoBuilder {
    fn default() -> Self {
        Self::new()
    }
}
