//! Identity-keyed trie with reachability-driven reclamation.
//!
//! Each node maps key identities to entries. An entry pairs the weak handle
//! of its key object with a child node (for longer paths through that key)
//! and an optional value stored at exactly that depth.
//!
//! ## Architecture
//!
//! ```text
//!   root: TrieNode<V>
//!   ┌──────────────┬──────────────────────────────────────────┐
//!   │  KeyId(A)    │  Entry { key: weak A, value: None }      │
//!   │              │    └─ child ┬─ KeyId(B) → value: v_ab    │
//!   │              │             └─ KeyId(C) → value: v_ac    │
//!   ├──────────────┼──────────────────────────────────────────┤
//!   │  KeyId(B)    │  Entry { key: weak B, value: v_b }       │
//!   │              │    └─ child ┬─ KeyId(A) → value: v_ba    │
//!   └──────────────┴──────────────────────────────────────────┘
//!
//!   [A, B] → v_ab     [B, A] → v_ba     [A] → absent     [B] → v_b
//! ```
//!
//! ## Reclamation
//!
//! Dropping a key object leaves its entry *expired*. An expired entry can
//! never match a lookup (see [`weak_key`](crate::ds::weak_key)), and it is
//! removed together with its whole subtree by either:
//!
//! - an amortized sweep: before a node grows past its sweep threshold it
//!   drops its expired entries and resets the threshold to
//!   `max(min_threshold, 2 * live)`, or
//! - [`TrieNode::purge_expired`], which walks the entire trie.
//!
//! ## Operations
//!
//! | Operation        | Time                   | Notes                            |
//! |------------------|------------------------|----------------------------------|
//! | `lookup`         | O(path)                | No mutation                      |
//! | `insert`         | O(path) amortized      | May sweep nodes it grows         |
//! | `purge_expired`  | O(entries)             | Cascades through subtrees        |
//! | `entry_count`    | O(entries)             | Includes not yet swept entries   |
//!
//! ## Example Usage
//!
//! ```
//! use std::rc::Rc;
//!
//! use weakcache::ds::trie::{SweepPolicy, TrieNode};
//! use weakcache::path;
//!
//! let policy = SweepPolicy::default();
//! let mut root = TrieNode::new();
//! let a = Rc::new("a");
//! let b = Rc::new("b");
//!
//! root.insert(path![a, b], 1, &policy).unwrap();
//! assert_eq!(root.lookup(path![a, b]).unwrap(), Some(&1));
//! assert_eq!(root.lookup(path![b, a]).unwrap(), None);
//! assert_eq!(root.lookup(path![a]).unwrap(), None);
//!
//! drop(a);
//! assert_eq!(root.purge_expired(), 2);
//! assert!(root.is_empty());
//! ```

use rustc_hash::FxHashMap;

use crate::ds::weak_key::{KeyId, WeakKey};
use crate::error::{EmptyPathError, InvariantError};
use crate::traits::KeyObject;

/// Default minimum number of entries a node holds before it sweeps.
pub const DEFAULT_SWEEP_THRESHOLD: usize = 32;

/// Controls when nodes drop expired entries during inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPolicy {
    min_threshold: usize,
}

impl SweepPolicy {
    /// Creates a policy; a zero threshold is raised to 1.
    pub fn new(min_threshold: usize) -> Self {
        Self {
            min_threshold: min_threshold.max(1),
        }
    }

    /// Entry count at which an untouched node first sweeps.
    #[inline]
    pub fn min_threshold(&self) -> usize {
        self.min_threshold
    }

    #[inline]
    fn next_threshold(&self, live: usize) -> usize {
        live.saturating_mul(2).max(self.min_threshold)
    }
}

impl Default for SweepPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SWEEP_THRESHOLD)
    }
}

/// Bookkeeping gathered while inserting a single path.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InsertStats {
    /// Entries allocated along the path.
    pub entries_created: usize,
    /// Amortized sweeps triggered.
    pub sweeps: usize,
    /// Entries removed by those sweeps, subtrees included.
    pub reclaimed: usize,
}

#[derive(Debug)]
struct Entry<V> {
    key: WeakKey,
    child: TrieNode<V>,
    value: Option<V>,
}

impl<V> Entry<V> {
    fn new(key: WeakKey) -> Self {
        Self {
            key,
            child: TrieNode::new(),
            value: None,
        }
    }

    fn subtree_entries(&self) -> usize {
        1 + self.child.entry_count()
    }
}

/// One level of the trie.
#[derive(Debug)]
pub struct TrieNode<V> {
    entries: FxHashMap<KeyId, Entry<V>>,
    // 0 until the first sweep; the policy minimum applies meanwhile.
    sweep_at: usize,
}

impl<V> Default for TrieNode<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TrieNode<V> {
    /// Creates an empty node.
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
            sweep_at: 0,
        }
    }

    /// Returns the value stored at exactly `path`.
    ///
    /// Walking through an entry that holds no value is not an error; only the
    /// entry at the final key decides the result.
    pub fn lookup(&self, path: &[&dyn KeyObject]) -> Result<Option<&V>, EmptyPathError> {
        let (last, prefix) = path.split_last().ok_or(EmptyPathError)?;
        let mut node = self;
        for key in prefix {
            match node.entries.get(&key.key_id()) {
                Some(entry) => node = &entry.child,
                None => return Ok(None),
            }
        }
        let entry = node.entries.get(&last.key_id());
        debug_assert!(entry.is_none_or(|e| e.key.is_alive()));
        Ok(entry.and_then(|e| e.value.as_ref()))
    }

    /// Stores `value` at `path`, returning the value it replaced.
    pub fn insert(
        &mut self,
        path: &[&dyn KeyObject],
        value: V,
        policy: &SweepPolicy,
    ) -> Result<Option<V>, EmptyPathError> {
        let mut stats = InsertStats::default();
        self.insert_tracked(path, value, policy, &mut stats)
    }

    /// [`insert`](Self::insert) that also reports allocation and sweep work.
    pub fn insert_tracked(
        &mut self,
        path: &[&dyn KeyObject],
        value: V,
        policy: &SweepPolicy,
        stats: &mut InsertStats,
    ) -> Result<Option<V>, EmptyPathError> {
        let (last, prefix) = path.split_last().ok_or(EmptyPathError)?;
        let mut node = self;
        for key in prefix {
            node = &mut node.entry_or_insert(*key, policy, stats).child;
        }
        let entry = node.entry_or_insert(*last, policy, stats);
        Ok(entry.value.replace(value))
    }

    fn entry_or_insert(
        &mut self,
        key: &dyn KeyObject,
        policy: &SweepPolicy,
        stats: &mut InsertStats,
    ) -> &mut Entry<V> {
        let id = key.key_id();
        if !self.entries.contains_key(&id) {
            self.maybe_sweep(policy, stats);
            stats.entries_created += 1;
        }
        self.entries
            .entry(id)
            .or_insert_with(|| Entry::new(key.downgrade_key()))
    }

    fn maybe_sweep(&mut self, policy: &SweepPolicy, stats: &mut InsertStats) {
        if self.entries.len() < self.threshold(policy) {
            return;
        }
        stats.sweeps += 1;
        stats.reclaimed += self.sweep_expired();
        self.sweep_at = policy.next_threshold(self.entries.len());
    }

    fn threshold(&self, policy: &SweepPolicy) -> usize {
        self.sweep_at.max(policy.min_threshold())
    }

    /// Drops expired entries of this node only.
    fn sweep_expired(&mut self) -> usize {
        let mut reclaimed = 0;
        self.entries.retain(|_, entry| {
            if entry.key.is_alive() {
                return true;
            }
            reclaimed += entry.subtree_entries();
            false
        });
        reclaimed
    }

    /// Removes every expired entry in the subtree, plus live entries left
    /// with neither a value nor children. Returns the number of entries
    /// removed.
    pub fn purge_expired(&mut self) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            if !entry.key.is_alive() {
                removed += entry.subtree_entries();
                return false;
            }
            removed += entry.child.purge_expired();
            if entry.value.is_none() && entry.child.is_empty() {
                removed += 1;
                return false;
            }
            true
        });
        removed
    }

    /// Number of entries directly under this node.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the whole subtree, expired ones included until swept.
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Entry::subtree_entries).sum()
    }

    /// Stored values in the whole subtree, expired ones included until swept.
    pub fn value_count(&self) -> usize {
        self.entries
            .values()
            .map(|e| usize::from(e.value.is_some()) + e.child.value_count())
            .sum()
    }

    /// Stored values whose every key object is still alive.
    pub fn live_value_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.key.is_alive())
            .map(|e| usize::from(e.value.is_some()) + e.child.live_value_count())
            .sum()
    }

    /// Validates structural invariants of the subtree.
    pub fn check_invariants(&self, policy: &SweepPolicy) -> Result<(), InvariantError> {
        let threshold = self.threshold(policy);
        if self.entries.len() > threshold {
            return Err(InvariantError::new(format!(
                "node holds {} entries, above its sweep threshold {}",
                self.entries.len(),
                threshold
            )));
        }
        for (id, entry) in &self.entries {
            if entry.key.id() != *id {
                return Err(InvariantError::new(format!(
                    "entry for {:#x} indexed under {:#x}",
                    entry.key.id().as_usize(),
                    id.as_usize()
                )));
            }
            entry.child.check_invariants(policy)?;
        }
        Ok(())
    }
}
