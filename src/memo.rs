//! Memoization over identity key paths.
//!
//! [`WeakMemo`] owns one root [`TrieNode`] and exposes
//! [`resolve`](WeakMemo::resolve): return the value cached for a key path,
//! or run the factory once, store its result and return it.
//!
//! ## Resolve Flow
//!
//! ```text
//!   resolve(factory, [A, B]):
//!     1. path empty?           → Err(EmptyPathError), factory not run
//!     2. root.lookup([A, B])   → Some(v): return v.clone()
//!     3. factory()             → v   (trie not borrowed while it runs)
//!     4. root.insert([A, B], v.clone())
//!     5. return v
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use weakcache::{WeakMemo, path};
//!
//! let memo: WeakMemo<Rc<String>> = WeakMemo::new();
//! let user = Rc::new("ada");
//! let locale = Rc::new("en-GB");
//! let calls = Cell::new(0);
//!
//! let render = || {
//!     calls.set(calls.get() + 1);
//!     Rc::new(format!("{}@{}", user, locale))
//! };
//!
//! let first = memo.resolve(render, path![user, locale]).unwrap();
//! let second = memo.resolve(|| unreachable!(), path![user, locale]).unwrap();
//! assert!(Rc::ptr_eq(&first, &second));
//! assert_eq!(calls.get(), 1);
//!
//! // Order matters: a permutation is a different slot.
//! let swapped = memo.resolve(|| Rc::new(String::new()), path![locale, user]).unwrap();
//! assert!(!Rc::ptr_eq(&first, &swapped));
//! ```
//!
//! ## Reclamation
//!
//! The cache never keeps a key object alive. Once a key is dropped the values
//! stored under it can no longer be reached; their memory is released by the
//! next sweep of the node holding them or by
//! [`purge_expired`](WeakMemo::purge_expired).
//!
//! A stored value that owns a strong reference to one of its own keys keeps
//! that key alive for as long as the entry exists. Store `Weak` handles in
//! values that need to refer back to their keys.
//!
//! ## Thread Safety
//!
//! `WeakMemo` is neither `Send` nor `Sync`. A single instance is the unit of
//! shared mutable state and is meant to live on one thread (for example in a
//! `thread_local!` or a struct owned by one task).
//!
//! ## Re-entrancy
//!
//! The factory may resolve other paths on the same cache. If it resolves the
//! very same path, the outer result overwrites the inner one. `V::clone` and
//! `V::drop` must not call back into the cache.

use std::cell::RefCell;
use std::fmt;

use crate::builder::WeakMemoBuilder;
use crate::ds::trie::{InsertStats, SweepPolicy, TrieNode};
use crate::error::{EmptyPathError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::MemoMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::MemoMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{MemoMetricsRecorder, MetricsReset, MetricsSnapshotProvider};
use crate::traits::KeyObject;

/// Memoizing cache keyed by ordered paths of key objects.
pub struct WeakMemo<V> {
    root: RefCell<TrieNode<V>>,
    policy: SweepPolicy,
    #[cfg(feature = "metrics")]
    metrics: MemoMetrics,
}

impl<V> WeakMemo<V> {
    /// Creates an empty cache with the default sweep policy.
    pub fn new() -> Self {
        Self::with_policy(SweepPolicy::default())
    }

    /// Returns a builder for tuning the cache.
    pub fn builder() -> WeakMemoBuilder {
        WeakMemoBuilder::new()
    }

    pub(crate) fn with_policy(policy: SweepPolicy) -> Self {
        Self {
            root: RefCell::new(TrieNode::new()),
            policy,
            #[cfg(feature = "metrics")]
            metrics: MemoMetrics::default(),
        }
    }

    /// Sweep policy applied to inserts.
    pub fn sweep_policy(&self) -> SweepPolicy {
        self.policy
    }

    /// Returns `true` if a value is cached at exactly `path`.
    pub fn contains(&self, path: &[&dyn KeyObject]) -> Result<bool, EmptyPathError> {
        Ok(self.root.borrow().lookup(path)?.is_some())
    }

    /// Drops every entry whose key object is gone, along with everything
    /// nested under it. Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let removed = self.root.borrow_mut().purge_expired();
        #[cfg(feature = "metrics")]
        self.metrics.record_purge(removed);
        removed
    }

    /// Number of cached values reachable through live keys.
    pub fn len(&self) -> usize {
        self.root.borrow().live_value_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Trie entries currently allocated, expired ones included until swept.
    pub fn entry_count(&self) -> usize {
        self.root.borrow().entry_count()
    }

    /// Validates the trie's structural invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.root.borrow().check_invariants(&self.policy)
    }

    fn store(&self, path: &[&dyn KeyObject], value: V) -> Result<(), EmptyPathError> {
        let mut stats = InsertStats::default();
        let previous = self
            .root
            .borrow_mut()
            .insert_tracked(path, value, &self.policy, &mut stats)?;
        #[cfg(feature = "metrics")]
        self.metrics.record_store(previous.is_some(), &stats);
        // released after the borrow ends
        drop(previous);
        Ok(())
    }
}

impl<V: Clone> WeakMemo<V> {
    /// Returns the value cached at `path`, computing it with `factory` on a
    /// miss.
    ///
    /// The factory runs at most once per call and only when nothing is cached
    /// for this exact path.
    pub fn resolve<F>(&self, factory: F, path: &[&dyn KeyObject]) -> Result<V, EmptyPathError>
    where
        F: FnOnce() -> V,
    {
        self.try_resolve(|| Ok(factory()), path)
    }

    /// Fallible [`resolve`](Self::resolve).
    ///
    /// A factory error is returned unchanged and nothing is stored, so the
    /// next call for the same path runs the factory again.
    ///
    /// ```
    /// use std::rc::Rc;
    ///
    /// use weakcache::error::EmptyPathError;
    /// use weakcache::{WeakMemo, path};
    ///
    /// #[derive(Debug, PartialEq)]
    /// enum LoadError {
    ///     NotFound,
    ///     BadPath,
    /// }
    ///
    /// impl From<EmptyPathError> for LoadError {
    ///     fn from(_: EmptyPathError) -> Self {
    ///         LoadError::BadPath
    ///     }
    /// }
    ///
    /// let memo: WeakMemo<u32> = WeakMemo::new();
    /// let doc = Rc::new(());
    ///
    /// let failed = memo.try_resolve(|| Err(LoadError::NotFound), path![doc]);
    /// assert_eq!(failed, Err(LoadError::NotFound));
    /// assert!(!memo.contains(path![doc]).unwrap());
    ///
    /// let loaded = memo.try_resolve(|| Ok::<_, LoadError>(7), path![doc]);
    /// assert_eq!(loaded, Ok(7));
    /// ```
    pub fn try_resolve<F, E>(&self, factory: F, path: &[&dyn KeyObject]) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
        E: From<EmptyPathError>,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_resolve_call();

        if let Some(cached) = self.cached(path)? {
            #[cfg(feature = "metrics")]
            self.metrics.record_hit();
            return Ok(cached);
        }

        #[cfg(feature = "metrics")]
        {
            self.metrics.record_miss();
            self.metrics.record_factory_call();
        }

        let value = match factory() {
            Ok(value) => value,
            Err(err) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_factory_failure();
                return Err(err);
            },
        };
        self.store(path, value.clone())?;
        Ok(value)
    }

    /// Returns the value cached at `path` without computing anything.
    pub fn get(&self, path: &[&dyn KeyObject]) -> Result<Option<V>, EmptyPathError> {
        self.cached(path)
    }

    fn cached(&self, path: &[&dyn KeyObject]) -> Result<Option<V>, EmptyPathError> {
        Ok(self.root.borrow().lookup(path)?.cloned())
    }
}

impl<V> Default for WeakMemo<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for WeakMemo<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakMemo")
            .field("entries", &self.entry_count())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "metrics")]
impl<V> WeakMemo<V> {
    pub fn metrics_snapshot(&self) -> MemoMetricsSnapshot {
        let root = self.root.borrow();
        MemoMetricsSnapshot {
            resolve_calls: self.metrics.resolve_calls.get(),
            hits: self.metrics.hits.get(),
            misses: self.metrics.misses.get(),
            factory_calls: self.metrics.factory_calls.get(),
            factory_failures: self.metrics.factory_failures.get(),
            values_stored: self.metrics.values_stored.get(),
            overwrites: self.metrics.overwrites.get(),
            entries_created: self.metrics.entries_created.get(),
            sweeps: self.metrics.sweeps.get(),
            swept_entries: self.metrics.swept_entries.get(),
            purge_calls: self.metrics.purge_calls.get(),
            purged_entries: self.metrics.purged_entries.get(),
            live_values: root.live_value_count(),
            entry_count: root.entry_count(),
        }
    }
}

#[cfg(feature = "metrics")]
impl<V> MetricsSnapshotProvider<MemoMetricsSnapshot> for WeakMemo<V> {
    fn snapshot(&self) -> MemoMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<V> MetricsReset for WeakMemo<V> {
    fn reset_metrics(&self) {
        self.metrics.reset();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;

    use super::*;
    use crate::path;

    #[derive(Debug, PartialEq)]
    struct Tagged {
        value: u32,
    }

    fn counter() -> impl FnMut() -> Rc<Tagged> {
        let mut next = 0;
        move || {
            next += 1;
            Rc::new(Tagged { value: next })
        }
    }

    #[test]
    fn order_matters() {
        let memo = WeakMemo::new();
        let first = Rc::new(());
        let second = Rc::new(());
        let mut make = counter();

        let a = memo.resolve(&mut make, path![first, second]).unwrap();
        let b = memo.resolve(&mut make, path![first, second]).unwrap();
        let c = memo.resolve(&mut make, path![second, first]).unwrap();

        assert!(Rc::ptr_eq(&a, &b));
        assert!(!Rc::ptr_eq(&a, &c));
        assert_eq!(a.value, 1);
        assert_eq!(c.value, 2);
    }

    #[test]
    fn factory_runs_once_per_path() {
        let memo: WeakMemo<u32> = WeakMemo::new();
        let key = Rc::new(());
        let calls = Cell::new(0);
        for _ in 0..5 {
            let v = memo
                .resolve(
                    || {
                        calls.set(calls.get() + 1);
                        42
                    },
                    path![key],
                )
                .unwrap();
            assert_eq!(v, 42);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn instances_do_not_share_entries() {
        let one = WeakMemo::new();
        let two = WeakMemo::new();
        let key = Rc::new(());
        let mut make = counter();
        let a = one.resolve(&mut make, path![key]).unwrap();
        let b = two.resolve(&mut make, path![key]).unwrap();
        assert!(!Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn prefix_is_not_cached() {
        let memo: WeakMemo<&str> = WeakMemo::new();
        let a = Rc::new(());
        let b = Rc::new(());
        memo.resolve(|| "ab", path![a, b]).unwrap();
        assert_eq!(memo.get(path![a]), Ok(None));
        assert_eq!(memo.resolve(|| "a", path![a]), Ok("a"));
        assert_eq!(memo.get(path![a, b]), Ok(Some("ab")));
    }

    #[test]
    fn empty_path_rejected_before_factory() {
        let memo: WeakMemo<u32> = WeakMemo::new();
        let ran = Cell::new(false);
        let result = memo.resolve(
            || {
                ran.set(true);
                1
            },
            &[],
        );
        assert_eq!(result, Err(EmptyPathError));
        assert!(!ran.get());
        assert_eq!(memo.get(&[]), Err(EmptyPathError));
        assert_eq!(memo.contains(&[]), Err(EmptyPathError));
    }

    #[derive(Debug, PartialEq)]
    enum LoadError {
        Transient,
        EmptyPath,
    }

    impl From<EmptyPathError> for LoadError {
        fn from(_: EmptyPathError) -> Self {
            LoadError::EmptyPath
        }
    }

    #[test]
    fn factory_error_is_not_cached() {
        let memo: WeakMemo<u32> = WeakMemo::new();
        let key = Rc::new(());
        let attempts = Cell::new(0);
        let flaky = || {
            attempts.set(attempts.get() + 1);
            if attempts.get() == 1 {
                Err(LoadError::Transient)
            } else {
                Ok(5)
            }
        };

        assert_eq!(memo.try_resolve(flaky, path![key]), Err(LoadError::Transient));
        assert!(memo.is_empty());
        assert_eq!(memo.try_resolve(flaky, path![key]), Ok(5));
        assert_eq!(memo.try_resolve(flaky, path![key]), Ok(5));
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn empty_path_converts_into_caller_error() {
        let memo: WeakMemo<u32> = WeakMemo::new();
        let result = memo.try_resolve(|| Ok::<_, LoadError>(1), &[]);
        assert_eq!(result, Err(LoadError::EmptyPath));
    }

    #[test]
    fn factory_panic_leaves_cache_usable() {
        let memo: WeakMemo<u32> = WeakMemo::new();
        let key = Rc::new(());
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            memo.resolve(|| panic!("factory blew up"), path![key])
        }));
        assert!(outcome.is_err());
        assert_eq!(memo.get(path![key]), Ok(None));
        assert_eq!(memo.resolve(|| 3, path![key]), Ok(3));
    }

    #[test]
    fn nested_resolution_from_factory() {
        let memo: WeakMemo<u32> = WeakMemo::new();
        let outer = Rc::new(());
        let inner = Rc::new(());
        let total = memo
            .resolve(
                || memo.resolve(|| 20, path![inner]).unwrap() + 1,
                path![outer],
            )
            .unwrap();
        assert_eq!(total, 21);
        assert_eq!(memo.get(path![inner]), Ok(Some(20)));
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn dropping_a_key_releases_its_values() {
        let memo = WeakMemo::new();
        let keep = Rc::new(());
        let transient = Rc::new(());
        let value = memo
            .resolve(|| Rc::new(Tagged { value: 1 }), path![keep, transient])
            .unwrap();
        let observer = Rc::downgrade(&value);
        drop(value);

        assert_eq!(memo.len(), 1);
        drop(transient);
        assert_eq!(memo.len(), 0);
        assert!(observer.upgrade().is_some());

        assert_eq!(memo.purge_expired(), 2);
        assert!(observer.upgrade().is_none());
        assert_eq!(memo.entry_count(), 0);
    }

    #[test]
    fn cache_does_not_keep_keys_alive() {
        let memo: WeakMemo<u8> = WeakMemo::new();
        let key = Arc::new(String::from("k"));
        let observer = Arc::downgrade(&key);
        memo.resolve(|| 1, path![key]).unwrap();
        drop(key);
        assert!(observer.upgrade().is_none());
    }

    #[test]
    fn debug_reports_entry_count() {
        let memo: WeakMemo<u8> = WeakMemo::new();
        let key = Rc::new(());
        memo.resolve(|| 1, path![key]).unwrap();
        let dbg = format!("{:?}", memo);
        assert!(dbg.contains("entries: 1"));
    }

    #[test]
    fn invariants_hold_after_churn() {
        let memo: WeakMemo<usize> = WeakMemo::<usize>::builder().sweep_threshold(4).build();
        let stable = Rc::new(());
        for i in 0..100 {
            let transient = Rc::new(i);
            memo.resolve(|| i, path![stable, transient]).unwrap();
            memo.check_invariants().unwrap();
        }
        assert_eq!(memo.len(), 0);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_track_hits_misses_and_failures() {
        let memo: WeakMemo<u32> = WeakMemo::new();
        let a = Rc::new(());
        let b = Rc::new(());

        memo.resolve(|| 1, path![a, b]).unwrap();
        memo.resolve(|| 2, path![a, b]).unwrap();
        let _ = memo.try_resolve(|| Err::<u32, EmptyPathError>(EmptyPathError), path![b]);

        let snapshot = memo.metrics_snapshot();
        assert_eq!(snapshot.resolve_calls, 3);
        assert_eq!(snapshot.hits, 1);
        assert_eq!(snapshot.misses, 2);
        assert_eq!(snapshot.factory_calls, 2);
        assert_eq!(snapshot.factory_failures, 1);
        assert_eq!(snapshot.values_stored, 1);
        assert_eq!(snapshot.entries_created, 2);
        assert_eq!(snapshot.live_values, 1);
        assert_eq!(snapshot.entry_count, 2);

        memo.reset_metrics();
        assert_eq!(memo.snapshot().resolve_calls, 0);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_track_reclamation() {
        let memo: WeakMemo<u32> = WeakMemo::new();
        let a = Rc::new(());
        memo.resolve(|| 1, path![a]).unwrap();
        drop(a);
        memo.purge_expired();

        let snapshot = memo.metrics_snapshot();
        assert_eq!(snapshot.purge_calls, 1);
        assert_eq!(snapshot.purged_entries, 1);
        assert_eq!(snapshot.reclaimed_entries(), 1);
    }
}
