//! # Metrics Traits
//!
//! Recording, snapshotting and export are kept in separate traits so that
//! the memoizer only ever writes counters, tests and benches only read
//! snapshots, and monitoring code only publishes them.
//!
//! ```text
//!   ┌─────────────────────────────┐
//!   │     MemoMetricsRecorder     │  written by WeakMemo (&self)
//!   │  resolve / hit / miss       │
//!   │  factory call / failure     │
//!   │  store / sweep / purge      │
//!   └──────────────┬──────────────┘
//!                  │
//!     ┌────────────┴─────────────────────────┐
//!     ▼                                      ▼
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ MetricsReset (bench/test)    │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

use crate::ds::trie::InsertStats;

/// Counters for memoized resolution.
///
/// All methods take `&self`: the memoizer resolves through a shared
/// reference, so recorders rely on interior mutability.
pub trait MemoMetricsRecorder {
    fn record_resolve_call(&self);
    fn record_hit(&self);
    fn record_miss(&self);
    fn record_factory_call(&self);
    fn record_factory_failure(&self);
    /// A value was written; `overwrote` is true when it replaced another.
    fn record_store(&self, overwrote: bool, stats: &InsertStats);
    fn record_purge(&self, removed: usize);
}

/// Produce a point-in-time snapshot of metrics.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&self);
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
