//! Optional counters for [`WeakMemo`](crate::memo::WeakMemo) (feature `metrics`).
//!
//! Recording, snapshotting and export are separate concerns:
//!
//! ```text
//!   WeakMemo ──records──► MemoMetrics (MetricsCell counters)
//!        │
//!        └──snapshot()──► MemoMetricsSnapshot ──export()──► PrometheusTextExporter
//! ```

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use exporter::PrometheusTextExporter;
pub use metrics_impl::MemoMetrics;
pub use snapshot::MemoMetricsSnapshot;
pub use traits::{MemoMetricsRecorder, MetricsExporter, MetricsReset, MetricsSnapshotProvider};
