use std::io::Write;
use std::sync::{Mutex, MutexGuard};

use crate::metrics::snapshot::MemoMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for memoizer metrics snapshots.
///
/// Writes in the Prometheus text exposition format so the output can be
/// scraped by Prometheus or forwarded to an OpenTelemetry collector. Write
/// errors are ignored; metrics are best-effort.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn writer(&self) -> MutexGuard<'_, W> {
        self.writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = self.writer();
        let _ = writeln!(writer, "# TYPE {} counter", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = self.writer();
        let _ = writeln!(writer, "# TYPE {} gauge", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write> MetricsExporter<MemoMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &MemoMetricsSnapshot) {
        self.write_counter("resolve_calls_total", snapshot.resolve_calls);
        self.write_counter("hits_total", snapshot.hits);
        self.write_counter("misses_total", snapshot.misses);
        self.write_counter("factory_calls_total", snapshot.factory_calls);
        self.write_counter("factory_failures_total", snapshot.factory_failures);
        self.write_counter("values_stored_total", snapshot.values_stored);
        self.write_counter("overwrites_total", snapshot.overwrites);
        self.write_counter("entries_created_total", snapshot.entries_created);
        self.write_counter("sweeps_total", snapshot.sweeps);
        self.write_counter("swept_entries_total", snapshot.swept_entries);
        self.write_counter("purge_calls_total", snapshot.purge_calls);
        self.write_counter("purged_entries_total", snapshot.purged_entries);
        self.write_gauge("live_values", snapshot.live_values as u64);
        self.write_gauge("entry_count", snapshot.entry_count as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_prefixed_counters_and_gauges() {
        let exporter = PrometheusTextExporter::new("weakcache", Vec::new());
        let snapshot = MemoMetricsSnapshot {
            resolve_calls: 3,
            hits: 1,
            live_values: 2,
            ..MemoMetricsSnapshot::default()
        };
        exporter.export(&snapshot);

        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("# TYPE weakcache_resolve_calls_total counter\n"));
        assert!(text.contains("weakcache_resolve_calls_total 3\n"));
        assert!(text.contains("weakcache_hits_total 1\n"));
        assert!(text.contains("# TYPE weakcache_live_values gauge\n"));
        assert!(text.contains("weakcache_live_values 2\n"));
    }

    #[test]
    fn empty_prefix_leaves_names_bare() {
        let exporter = PrometheusTextExporter::new("", Vec::new());
        exporter.export(&MemoMetricsSnapshot::default());
        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("\nmisses_total 0\n"));
    }
}
