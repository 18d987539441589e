use crate::ds::trie::InsertStats;
use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::MemoMetricsRecorder;

// ---------------------------------------------------------------------------
// MemoMetrics
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoMetrics {
    pub resolve_calls: MetricsCell,
    pub hits: MetricsCell,
    pub misses: MetricsCell,
    pub factory_calls: MetricsCell,
    pub factory_failures: MetricsCell,
    pub values_stored: MetricsCell,
    pub overwrites: MetricsCell,
    pub entries_created: MetricsCell,
    pub sweeps: MetricsCell,
    pub swept_entries: MetricsCell,
    pub purge_calls: MetricsCell,
    pub purged_entries: MetricsCell,
}

impl MemoMetrics {
    pub fn reset(&self) {
        for cell in [
            &self.resolve_calls,
            &self.hits,
            &self.misses,
            &self.factory_calls,
            &self.factory_failures,
            &self.values_stored,
            &self.overwrites,
            &self.entries_created,
            &self.sweeps,
            &self.swept_entries,
            &self.purge_calls,
            &self.purged_entries,
        ] {
            cell.reset();
        }
    }
}

impl MemoMetricsRecorder for MemoMetrics {
    fn record_resolve_call(&self) {
        self.resolve_calls.incr();
    }
    fn record_hit(&self) {
        self.hits.incr();
    }
    fn record_miss(&self) {
        self.misses.incr();
    }
    fn record_factory_call(&self) {
        self.factory_calls.incr();
    }
    fn record_factory_failure(&self) {
        self.factory_failures.incr();
    }
    fn record_store(&self, overwrote: bool, stats: &InsertStats) {
        self.values_stored.incr();
        if overwrote {
            self.overwrites.incr();
        }
        self.entries_created.add(stats.entries_created as u64);
        self.sweeps.add(stats.sweeps as u64);
        self.swept_entries.add(stats.reclaimed as u64);
    }
    fn record_purge(&self, removed: usize) {
        self.purge_calls.incr();
        self.purged_entries.add(removed as u64);
    }
}
