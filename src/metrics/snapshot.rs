/// Point-in-time copy of a memoizer's counters and gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoMetricsSnapshot {
    pub resolve_calls: u64,
    pub hits: u64,
    pub misses: u64,

    pub factory_calls: u64,
    pub factory_failures: u64,

    pub values_stored: u64,
    pub overwrites: u64,
    pub entries_created: u64,

    pub sweeps: u64,
    pub swept_entries: u64, // removed by amortized sweeps during inserts
    pub purge_calls: u64,
    pub purged_entries: u64,

    // gauges captured at snapshot time
    pub live_values: usize,
    pub entry_count: usize,
}

impl MemoMetricsSnapshot {
    /// Fraction of lookups answered from the cache, or 0.0 before any.
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits.saturating_add(self.misses);
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }

    /// Entries removed by sweeps and purges combined.
    pub fn reclaimed_entries(&self) -> u64 {
        self.swept_entries.saturating_add(self.purged_entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_ratio_without_lookups_is_zero() {
        assert_eq!(MemoMetricsSnapshot::default().hit_ratio(), 0.0);
    }

    #[test]
    fn hit_ratio_counts_hits_over_lookups() {
        let snapshot = MemoMetricsSnapshot {
            hits: 3,
            misses: 1,
            ..MemoMetricsSnapshot::default()
        };
        assert_eq!(snapshot.hit_ratio(), 0.75);
    }

    #[test]
    fn reclaimed_sums_sweeps_and_purges() {
        let snapshot = MemoMetricsSnapshot {
            swept_entries: 2,
            purged_entries: 5,
            ..MemoMetricsSnapshot::default()
        };
        assert_eq!(snapshot.reclaimed_entries(), 7);
    }

    #[test]
    fn saturated_counters_do_not_overflow() {
        let snapshot = MemoMetricsSnapshot {
            hits: u64::MAX,
            misses: u64::MAX,
            swept_entries: u64::MAX,
            purged_entries: 1,
            ..MemoMetricsSnapshot::default()
        };
        assert_eq!(snapshot.hit_ratio(), 1.0);
        assert_eq!(snapshot.reclaimed_entries(), u64::MAX);
    }
}
