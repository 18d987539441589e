//! Cost of reclaiming entries whose key objects were dropped.
//!
//! Run with: `cargo bench --bench reclaim`
//!
//! `churn` resolves paths through short-lived keys so that amortized sweeps
//! do the reclaiming; `purge` measures an explicit `purge_expired` pass over
//! a trie in which a fraction of the keys have died.

use std::hint::black_box;
use std::rc::Rc;
use std::time::{Duration, Instant};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use weakcache::{WeakMemo, path};

const OPS: u64 = 10_000;
const LIVE_KEYS: usize = 512;

// ============================================================================
// Transient Key Churn
// ============================================================================

fn bench_transient_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("transient_churn_ns");
    group.throughput(Throughput::Elements(OPS));

    for threshold in [4usize, 32, 256] {
        group.bench_with_input(
            BenchmarkId::from_parameter(threshold),
            &threshold,
            |b, &threshold| {
                let anchors: Vec<Rc<u64>> = (0..LIVE_KEYS as u64).map(Rc::new).collect();
                b.iter_custom(|iters| {
                    let mut rng = SmallRng::seed_from_u64(17);
                    let memo: WeakMemo<u64> =
                        WeakMemo::<u64>::builder().sweep_threshold(threshold).build();
                    let start = Instant::now();
                    for _ in 0..iters {
                        for i in 0..OPS {
                            let anchor = &anchors[rng.random_range(0..LIVE_KEYS)];
                            let transient = Rc::new(i);
                            black_box(memo.resolve(|| i, path![anchor, transient]).ok());
                        }
                    }
                    let elapsed = start.elapsed();
                    black_box(memo.entry_count());
                    elapsed
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Explicit Purge
// ============================================================================

fn bench_purge_expired(c: &mut Criterion) {
    let mut group = c.benchmark_group("purge_expired");

    for dead_percent in [10u64, 50, 90] {
        group.bench_with_input(
            BenchmarkId::from_parameter(dead_percent),
            &dead_percent,
            |b, &dead_percent| {
                b.iter_custom(|iters| {
                    let mut elapsed = Duration::ZERO;
                    for _ in 0..iters {
                        let root = Rc::new(0u64);
                        let memo: WeakMemo<u64> = WeakMemo::<u64>::builder()
                            .sweep_threshold(usize::MAX)
                            .build();
                        let mut keys: Vec<Rc<u64>> = (0..OPS).map(Rc::new).collect();
                        for (i, key) in keys.iter().enumerate() {
                            let _ = memo.resolve(|| i as u64, path![root, key]);
                        }
                        let keep = OPS - OPS * dead_percent / 100;
                        keys.truncate(keep as usize);

                        let start = Instant::now();
                        black_box(memo.purge_expired());
                        elapsed += start.elapsed();
                    }
                    elapsed
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_transient_churn, bench_purge_expired);
criterion_main!(benches);
