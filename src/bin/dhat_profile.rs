//! DHAT heap profiler for weakcache.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::rc::Rc;

use weakcache::{WeakMemo, path};

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

/// Long-lived anchors paired with keys that die right after use.
fn transient_churn(memo: &WeakMemo<Rc<[u64; 8]>>, anchors: &[Rc<u64>], operations: usize) {
    let mut rng = XorShift64::new(42);
    for i in 0..operations {
        let anchor = &anchors[(rng.next_u64() % anchors.len() as u64) as usize];
        let transient = Rc::new(i as u64);
        let _ = memo.resolve(|| Rc::new([i as u64; 8]), path![anchor, transient]);
    }
}

/// Repeated resolution over a fixed working set; should allocate only once.
fn steady_hits(memo: &WeakMemo<Rc<[u64; 8]>>, anchors: &[Rc<u64>], operations: usize) {
    let mut rng = XorShift64::new(7);
    for _ in 0..operations {
        let a = &anchors[(rng.next_u64() % anchors.len() as u64) as usize];
        let b = &anchors[(rng.next_u64() % anchors.len() as u64) as usize];
        let _ = memo.resolve(|| Rc::new([0; 8]), path![a, b]);
    }
}

fn profile_default_threshold() {
    println!("=== Profiling default sweep threshold ===");
    let memo = WeakMemo::new();
    let anchors: Vec<Rc<u64>> = (0..64).map(Rc::new).collect();

    transient_churn(&memo, &anchors, 100_000);
    println!("  After churn: entries={} values={}", memo.entry_count(), memo.len());

    steady_hits(&memo, &anchors, 100_000);
    println!("  After hits:  entries={} values={}", memo.entry_count(), memo.len());

    let purged = memo.purge_expired();
    println!("  Purged {purged} entries, {} remain", memo.entry_count());
}

fn profile_eager_threshold() {
    println!("=== Profiling sweep threshold 4 ===");
    let memo = WeakMemo::<Rc<[u64; 8]>>::builder().sweep_threshold(4).build();
    let anchors: Vec<Rc<u64>> = (0..64).map(Rc::new).collect();

    transient_churn(&memo, &anchors, 100_000);
    println!("  After churn: entries={} values={}", memo.entry_count(), memo.len());
}

fn profile_dropped_anchors() {
    println!("=== Profiling anchor teardown ===");
    let memo = WeakMemo::new();
    let mut anchors: Vec<Rc<u64>> = (0..256).map(Rc::new).collect();

    steady_hits(&memo, &anchors, 50_000);
    println!("  Before teardown: entries={}", memo.entry_count());

    anchors.clear();
    let purged = memo.purge_expired();
    println!("  Purged {purged} entries, {} remain", memo.entry_count());
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    println!("weakcache DHAT Heap Profiling");
    println!("=============================\n");

    profile_default_threshold();
    profile_eager_threshold();
    profile_dropped_anchors();

    println!("\n=============================");
    println!("Profile written to dhat-heap.json");
}
