#![no_main]

use std::rc::Rc;

use libfuzzer_sys::fuzz_target;
use weakcache::ds::{InsertStats, SweepPolicy, TrieNode};
use weakcache::path;

// Stress amortized sweeping with short-lived keys
//
// Each byte decides whether the next key is kept or dropped immediately after
// insertion. Node width must stay bounded by the sweep threshold and never
// lose a live entry.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let policy = SweepPolicy::new(usize::from(data[0] % 16) + 1);
    let mut root: TrieNode<usize> = TrieNode::new();
    let anchor = Rc::new(());
    let mut kept = Vec::new();
    let mut totals = InsertStats::default();

    for (i, &byte) in data[1..].iter().enumerate() {
        let key = Rc::new(i);
        let mut stats = InsertStats::default();
        root.insert_tracked(path![anchor, key], i, &policy, &mut stats).unwrap();
        totals.sweeps += stats.sweeps;
        totals.reclaimed += stats.reclaimed;

        if byte % 4 == 0 {
            kept.push(key);
        }

        assert!(root.check_invariants(&policy).is_ok());
        for (j, key) in kept.iter().enumerate() {
            assert!(root.lookup(path![anchor, key]).unwrap().is_some(), "lost live key {j}");
        }
    }

    assert_eq!(root.live_value_count(), kept.len());
    let purged = root.purge_expired();
    assert_eq!(root.value_count(), kept.len());
    assert!(totals.reclaimed + purged >= data.len() - 1 - kept.len());
});
