#![no_main]

use std::collections::HashMap;
use std::rc::Rc;

use libfuzzer_sys::fuzz_target;
use weakcache::KeyObject;
use weakcache::ds::{SweepPolicy, TrieNode};

const SLOTS: usize = 6;

// Fuzz arbitrary operation sequences on TrieNode
//
// Tests random sequences of insert, lookup, key replacement and purge against
// a map keyed by (slot, generation) paths.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let policy = SweepPolicy::new(usize::from(data[0] % 8));
    let mut root: TrieNode<u32> = TrieNode::new();
    let mut keys: Vec<Rc<()>> = (0..SLOTS).map(|_| Rc::new(())).collect();
    let mut generation = [0u32; SLOTS];
    let mut model: HashMap<Vec<(usize, u32)>, u32> = HashMap::new();

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 4;
        let arg = data[idx + 1];

        // Path of 1..=3 slots packed into the argument byte.
        let depth = usize::from(arg % 3) + 1;
        let slots: Vec<usize> = (0..depth)
            .map(|i| usize::from(arg >> (2 * i + 2)) % SLOTS)
            .collect();
        let path: Vec<&dyn KeyObject> = slots.iter().map(|&s| &keys[s] as &dyn KeyObject).collect();
        let model_key: Vec<(usize, u32)> = slots.iter().map(|&s| (s, generation[s])).collect();

        match op {
            0 => {
                // insert
                let value = u32::from(arg);
                let previous = root.insert(&path, value, &policy).unwrap();
                assert_eq!(previous, model.insert(model_key, value));
            }
            1 => {
                // lookup
                assert_eq!(root.lookup(&path).unwrap(), model.get(&model_key));
            }
            2 => {
                // replace a key object
                drop(path);
                let slot = usize::from(arg) % SLOTS;
                keys[slot] = Rc::new(());
                generation[slot] += 1;
                model.retain(|p, _| p.iter().all(|&(s, g)| generation[s] == g));
            }
            3 => {
                // purge
                root.purge_expired();
                assert_eq!(root.value_count(), model.len());
            }
            _ => unreachable!(),
        }

        assert_eq!(root.live_value_count(), model.len());
        assert!(root.check_invariants(&policy).is_ok());

        idx += 2;
    }

    drop(keys);
    root.purge_expired();
    assert!(root.is_empty());
});
