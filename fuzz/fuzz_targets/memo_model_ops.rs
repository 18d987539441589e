#![no_main]

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use libfuzzer_sys::fuzz_target;
use weakcache::{EmptyPathError, KeyObject, WeakMemo};

const SLOTS: usize = 4;

#[derive(Debug, PartialEq)]
enum Failure {
    Refused,
    Empty,
}

impl From<EmptyPathError> for Failure {
    fn from(_: EmptyPathError) -> Self {
        Failure::Empty
    }
}

// Fuzz WeakMemo against a reference model
//
// Tests resolve, try_resolve (with failing factories), get, key replacement
// and purge; checks the factory runs exactly on model misses.
fuzz_target!(|data: &[u8]| {
    let memo: WeakMemo<u32> = WeakMemo::builder().sweep_threshold(2).build();
    let mut keys: Vec<Rc<u8>> = (0..SLOTS as u8).map(Rc::new).collect();
    let mut generation = [0u32; SLOTS];
    let mut model: HashMap<Vec<(usize, u32)>, u32> = HashMap::new();
    let calls = Cell::new(0u32);

    for chunk in data.chunks_exact(2) {
        let (op, arg) = (chunk[0] % 5, chunk[1]);
        let depth = usize::from(arg % 4);
        let slots: Vec<usize> = (0..depth)
            .map(|i| usize::from(arg >> (2 * i + 2)) % SLOTS)
            .collect();
        let path: Vec<&dyn KeyObject> = slots.iter().map(|&s| &keys[s] as &dyn KeyObject).collect();
        let model_key: Vec<(usize, u32)> = slots.iter().map(|&s| (s, generation[s])).collect();
        let before = calls.get();

        match op {
            0 => {
                // resolve
                let hit = model.contains_key(&model_key);
                let result = memo.resolve(
                    || {
                        calls.set(calls.get() + 1);
                        u32::from(arg)
                    },
                    &path,
                );
                if depth == 0 {
                    assert_eq!(result, Err(EmptyPathError));
                    assert_eq!(calls.get(), before);
                } else {
                    let expected = *model.entry(model_key).or_insert(u32::from(arg));
                    assert_eq!(result, Ok(expected));
                    assert_eq!(calls.get() - before, u32::from(!hit));
                }
            }
            1 => {
                // try_resolve with a factory that always fails
                let result: Result<u32, Failure> = memo.try_resolve(
                    || {
                        calls.set(calls.get() + 1);
                        Err(Failure::Refused)
                    },
                    &path,
                );
                match (depth, model.get(&model_key)) {
                    (0, _) => assert_eq!(result, Err(Failure::Empty)),
                    (_, Some(&v)) => assert_eq!(result, Ok(v)),
                    (_, None) => assert_eq!(result, Err(Failure::Refused)),
                }
            }
            2 => {
                // get
                let result = memo.get(&path);
                if depth == 0 {
                    assert_eq!(result, Err(EmptyPathError));
                } else {
                    assert_eq!(result, Ok(model.get(&model_key).copied()));
                }
            }
            3 => {
                drop(path);
                let slot = usize::from(arg) % SLOTS;
                keys[slot] = Rc::new(arg);
                generation[slot] += 1;
                model.retain(|p, _| p.iter().all(|&(s, g)| generation[s] == g));
            }
            4 => {
                memo.purge_expired();
            }
            _ => unreachable!(),
        }

        let ran = calls.get() - before;
        assert!(ran <= 1);
        assert_eq!(memo.len(), model.len());
        assert!(memo.check_invariants().is_ok());
    }
});
