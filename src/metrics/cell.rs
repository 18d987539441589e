use std::cell::Cell;

/// A metrics-only counter cell.
///
/// Counters are bumped from `&self` methods (`resolve`, `get`), so they need
/// interior mutability. The cell is `!Sync`, matching the single-threaded
/// cache that owns it.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.add(1);
    }

    #[inline]
    pub fn add(&self, n: u64) {
        self.0.set(self.0.get().saturating_add(n));
    }

    #[inline]
    pub fn reset(&self) {
        self.0.set(0);
    }
}
