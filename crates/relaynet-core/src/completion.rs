//! Producer completion latch.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts producers still sending; opens once every one has finished.
#[derive(Debug)]
pub struct Completion {
    pending: AtomicUsize,
}

impl Completion {
    /// Latch waiting for `producers` completions.
    pub fn new(producers: usize) -> Self {
        Self { pending: AtomicUsize::new(producers) }
    }

    /// Mark one producer finished. Returns `true` for the final one.
    pub fn producer_done(&self) -> bool {
        let previous = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .unwrap_or(0);
        previous == 1
    }

    /// Producers that have not finished yet.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Whether every producer has finished.
    pub fn is_complete(&self) -> bool {
        self.pending() == 0
    }
}
