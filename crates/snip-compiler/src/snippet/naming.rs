use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Process-wide compilation counter. Monotonic, never reused.
#[derive(Debug, Default)]
pub struct UnitCounter(AtomicU64);

impl UnitCounter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Increments and returns the new value; the first call yields 1.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Number of compilations started so far.
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// `Snippet_<counter>_<uuid-simple>`.
pub fn unit_name(counter: &UnitCounter) -> String {
    format!("Snippet_{}_{}", counter.next(), Uuid::new_v4().simple())
}
