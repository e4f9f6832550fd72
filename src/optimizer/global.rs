use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BestRecord {
    pub score: u32,
    pub seed: u64,
    pub elapsed: Duration,
}

/// The only state shared between chains. Score never decreases.
#[derive(Debug, Default)]
pub struct GlobalBest {
    record: Mutex<Option<BestRecord>>,
}

impl GlobalBest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare-and-update under the lock; true when `score` became the
    /// new global best.
    pub fn try_update(&self, score: u32, seed: u64, elapsed: Duration) -> bool {
        let mut guard = self.record.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*guard, Some(current) if score <= current.score) {
            return false;
        }
        *guard = Some(BestRecord {
            score,
            seed,
            elapsed,
        });
        true
    }

    pub fn get(&self) -> Option<BestRecord> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn score(&self) -> Option<u32> {
        self.get().map(|r| r.score)
    }
}
