//! Per-pod trigger cooldown

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Suppresses repeat diagnoses of the same pod within a time window.
///
/// State is memory-resident only. After a process restart every pod is
/// eligible again, which at worst causes one extra diagnosis per pod.
pub struct CooldownTracker {
    window: Duration,
    last_run: DashMap<String, Instant>,
}

impl CooldownTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_run: DashMap::new(),
        }
    }

    /// Atomically decide whether a new run may start for this identity.
    ///
    /// Admission records the run time immediately, before the diagnosis
    /// itself executes, so a slow run cannot let duplicates through.
    pub fn try_begin(&self, uid: &str) -> bool {
        let now = Instant::now();
        let mut admitted = false;
        self.last_run
            .entry(uid.to_string())
            .and_modify(|last| {
                if now.duration_since(*last) >= self.window {
                    *last = now;
                    admitted = true;
                }
            })
            .or_insert_with(|| {
                admitted = true;
                now
            });
        admitted
    }

    /// Drop the entry of a deleted pod
    pub fn forget(&self, uid: &str) {
        self.last_run.remove(uid);
    }

    pub fn len(&self) -> usize {
        self.last_run.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_run.is_empty()
    }
}
