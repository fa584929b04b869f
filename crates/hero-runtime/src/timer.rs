#![forbid(unsafe_code)]

//! Cancellable one-shot timers.
//!
//! A [`TimerQueue`] stores deadlines with an arbitrary payload. The host asks
//! for [`next_deadline`](TimerQueue::next_deadline) to know when to wake the
//! engine, and the engine pops whatever is due with
//! [`pop_due`](TimerQueue::pop_due).
//!
//! # Invariants
//!
//! 1. Due timers are returned in deadline order; equal deadlines fire in
//!    scheduling order.
//! 2. A cancelled timer never fires, and cancelling twice is harmless.
//! 3. [`TimerId`]s are never reused within one queue.

use std::time::Duration;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw id, for logs.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Entry<K> {
    id: TimerId,
    deadline: Duration,
    payload: K,
}

/// A queue of pending one-shot timers keyed by deadline.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    entries: Vec<Entry<K>>,
    next_id: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TimerQueue<K> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Schedule `payload` to fire at `deadline`.
    pub fn schedule(&mut self, deadline: Duration, payload: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        // Stable insertion: after every entry with deadline <= ours.
        let idx = self.entries.partition_point(|e| e.deadline <= deadline);
        self.entries.insert(
            idx,
            Entry {
                id,
                deadline,
                payload,
            },
        );
        tracing::trace!(timer = id.0, deadline_ms = deadline.as_millis() as u64, "timer scheduled");
        id
    }

    /// Cancel a timer. Returns `true` if it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() < before;
        if removed {
            tracing::trace!(timer = id.0, "timer cancelled");
        }
        removed
    }

    /// Remove and return every timer whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Vec<(TimerId, K)> {
        let due = self.entries.partition_point(|e| e.deadline <= now);
        self.entries
            .drain(..due)
            .map(|e| (e.id, e.payload))
            .collect()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.first().map(|e| e.deadline)
    }

    /// Whether a timer is still pending.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
