//! Fire-once timer queue.
//!
//! Entries fire in due-time order; entries due at the same instant fire in
//! the order they were scheduled. Timer IDs are never reused, so an ID that
//! was cancelled (individually or by `cancel_all`) can never fire.

use serde::{Deserialize, Serialize};

use super::{Millis, Transition};

/// Unique identifier for a scheduled transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u32);

impl TimerId {
    /// Create a timer ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

/// A transition waiting for its due time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTransition {
    /// Unique identifier.
    pub id: TimerId,
    /// Clock time at which it fires.
    pub due: Millis,
    /// What happens when it fires.
    pub transition: Transition,
}

/// Fire-once timers on a virtual clock.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    /// Current clock time.
    now: Millis,

    /// Pending entries, unordered.
    entries: Vec<ScheduledTransition>,

    /// Next timer ID.
    next_id: u32,
}

impl TimerQueue {
    /// Create an empty queue at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock time.
    #[must_use]
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Schedule `transition` to fire `delay` from now.
    pub fn schedule(&mut self, delay: Millis, transition: Transition) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now + delay;
        self.entries.push(ScheduledTransition { id, due, transition });
        tracing::trace!(timer = %id, due = %due, ?transition, "scheduled");
        id
    }

    /// Cancel one entry. Returns true if it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        if let Some(pos) = self.entries.iter().position(|e| e.id == id) {
            self.entries.remove(pos);
            true
        } else {
            false
        }
    }

    /// Cancel every pending entry. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        if dropped > 0 {
            tracing::debug!(dropped, "cancelled pending transitions");
        }
        dropped
    }

    /// Remove a specific entry regardless of its due time.
    ///
    /// For hosts that run their own timers and fire entries themselves.
    pub fn take(&mut self, id: TimerId) -> Option<ScheduledTransition> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos))
    }

    /// Remove the earliest entry due at or before `deadline`.
    ///
    /// The clock moves forward to that entry's due time, so anything it
    /// schedules is timed from when it fired.
    pub fn pop_due(&mut self, deadline: Millis) -> Option<ScheduledTransition> {
        let pos = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= deadline)
            .min_by_key(|(_, e)| (e.due, e.id))
            .map(|(i, _)| i)?;

        let entry = self.entries.remove(pos);
        if entry.due > self.now {
            self.now = entry.due;
        }
        Some(entry)
    }

    /// Move the clock forward to `time`. Never moves backwards.
    pub fn advance_clock_to(&mut self, time: Millis) {
        if time > self.now {
            self.now = time;
        }
    }

    /// Due time of the earliest pending entry.
    #[must_use]
    pub fn next_due(&self) -> Option<Millis> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Pending entries in firing order.
    #[must_use]
    pub fn pending(&self) -> Vec<ScheduledTransition> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|e| (e.due, e.id));
        entries
    }

    /// Number of pending entries.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Is nothing scheduled?
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }
}
