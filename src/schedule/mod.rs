//! Deferred state transitions on a virtual clock.
//!
//! Completing a pair does not resolve it at once: the outcome is applied
//! after a short delay so the second card can be seen. This module provides
//! the fire-once timer queue that holds those deferred transitions.
//!
//! ## Design Philosophy
//!
//! The clock is virtual and advanced explicitly by the host. There are no
//! threads and no async runtime: a UI loop calls `advance` with the elapsed
//! frame time, and tests step time deterministically.
//!
//! ## Example Usage
//!
//! ```
//! use pair_match::schedule::{Millis, TimerQueue, Transition};
//!
//! let mut timers = TimerQueue::new();
//! timers.schedule(Millis(600), Transition::ResolvePair);
//!
//! assert!(timers.pop_due(Millis(599)).is_none());
//! let fired = timers.pop_due(Millis(600)).unwrap();
//! assert_eq!(fired.transition, Transition::ResolvePair);
//! assert_eq!(timers.now(), Millis(600));
//! ```

mod timer;

pub use timer::{ScheduledTransition, TimerId, TimerQueue};

use serde::{Deserialize, Serialize};

/// A point or span on the virtual clock, in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Millis(pub u64);

impl Millis {
    /// Zero milliseconds.
    pub const ZERO: Millis = Millis(0);

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Add, saturating at `u64::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Millis) -> Millis {
        Millis(self.0.saturating_add(other.0))
    }
}

impl std::ops::Add for Millis {
    type Output = Millis;

    fn add(self, other: Millis) -> Millis {
        self.saturating_add(other)
    }
}

impl From<u64> for Millis {
    fn from(ms: u64) -> Self {
        Self(ms)
    }
}

impl std::fmt::Display for Millis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// A deferred change to the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// Apply the pending pair's match or mismatch.
    ResolvePair,
    /// Announce the win after the last match has settled.
    Celebrate,
}
