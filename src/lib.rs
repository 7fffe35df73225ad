//! # pair-match
//!
//! A deterministic pairs-matching ("memory") game engine.
//!
//! ## Design Principles
//!
//! 1. **Rules are synchronous**: `GameState` applies the pair rules in place
//!    with no clock and no I/O. Invalid selections are ignored, never errors.
//!
//! 2. **Time is explicit**: a completed pair locks the board until the host
//!    resolves it. `MatchingGame` schedules that resolution on a virtual clock
//!    the host advances, so tests and UIs see identical behavior.
//!
//! 3. **Presentation is someone else's job**: the engine emits `GameEvent`s
//!    and abstract `SoundCue`s; hosts render and play them.
//!
//! ## Modules
//!
//! - `core`: Cards, board state, pair rules, RNG, configuration, errors
//! - `schedule`: Fire-once timers on a virtual clock
//! - `events`: Game events, sound cues, observers
//! - `rules`: The `MatchingGame` controller
//! - `players`: Automated selection policies and simulation

pub mod core;
pub mod schedule;
pub mod events;
pub mod rules;
pub mod players;

// Re-export commonly used types
pub use crate::core::{
    Card, CardFace, CardId, Symbol,
    GameConfig, TimingConfig,
    ConfigError, InvariantError, SnapshotError,
    GameRng, GameRngState,
    MoveRecord, PairOutcome, PendingPair,
    GamePhase, GameState, IgnoreReason, Resolution, Selection,
};

pub use crate::schedule::{Millis, ScheduledTransition, TimerId, TimerQueue, Transition};

pub use crate::events::{EventLog, GameEvent, GameObserver, SoundCue};

pub use crate::rules::MatchingGame;

pub use crate::players::{
    PerfectMemoryPolicy, RandomPolicy, SelectionPolicy,
    SimulationReport, SimulationSummary, simulate, simulate_many,
};
