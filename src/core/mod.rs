//! Core types: cards, board state, pair rules, RNG, configuration.
//!
//! Everything here is synchronous and deterministic. Timing, events, and
//! hosting live in the `schedule`, `events`, and `rules` modules.

pub mod card;
pub mod config;
pub mod error;
pub mod record;
pub mod rng;
pub mod state;

pub use card::{Card, CardFace, CardId, Symbol};
pub use config::{GameConfig, TimingConfig};
pub use error::{ConfigError, InvariantError, SnapshotError};
pub use record::{MoveRecord, PairOutcome, PendingPair};
pub use rng::{GameRng, GameRngState};
pub use state::{GamePhase, GameState, IgnoreReason, Resolution, Selection};
