//! Game hosting: the pair rules driven over time.
//!
//! [`MatchingGame`] wraps a [`GameState`](crate::core::GameState) with the
//! resolution scheduler and event outlets. Use `GameState` directly for
//! synchronous play; use `MatchingGame` when the host wants delays, events,
//! restarts, and snapshots handled for it.

mod game;

pub use game::MatchingGame;
