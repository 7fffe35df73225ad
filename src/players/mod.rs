//! Automated players.
//!
//! Policies are trait-based so hosts can plug in their own:
//! - `RandomPolicy`: flips uniformly among face-down cards
//! - `PerfectMemoryPolicy`: never forgets a revealed symbol
//!
//! `simulate` plays whole games with a policy, resolving pairs immediately.

mod policy;
mod simulate;

pub use policy::{PerfectMemoryPolicy, RandomPolicy, SelectionPolicy};
pub use simulate::{simulate, simulate_many, SimulationReport, SimulationSummary};
