//! Automated play for testing and benchmarking.

use serde::{Deserialize, Serialize};

use crate::core::{ConfigError, GameConfig, GameRng, PairOutcome};
use crate::rules::MatchingGame;

use super::policy::SelectionPolicy;

/// Result of one simulated game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Seed the deck was dealt from.
    pub seed: u64,
    /// Completed pair-selections.
    pub moves: u32,
    /// Of which mismatches.
    pub mismatches: u32,
    /// Did the game finish before the move cap?
    pub won: bool,
}

/// Aggregate statistics over many games.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub games: usize,
    pub wins: usize,
    pub min_moves: u32,
    pub max_moves: u32,
    pub mean_moves: f64,
}

impl SimulationSummary {
    /// Summarize a batch of reports. Returns `None` for an empty batch.
    #[must_use]
    pub fn from_reports(reports: &[SimulationReport]) -> Option<Self> {
        let min_moves = reports.iter().map(|r| r.moves).min()?;
        let max_moves = reports.iter().map(|r| r.moves).max()?;
        let total: u64 = reports.iter().map(|r| u64::from(r.moves)).sum();

        Some(Self {
            games: reports.len(),
            wins: reports.iter().filter(|r| r.won).count(),
            min_moves,
            max_moves,
            mean_moves: total as f64 / reports.len() as f64,
        })
    }
}

/// Play one game to completion (or `max_moves`) with `policy`.
///
/// Pairs are resolved immediately; the configured delays are irrelevant.
pub fn simulate(
    config: &GameConfig,
    policy: &mut dyn SelectionPolicy,
    max_moves: u32,
) -> Result<SimulationReport, ConfigError> {
    let mut game = MatchingGame::new(config.clone())?;
    let mut rng = GameRng::new(config.seed).for_context("player");

    policy.reset();
    for event in game.drain_events() {
        policy.observe(&event);
    }

    while !game.is_won() && game.move_count() < max_moves {
        let Some(card) = policy.choose(game.state(), &mut rng) else {
            break;
        };
        game.select(card);
        if game.state().is_locked() {
            game.resolve_now();
        }
        for event in game.drain_events() {
            policy.observe(&event);
        }
    }

    let mismatches = game
        .state()
        .history()
        .iter()
        .filter(|r| r.outcome == PairOutcome::Mismatch)
        .count() as u32;

    tracing::debug!(
        policy = policy.name(),
        seed = config.seed,
        moves = game.move_count(),
        won = game.is_won(),
        "simulation finished"
    );

    Ok(SimulationReport {
        seed: config.seed,
        moves: game.move_count(),
        mismatches,
        won: game.is_won(),
    })
}

/// Play `games` independent games, each dealt from a seed forked off
/// `config.seed`.
pub fn simulate_many(
    config: &GameConfig,
    policy: &mut dyn SelectionPolicy,
    games: usize,
    max_moves: u32,
) -> Result<Vec<SimulationReport>, ConfigError> {
    let mut seeds = GameRng::new(config.seed);
    (0..games)
        .map(|_| {
            let seed = seeds.fork().seed();
            simulate(&config.clone().with_seed(seed), policy, max_moves)
        })
        .collect()
}
