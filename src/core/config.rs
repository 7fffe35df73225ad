//! Game configuration.
//!
//! `GameConfig` holds everything needed to deal and pace a game:
//! the symbol set, the resolution delays, and the RNG seed.
//! Defaults reproduce the classic 12-card board.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::card::Symbol;
use super::error::ConfigError;

/// Delays between completing a pair and applying its outcome.
///
/// All values are milliseconds on the game's virtual clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay before a matched pair is locked in.
    pub match_delay_ms: u64,

    /// Delay before a mismatched pair is hidden again.
    pub mismatch_delay_ms: u64,

    /// Delay between the final match and the win celebration.
    pub celebration_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            match_delay_ms: 600,
            mismatch_delay_ms: 1000,
            celebration_delay_ms: 500,
        }
    }
}

impl TimingConfig {
    /// Resolve everything on the next clock tick.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            match_delay_ms: 0,
            mismatch_delay_ms: 0,
            celebration_delay_ms: 0,
        }
    }
}

/// Configuration for a matching game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Distinct symbols; each is dealt twice.
    pub symbols: Vec<Symbol>,

    /// Resolution pacing.
    pub timing: TimingConfig,

    /// Seed for the shuffle RNG. Same seed produces the same deals.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            symbols: Symbol::default_set(),
            timing: TimingConfig::default(),
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Use a custom symbol set.
    #[must_use]
    pub fn with_symbols<S: Into<Symbol>>(mut self, symbols: impl IntoIterator<Item = S>) -> Self {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    /// Use custom resolution delays.
    #[must_use]
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Use a custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of pairs on the board.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.symbols.len()
    }

    /// Check the symbol set is non-empty and has no duplicates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_symbols(&self.symbols)
    }
}

/// Shared symbol-set check used by config loading and deck building.
pub(crate) fn validate_symbols(symbols: &[Symbol]) -> Result<(), ConfigError> {
    if symbols.is_empty() {
        return Err(ConfigError::EmptySymbolSet);
    }

    let mut seen = FxHashSet::default();
    for symbol in symbols {
        if !seen.insert(symbol) {
            return Err(ConfigError::DuplicateSymbol(symbol.clone()));
        }
    }

    Ok(())
}
