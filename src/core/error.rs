//! Error types for configuration and snapshots.
//!
//! Gameplay itself never fails: an invalid selection is reported as
//! [`Selection::Ignored`](super::Selection::Ignored). Errors only arise when
//! a deck is built from bad input or a snapshot cannot be decoded.
//! [`InvariantError`] names the board invariant a decoded state breaks.

use thiserror::Error;

use super::card::{CardId, Symbol};

/// Errors building a deck or loading a [`GameConfig`](super::GameConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No symbols to deal.
    #[error("symbol set is empty")]
    EmptySymbolSet,

    /// A symbol appears more than once in the symbol set.
    #[error("duplicate symbol in symbol set: {0}")]
    DuplicateSymbol(Symbol),

    /// Two cards in a prepared deck share an ID.
    #[error("duplicate card id in deck: {0}")]
    DuplicateCardId(CardId),

    /// A prepared deck holds a symbol other than exactly twice.
    #[error("symbol {symbol} appears {count} times, expected 2")]
    UnpairedSymbol { symbol: Symbol, count: usize },

    /// A prepared deck has a card already face up.
    #[error("card {0} must start face down and unmatched")]
    CardNotHidden(CardId),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A board invariant that a [`GameState`](super::GameState) breaks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("card index does not match cards")]
    IndexMismatch,

    #[error("card {0} is matched but face down")]
    MatchedFaceDown(CardId),

    #[error("symbol {symbol} appears {count} times, expected 2")]
    UnpairedSymbol { symbol: Symbol, count: usize },

    #[error("{0} cards selected, at most 2 allowed")]
    TooManySelected(usize),

    /// A selected card is unknown, face down, or already matched.
    #[error("selected card {0} is not face up and unmatched")]
    SelectionNotRevealed(CardId),

    #[error("pending pair does not match the resolving phase")]
    PendingPhaseMismatch,

    /// The pending pair is not the two selected cards, in order.
    #[error("pending pair does not match the selected cards")]
    PendingNotSelected,

    #[error("won phase does not match matched cards")]
    WonMismatch,

    #[error("history holds {history} records but move count is {moves}")]
    HistoryMismatch { history: usize, moves: u32 },
}

/// Errors encoding or decoding a binary game snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// bincode failed to encode or decode.
    #[error("snapshot codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// The decoded config would not deal a valid game.
    #[error("snapshot config is invalid: {0}")]
    Config(#[from] ConfigError),

    /// The decoded state breaks a board invariant.
    #[error("snapshot is inconsistent: {0}")]
    Inconsistent(#[from] InvariantError),

    /// The board is locked but no `ResolvePair` timer will unlock it.
    #[error("snapshot has a pending pair with no scheduled resolution")]
    UnscheduledResolution,
}
