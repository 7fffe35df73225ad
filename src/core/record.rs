//! Pair outcomes and move history.

use serde::{Deserialize, Serialize};

use super::card::CardId;

/// Result of comparing two revealed cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairOutcome {
    /// Same symbol; both cards stay face up.
    Match,
    /// Different symbols; both cards are hidden again.
    Mismatch,
}

impl PairOutcome {
    /// Is this a match?
    #[must_use]
    pub fn is_match(self) -> bool {
        matches!(self, PairOutcome::Match)
    }
}

/// A completed pair waiting for its resolution delay to elapse.
///
/// The outcome is decided when the second card is flipped and applied when
/// the pair resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingPair {
    /// First card selected.
    pub first: CardId,
    /// Second card selected.
    pub second: CardId,
    /// What resolution will do.
    pub outcome: PairOutcome,
}

/// One completed pair-selection in the game's history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based move number.
    pub move_number: u32,
    /// First card selected.
    pub first: CardId,
    /// Second card selected.
    pub second: CardId,
    /// Match or mismatch.
    pub outcome: PairOutcome,
}

impl MoveRecord {
    /// Record a pair as move `move_number`.
    #[must_use]
    pub fn new(move_number: u32, pair: PendingPair) -> Self {
        Self {
            move_number,
            first: pair.first,
            second: pair.second,
            outcome: pair.outcome,
        }
    }
}
