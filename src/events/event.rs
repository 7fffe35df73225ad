//! Game events and sound cues.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, Symbol};

/// Something that happened in a game.
///
/// Events are emitted in the order they happen. A completed pair produces
/// two events: `PairMatched`/`PairMismatched` when the second card is
/// flipped, then `PairResolved`/`PairHidden` once the resolution delay has
/// elapsed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new deck was dealt.
    GameStarted {
        /// Pairs on the board.
        pairs: usize,
    },

    /// A card was turned face up.
    CardFlipped {
        /// The card.
        card: CardId,
        /// Its now-visible symbol.
        symbol: Symbol,
    },

    /// Two revealed cards share a symbol; resolution is pending.
    PairMatched { first: CardId, second: CardId },

    /// Two revealed cards differ; resolution is pending.
    PairMismatched { first: CardId, second: CardId },

    /// A matched pair was locked in face up.
    PairResolved { first: CardId, second: CardId },

    /// A mismatched pair was turned face down again.
    PairHidden { first: CardId, second: CardId },

    /// The last pair was matched.
    GameWon {
        /// Total moves taken.
        moves: u32,
    },

    /// The win fanfare, a short delay after `GameWon`.
    Celebration {
        /// Total moves taken.
        moves: u32,
    },
}

impl GameEvent {
    /// The sound cue a host should play for this event, if any.
    #[must_use]
    pub fn cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::CardFlipped { .. } => Some(SoundCue::Pop),
            GameEvent::PairMatched { .. } => Some(SoundCue::Ding),
            GameEvent::PairMismatched { .. } => Some(SoundCue::Boop),
            GameEvent::Celebration { .. } => Some(SoundCue::Cheer),
            GameEvent::GameStarted { .. }
            | GameEvent::PairResolved { .. }
            | GameEvent::PairHidden { .. }
            | GameEvent::GameWon { .. } => None,
        }
    }

    /// Does this event end the game?
    #[must_use]
    pub fn is_win(&self) -> bool {
        matches!(self, GameEvent::GameWon { .. })
    }
}

/// Opaque sound effect identifiers.
///
/// The engine never synthesizes audio; hosts map cues to whatever they play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Short click for a card flip.
    Pop,
    /// Bright chime for a match.
    Ding,
    /// Low buzz for a mismatch.
    Boop,
    /// Rising arpeggio for a win.
    Cheer,
}
