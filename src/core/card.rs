//! Cards and symbols.
//!
//! A deck holds exactly two cards per [`Symbol`]. Each [`Card`] carries its
//! own face state; the engine never re-hides a matched card.
//!
//! ## ID Layout
//!
//! Cards are numbered by the position of their symbol in the symbol set:
//! the symbol at index `i` owns cards `2i` and `2i + 1`. IDs are assigned
//! before shuffling, so they are stable for the lifetime of a deal.
//!
//! ```
//! use pair_match::core::CardId;
//!
//! let (a, b) = CardId::pair_for(2);
//! assert_eq!(a, CardId::new(4));
//! assert_eq!(b, CardId::new(5));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card within one deal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Both card IDs dealt for the symbol at `symbol_index`.
    #[must_use]
    pub const fn pair_for(symbol_index: usize) -> (Self, Self) {
        let base = (symbol_index as u32) * 2;
        (Self(base), Self(base + 1))
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Opaque face symbol. The engine only compares symbols for equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// The symbol's text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The six suit and shape symbols of the default deck.
    #[must_use]
    pub fn default_set() -> Vec<Symbol> {
        ["♠", "♥", "♦", "♣", "★", "●"]
            .into_iter()
            .map(Symbol::new)
            .collect()
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a player can currently see of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardFace {
    /// Face down.
    Hidden,
    /// Face up, waiting for its pair to resolve.
    Revealed,
    /// Face up for good.
    Matched,
}

/// A card on the board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Unique ID within the deal.
    pub id: CardId,

    /// Face symbol, shared with exactly one other card.
    pub symbol: Symbol,

    /// Is this card face up?
    pub flipped: bool,

    /// Has this card been matched with its partner?
    pub matched: bool,
}

impl Card {
    /// Create a hidden, unmatched card.
    #[must_use]
    pub fn new(id: CardId, symbol: Symbol) -> Self {
        Self {
            id,
            symbol,
            flipped: false,
            matched: false,
        }
    }

    /// Current face state.
    #[must_use]
    pub fn face(&self) -> CardFace {
        if self.matched {
            CardFace::Matched
        } else if self.flipped {
            CardFace::Revealed
        } else {
            CardFace::Hidden
        }
    }

    /// Is this card face up, either revealed or matched?
    #[must_use]
    pub fn is_face_up(&self) -> bool {
        self.flipped || self.matched
    }

    /// Can this card be selected (face down and unmatched)?
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self.is_face_up()
    }

    /// The symbol, but only if a player could see it right now.
    #[must_use]
    pub fn visible_symbol(&self) -> Option<&Symbol> {
        self.is_face_up().then_some(&self.symbol)
    }
}
