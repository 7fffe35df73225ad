//! Board state and the pair-matching rules.
//!
//! ## Lifecycle
//!
//! Per card: `Hidden → Revealed → { Matched (terminal) | Hidden (mismatch) }`.
//!
//! Per game: `Idle → Playing → Resolving → Playing … → Won (terminal)`.
//!
//! ## Two-step pairs
//!
//! Selecting the second card of a pair does **not** apply the outcome. It
//! locks the board and returns a [`PendingPair`]; the host applies it later
//! with [`GameState::resolve_pending`], typically after a short delay so the
//! flip can be seen. While locked, every selection is ignored.
//!
//! ```
//! use pair_match::core::{GameRng, GameState, Selection, Symbol};
//!
//! let mut rng = GameRng::new(1);
//! let mut state = GameState::new_game(&[Symbol::new("A")], &mut rng).unwrap();
//!
//! let ids: Vec<_> = state.cards().iter().map(|c| c.id).collect();
//! assert!(matches!(state.select_card(ids[0]), Selection::Flipped(_)));
//! assert!(matches!(state.select_card(ids[1]), Selection::PairPending(_)));
//! assert!(state.is_locked());
//!
//! state.resolve_pending();
//! assert!(state.is_won());
//! assert_eq!(state.move_count(), 1);
//! ```

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, CardId, Symbol};
use super::config::validate_symbols;
use super::error::{ConfigError, InvariantError};
use super::record::{MoveRecord, PairOutcome, PendingPair};
use super::rng::GameRng;

/// Game-level phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Freshly dealt; nothing selected yet.
    #[default]
    Idle,
    /// Accepting selections.
    Playing,
    /// A pair is waiting to resolve; selections are locked out.
    Resolving,
    /// Every card is matched.
    Won,
}

/// Why a selection had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// A pair is still resolving.
    Locked,
    /// The game is already won.
    GameOver,
    /// No card has that ID.
    UnknownCard,
    /// The card is already face up or matched.
    AlreadyFaceUp,
}

/// Result of [`GameState::select_card`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selection {
    /// Nothing changed.
    Ignored(IgnoreReason),
    /// The card was flipped as the first of a pair.
    Flipped(CardId),
    /// The card completed a pair; the board is locked until it resolves.
    PairPending(PendingPair),
}

impl Selection {
    /// Did the selection change the board?
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Selection::Ignored(_))
    }
}

/// Outcome of [`GameState::resolve_pending`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    /// The pair that was resolved.
    pub pair: PendingPair,
    /// Did this resolution win the game?
    pub won: bool,
}

/// State of one pairs-matching game.
///
/// Mutated in place by [`select_card`](Self::select_card) and
/// [`resolve_pending`](Self::resolve_pending). Cloning is cheap: the move
/// history is a persistent `im::Vector`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Cards in board order.
    cards: Vec<Card>,

    /// Card ID → position in `cards`.
    index: FxHashMap<CardId, usize>,

    /// Cards selected in the current pair (at most 2).
    selected: SmallVec<[CardId; 2]>,

    /// Game-level phase.
    phase: GamePhase,

    /// Pair waiting to resolve. `Some` exactly while `phase == Resolving`.
    pending: Option<PendingPair>,

    /// Completed pair-selections, match or not.
    move_count: u32,

    /// Every completed pair in order.
    history: Vector<MoveRecord>,
}

impl GameState {
    /// Deal a new game: two cards per symbol, uniformly shuffled.
    ///
    /// The symbol at index `i` gets cards `2i` and `2i + 1`.
    pub fn new_game(symbols: &[Symbol], rng: &mut GameRng) -> Result<Self, ConfigError> {
        validate_symbols(symbols)?;
        Ok(Self::deal(symbols, rng))
    }

    /// Deal from a symbol set that has already been validated.
    pub(crate) fn deal(symbols: &[Symbol], rng: &mut GameRng) -> Self {
        let mut cards = Vec::with_capacity(symbols.len() * 2);
        for (i, symbol) in symbols.iter().enumerate() {
            let (a, b) = CardId::pair_for(i);
            cards.push(Card::new(a, symbol.clone()));
            cards.push(Card::new(b, symbol.clone()));
        }
        rng.shuffle(&mut cards);

        tracing::debug!(pairs = symbols.len(), seed = rng.seed(), "dealt new game");
        Self::from_validated(cards)
    }

    /// Build a game from a prepared deck, keeping its order.
    ///
    /// Every card must be face down, IDs must be unique, and each symbol
    /// must appear exactly twice.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, ConfigError> {
        if cards.is_empty() {
            return Err(ConfigError::EmptySymbolSet);
        }

        let mut ids = FxHashSet::default();
        let mut symbol_counts: FxHashMap<&Symbol, usize> = FxHashMap::default();
        for card in &cards {
            if !ids.insert(card.id) {
                return Err(ConfigError::DuplicateCardId(card.id));
            }
            if card.is_face_up() {
                return Err(ConfigError::CardNotHidden(card.id));
            }
            *symbol_counts.entry(&card.symbol).or_insert(0) += 1;
        }

        // Report the first offending symbol in deck order.
        for card in &cards {
            let count = symbol_counts[&card.symbol];
            if count != 2 {
                return Err(ConfigError::UnpairedSymbol {
                    symbol: card.symbol.clone(),
                    count,
                });
            }
        }

        Ok(Self::from_validated(cards))
    }

    fn from_validated(cards: Vec<Card>) -> Self {
        let index = cards.iter().enumerate().map(|(i, c)| (c.id, i)).collect();
        Self {
            cards,
            index,
            selected: SmallVec::new(),
            phase: GamePhase::Idle,
            pending: None,
            move_count: 0,
            history: Vector::new(),
        }
    }

    // === Rules ===

    /// Flip a card.
    ///
    /// Ignored (with a reason) while locked, after the game is won, for an
    /// unknown ID, or for a card that is already face up. Completing a pair
    /// counts a move and locks the board until [`resolve_pending`](Self::resolve_pending).
    pub fn select_card(&mut self, card_id: CardId) -> Selection {
        match self.phase {
            GamePhase::Resolving => return Selection::Ignored(IgnoreReason::Locked),
            GamePhase::Won => return Selection::Ignored(IgnoreReason::GameOver),
            GamePhase::Idle | GamePhase::Playing => {}
        }

        let Some(&pos) = self.index.get(&card_id) else {
            return Selection::Ignored(IgnoreReason::UnknownCard);
        };
        if self.cards[pos].is_face_up() {
            return Selection::Ignored(IgnoreReason::AlreadyFaceUp);
        }

        self.cards[pos].flipped = true;
        self.selected.push(card_id);
        self.phase = GamePhase::Playing;

        if self.selected.len() < 2 {
            tracing::debug!(card = %card_id, "card flipped");
            return Selection::Flipped(card_id);
        }

        let pair = PendingPair {
            first: self.selected[0],
            second: self.selected[1],
            outcome: self.compare(self.selected[0], self.selected[1]),
        };
        self.move_count += 1;
        self.history.push_back(MoveRecord::new(self.move_count, pair));
        self.pending = Some(pair);
        self.phase = GamePhase::Resolving;

        tracing::debug!(
            first = %pair.first,
            second = %pair.second,
            outcome = ?pair.outcome,
            moves = self.move_count,
            "pair completed"
        );
        Selection::PairPending(pair)
    }

    /// Apply the pending pair's outcome and unlock the board.
    ///
    /// A match leaves both cards matched (and may win the game); a mismatch
    /// hides both again. Returns `None` if nothing is pending.
    pub fn resolve_pending(&mut self) -> Option<Resolution> {
        let pair = self.pending.take()?;
        self.selected.clear();

        match pair.outcome {
            PairOutcome::Match if pair.first != pair.second => {
                self.set_card(pair.first, |c| c.matched = true);
                self.set_card(pair.second, |c| c.matched = true);
            }
            PairOutcome::Match => {
                // A card cannot pair with itself.
                tracing::warn!(card = %pair.first, "pending pair names one card twice; hiding it");
                self.set_card(pair.first, |c| c.flipped = false);
            }
            PairOutcome::Mismatch => {
                self.set_card(pair.first, |c| c.flipped = false);
                self.set_card(pair.second, |c| c.flipped = false);
            }
        }

        let won = self.cards.iter().all(|c| c.matched);
        self.phase = if won { GamePhase::Won } else { GamePhase::Playing };

        tracing::debug!(first = %pair.first, second = %pair.second, won, "pair resolved");
        Some(Resolution { pair, won })
    }

    fn compare(&self, first: CardId, second: CardId) -> PairOutcome {
        if first == second {
            return PairOutcome::Mismatch;
        }
        match (self.card(first), self.card(second)) {
            (Some(a), Some(b)) if a.symbol == b.symbol => PairOutcome::Match,
            _ => PairOutcome::Mismatch,
        }
    }

    fn set_card(&mut self, card_id: CardId, update: impl FnOnce(&mut Card)) {
        if let Some(&pos) = self.index.get(&card_id) {
            update(&mut self.cards[pos]);
        }
    }

    // === Accessors ===

    /// Cards in board order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Look up a card by ID.
    #[must_use]
    pub fn card(&self, card_id: CardId) -> Option<&Card> {
        self.index.get(&card_id).map(|&pos| &self.cards[pos])
    }

    /// Cards selected in the current pair.
    #[must_use]
    pub fn selected(&self) -> &[CardId] {
        &self.selected
    }

    /// The pair waiting to resolve, if any.
    #[must_use]
    pub fn pending(&self) -> Option<PendingPair> {
        self.pending
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Is the board locked while a pair resolves?
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.phase == GamePhase::Resolving
    }

    /// Is every card matched?
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.phase == GamePhase::Won
    }

    /// Number of completed pair-selections.
    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Number of pairs on the board.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    /// Number of pairs already matched.
    #[must_use]
    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.matched).count() / 2
    }

    /// Number of pairs still to find.
    #[must_use]
    pub fn remaining_pairs(&self) -> usize {
        self.pair_count() - self.matched_pairs()
    }

    /// IDs a selection would currently be accepted for, in board order.
    #[must_use]
    pub fn selectable_cards(&self) -> Vec<CardId> {
        if matches!(self.phase, GamePhase::Resolving | GamePhase::Won) {
            return Vec::new();
        }
        self.cards
            .iter()
            .filter(|c| c.is_selectable())
            .map(|c| c.id)
            .collect()
    }

    /// Every completed pair in order.
    #[must_use]
    pub fn history(&self) -> &Vector<MoveRecord> {
        &self.history
    }

    /// Check the board invariants.
    ///
    /// Always holds for states built through this API; useful after
    /// decoding a snapshot from elsewhere.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.cards.len()
            || self.cards.iter().enumerate().any(|(i, c)| self.index.get(&c.id) != Some(&i))
        {
            return Err(InvariantError::IndexMismatch);
        }

        let mut symbol_counts: FxHashMap<&Symbol, usize> = FxHashMap::default();
        for card in &self.cards {
            *symbol_counts.entry(&card.symbol).or_insert(0) += 1;
            if card.matched && !card.flipped {
                return Err(InvariantError::MatchedFaceDown(card.id));
            }
        }
        if let Some((symbol, &count)) = symbol_counts.iter().find(|&(_, &n)| n != 2) {
            return Err(InvariantError::UnpairedSymbol { symbol: (*symbol).clone(), count });
        }

        if self.selected.len() > 2 {
            return Err(InvariantError::TooManySelected(self.selected.len()));
        }
        for &id in &self.selected {
            if !self.card(id).is_some_and(|c| c.flipped && !c.matched) {
                return Err(InvariantError::SelectionNotRevealed(id));
            }
        }

        if self.pending.is_some() != (self.phase == GamePhase::Resolving) {
            return Err(InvariantError::PendingPhaseMismatch);
        }
        match self.pending {
            Some(pair) if self.selected.as_slice() != [pair.first, pair.second] => {
                return Err(InvariantError::PendingNotSelected);
            }
            None if self.selected.len() > 1 => {
                return Err(InvariantError::TooManySelected(self.selected.len()));
            }
            _ => {}
        }

        if (self.phase == GamePhase::Won) != self.cards.iter().all(|c| c.matched) {
            return Err(InvariantError::WonMismatch);
        }
        if self.history.len() != self.move_count as usize {
            return Err(InvariantError::HistoryMismatch {
                history: self.history.len(),
                moves: self.move_count,
            });
        }

        Ok(())
    }
}
