//! Selection policies.
//!
//! A policy picks the next card to flip. Policies only see what a human
//! player could: the public board (face-up symbols) and the event stream.
//! They never read the symbol of a face-down card.

use rustc_hash::FxHashMap;

use crate::core::{CardId, GameRng, GameState, Symbol};
use crate::events::GameEvent;

/// Chooses which card to select next.
pub trait SelectionPolicy {
    /// Pick a card, or `None` if nothing can be selected right now.
    fn choose(&mut self, state: &GameState, rng: &mut GameRng) -> Option<CardId>;

    /// Learn from an event. Default: ignore it.
    fn observe(&mut self, _event: &GameEvent) {}

    /// Forget everything before a new deal.
    fn reset(&mut self) {}

    /// Short name for reports.
    fn name(&self) -> &'static str;
}

/// Picks uniformly among selectable cards. Remembers nothing.
#[derive(Clone, Debug, Default)]
pub struct RandomPolicy;

impl SelectionPolicy for RandomPolicy {
    fn choose(&mut self, state: &GameState, rng: &mut GameRng) -> Option<CardId> {
        rng.choose(&state.selectable_cards()).copied()
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Remembers every symbol it has seen.
///
/// Strategy, in order:
/// 1. With nothing selected, open a known pair if one is face down.
/// 2. With one card selected, pick its known partner if there is one.
/// 3. Otherwise explore a card whose symbol has never been seen.
///
/// Each mismatch reveals two unseen cards, and the last two unseen cards
/// always match, so a game of `N` pairs takes at most `2N - 1` moves.
#[derive(Clone, Debug, Default)]
pub struct PerfectMemoryPolicy {
    seen: FxHashMap<CardId, Symbol>,
}

impl PerfectMemoryPolicy {
    /// Create a policy with empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cards whose symbol is remembered.
    #[must_use]
    pub fn remembered(&self) -> usize {
        self.seen.len()
    }

    fn remembered_symbol(&self, card: CardId) -> Option<&Symbol> {
        self.seen.get(&card)
    }
}

impl SelectionPolicy for PerfectMemoryPolicy {
    fn choose(&mut self, state: &GameState, rng: &mut GameRng) -> Option<CardId> {
        let selectable = state.selectable_cards();
        if selectable.is_empty() {
            return None;
        }

        let known: Vec<(CardId, &Symbol)> = selectable
            .iter()
            .filter_map(|&id| self.remembered_symbol(id).map(|s| (id, s)))
            .collect();

        match state.selected() {
            [] => {
                for (i, &(id, symbol)) in known.iter().enumerate() {
                    if known[i + 1..].iter().any(|&(_, other)| other == symbol) {
                        return Some(id);
                    }
                }
            }
            [first] => {
                let target = state.card(*first).and_then(|c| c.visible_symbol());
                if let Some(&(id, _)) = known.iter().find(|&&(_, s)| Some(s) == target) {
                    return Some(id);
                }
            }
            _ => return None,
        }

        let unseen: Vec<CardId> = selectable
            .iter()
            .copied()
            .filter(|id| !self.seen.contains_key(id))
            .collect();
        rng.choose(&unseen)
            .or_else(|| rng.choose(&selectable))
            .copied()
    }

    fn observe(&mut self, event: &GameEvent) {
        match event {
            GameEvent::GameStarted { .. } => self.reset(),
            GameEvent::CardFlipped { card, symbol } => {
                self.seen.insert(*card, symbol.clone());
            }
            _ => {}
        }
    }

    fn reset(&mut self) {
        self.seen.clear();
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
