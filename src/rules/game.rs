//! The matching game controller.
//!
//! `MatchingGame` owns the board, the deal RNG, the timer queue, and the
//! event outlets. Hosts drive it with three calls:
//!
//! - [`select`](MatchingGame::select) when the player taps a card
//! - [`advance`](MatchingGame::advance) with elapsed time, to let pending
//!   pairs resolve
//! - [`restart`](MatchingGame::restart) to deal again
//!
//! ## Example
//!
//! ```
//! use pair_match::core::{GameConfig, Selection};
//! use pair_match::rules::MatchingGame;
//! use pair_match::schedule::Millis;
//!
//! let config = GameConfig::default().with_symbols(["A"]);
//! let mut game = MatchingGame::new(config).unwrap();
//!
//! let ids: Vec<_> = game.state().cards().iter().map(|c| c.id).collect();
//! game.select(ids[0]);
//! assert!(matches!(game.select(ids[1]), Selection::PairPending(_)));
//!
//! // Match delay is 600ms by default.
//! game.advance(Millis(599));
//! assert!(!game.is_won());
//! game.advance(Millis(1));
//! assert!(game.is_won());
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{
    CardId, ConfigError, GameConfig, GameRng, GameRngState, GameState, PairOutcome, PendingPair,
    Resolution, Selection, SnapshotError,
};
use crate::events::{EventLog, GameEvent, GameObserver};
use crate::schedule::{Millis, ScheduledTransition, TimerId, TimerQueue, Transition};

/// Serialized form of a game in progress.
#[derive(Serialize, Deserialize)]
struct GameSnapshot {
    config: GameConfig,
    rng: GameRngState,
    state: GameState,
    timers: TimerQueue,
    resolve_timer: Option<TimerId>,
}

/// A pairs-matching game with scheduled resolution.
pub struct MatchingGame {
    config: GameConfig,

    /// Stream used for every deal.
    rng: GameRng,

    state: GameState,

    timers: TimerQueue,

    /// The pending pair's resolution, if scheduled.
    resolve_timer: Option<TimerId>,

    /// Events not yet drained by the host.
    log: EventLog,

    observers: Vec<Box<dyn GameObserver>>,
}

impl MatchingGame {
    /// Validate `config` and deal the first game.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = GameRng::new(config.seed).for_context("deal");
        let state = GameState::deal(&config.symbols, &mut rng);
        Ok(Self::assemble(config, rng, state))
    }

    /// Start from a prepared board instead of a random deal.
    ///
    /// `config.symbols` only matters for later restarts. A board taken
    /// mid-pair gets its resolution scheduled from the current clock.
    pub fn with_state(config: GameConfig, state: GameState) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = GameRng::new(config.seed).for_context("deal");
        Ok(Self::assemble(config, rng, state))
    }

    fn assemble(config: GameConfig, rng: GameRng, state: GameState) -> Self {
        let mut game = Self {
            config,
            rng,
            state,
            timers: TimerQueue::new(),
            resolve_timer: None,
            log: EventLog::new(),
            observers: Vec::new(),
        };
        game.announce_start();
        if let Some(pair) = game.state.pending() {
            game.schedule_resolution(pair);
        }
        game
    }

    /// Register an observer for every future event.
    pub fn subscribe(&mut self, observer: impl GameObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // === Play ===

    /// Flip a card.
    ///
    /// Completing a pair schedules its resolution after the configured
    /// match or mismatch delay. Ignored selections emit nothing.
    pub fn select(&mut self, card_id: CardId) -> Selection {
        let selection = self.state.select_card(card_id);

        match selection {
            Selection::Ignored(reason) => {
                tracing::trace!(card = %card_id, ?reason, "selection ignored");
            }
            Selection::Flipped(card) => self.announce_flip(card),
            Selection::PairPending(pair) => {
                self.announce_flip(pair.second);

                let event = match pair.outcome {
                    PairOutcome::Match => {
                        GameEvent::PairMatched { first: pair.first, second: pair.second }
                    }
                    PairOutcome::Mismatch => {
                        GameEvent::PairMismatched { first: pair.first, second: pair.second }
                    }
                };
                self.emit(event);
                self.schedule_resolution(pair);
            }
        }

        selection
    }

    /// Move the clock forward by `elapsed`, firing every transition that
    /// comes due. Returns how many fired.
    pub fn advance(&mut self, elapsed: Millis) -> usize {
        let deadline = self.timers.now() + elapsed;
        self.advance_to(deadline)
    }

    /// Move the clock forward to `time`, firing every transition due by then.
    ///
    /// Transitions fire one at a time at their own due time, so a win
    /// celebration scheduled by the final resolution is timed from it.
    pub fn advance_to(&mut self, time: Millis) -> usize {
        let mut fired = 0;
        while let Some(entry) = self.timers.pop_due(time) {
            self.apply(entry);
            fired += 1;
        }
        self.timers.advance_clock_to(time);
        fired
    }

    /// Fire one scheduled transition now, regardless of its due time.
    ///
    /// For hosts that run their own timers. Returns false if the timer was
    /// cancelled, already fired, or belongs to a previous deal.
    pub fn fire(&mut self, timer: TimerId) -> bool {
        match self.timers.take(timer) {
            Some(entry) => {
                self.apply(entry);
                true
            }
            None => false,
        }
    }

    /// Resolve the pending pair immediately, skipping its delay.
    pub fn resolve_now(&mut self) -> Option<Resolution> {
        if let Some(timer) = self.resolve_timer.take() {
            self.timers.cancel(timer);
        }
        self.resolve()
    }

    /// Deal a fresh game from the same RNG stream.
    ///
    /// Any pending resolution or celebration is cancelled first, so nothing
    /// scheduled for the old board can touch the new one.
    pub fn restart(&mut self) {
        self.timers.cancel_all();
        self.resolve_timer = None;
        self.state = GameState::deal(&self.config.symbols, &mut self.rng);
        self.announce_start();
    }

    fn schedule_resolution(&mut self, pair: PendingPair) {
        let delay_ms = match pair.outcome {
            PairOutcome::Match => self.config.timing.match_delay_ms,
            PairOutcome::Mismatch => self.config.timing.mismatch_delay_ms,
        };
        let timer = self.timers.schedule(Millis(delay_ms), Transition::ResolvePair);
        self.resolve_timer = Some(timer);
    }

    fn apply(&mut self, entry: ScheduledTransition) {
        match entry.transition {
            Transition::ResolvePair => {
                if self.resolve_timer == Some(entry.id) {
                    self.resolve_timer = None;
                }
                self.resolve();
            }
            Transition::Celebrate => {
                let moves = self.state.move_count();
                self.emit(GameEvent::Celebration { moves });
            }
        }
    }

    fn resolve(&mut self) -> Option<Resolution> {
        let resolution = self.state.resolve_pending()?;
        let (first, second) = (resolution.pair.first, resolution.pair.second);

        if resolution.pair.outcome.is_match() && first != second {
            self.emit(GameEvent::PairResolved { first, second });
        } else {
            self.emit(GameEvent::PairHidden { first, second });
        }

        if resolution.won {
            let moves = self.state.move_count();
            tracing::info!(moves, "game won");
            self.emit(GameEvent::GameWon { moves });
            self.timers.schedule(
                Millis(self.config.timing.celebration_delay_ms),
                Transition::Celebrate,
            );
        }

        Some(resolution)
    }

    // === Events ===

    fn announce_start(&mut self) {
        let pairs = self.state.pair_count();
        tracing::info!(pairs, "game started");
        self.emit(GameEvent::GameStarted { pairs });
    }

    fn announce_flip(&mut self, card: CardId) {
        if let Some(symbol) = self.state.card(card).map(|c| c.symbol.clone()) {
            self.emit(GameEvent::CardFlipped { card, symbol });
        }
    }

    fn emit(&mut self, event: GameEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
        self.log.push(event);
    }

    /// Events emitted since the last drain.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        self.log.events()
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.log.drain()
    }

    // === Accessors ===

    /// Current board.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current virtual clock time.
    #[must_use]
    pub fn now(&self) -> Millis {
        self.timers.now()
    }

    /// Scheduled transitions in firing order.
    #[must_use]
    pub fn pending_timers(&self) -> Vec<ScheduledTransition> {
        self.timers.pending()
    }

    /// Is every card matched?
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.state.is_won()
    }

    /// Completed pair-selections so far.
    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.state.move_count()
    }

    // === Snapshots ===

    /// Encode the game (board, RNG, clock, pending timers) with bincode.
    ///
    /// Observers and undrained events are not included.
    pub fn snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        let snapshot = GameSnapshot {
            config: self.config.clone(),
            rng: self.rng.state(),
            state: self.state.clone(),
            timers: self.timers.clone(),
            resolve_timer: self.resolve_timer,
        };
        Ok(bincode::serialize(&snapshot)?)
    }

    /// Rebuild a game from [`snapshot`](Self::snapshot) bytes.
    pub fn restore(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: GameSnapshot = bincode::deserialize(bytes)?;

        snapshot.config.validate()?;
        snapshot.state.check_invariants()?;
        if snapshot.state.is_locked() {
            let scheduled = snapshot.timers.pending().iter().any(|entry| {
                Some(entry.id) == snapshot.resolve_timer
                    && entry.transition == Transition::ResolvePair
            });
            if !scheduled {
                return Err(SnapshotError::UnscheduledResolution);
            }
        }

        Ok(Self {
            config: snapshot.config,
            rng: GameRng::from_state(&snapshot.rng),
            state: snapshot.state,
            timers: snapshot.timers,
            resolve_timer: snapshot.resolve_timer,
            log: EventLog::new(),
            observers: Vec::new(),
        })
    }
}

impl std::fmt::Debug for MatchingGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingGame")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("timers", &self.timers)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, Symbol, TimingConfig};
    use crate::events::SoundCue;

    /// Deck [A1, B1, A2, B2] with A = cards 0/1, B = cards 2/3.
    fn fixed_ab() -> MatchingGame {
        let state = GameState::from_cards(vec![
            Card::new(CardId(0), Symbol::new("A")),
            Card::new(CardId(2), Symbol::new("B")),
            Card::new(CardId(1), Symbol::new("A")),
            Card::new(CardId(3), Symbol::new("B")),
        ])
        .unwrap();
        let config = GameConfig::default().with_symbols(["A", "B"]);
        MatchingGame::with_state(config, state).unwrap()
    }

    #[test]
    fn test_new_game_announces_start() {
        let mut game = MatchingGame::new(GameConfig::default()).unwrap();
        assert_eq!(game.drain_events(), vec![GameEvent::GameStarted { pairs: 6 }]);
        assert_eq!(game.state().cards().len(), 12);
        assert_eq!(game.now(), Millis::ZERO);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GameConfig::default().with_symbols(["A", "A"]);
        assert!(matches!(
            MatchingGame::new(config),
            Err(ConfigError::DuplicateSymbol(_))
        ));
    }

    #[test]
    fn test_same_seed_same_deal() {
        let a = MatchingGame::new(GameConfig::default().with_seed(5)).unwrap();
        let b = MatchingGame::new(GameConfig::default().with_seed(5)).unwrap();
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_match_resolves_after_match_delay() {
        let mut game = fixed_ab();
        game.drain_events();

        game.select(CardId(0));
        game.select(CardId(1));
        assert!(game.state().is_locked());
        assert_eq!(game.pending_timers()[0].due, Millis(600));

        assert_eq!(game.advance(Millis(599)), 0);
        assert!(game.state().is_locked());

        assert_eq!(game.advance(Millis(1)), 1);
        assert!(!game.state().is_locked());
        assert!(game.state().card(CardId(0)).unwrap().matched);
    }

    #[test]
    fn test_mismatch_hides_after_mismatch_delay() {
        let mut game = fixed_ab();

        game.select(CardId(0));
        game.select(CardId(2));
        game.advance(Millis(999));
        assert!(game.state().card(CardId(0)).unwrap().flipped);

        game.advance(Millis(1));
        assert!(!game.state().card(CardId(0)).unwrap().flipped);
        assert!(!game.state().card(CardId(2)).unwrap().flipped);
        assert!(!game.state().is_locked());
    }

    #[test]
    fn test_locked_during_delay() {
        let mut game = fixed_ab();

        game.select(CardId(0));
        game.select(CardId(2));
        game.drain_events();

        assert_eq!(
            game.select(CardId(1)),
            Selection::Ignored(crate::core::IgnoreReason::Locked)
        );
        assert!(game.events().is_empty());
    }

    #[test]
    fn test_event_order_for_full_game() {
        let mut game = fixed_ab();
        game.drain_events();

        game.select(CardId(0));
        game.select(CardId(1));
        game.advance(Millis(600));
        game.select(CardId(2));
        game.select(CardId(3));
        game.advance(Millis(600));
        assert!(game.is_won());
        game.advance(Millis(500));

        let events = game.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::CardFlipped { card: CardId(0), symbol: Symbol::new("A") },
                GameEvent::CardFlipped { card: CardId(1), symbol: Symbol::new("A") },
                GameEvent::PairMatched { first: CardId(0), second: CardId(1) },
                GameEvent::PairResolved { first: CardId(0), second: CardId(1) },
                GameEvent::CardFlipped { card: CardId(2), symbol: Symbol::new("B") },
                GameEvent::CardFlipped { card: CardId(3), symbol: Symbol::new("B") },
                GameEvent::PairMatched { first: CardId(2), second: CardId(3) },
                GameEvent::PairResolved { first: CardId(2), second: CardId(3) },
                GameEvent::GameWon { moves: 2 },
                GameEvent::Celebration { moves: 2 },
            ]
        );

        let cues: Vec<_> = events.iter().filter_map(GameEvent::cue).collect();
        assert_eq!(
            cues,
            vec![
                SoundCue::Pop,
                SoundCue::Pop,
                SoundCue::Ding,
                SoundCue::Pop,
                SoundCue::Pop,
                SoundCue::Ding,
                SoundCue::Cheer,
            ]
        );
    }

    #[test]
    fn test_celebration_timed_from_final_resolution() {
        let mut game = fixed_ab();

        game.select(CardId(0));
        game.select(CardId(1));
        game.advance(Millis(600));
        game.select(CardId(2));
        game.select(CardId(3));
        game.drain_events();

        // One big step: resolution at 1200, celebration at 1700.
        assert_eq!(game.advance(Millis(1099)), 1);
        assert!(game.is_won());
        assert!(!game.events().contains(&GameEvent::Celebration { moves: 2 }));

        assert_eq!(game.advance(Millis(1)), 1);
        assert!(game.events().contains(&GameEvent::Celebration { moves: 2 }));
        assert_eq!(game.now(), Millis(1700));
    }

    #[test]
    fn test_restart_cancels_pending_resolution() {
        let mut game = fixed_ab();

        game.select(CardId(0));
        game.select(CardId(1));
        let stale = game.pending_timers()[0].id;

        game.restart();
        game.drain_events();
        assert!(game.pending_timers().is_empty());
        assert!(!game.state().is_locked());
        assert_eq!(game.move_count(), 0);

        assert!(!game.fire(stale));
        assert_eq!(game.advance(Millis(5000)), 0);
        assert!(game.state().cards().iter().all(|c| !c.flipped && !c.matched));
        assert!(game.events().is_empty());
    }

    #[test]
    fn test_restart_deals_from_config_symbols() {
        let mut game = fixed_ab();
        game.restart();
        assert_eq!(game.state().cards().len(), 4);
        assert_eq!(game.drain_events().last(), Some(&GameEvent::GameStarted { pairs: 2 }));
    }

    #[test]
    fn test_fire_runs_host_timer() {
        let mut game = fixed_ab();

        game.select(CardId(0));
        game.select(CardId(2));
        let timer = game.pending_timers()[0].id;

        assert!(game.fire(timer));
        assert!(!game.state().is_locked());
        assert!(!game.fire(timer));
    }

    #[test]
    fn test_resolve_now_skips_delay() {
        let mut game = fixed_ab();

        game.select(CardId(0));
        game.select(CardId(1));
        let resolution = game.resolve_now().unwrap();

        assert!(resolution.pair.outcome.is_match());
        assert!(game.pending_timers().is_empty());
        assert_eq!(game.resolve_now(), None);
    }

    #[test]
    fn test_instant_timing() {
        let config = GameConfig::default()
            .with_symbols(["A"])
            .with_timing(TimingConfig::instant());
        let mut game = MatchingGame::new(config).unwrap();

        game.select(CardId(0));
        game.select(CardId(1));
        assert!(!game.is_won());

        // Resolution and celebration both fire on a zero-length advance.
        assert_eq!(game.advance(Millis::ZERO), 2);
        assert!(game.is_won());
    }

    #[test]
    fn test_observer_sees_events() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let cues = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&cues);

        let mut game = fixed_ab();
        game.subscribe(move |event: &GameEvent| {
            if let Some(cue) = event.cue() {
                sink.borrow_mut().push(cue);
            }
        });

        game.select(CardId(0));
        game.select(CardId(2));
        assert_eq!(*cues.borrow(), vec![SoundCue::Pop, SoundCue::Pop, SoundCue::Boop]);
    }

    #[test]
    fn test_snapshot_round_trip_mid_resolution() {
        let mut game = fixed_ab();
        game.select(CardId(0));
        game.select(CardId(2));
        game.advance(Millis(400));

        let bytes = game.snapshot().unwrap();
        let mut restored = MatchingGame::restore(&bytes).unwrap();

        assert_eq!(restored.state(), game.state());
        assert_eq!(restored.now(), Millis(400));
        assert!(restored.state().is_locked());

        restored.advance(Millis(600));
        assert!(!restored.state().is_locked());
        assert!(!restored.state().card(CardId(0)).unwrap().flipped);
    }

    #[test]
    fn test_with_state_mid_pair_schedules_resolution() {
        let mut source = fixed_ab();
        source.select(CardId(0));
        source.select(CardId(2));
        let locked = source.state().clone();

        let config = GameConfig::default().with_symbols(["A", "B"]);
        let mut game = MatchingGame::with_state(config, locked).unwrap();
        assert!(game.state().is_locked());
        let timers = game.pending_timers();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].transition, Transition::ResolvePair);
        assert_eq!(timers[0].due, Millis(1000));

        assert_eq!(game.advance(Millis(1000)), 1);
        assert!(!game.state().is_locked());
        assert_eq!(game.select(CardId(1)), Selection::Flipped(CardId(1)));
    }

    #[test]
    fn test_restore_rejects_dangling_resolve_timer() {
        let mut game = fixed_ab();
        game.select(CardId(0));
        game.select(CardId(1));

        let snapshot = GameSnapshot {
            config: game.config.clone(),
            rng: game.rng.state(),
            state: game.state.clone(),
            timers: TimerQueue::new(),
            resolve_timer: Some(TimerId(77)),
        };
        let bytes = bincode::serialize(&snapshot).unwrap();
        assert!(matches!(
            MatchingGame::restore(&bytes),
            Err(SnapshotError::UnscheduledResolution)
        ));

        // A live id pointing at the celebration does not count either.
        let mut timers = TimerQueue::new();
        let celebrate = timers.schedule(Millis(10), Transition::Celebrate);
        let snapshot = GameSnapshot { timers, resolve_timer: Some(celebrate), ..snapshot };
        let bytes = bincode::serialize(&snapshot).unwrap();
        assert!(matches!(
            MatchingGame::restore(&bytes),
            Err(SnapshotError::UnscheduledResolution)
        ));
    }

    #[test]
    fn test_restore_rejects_invalid_config() {
        let game = fixed_ab();
        let snapshot = GameSnapshot {
            config: GameConfig::default().with_symbols(Vec::<&str>::new()),
            rng: game.rng.state(),
            state: game.state.clone(),
            timers: TimerQueue::new(),
            resolve_timer: None,
        };
        let bytes = bincode::serialize(&snapshot).unwrap();
        assert!(matches!(
            MatchingGame::restore(&bytes),
            Err(SnapshotError::Config(ConfigError::EmptySymbolSet))
        ));
    }

    #[test]
    fn test_restore_rejects_garbage() {
        assert!(matches!(
            MatchingGame::restore(&[1, 2, 3]),
            Err(SnapshotError::Codec(_))
        ));
    }
}
