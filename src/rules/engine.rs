//! The dealing engine.
//!
//! [`GameEngine`] is the public engine surface that front-ends drive;
//! [`HalfDeckEngine`] is the implementation. The engine owns the deck, the
//! players and the dealing observers. It has no locking of its own: callers
//! serialize access, normally through the table worker.
//!
//! ## House round ordering
//!
//! `deal_house` settles every player against the house score while bets are
//! still intact, then emits `HouseResult`, and only then clears every bet.
//! Observers of the house result therefore see final points and the bets
//! that produced them.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, info};

use super::error::EngineError;
use super::hand::{Draw, HandOutcome, HandTally, Participant};
use super::settlement::settle;
use crate::cards::{Card, Deck};
use crate::core::config::{TableConfig, MAX_DEAL_DELAY_MS};
use crate::core::player::{Player, PlayerId};
use crate::core::rng::DeckRng;
use crate::events::{CallbackRegistry, DealEvent, DealingObserver, ObserverId};

/// Operations a front-end may invoke on a dealing engine.
pub trait GameEngine: Send {
    /// Add a player, replacing any stored player with the same id.
    fn add_player(&mut self, player: Player);

    /// Remove a player. Returns `false` if the id is unknown.
    fn remove_player(&mut self, id: &PlayerId) -> bool;

    fn player(&self, id: &PlayerId) -> Option<&Player>;

    /// All players in ascending id order.
    fn all_players(&self) -> Vec<&Player>;

    /// Place a bet. `Ok(false)` if the amount is zero or exceeds the player's
    /// points, in which case the previous bet stands.
    fn place_bet(&mut self, id: &PlayerId, bet: u32) -> Result<bool, EngineError>;

    fn clear_bet(&mut self, id: &PlayerId) -> Result<(), EngineError>;

    fn reset_result(&mut self, id: &PlayerId) -> Result<(), EngineError>;

    /// Deal one hand to a player and store its score as the player's result.
    fn deal_player(&mut self, id: &PlayerId, delay_ms: u64) -> Result<HandOutcome, EngineError>;

    /// Deal the house hand and settle the round.
    fn deal_house(&mut self, delay_ms: u64) -> Result<HandOutcome, EngineError>;

    /// Settle one player's bet against `house`. Does not clear the bet.
    fn apply_win_loss(&mut self, id: &PlayerId, house: u32) -> Result<(), EngineError>;

    fn add_observer(&mut self, observer: Arc<dyn DealingObserver>) -> ObserverId;

    fn remove_observer(&mut self, id: ObserverId) -> bool;

    /// The house score of the most recent house hand.
    fn house_result(&self) -> Option<u32>;

    /// A freshly shuffled, independent deck, for inspection only.
    fn shuffled_half_deck(&self) -> Vec<Card>;
}

/// The 28-card, bust-at-42 engine.
///
/// ```
/// use half_deck::{GameEngine, HalfDeckEngine, Player, PlayerId};
///
/// let mut engine = HalfDeckEngine::with_seed(7);
/// engine.add_player(Player::new("1", "The Shark", 1000));
///
/// let shark = PlayerId::new("1");
/// assert!(engine.place_bet(&shark, 100).unwrap());
/// let hand = engine.deal_player(&shark, 0).unwrap();
/// assert!(hand.score <= 42);
///
/// engine.deal_house(0).unwrap();
/// assert_eq!(engine.player(&shark).unwrap().bet(), 0);
/// ```
#[derive(Debug)]
pub struct HalfDeckEngine {
    players: BTreeMap<PlayerId, Player>,
    deck: Deck,
    observers: CallbackRegistry<dyn DealingObserver>,
    house_result: Option<u32>,
}

impl Default for HalfDeckEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HalfDeckEngine {
    /// Engine with an entropy-seeded deck.
    #[must_use]
    pub fn new() -> Self {
        Self::with_deck(Deck::shuffled(DeckRng::from_entropy()))
    }

    /// Engine whose first shuffle is reproducible.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_deck(Deck::shuffled(DeckRng::new(seed)))
    }

    #[must_use]
    pub fn from_config(config: &TableConfig) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    /// Engine dealing from `deck` as-is, without shuffling it first.
    #[must_use]
    pub fn with_deck(deck: Deck) -> Self {
        Self {
            players: BTreeMap::new(),
            deck,
            observers: CallbackRegistry::new(),
            house_result: None,
        }
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn check_delay(delay_ms: u64) -> Result<Duration, EngineError> {
        if delay_ms > MAX_DEAL_DELAY_MS {
            return Err(EngineError::InvalidDelay(delay_ms));
        }
        Ok(Duration::from_millis(delay_ms))
    }

    fn player_mut(&mut self, id: &PlayerId) -> Result<&mut Player, EngineError> {
        self.players
            .get_mut(id)
            .ok_or_else(|| EngineError::UnknownPlayer(id.clone()))
    }

    fn notify(&self, event: &DealEvent) {
        for observer in self.observers.snapshot() {
            observer.on_event(event, self);
        }
    }

    fn card_event(participant: &Participant, card: Card, bust: bool) -> DealEvent {
        match (participant, bust) {
            (Participant::Player(player), false) => DealEvent::NextCard { player: player.clone(), card },
            (Participant::Player(player), true) => DealEvent::BustCard { player: player.clone(), card },
            (Participant::House, false) => DealEvent::HouseNextCard { card },
            (Participant::House, true) => DealEvent::HouseBustCard { card },
        }
    }

    // Runs until the hand is Exact or Bust; sleeps only between counted cards.
    fn deal_hand(&mut self, participant: &Participant, delay: Duration) -> HandOutcome {
        let mut tally = HandTally::new();
        loop {
            let card = self.deck.deal_card();
            match tally.draw(card) {
                Draw::Counted => {
                    self.notify(&Self::card_event(participant, card, false));
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                }
                Draw::Exact => {
                    self.notify(&Self::card_event(participant, card, false));
                    break;
                }
                Draw::Bust => {
                    self.notify(&Self::card_event(participant, card, true));
                    break;
                }
            }
        }
        tally.finish()
    }
}

impl GameEngine for HalfDeckEngine {
    fn add_player(&mut self, player: Player) {
        debug!("Adding player {} ({})", player.id(), player.name());
        self.players.insert(player.id().clone(), player);
    }

    fn remove_player(&mut self, id: &PlayerId) -> bool {
        let removed = self.players.remove(id).is_some();
        if removed {
            debug!("Removed player {id}");
        }
        removed
    }

    fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    fn all_players(&self) -> Vec<&Player> {
        self.players.values().collect()
    }

    fn place_bet(&mut self, id: &PlayerId, bet: u32) -> Result<bool, EngineError> {
        Ok(self.player_mut(id)?.place_bet(bet))
    }

    fn clear_bet(&mut self, id: &PlayerId) -> Result<(), EngineError> {
        self.player_mut(id)?.reset_bet();
        Ok(())
    }

    fn reset_result(&mut self, id: &PlayerId) -> Result<(), EngineError> {
        self.player_mut(id)?.set_result(0);
        Ok(())
    }

    fn deal_player(&mut self, id: &PlayerId, delay_ms: u64) -> Result<HandOutcome, EngineError> {
        let delay = Self::check_delay(delay_ms)?;
        if !self.players.contains_key(id) {
            return Err(EngineError::UnknownPlayer(id.clone()));
        }

        let outcome = self.deal_hand(&Participant::Player(id.clone()), delay);
        self.notify(&DealEvent::Result {
            player: id.clone(),
            score: outcome.score,
        });
        // Observers may not remove players, so the player is still present.
        self.player_mut(id)?.set_result(outcome.score);
        Ok(outcome)
    }

    fn deal_house(&mut self, delay_ms: u64) -> Result<HandOutcome, EngineError> {
        let delay = Self::check_delay(delay_ms)?;

        let outcome = self.deal_hand(&Participant::House, delay);
        let score = outcome.score;

        let ids: Vec<PlayerId> = self.players.keys().cloned().collect();
        for id in &ids {
            self.apply_win_loss(id, score)?;
        }

        self.notify(&DealEvent::HouseResult { score });
        self.house_result = Some(score);

        for player in self.players.values_mut() {
            player.reset_bet();
        }
        info!("House round settled at {score} for {} player(s)", ids.len());
        Ok(outcome)
    }

    fn apply_win_loss(&mut self, id: &PlayerId, house: u32) -> Result<(), EngineError> {
        let player = self.player_mut(id)?;
        let points = settle(player.result(), player.bet(), player.points(), house);
        player.set_points(points);
        Ok(())
    }

    fn add_observer(&mut self, observer: Arc<dyn DealingObserver>) -> ObserverId {
        self.observers.register(observer)
    }

    fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    fn house_result(&self) -> Option<u32> {
        self.house_result
    }

    fn shuffled_half_deck(&self) -> Vec<Card> {
        Deck::shuffled(DeckRng::from_entropy()).remaining().to_vec()
    }
}
