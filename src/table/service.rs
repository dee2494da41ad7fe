//! The table service: engine, roster, and round bookkeeping together.
//!
//! A [`Table`] is what front-ends talk to. It forwards to a [`GameEngine`],
//! mirrors membership into a shared [`Roster`] (the house always at index
//! 0), and tracks who has been dealt this round with the roster's `dealt`
//! flag.
//!
//! ## Round lifecycle
//!
//! 1. Players bet and are dealt in any order; each deal tags the player.
//! 2. Once every player is tagged the house may deal. The house deal
//!    settles bets, tags the house, clears the player tags, and drops broke
//!    players when configured to.
//! 3. The next accepted bet call after a house deal starts a new round.
//!
//! A table is not synchronized. Run it behind a `TableWorker` to share it.

use std::sync::Arc;

use log::{debug, info, warn};

use super::error::TableError;
use super::observer::TableObserver;
use crate::core::config::TableConfig;
use crate::core::player::{Player, PlayerId};
use crate::events::{CallbackRegistry, DealingObserver, ObserverId};
use crate::roster::{Roster, RosterEntry, DEALT};
use crate::rules::{GameEngine, HalfDeckEngine, HandOutcome};
use crate::runtime::affinity::AffinityThread;

/// Engine plus roster plus round state.
pub struct Table<E: GameEngine = HalfDeckEngine> {
    engine: E,
    roster: Arc<Roster>,
    house: RosterEntry,
    observers: CallbackRegistry<dyn TableObserver>,
    config: TableConfig,
}

impl<E: GameEngine + std::fmt::Debug> std::fmt::Debug for Table<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("engine", &self.engine)
            .field("roster", &self.roster)
            .field("config", &self.config)
            .finish()
    }
}

impl Table {
    /// Table with a fresh engine and a roster without an affinity thread.
    ///
    /// # Errors
    ///
    /// Only if the house cannot be added to the roster.
    pub fn new(config: TableConfig) -> Result<Self, TableError> {
        let engine = HalfDeckEngine::from_config(&config);
        Self::with_parts(engine, Arc::new(Roster::new()), config)
    }

    /// Table whose roster delivers affinity-bound subscribers on `affinity`.
    ///
    /// # Errors
    ///
    /// Only if the house cannot be added to the roster.
    pub fn with_affinity(config: TableConfig, affinity: Arc<AffinityThread>) -> Result<Self, TableError> {
        let engine = HalfDeckEngine::from_config(&config);
        Self::with_parts(engine, Arc::new(Roster::with_affinity(affinity)), config)
    }
}

impl<E: GameEngine> Table<E> {
    /// Assemble a table and register the house with the roster.
    ///
    /// # Errors
    ///
    /// [`TableError::Roster`] if `roster` already holds members that would
    /// keep the house from being appended.
    pub fn with_parts(engine: E, roster: Arc<Roster>, config: TableConfig) -> Result<Self, TableError> {
        let house = roster.get_or_create(&PlayerId::house(), &config.house_name)?;
        Ok(Self {
            engine,
            roster,
            house,
            observers: CallbackRegistry::new(),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    #[must_use]
    pub fn roster(&self) -> &Arc<Roster> {
        &self.roster
    }

    #[must_use]
    pub fn house_entry(&self) -> &RosterEntry {
        &self.house
    }

    pub fn add_observer(&mut self, observer: Arc<dyn TableObserver>) -> ObserverId {
        self.observers.register(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    pub fn add_dealing_observer(&mut self, observer: Arc<dyn DealingObserver>) -> ObserverId {
        self.engine.add_observer(observer)
    }

    pub fn remove_dealing_observer(&mut self, id: ObserverId) -> bool {
        self.engine.remove_observer(id)
    }

    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.engine.player(id)
    }

    /// Players in id order, excluding the house.
    #[must_use]
    pub fn players(&self) -> Vec<&Player> {
        self.engine.all_players()
    }

    /// Add a player to the engine and append them to the roster.
    ///
    /// Adding an id that is already present replaces the stored player and
    /// returns the existing roster entry.
    ///
    /// # Errors
    ///
    /// [`TableError::ReservedId`] for the house id, or
    /// [`TableError::Roster`] if the id would not be appended at the tail.
    /// Nothing is changed on error.
    pub fn add_player(&mut self, player: Player) -> Result<RosterEntry, TableError> {
        let id = player.id().clone();
        if id.is_house() {
            return Err(TableError::ReservedId(id));
        }
        self.roster.check_append(&id)?;

        let name = player.name().to_string();
        self.engine.add_player(player);
        Ok(self.roster.get_or_create(&id, &name)?)
    }

    /// Remove a player from engine and roster. The house cannot be removed.
    pub fn remove_player(&mut self, id: &PlayerId) -> bool {
        if id.is_house() {
            return false;
        }
        let from_engine = self.engine.remove_player(id);
        let from_roster = self.roster.remove(id);
        from_engine || from_roster
    }

    /// Place a bet. An accepted bet after the house has dealt starts a new
    /// round.
    ///
    /// Returns `Ok(false)` for an amount of zero or above the player's
    /// points; a rejected bet leaves the round as it was.
    ///
    /// # Errors
    ///
    /// [`TableError::Engine`] for an unknown player.
    pub fn place_bet(&mut self, id: &PlayerId, bet: u32) -> Result<bool, TableError> {
        if !self.engine.place_bet(id, bet)? {
            debug!("Rejected bet of {bet} from {id}");
            return Ok(false);
        }
        if self.is_house_dealt() {
            self.start_new_round();
        }
        self.engine.reset_result(id)?;

        if let Some(player) = self.engine.player(id) {
            self.observers.for_each(|o| o.bet_placed(player));
        }
        Ok(true)
    }

    /// # Errors
    ///
    /// [`TableError::Engine`] for an unknown player.
    pub fn clear_bet(&mut self, id: &PlayerId) -> Result<(), TableError> {
        Ok(self.engine.clear_bet(id)?)
    }

    /// Deal one player's hand and tag them as dealt.
    ///
    /// # Errors
    ///
    /// [`TableError::ReservedId`] for the house id; engine errors for an
    /// unknown player or an out-of-range delay.
    pub fn deal_player(&mut self, id: &PlayerId, delay_ms: u64) -> Result<HandOutcome, TableError> {
        if id.is_house() {
            return Err(TableError::ReservedId(id.clone()));
        }
        let outcome = self.engine.deal_player(id, delay_ms)?;

        if let Some(entry) = self.roster.entry(id) {
            entry.set_attribute(DEALT);
        }

        let left = self.players_left_to_deal();
        if !left.is_empty() {
            let names: Vec<&str> = left.iter().map(RosterEntry::name).collect();
            self.publish_status(&format!(
                "{} player(s) left until the house deals ({})",
                left.len(),
                names.join(", ")
            ));
        }
        Ok(outcome)
    }

    /// Deal the house, settle the round, and reset round flags.
    ///
    /// # Errors
    ///
    /// [`TableError::Engine`] for an out-of-range delay.
    pub fn deal_house(&mut self, delay_ms: u64) -> Result<HandOutcome, TableError> {
        let outcome = self.engine.deal_house(delay_ms)?;

        self.house.set_attribute(DEALT);
        for entry in self.roster.entries() {
            if !entry.same_entry(&self.house) {
                entry.clear_attribute(DEALT);
            }
        }
        info!("Round over, house scored {}", outcome.score);

        if self.config.remove_broke_players {
            self.remove_broke_players();
        }
        Ok(outcome)
    }

    /// Bet and deal every player not yet dealt this round.
    ///
    /// Players who cannot cover the configured bet are removed instead.
    ///
    /// # Errors
    ///
    /// The first engine error encountered; earlier players stay dealt.
    pub fn deal_all(&mut self) -> Result<Vec<(PlayerId, HandOutcome)>, TableError> {
        let bet = self.config.deal_all_bet;
        let delay_ms = self.config.deal_delay_ms;
        if self.is_house_dealt() {
            self.start_new_round();
        }

        let mut dealt = Vec::new();
        for entry in self.players_left_to_deal() {
            let id = entry.player().clone();
            let points = self.engine.player(&id).map_or(0, Player::points);
            if points < bet {
                self.publish_status(&format!("Removing {}, who cannot cover a bet of {bet}", entry.name()));
                self.remove_player(&id);
                continue;
            }
            self.place_bet(&id, bet)?;
            let outcome = self.deal_player(&id, delay_ms)?;
            dealt.push((id, outcome));
        }
        Ok(dealt)
    }

    /// Clear every round flag, including the house's.
    pub fn start_new_round(&mut self) {
        for entry in self.roster.entries() {
            entry.clear_attribute(DEALT);
        }
        info!("New round started");
        self.publish_status("A new round has just begun");
    }

    #[must_use]
    pub fn is_house_dealt(&self) -> bool {
        self.house.has_attribute(DEALT)
    }

    /// Non-house members not yet dealt this round, in index order.
    #[must_use]
    pub fn players_left_to_deal(&self) -> Vec<RosterEntry> {
        self.roster
            .entries()
            .into_iter()
            .filter(|e| !e.same_entry(&self.house) && !e.has_attribute(DEALT))
            .collect()
    }

    /// At least one player is seated and all of them have been dealt.
    #[must_use]
    pub fn is_everyone_dealt(&self) -> bool {
        self.roster.len() > 1 && self.players_left_to_deal().is_empty()
    }

    /// Everyone is dealt and the house has not dealt yet.
    #[must_use]
    pub fn house_ready(&self) -> bool {
        self.is_everyone_dealt() && !self.is_house_dealt()
    }

    /// Send a status line to table observers.
    pub fn publish_status(&self, message: &str) {
        debug!("Status: {message}");
        self.observers.for_each(|o| o.status(message));
    }

    fn remove_broke_players(&mut self) {
        let broke: Vec<(PlayerId, String)> = self
            .engine
            .all_players()
            .into_iter()
            .filter(|p| p.points() == 0)
            .map(|p| (p.id().clone(), p.name().to_string()))
            .collect();

        for (id, name) in broke {
            warn!("Removing broke player {name}");
            self.publish_status(&format!("Removing broke player {name}"));
            self.remove_player(&id);
            self.publish_status(&format!("Removed broke player {name}"));
        }
    }
}
