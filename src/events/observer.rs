//! Dealing observers.
//!
//! An observer receives every [`DealEvent`] synchronously, in registration
//! order, together with a read-only view of the engine so it can look up
//! players or inspect the table while the hand is in progress.
//!
//! ## Provided observers
//!
//! - [`LoggingObserver`]: writes a console-style trace through `log`
//! - [`EventRecorder`]: keeps every event in memory

use log::{debug, info};
use parking_lot::Mutex;

use super::event::DealEvent;
use crate::core::player::PlayerId;
use crate::rules::engine::GameEngine;

/// Receives dealing events from a [`GameEngine`].
pub trait DealingObserver: Send + Sync {
    fn on_event(&self, event: &DealEvent, engine: &dyn GameEngine);
}

/// Logs cards at `debug` and results at `info`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingObserver;

impl LoggingObserver {
    fn name_of(engine: &dyn GameEngine, id: &PlayerId) -> String {
        engine
            .player(id)
            .map_or_else(|| id.to_string(), |p| p.name().to_string())
    }
}

impl DealingObserver for LoggingObserver {
    fn on_event(&self, event: &DealEvent, engine: &dyn GameEngine) {
        match event {
            DealEvent::NextCard { player, card } => {
                debug!("Card dealt to {} .. {}", Self::name_of(engine, player), card);
            }
            DealEvent::BustCard { player, card } => {
                debug!(
                    "Card dealt to {} .. {} ... YOU BUSTED!",
                    Self::name_of(engine, player),
                    card
                );
            }
            DealEvent::Result { player, score } => {
                info!("{}, final result={}", Self::name_of(engine, player), score);
            }
            DealEvent::HouseNextCard { card } => debug!("Card dealt to House .. {card}"),
            DealEvent::HouseBustCard { card } => {
                debug!("Card dealt to House .. {card} ... HOUSE BUSTED!");
            }
            DealEvent::HouseResult { score } => {
                info!("House, final result={score}");
                info!("Final player results");
                for player in engine.all_players() {
                    info!("{player}");
                }
            }
        }
    }
}

/// Records every event it sees.
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Mutex<Vec<DealEvent>>,
}

impl EventRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<DealEvent> {
        self.events.lock().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<DealEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl DealingObserver for EventRecorder {
    fn on_event(&self, event: &DealEvent, _engine: &dyn GameEngine) {
        self.events.lock().push(event.clone());
    }
}
