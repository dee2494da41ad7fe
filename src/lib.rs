//! # half-deck
//!
//! A house card game played with a 28-card half deck (Eight through Ace in
//! four suits). Each participant draws until the hand reaches exactly 42 or
//! a card would push it past 42; the card that busts a hand is never
//! counted. Players bet against the house and are settled once the house
//! has dealt.
//!
//! ## Design Principles
//!
//! 1. **Explicit ownership**: each deck owns its RNG; the engine owns the
//!    deck and players; a single worker thread owns the table.
//!
//! 2. **Ordered events**: dealing observers and roster subscribers are
//!    notified synchronously, in registration order, from a snapshot of
//!    the subscriber list.
//!
//! 3. **Dense indices**: the roster gives every tracked participant an
//!    index in `0..len`, kept exact across removals by one shift routine.
//!
//! ## Modules
//!
//! - `core`: player ids, players, RNG, constants, configuration
//! - `cards`: cards and the half deck
//! - `rules`: hand state machine, settlement, the dealing engine
//! - `events`: dealing events, observer registry, logging observer
//! - `roster`: dense-index player roster with affinity dispatch
//! - `table`: the table service tying engine and roster together
//! - `runtime`: affinity thread, table worker, automatic house deal

pub mod core;
pub mod cards;
pub mod rules;
pub mod events;
pub mod roster;
pub mod table;
pub mod runtime;

// Re-export commonly used types
pub use crate::core::{
    DeckRng, Player, PlayerId, TableConfig,
    BUST_LEVEL, DECK_SIZE, HOUSE_ID, MAX_DEAL_DELAY_MS,
};

pub use crate::cards::{Card, Deck, Rank, Suit};

pub use crate::rules::{
    settle, Draw, EngineError, GameEngine, HalfDeckEngine,
    HandOutcome, HandState, HandTally, Participant, Settlement,
};

pub use crate::events::{
    CallbackRegistry, DealEvent, DealEventKind, DealingObserver,
    EventRecorder, LoggingObserver, ObserverId,
};

pub use crate::roster::{
    Attributes, Delivery, EntrySnapshot, Roster, RosterEntry,
    RosterError, RosterEvent, SubscriptionToken, DEALT, INVALID_INDEX,
};

pub use crate::table::{Table, TableError, TableObserver};

pub use crate::runtime::{
    AffinityThread, AutoDealTiming, AutoDealer,
    TableCommand, TableHandle, TableWorker, WorkerError,
};
