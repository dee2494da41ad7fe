//! Core types: players, RNG, constants and configuration.
//!
//! These building blocks carry no dealing logic of their own; the engine,
//! roster and table service are built on top of them.

pub mod config;
pub mod player;
pub mod rng;

pub use config::{TableConfig, BUST_LEVEL, DECK_SIZE, HOUSE_ID, MAX_DEAL_DELAY_MS};
pub use player::{Player, PlayerId};
pub use rng::DeckRng;
