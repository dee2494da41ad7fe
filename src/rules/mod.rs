//! Dealing rules.
//!
//! ## Key Types
//!
//! - `GameEngine`: the engine surface front-ends drive
//! - `HalfDeckEngine`: deck, players, observers, and the hand loop
//! - `HandTally` / `HandOutcome`: per-hand accumulate-until-42 state machine
//! - `settle`: pure win/loss/push settlement against the house

pub mod engine;
pub mod error;
pub mod hand;
pub mod settlement;

pub use engine::{GameEngine, HalfDeckEngine};
pub use error::EngineError;
pub use hand::{Draw, HandOutcome, HandState, HandTally, Participant};
pub use settlement::{settle, Settlement};
