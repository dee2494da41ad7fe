//! Table error types.

use thiserror::Error;

use crate::core::player::PlayerId;
use crate::roster::RosterError;
use crate::rules::EngineError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    /// The house id cannot be used for a regular player.
    #[error("id {0} is reserved for the house")]
    ReservedId(PlayerId),
}
