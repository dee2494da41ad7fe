//! Roster error types.

use thiserror::Error;

use crate::core::player::PlayerId;

/// Roster invariant violations. All of these are programmer errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// The entry was removed and its index is no longer meaningful.
    #[error("roster entry for player {player} has been removed")]
    StaleEntry { player: PlayerId },

    /// A new member must sort after every existing member.
    #[error("player {player} would take index {rank}, but new members must be appended at index {tail}")]
    OutOfOrderInsert {
        player: PlayerId,
        rank: usize,
        tail: usize,
    },

    /// An affinity-bound subscription on a roster without an affinity thread.
    #[error("subscriber '{subscriber}' needs an affinity thread, but the roster has none")]
    NoAffinityThread { subscriber: String },
}
