//! Table-level notifications.
//!
//! These are a separate capability from dealing events: a front-end that
//! wants bet and status updates registers a [`TableObserver`] with the
//! table, independently of any `DealingObserver` on the engine.

use crate::core::player::Player;

/// Receives bet and status notifications. Both methods default to no-ops.
pub trait TableObserver: Send + Sync {
    /// A bet was accepted. `player` reflects the new bet.
    fn bet_placed(&self, _player: &Player) {}

    /// A human-readable status line.
    fn status(&self, _message: &str) {}
}
