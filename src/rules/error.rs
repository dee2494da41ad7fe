//! Engine error types.

use thiserror::Error;

use crate::core::config::MAX_DEAL_DELAY_MS;
use crate::core::player::PlayerId;

/// Errors raised by engine operations.
///
/// Both variants are caller contract violations; an invalid bet amount is
/// not an error and is reported as `Ok(false)` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Per-card delay outside `0..=MAX_DEAL_DELAY_MS`.
    #[error("deal delay {0}ms is outside 0..={max}ms", max = MAX_DEAL_DELAY_MS)]
    InvalidDelay(u64),

    /// The player was never added to the engine, or has been removed.
    #[error("player {0} is not known to the engine")]
    UnknownPlayer(PlayerId),
}
