//! Game constants and table configuration.
//!
//! The rules themselves are fixed (28 cards, bust above 42). What a table
//! may tune is pacing and round housekeeping, collected in [`TableConfig`].

use serde::{Deserialize, Serialize};

/// Score a hand may reach without busting.
pub const BUST_LEVEL: u32 = 42;

/// Number of cards in the half deck (7 ranks x 4 suits).
pub const DECK_SIZE: usize = 28;

/// Largest per-card delay accepted by the dealing loop.
pub const MAX_DEAL_DELAY_MS: u64 = 1000;

/// Player id reserved for the house. Numerically it sorts first, so the
/// house always holds roster index 0.
pub const HOUSE_ID: &str = "0";

/// Table configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Seed for the first shuffle of the session.
    /// `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Name shown for the house's roster entry.
    pub house_name: String,

    /// Delay between cards for deal-all and automatic house deals.
    pub deal_delay_ms: u64,

    /// Bet placed on behalf of each player by deal-all.
    pub deal_all_bet: u32,

    /// Wait between "everyone has been dealt" and the automatic house deal.
    pub settle_delay_ms: u64,

    /// Period of the automatic house-deal poll.
    pub poll_interval_ms: u64,

    /// Delay before the first automatic house-deal poll.
    pub poll_initial_delay_ms: u64,

    /// Remove players left without points once the house result is in.
    pub remove_broke_players: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seed: None,
            house_name: "House".to_string(),
            deal_delay_ms: 100,
            deal_all_bet: 100,
            settle_delay_ms: 2000,
            poll_interval_ms: 1000,
            poll_initial_delay_ms: 10_000,
            remove_broke_players: true,
        }
    }
}

impl TableConfig {
    /// Use a fixed seed for the first shuffle.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the per-card delay used by deal-all and the auto dealer.
    #[must_use]
    pub fn with_deal_delay(mut self, delay_ms: u64) -> Self {
        self.deal_delay_ms = delay_ms;
        self
    }

    /// Set the bet placed by deal-all.
    #[must_use]
    pub fn with_deal_all_bet(mut self, bet: u32) -> Self {
        self.deal_all_bet = bet;
        self
    }

    /// Set auto dealer timings: settle delay, poll interval and initial delay.
    #[must_use]
    pub fn with_auto_deal_timing(mut self, settle_ms: u64, interval_ms: u64, initial_ms: u64) -> Self {
        self.settle_delay_ms = settle_ms;
        self.poll_interval_ms = interval_ms;
        self.poll_initial_delay_ms = initial_ms;
        self
    }

    /// Keep or remove players that run out of points.
    #[must_use]
    pub fn with_remove_broke_players(mut self, remove: bool) -> Self {
        self.remove_broke_players = remove;
        self
    }
}
