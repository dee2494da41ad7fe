//! Player identification and per-player betting state.
//!
//! ## PlayerId
//!
//! String identifier ordered numerically, so `"2"` sorts before `"10"`.
//! The house is `"0"` and therefore always first.
//!
//! ## Player
//!
//! Mutable entity holding points, the bet for the current round and the
//! result of the last hand dealt.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::HOUSE_ID;

/// Player identifier, ordered by numeric value.
///
/// Ids that do not parse as integers sort as `-1`; ties are broken by the
/// raw string so ordering stays consistent with equality.
///
/// ```
/// use half_deck::core::PlayerId;
///
/// let mut ids = vec![PlayerId::new("10"), PlayerId::new("2"), PlayerId::new("0")];
/// ids.sort();
/// assert_eq!(ids, vec![PlayerId::new("0"), PlayerId::new("2"), PlayerId::new("10")]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a new player ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The house's id.
    #[must_use]
    pub fn house() -> Self {
        Self(HOUSE_ID.to_string())
    }

    /// Whether this is the house's id.
    #[must_use]
    pub fn is_house(&self) -> bool {
        self.0 == HOUSE_ID
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value used for ordering.
    #[must_use]
    pub fn numeric(&self) -> i64 {
        self.0.trim().parse().unwrap_or(-1)
    }
}

impl Ord for PlayerId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numeric()
            .cmp(&other.numeric())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for PlayerId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A player at the table.
///
/// A bet is always in `1..=points`; clearing it back to zero goes through
/// [`Player::reset_bet`], never `place_bet(0)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    name: String,
    points: u32,
    bet: u32,
    result: u32,
}

impl Player {
    /// Create a player with no bet and no result.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, points: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            points,
            bet: 0,
            result: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn set_points(&mut self, points: u32) {
        self.points = points;
    }

    #[must_use]
    pub fn bet(&self) -> u32 {
        self.bet
    }

    /// Place a bet for this round.
    ///
    /// Returns `false` and leaves the current bet untouched when `bet` is zero
    /// or more than the player's points.
    pub fn place_bet(&mut self, bet: u32) -> bool {
        if bet == 0 || bet > self.points {
            return false;
        }
        self.bet = bet;
        true
    }

    /// Clear the bet ahead of the next round.
    pub fn reset_bet(&mut self) {
        self.bet = 0;
    }

    /// Score of the most recent hand.
    #[must_use]
    pub fn result(&self) -> u32 {
        self.result
    }

    pub fn set_result(&mut self, result: u32) {
        self.result = result;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Player: id={}, name={}, bet={}, points={}, RESULT .. {}",
            self.id, self.name, self.bet, self.points, self.result
        )
    }
}
