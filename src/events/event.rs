//! Dealing events.

use std::fmt;

use crate::cards::Card;
use crate::core::player::PlayerId;

/// One of the six dealing notifications.
///
/// Per hand, every counted card produces a `NextCard` (or `HouseNextCard`),
/// a card that would exceed the bust level produces a `BustCard` instead,
/// and the hand closes with exactly one `Result` (or `HouseResult`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DealEvent {
    NextCard { player: PlayerId, card: Card },
    BustCard { player: PlayerId, card: Card },
    Result { player: PlayerId, score: u32 },
    HouseNextCard { card: Card },
    HouseBustCard { card: Card },
    HouseResult { score: u32 },
}

/// Discriminant of a [`DealEvent`], handy for asserting event order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DealEventKind {
    NextCard,
    BustCard,
    Result,
    HouseNextCard,
    HouseBustCard,
    HouseResult,
}

impl DealEvent {
    #[must_use]
    pub fn kind(&self) -> DealEventKind {
        match self {
            DealEvent::NextCard { .. } => DealEventKind::NextCard,
            DealEvent::BustCard { .. } => DealEventKind::BustCard,
            DealEvent::Result { .. } => DealEventKind::Result,
            DealEvent::HouseNextCard { .. } => DealEventKind::HouseNextCard,
            DealEvent::HouseBustCard { .. } => DealEventKind::HouseBustCard,
            DealEvent::HouseResult { .. } => DealEventKind::HouseResult,
        }
    }

    /// The player a player-scoped event is about; `None` for house events.
    #[must_use]
    pub fn player(&self) -> Option<&PlayerId> {
        match self {
            DealEvent::NextCard { player, .. }
            | DealEvent::BustCard { player, .. }
            | DealEvent::Result { player, .. } => Some(player),
            _ => None,
        }
    }

    /// The card carried by card events.
    #[must_use]
    pub fn card(&self) -> Option<Card> {
        match self {
            DealEvent::NextCard { card, .. }
            | DealEvent::BustCard { card, .. }
            | DealEvent::HouseNextCard { card }
            | DealEvent::HouseBustCard { card } => Some(*card),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_house(&self) -> bool {
        self.player().is_none()
    }

    #[must_use]
    pub fn is_result(&self) -> bool {
        matches!(self, DealEvent::Result { .. } | DealEvent::HouseResult { .. })
    }
}

impl fmt::Display for DealEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealEvent::NextCard { player, card } => write!(f, "next card for {player}: {card}"),
            DealEvent::BustCard { player, card } => write!(f, "bust card for {player}: {card}"),
            DealEvent::Result { player, score } => write!(f, "result for {player}: {score}"),
            DealEvent::HouseNextCard { card } => write!(f, "next house card: {card}"),
            DealEvent::HouseBustCard { card } => write!(f, "house bust card: {card}"),
            DealEvent::HouseResult { score } => write!(f, "house result: {score}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    #[test]
    fn test_accessors() {
        let card = Card::new(Suit::Spades, Rank::Ace);
        let event = DealEvent::NextCard { player: PlayerId::new("1"), card };
        assert_eq!(event.kind(), DealEventKind::NextCard);
        assert_eq!(event.player(), Some(&PlayerId::new("1")));
        assert_eq!(event.card(), Some(card));
        assert!(!event.is_house());
        assert!(!event.is_result());

        let house = DealEvent::HouseResult { score: 40 };
        assert!(house.is_house());
        assert!(house.is_result());
        assert_eq!(house.card(), None);
    }
}
