//! Hand dealing state machine.
//!
//! A hand starts `Accumulating` and ends in exactly one of `Exact` (the
//! total hit the bust level) or `Bust` (a card pushed it over). The bust
//! card is recorded but never added to the score, so a busted hand keeps
//! its pre-bust total. A finished tally becomes a [`HandOutcome`], the
//! settled record the engine persists onto the participant.

use smallvec::SmallVec;

use crate::cards::Card;
use crate::core::config::BUST_LEVEL;
use crate::core::player::PlayerId;

/// Who a hand is dealt to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Participant {
    Player(PlayerId),
    House,
}

impl Participant {
    #[must_use]
    pub fn is_house(&self) -> bool {
        matches!(self, Participant::House)
    }
}

/// Where a hand is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandState {
    /// Still drawing cards.
    Accumulating,
    /// Total reached the bust level exactly.
    Exact,
    /// A card would have pushed the total past the bust level.
    Bust,
}

impl HandState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, HandState::Accumulating)
    }
}

/// What a single drawn card did to the hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Draw {
    /// Added to the score; keep dealing.
    Counted,
    /// Added to the score and landed on the bust level; the hand is over.
    Exact,
    /// Would exceed the bust level; not counted and the hand is over.
    Bust,
}

/// Running score for one hand.
#[derive(Clone, Debug)]
pub struct HandTally {
    score: u32,
    state: HandState,
    cards: SmallVec<[Card; 6]>,
}

impl Default for HandTally {
    fn default() -> Self {
        Self::new()
    }
}

impl HandTally {
    #[must_use]
    pub fn new() -> Self {
        Self {
            score: 0,
            state: HandState::Accumulating,
            cards: SmallVec::new(),
        }
    }

    /// Apply one card to the hand.
    ///
    /// # Panics
    ///
    /// If the hand has already terminated.
    pub fn draw(&mut self, card: Card) -> Draw {
        assert!(!self.state.is_terminal(), "Cannot draw into a finished hand");

        self.cards.push(card);
        let total = self.score + card.score();

        if total == BUST_LEVEL {
            self.score = total;
            self.state = HandState::Exact;
            Draw::Exact
        } else if total > BUST_LEVEL {
            self.state = HandState::Bust;
            Draw::Bust
        } else {
            self.score = total;
            Draw::Counted
        }
    }

    /// Score so far, never including a bust card.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn state(&self) -> HandState {
        self.state
    }

    /// Cards drawn so far, including a bust card if there was one.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Close the hand.
    ///
    /// # Panics
    ///
    /// If the hand is still accumulating.
    #[must_use]
    pub fn finish(self) -> HandOutcome {
        assert!(self.state.is_terminal(), "Cannot finish a hand that is still accumulating");
        HandOutcome {
            score: self.score,
            state: self.state,
            cards: self.cards,
        }
    }
}

/// A completed hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandOutcome {
    /// Final score (the pre-bust total for a busted hand).
    pub score: u32,
    /// `Exact` or `Bust`.
    pub state: HandState,
    /// Every card dealt, bust card last when the hand busted.
    pub cards: SmallVec<[Card; 6]>,
}

impl HandOutcome {
    #[must_use]
    pub fn is_bust(&self) -> bool {
        self.state == HandState::Bust
    }

    /// The card that ended a busted hand.
    #[must_use]
    pub fn bust_card(&self) -> Option<Card> {
        if self.is_bust() {
            self.cards.last().copied()
        } else {
            None
        }
    }
}
