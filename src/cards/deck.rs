//! The 28-card half deck.
//!
//! A deck is created once per session and dealt from a cursor. Running off
//! the end is not an error: the deck reshuffles itself and keeps dealing.

use log::debug;

use super::card::{Card, Rank, Suit};
use crate::core::config::DECK_SIZE;
use crate::core::rng::DeckRng;

/// A shuffled half deck with a dealing cursor.
///
/// Invariant: `0 <= cursor <= DECK_SIZE`, and `cards` is always a
/// permutation of [`Card::all`].
///
/// ```
/// use half_deck::cards::Deck;
///
/// let mut deck = Deck::seeded(42);
/// deck.shuffle();
/// let first = deck.deal_card();
/// assert_eq!(deck.remaining().len(), 27);
/// assert!(!deck.remaining().contains(&first));
/// ```
#[derive(Clone, Debug)]
pub struct Deck {
    cards: [Card; DECK_SIZE],
    cursor: usize,
    rng: DeckRng,
}

impl Deck {
    /// Create an unshuffled deck that will shuffle with `rng`.
    #[must_use]
    pub fn new(rng: DeckRng) -> Self {
        let mut cards = [Card::new(Suit::Hearts, Rank::Eight); DECK_SIZE];
        for (slot, card) in cards.iter_mut().zip(Card::all()) {
            *slot = card;
        }
        Self { cards, cursor: 0, rng }
    }

    /// Unshuffled deck whose first shuffle is reproducible.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(DeckRng::new(seed))
    }

    /// Unshuffled deck seeded from entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(DeckRng::from_entropy())
    }

    /// Build and shuffle in one step.
    #[must_use]
    pub fn shuffled(rng: DeckRng) -> Self {
        let mut deck = Self::new(rng);
        deck.shuffle();
        deck
    }

    /// Deck that deals `order` first, e.g. to replay a recorded shuffle.
    ///
    /// Returns `None` unless `order` is a permutation of the 28 cards.
    #[must_use]
    pub fn with_order(order: &[Card], rng: DeckRng) -> Option<Self> {
        if order.len() != DECK_SIZE || !Card::all().all(|card| order.contains(&card)) {
            return None;
        }
        let mut cards = [Card::new(Suit::Hearts, Rank::Eight); DECK_SIZE];
        cards.copy_from_slice(order);
        Some(Self { cards, cursor: 0, rng })
    }

    /// Permute all 28 cards and move the cursor back to the top.
    pub fn shuffle(&mut self) {
        self.rng.shuffle(&mut self.cards);
        self.cursor = 0;
    }

    /// Deal the card under the cursor, reshuffling first if the deck is spent.
    pub fn deal_card(&mut self) -> Card {
        if self.cursor >= DECK_SIZE {
            self.reshuffle();
        }
        let card = self.cards[self.cursor];
        self.cursor += 1;
        card
    }

    /// Undealt cards in dealing order.
    #[must_use]
    pub fn remaining(&self) -> &[Card] {
        &self.cards[self.cursor..]
    }

    /// Cards dealt since the last shuffle.
    #[must_use]
    pub fn dealt(&self) -> &[Card] {
        &self.cards[..self.cursor]
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn rng(&self) -> &DeckRng {
        &self.rng
    }

    // Only the session's first shuffle is reproducible; later ones draw fresh entropy.
    fn reshuffle(&mut self) {
        if self.rng.is_deterministic() {
            self.rng = DeckRng::from_entropy();
        }
        debug!("Deck exhausted after {} cards, reshuffling", DECK_SIZE);
        self.shuffle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_permutation(cards: &[Card]) {
        assert_eq!(cards.len(), DECK_SIZE);
        let unique: HashSet<_> = cards.iter().copied().collect();
        let all: HashSet<_> = Card::all().collect();
        assert_eq!(unique, all);
    }

    #[test]
    fn test_new_deck_is_ordered() {
        let deck = Deck::seeded(1);
        let expected: Vec<_> = Card::all().collect();
        assert_eq!(deck.remaining(), expected.as_slice());
        assert_eq!(deck.cursor(), 0);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut deck = Deck::seeded(42);
        deck.shuffle();
        assert_permutation(deck.remaining());
    }

    #[test]
    fn test_seeded_shuffle_reproducible() {
        let a = Deck::shuffled(DeckRng::new(5));
        let b = Deck::shuffled(DeckRng::new(5));
        assert_eq!(a.remaining(), b.remaining());
    }

    #[test]
    fn test_shuffle_resets_cursor() {
        let mut deck = Deck::seeded(3);
        deck.shuffle();
        deck.deal_card();
        deck.deal_card();
        assert_eq!(deck.cursor(), 2);
        deck.shuffle();
        assert_eq!(deck.cursor(), 0);
        assert_eq!(deck.remaining().len(), DECK_SIZE);
    }

    #[test]
    fn test_deal_advances_cursor() {
        let mut deck = Deck::seeded(8);
        deck.shuffle();
        let top = deck.remaining()[0];
        assert_eq!(deck.deal_card(), top);
        assert_eq!(deck.cursor(), 1);
        assert_eq!(deck.dealt(), &[top]);
    }

    #[test]
    fn test_full_pass_deals_every_card_once() {
        let mut deck = Deck::seeded(11);
        deck.shuffle();
        let dealt: Vec<_> = (0..DECK_SIZE).map(|_| deck.deal_card()).collect();
        assert_permutation(&dealt);
        assert!(deck.remaining().is_empty());
    }

    #[test]
    fn test_exhaustion_reshuffles_silently() {
        let mut deck = Deck::seeded(13);
        deck.shuffle();
        for _ in 0..DECK_SIZE {
            deck.deal_card();
        }

        let _ = deck.deal_card();
        assert_eq!(deck.cursor(), 1);
        assert_permutation(&[deck.dealt(), deck.remaining()].concat());
        assert!(!deck.rng().is_deterministic());
    }

    #[test]
    fn test_with_order() {
        let mut order: Vec<_> = Card::all().collect();
        order.reverse();
        let mut deck = Deck::with_order(&order, DeckRng::new(0)).unwrap();
        assert_eq!(deck.deal_card(), order[0]);

        assert!(Deck::with_order(&order[1..], DeckRng::new(0)).is_none());
        order[0] = order[1];
        assert!(Deck::with_order(&order, DeckRng::new(0)).is_none());
    }

    #[test]
    fn test_remaining_does_not_mutate() {
        let mut deck = Deck::seeded(21);
        deck.shuffle();
        let before = deck.remaining().to_vec();
        let _ = deck.remaining();
        assert_eq!(deck.remaining(), before.as_slice());
        assert_eq!(deck.cursor(), 0);
    }
}
