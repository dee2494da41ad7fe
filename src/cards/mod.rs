//! Cards and the half deck.
//!
//! ## Key Types
//!
//! - `Suit`, `Rank`: the four suits and the seven ranks Eight..Ace
//! - `Card`: immutable (suit, rank) value with a derived score
//! - `Deck`: 28 cards, a cursor, and reshuffle-on-exhaustion

pub mod card;
pub mod deck;

pub use card::{Card, Rank, Suit};
pub use deck::Deck;
