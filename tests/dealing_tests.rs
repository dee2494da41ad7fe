//! Dealing engine verification tests.
//!
//! These tests drive `HalfDeckEngine` through whole rounds and check the
//! event stream, hand termination, and settlement against an independent
//! replay of the same seeded deck.

use std::collections::HashSet;
use std::sync::Arc;

use half_deck::{
    settle, Card, DealEvent, Deck, DeckRng, EventRecorder, GameEngine, HalfDeckEngine, HandState,
    Player, PlayerId, Settlement, BUST_LEVEL, DECK_SIZE,
};
use proptest::prelude::*;

/// Replay one hand from `cards`: returns the score and the cards consumed.
fn replay_hand(cards: &mut impl Iterator<Item = Card>) -> (u32, Vec<Card>) {
    let mut score = 0;
    let mut drawn = Vec::new();
    for card in cards.by_ref() {
        drawn.push(card);
        let total = score + card.score();
        if total > BUST_LEVEL {
            break;
        }
        score = total;
        if score == BUST_LEVEL {
            break;
        }
    }
    (score, drawn)
}

fn dealt_cards(events: &[DealEvent]) -> Vec<Card> {
    events.iter().filter_map(DealEvent::card).collect()
}

/// Cards a seed-20240601 session deals over two rounds, as recorded from
/// `DeckRng::new(20_240_601)`: the shark's hand, then the house's, twice.
fn recorded_session() -> Vec<Card> {
    use half_deck::Rank::*;
    use half_deck::Suit::*;
    [
        // Round 1: shark 10+11+9+8 = 38, busts on the Queen.
        (Diamonds, King),
        (Diamonds, Ace),
        (Diamonds, Nine),
        (Spades, Eight),
        (Clubs, Queen),
        // Round 1: house 10+8+10+10 = 38, busts on the Jack.
        (Spades, Ten),
        (Clubs, Eight),
        (Diamonds, Queen),
        (Spades, Queen),
        (Clubs, Jack),
        // Round 2: shark 10+10+10+10 = 40, busts on the Ten.
        (Diamonds, Ten),
        (Spades, Jack),
        (Hearts, Queen),
        (Hearts, Jack),
        (Clubs, Ten),
        // Round 2: house 9+8+11+10 = 38, busts on the King.
        (Clubs, Nine),
        (Diamonds, Eight),
        (Clubs, Ace),
        (Diamonds, Jack),
        (Clubs, King),
    ]
    .into_iter()
    .map(|(suit, rank)| Card::new(suit, rank))
    .collect()
}

/// Seeded session: two rounds of one player (1000 points, bet 100) against
/// the house. The dealt cards, hand scores, and points must match the
/// recorded session: a push at 38, then a 40 beating the house's 38.
#[test]
fn test_seeded_session_matches_recording() {
    let seed = 20_240_601;
    let shark = PlayerId::new("1");

    let mut engine = HalfDeckEngine::with_seed(seed);
    engine.add_player(Player::new("1", "The Shark", 1000));
    let recorder = Arc::new(EventRecorder::new());
    engine.add_observer(recorder.clone());

    let recorded_scores = [(38, 38, 1000), (40, 38, 1100)];
    for (player_score, house_score, points) in recorded_scores {
        assert!(engine.place_bet(&shark, 100).unwrap());
        assert_eq!(engine.deal_player(&shark, 0).unwrap().score, player_score);
        assert_eq!(engine.deal_house(0).unwrap().score, house_score);
        assert_eq!(engine.player(&shark).unwrap().points(), points);
    }

    let recorded = recorded_session();
    let actual = dealt_cards(&recorder.events());
    assert_eq!(actual[..10], recorded[..10]);
    assert_eq!(actual, recorded);
    assert_eq!(engine.player(&shark).unwrap().result(), 40);
    assert_eq!(engine.house_result(), Some(38));
}

/// The same seed replayed through the hand rules alone gives the same
/// cards, scores, and points as the engine.
#[test]
fn test_seeded_session_matches_replay() {
    let seed = 20_240_601;
    let shark = PlayerId::new("1");

    let mut engine = HalfDeckEngine::with_seed(seed);
    engine.add_player(Player::new("1", "The Shark", 1000));
    let recorder = Arc::new(EventRecorder::new());
    engine.add_observer(recorder.clone());

    let reference = Deck::shuffled(DeckRng::new(seed));
    let mut replay = reference.remaining().to_vec().into_iter();
    let mut expected_points = 1000;
    let mut expected_cards = Vec::new();

    for _ in 0..2 {
        assert!(engine.place_bet(&shark, 100).unwrap());
        let player_hand = engine.deal_player(&shark, 0).unwrap();
        let house_hand = engine.deal_house(0).unwrap();

        let (player_score, player_cards) = replay_hand(&mut replay);
        let (house_score, house_cards) = replay_hand(&mut replay);
        expected_cards.extend(player_cards);
        expected_cards.extend(house_cards);

        assert_eq!(player_hand.score, player_score);
        assert_eq!(house_hand.score, house_score);
        expected_points = settle(player_score, 100, expected_points, house_score);
        assert_eq!(engine.player(&shark).unwrap().points(), expected_points);
    }

    assert_eq!(dealt_cards(&recorder.events()), expected_cards);
}

/// A full round emits card events, then a result, for each participant.
#[test]
fn test_round_event_shape() {
    let mut engine = HalfDeckEngine::with_seed(5);
    engine.add_player(Player::new("1", "a", 500));
    engine.add_player(Player::new("2", "b", 500));
    let recorder = Arc::new(EventRecorder::new());
    engine.add_observer(recorder.clone());

    for id in ["1", "2"] {
        let id = PlayerId::new(id);
        engine.place_bet(&id, 50).unwrap();
        engine.deal_player(&id, 0).unwrap();
    }
    engine.deal_house(0).unwrap();

    let events = recorder.events();
    let results: Vec<_> = events.iter().filter(|e| e.is_result()).collect();
    assert_eq!(results.len(), 3);
    assert!(matches!(events.last(), Some(DealEvent::HouseResult { .. })));

    // Player events never mix with house events inside a hand.
    let first_house = events.iter().position(DealEvent::is_house).unwrap();
    assert!(events[..first_house].iter().all(|e| !e.is_house()));
    assert!(events[first_house..].iter().all(DealEvent::is_house));
}

/// After the house result every bet is zero and each player moved in the
/// direction given by comparing their result with the house.
#[test]
fn test_house_settles_every_player() {
    for seed in 0..20 {
        let mut engine = HalfDeckEngine::with_seed(seed);
        let ids: Vec<PlayerId> = (1..=3).map(|i| PlayerId::new(i.to_string())).collect();
        for id in &ids {
            engine.add_player(Player::new(id.clone(), format!("p{id}"), 1000));
            engine.place_bet(id, 100).unwrap();
            engine.deal_player(id, 0).unwrap();
        }

        let house = engine.deal_house(0).unwrap().score;
        for id in &ids {
            let player = engine.player(id).unwrap();
            assert_eq!(player.bet(), 0);
            let expected = match Settlement::of(player.result(), house) {
                Settlement::Win => 1100,
                Settlement::Loss => 900,
                Settlement::Push => 1000,
            };
            assert_eq!(player.points(), expected, "seed {seed}, player {id}");
        }
    }
}

/// Dealing past the end of the deck reshuffles instead of failing.
#[test]
fn test_long_session_survives_exhaustion() {
    let mut engine = HalfDeckEngine::with_seed(77);
    engine.add_player(Player::new("1", "a", 1_000_000));
    let id = PlayerId::new("1");
    for _ in 0..50 {
        engine.deal_player(&id, 0).unwrap();
    }
    assert!(engine.deck().cursor() <= DECK_SIZE);
}

/// The debug deck is a full, independent permutation.
#[test]
fn test_shuffled_half_deck_is_complete() {
    let engine = HalfDeckEngine::new();
    let cards: HashSet<_> = engine.shuffled_half_deck().into_iter().collect();
    assert_eq!(cards, Card::all().collect());
}

proptest! {
    #[test]
    fn prop_shuffle_is_permutation(seed in any::<u64>()) {
        let deck = Deck::shuffled(DeckRng::new(seed));
        let cards: HashSet<_> = deck.remaining().iter().copied().collect();
        prop_assert_eq!(deck.remaining().len(), DECK_SIZE);
        prop_assert_eq!(cards, Card::all().collect::<HashSet<_>>());
    }

    #[test]
    fn prop_hand_terminates_exact_or_bust(seed in any::<u64>()) {
        let mut engine = HalfDeckEngine::with_seed(seed);
        engine.add_player(Player::new("1", "a", 100));
        let recorder = Arc::new(EventRecorder::new());
        engine.add_observer(recorder.clone());

        let outcome = engine.deal_player(&PlayerId::new("1"), 0).unwrap();
        let events = recorder.events();

        prop_assert!(outcome.score <= BUST_LEVEL);
        let last_is_result = matches!(events.last(), Some(DealEvent::Result { .. }));
        prop_assert!(last_is_result);
        prop_assert_eq!(events.iter().filter(|e| e.is_result()).count(), 1);

        match outcome.state {
            HandState::Exact => {
                prop_assert_eq!(outcome.score, BUST_LEVEL);
                let any_bust_card = events.iter().any(|e| matches!(e, DealEvent::BustCard { .. }));
                prop_assert!(!any_bust_card);
            }
            HandState::Bust => {
                let bust = outcome.bust_card().unwrap();
                prop_assert!(outcome.score + bust.score() > BUST_LEVEL);
                let counted: u32 = outcome.cards[..outcome.cards.len() - 1].iter().map(|c| c.score()).sum();
                prop_assert_eq!(counted, outcome.score);
                let penultimate_is_bust_card = matches!(
                    events[events.len() - 2],
                    DealEvent::BustCard { .. }
                );
                prop_assert!(penultimate_is_bust_card);
            }
            HandState::Accumulating => prop_assert!(false, "hand did not terminate"),
        }
    }

    #[test]
    fn prop_settlement_follows_result_difference(
        result in 0u32..=BUST_LEVEL,
        house in 0u32..=BUST_LEVEL,
        (points, bet) in (1u32..10_000).prop_flat_map(|p| (Just(p), 1..=p)),
    ) {
        let after = settle(result, bet, points, house);
        if result > house {
            prop_assert_eq!(after, points + bet);
        } else if result < house {
            prop_assert_eq!(after, points - bet);
        } else {
            prop_assert_eq!(after, points);
        }
    }
}
