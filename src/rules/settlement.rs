//! Win/loss settlement against the house.

use std::cmp::Ordering;

/// Direction of a settled bet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Settlement {
    Win,
    Loss,
    Push,
}

impl Settlement {
    /// Compare a player's result with the house score.
    #[must_use]
    pub fn of(result: u32, house: u32) -> Self {
        match result.cmp(&house) {
            Ordering::Greater => Settlement::Win,
            Ordering::Less => Settlement::Loss,
            Ordering::Equal => Settlement::Push,
        }
    }
}

/// Points after settling `bet` for a hand worth `result` against `house`.
///
/// Pure; the caller is responsible for clearing the bet afterwards. A loss
/// saturates at zero.
#[must_use]
pub fn settle(result: u32, bet: u32, points: u32, house: u32) -> u32 {
    match Settlement::of(result, house) {
        Settlement::Win => points.saturating_add(bet),
        Settlement::Loss => points.saturating_sub(bet),
        Settlement::Push => points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_adds_bet() {
        assert_eq!(settle(38, 100, 1000, 30), 1100);
        assert_eq!(Settlement::of(38, 30), Settlement::Win);
    }

    #[test]
    fn test_loss_subtracts_bet() {
        assert_eq!(settle(20, 100, 1000, 30), 900);
        assert_eq!(Settlement::of(20, 30), Settlement::Loss);
    }

    #[test]
    fn test_push_keeps_points() {
        assert_eq!(settle(30, 100, 1000, 30), 1000);
        assert_eq!(Settlement::of(30, 30), Settlement::Push);
    }

    #[test]
    fn test_zero_bet_never_moves_points() {
        assert_eq!(settle(42, 0, 500, 0), 500);
        assert_eq!(settle(0, 0, 500, 42), 500);
    }
}
