//! Seedable random number generation for deck shuffling.
//!
//! Every [`Deck`](crate::cards::Deck) owns its own `DeckRng`; there is no
//! process-wide generator. A seeded RNG makes a session's first shuffle
//! reproducible, which is what the tests and the console client's `--seed`
//! flag rely on.
//!
//! ```
//! use half_deck::core::DeckRng;
//!
//! let mut a = DeckRng::new(42);
//! let mut b = DeckRng::new(42);
//! assert_eq!(a.gen_range_usize(0..28), b.gen_range_usize(0..28));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// ChaCha8-backed RNG owned by a single deck.
#[derive(Clone, Debug)]
pub struct DeckRng {
    inner: ChaCha8Rng,
    seed: Option<u64>,
}

impl DeckRng {
    /// Create a deterministic RNG from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create an RNG seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
            seed: None,
        }
    }

    /// The seed this RNG was built from, `None` when entropy-seeded.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Whether the sequence produced by this RNG is reproducible.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.seed.is_some()
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place (Fisher-Yates).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = DeckRng::new(42);
        let mut rng2 = DeckRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range_usize(0..1000), rng2.gen_range_usize(0..1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = DeckRng::new(1);
        let mut rng2 = DeckRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_seed_reporting() {
        assert_eq!(DeckRng::new(7).seed(), Some(7));
        assert!(DeckRng::new(7).is_deterministic());
        assert!(!DeckRng::from_entropy().is_deterministic());
    }

    #[test]
    fn test_shuffle() {
        let mut rng = DeckRng::new(42);
        let mut data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let original = data.clone();

        rng.shuffle(&mut data);

        // Same elements, different order (very likely)
        assert_eq!(data.len(), original.len());
        assert_ne!(data, original);

        data.sort();
        assert_eq!(data, original);
    }

    #[test]
    fn test_shuffle_is_reproducible() {
        let mut a: Vec<u32> = (0..28).collect();
        let mut b = a.clone();

        DeckRng::new(99).shuffle(&mut a);
        DeckRng::new(99).shuffle(&mut b);

        assert_eq!(a, b);
    }
}
