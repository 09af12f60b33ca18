//! Deterministic random number generation.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Serializable**: O(1) state capture and restore
//!
//! All shuffles and random choices in a duel flow through one `DuelRng`
//! owned by the game state, so the same seed and action sequence replays
//! identically. AI lookahead clones the whole state, RNG included, which
//! keeps a simulated action's outcome equal to the real one.
//!
//! ```
//! use duelbound::core::DuelRng;
//!
//! let mut rng = DuelRng::new(42);
//! let mut replay = DuelRng::new(42);
//!
//! let original: Vec<_> = (0..8).map(|_| rng.gen_range_usize(0..1000)).collect();
//! let replayed: Vec<_> = (0..8).map(|_| replay.gen_range_usize(0..1000)).collect();
//! assert_eq!(original, replayed);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Deterministic RNG for shuffles and AI sampling.
///
/// Uses ChaCha8 for speed while maintaining high-quality randomness.
#[derive(Clone, Debug)]
pub struct DuelRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl DuelRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Generate a random boolean with given probability of true.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> DuelRngState {
        DuelRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &DuelRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses the ChaCha8 word position for O(1) serialization regardless of
/// how many random numbers have been generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

// The RNG serializes as its captured state so the whole game state can
// round-trip through serde.
impl Serialize for DuelRng {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.state().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DuelRng {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let state = DuelRngState::deserialize(deserializer)?;
        Ok(Self::from_state(&state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = DuelRng::new(42);
        let mut rng2 = DuelRng::new(42);

        for _ in 0..100 {
            assert_eq!(
                rng1.gen_range_usize(0..1000),
                rng2.gen_range_usize(0..1000)
            );
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = DuelRng::new(1);
        let mut rng2 = DuelRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_shuffle() {
        let mut rng = DuelRng::new(42);
        let mut data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let original = data.clone();

        rng.shuffle(&mut data);

        assert_eq!(data.len(), original.len());
        assert_ne!(data, original);

        data.sort();
        assert_eq!(data, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_state_roundtrip() {
        let mut rng = DuelRng::new(42);

        for _ in 0..100 {
            rng.gen_range_usize(0..1000);
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.gen_range_usize(0..1000)).collect();

        let mut restored = DuelRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.gen_range_usize(0..1000)).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut rng = DuelRng::new(7);
        rng.gen_range_usize(0..100);

        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: DuelRng = serde_json::from_str(&json).unwrap();

        assert_eq!(
            rng.gen_range_usize(0..1000),
            restored.gen_range_usize(0..1000)
        );
    }
}
