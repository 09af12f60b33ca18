//! AI configuration: difficulty tiers and think scheduling parameters.

use serde::{Deserialize, Serialize};

/// Opponent difficulty.
///
/// Tiers differ in how many candidate intents are generated and how the
/// scored list is sampled: easy picks randomly among the top four,
/// medium mostly plays the best line with a 25% chance of the runner-up,
/// hard and very-hard always play the best line, very-hard over a larger
/// candidate set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    VeryHard,
}

impl Difficulty {
    /// Maximum number of candidate intents scored per decision.
    #[must_use]
    pub const fn candidate_cap(self) -> usize {
        match self {
            Difficulty::Easy => 8,
            Difficulty::Medium => 12,
            Difficulty::Hard => 20,
            Difficulty::VeryHard => 40,
        }
    }
}

/// AI parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AiConfig {
    /// Difficulty tier.
    pub difficulty: Difficulty,
    /// RNG seed for sampling.
    pub seed: u64,
    /// Ticks the scheduler waits before committing a decision.
    pub think_delay: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            seed: 42,
            think_delay: 2,
        }
    }
}

impl AiConfig {
    /// Set the difficulty (builder).
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the sampling seed (builder).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the think delay (builder).
    #[must_use]
    pub fn with_think_delay(mut self, ticks: u32) -> Self {
        self.think_delay = ticks;
        self
    }
}
