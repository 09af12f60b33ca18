//! The automated opponent.
//!
//! The AI treats the engine as a pure function: for every candidate
//! intent it clones the engine, applies the intent through the real
//! action API (auto-paying costs), deterministically fast-forwards any
//! resulting chain/showdown/combat to a quiescent state by passing for
//! both sides, and scores the result with a weighted heuristic.
//! Difficulty tiers vary the candidate count and how the scored list is
//! sampled.

pub mod config;
pub mod intent;
pub mod scheduler;
pub mod score;

pub use config::{AiConfig, Difficulty};
pub use intent::enumerate;
pub use scheduler::ThinkScheduler;
pub use score::{evaluate, Weights};

use crate::core::{DuelRng, PlayerId};
use crate::engine::{Action, DuelEngine};

/// Safety bound on fast-forward passes per candidate evaluation.
const MAX_FAST_FORWARD_STEPS: usize = 128;

/// One AI seat.
#[derive(Clone, Debug)]
pub struct AiPlayer {
    config: AiConfig,
    weights: Weights,
    rng: DuelRng,
}

impl AiPlayer {
    /// Create an AI with the given configuration.
    #[must_use]
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            weights: Weights::default(),
            rng: DuelRng::new(config.seed),
        }
    }

    /// Override the heuristic weights (builder).
    #[must_use]
    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    /// The configured difficulty.
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    /// A scheduler matching this AI's configured think delay.
    #[must_use]
    pub fn scheduler(&self) -> ThinkScheduler {
        ThinkScheduler::new(self.config.think_delay)
    }

    /// Choose an action for `player`, or `None` when there is nothing
    /// for them to do.
    pub fn decide(&mut self, engine: &DuelEngine, player: PlayerId) -> Option<Action> {
        let cap = self.config.difficulty.candidate_cap();
        let candidates = intent::enumerate(engine, player, cap);
        if candidates.is_empty() {
            return None;
        }

        let mut scored: Vec<(f64, Action)> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let mut sim = engine.clone();
            if sim.submit(player, &candidate).is_err() {
                continue;
            }
            fast_forward(&mut sim);
            let value = score::evaluate(sim.registry(), sim.state(), player, &self.weights);
            scored.push((value, candidate));
        }
        if scored.is_empty() {
            return None;
        }

        // Stable sort keeps enumeration order on ties, so decisions are
        // deterministic for a given seed.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let index = match self.config.difficulty {
            Difficulty::Easy => self.rng.gen_range_usize(0..scored.len().min(4)),
            Difficulty::Medium => {
                if scored.len() > 1 && self.rng.gen_bool(0.25) {
                    1
                } else {
                    0
                }
            }
            Difficulty::Hard | Difficulty::VeryHard => 0,
        };
        Some(scored.swap_remove(index).1)
    }
}

/// Drive a simulated engine to quiescence by passing priority for both
/// sides, assuming no further reactions.
pub fn fast_forward(engine: &mut DuelEngine) {
    for _ in 0..MAX_FAST_FORWARD_STEPS {
        let state = engine.state();
        if state.is_over() {
            return;
        }
        if state.chain.is_empty() && !state.window.is_open() {
            return;
        }
        let priority = state.priority;
        if engine.submit(priority, &Action::PassPriority).is_err() {
            return;
        }
    }
}
