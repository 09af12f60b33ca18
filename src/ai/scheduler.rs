//! Think scheduling: the AI's "thinking" modeled as explicit state.
//!
//! The engine is fully synchronous, so the delay between "it's the AI's
//! turn to act" and "the AI commits an action" is data, not a thread: a
//! scheduled think records the state version it was planned against and
//! a tick countdown. Any state change reschedules it, and when the
//! countdown fires the decision is computed fresh against the latest
//! state, so a stale pending intent is simply dropped, never applied.

use crate::core::PlayerId;
use crate::engine::{Action, DuelEngine};

use super::AiPlayer;

#[derive(Clone, Copy, Debug)]
struct PendingThink {
    player: PlayerId,
    version: u64,
    remaining: u32,
}

/// Tick-driven think scheduler for one AI seat.
#[derive(Clone, Debug)]
pub struct ThinkScheduler {
    delay: u32,
    pending: Option<PendingThink>,
}

impl ThinkScheduler {
    /// Create a scheduler with the given think delay, in ticks.
    #[must_use]
    pub fn new(delay: u32) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule a think for `player` against the current state.
    pub fn schedule(&mut self, engine: &DuelEngine, player: PlayerId) {
        self.pending = Some(PendingThink {
            player,
            version: engine.state().version,
            remaining: self.delay,
        });
    }

    /// True when a think is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending think.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Advance one tick. Returns a decision when the delay has elapsed.
    ///
    /// If the state changed since scheduling, the think restarts against
    /// the new version instead of firing; cancellation is total and
    /// implicit. The returned action was chosen against the latest
    /// state; the caller submits it (and the engine still re-validates).
    pub fn tick(&mut self, engine: &DuelEngine, ai: &mut AiPlayer) -> Option<Action> {
        let pending = self.pending.as_mut()?;

        let current = engine.state().version;
        if current != pending.version {
            pending.version = current;
            pending.remaining = self.delay;
            return None;
        }

        if pending.remaining > 0 {
            pending.remaining -= 1;
            return None;
        }

        let player = pending.player;
        self.pending = None;
        ai.decide(engine, player)
    }
}
