//! # duelbound
//!
//! A rules engine for a two-player collectible-card duel: authoritative
//! board state, turn phases, priority and reactive windows, a LIFO chain,
//! combat and battlefield scoring, a cost/auto-pay solver, a best-effort
//! ability-text interpreter, and an automated opponent.
//!
//! ## Design Principles
//!
//! 1. **One entry point**: external callers mutate state only through
//!    [`engine::DuelEngine::submit`] and observe only through redacted
//!    projections. Illegal actions are refused with the state untouched.
//!
//! 2. **Persistent state**: collections use `im` structures, so cloning
//!    the whole state for AI lookahead is cheap structural sharing.
//!
//! 3. **Visible gaps**: ability text that matches no known primitive is
//!    an explicit `UNSUPPORTED effect` diagnostic and a no-op, never a
//!    guess.
//!
//! 4. **Determinism**: all randomness flows through a seeded RNG owned
//!    by the state; the same seed and action sequence replays identically.
//!
//! ## Modules
//!
//! - `core`: seat ids, per-seat storage, RNG, the game log
//! - `cards`: the card definition schema as a tagged union
//! - `state`: aggregates, instances, resources, projection
//! - `engine`: actions, costs, interpreter, chain, combat, phases
//! - `ai`: intent enumeration, heuristic scoring, think scheduling

pub mod ai;
pub mod cards;
pub mod core;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use crate::core::{DuelRng, DuelRngState, GameLog, LogEntry, PerPlayer, PlayerId};

pub use crate::cards::{
    AbilityBlock, AbilityTrigger, CardDef, CardId, CardKind, CardRegistry, Domain, DomainSet,
    Keyword,
};

pub use crate::state::{
    project, BattlefieldId, BattlefieldState, CardInstance, ChainItem, ChainKind, CombatStep,
    Destination, FaceDownCard, GameState, InstanceId, Phase, PlayerState, PrivacyConfig,
    Resolution, ResourcePool, RuneInstance, Target, TargetRequirement, UnitRef, UnitZone, Window,
    VICTORY_THRESHOLD,
};

pub use crate::engine::{
    can_afford, pay, plan_auto_pay, Action, ActionError, CostSpec, DuelEngine, DuelSetup,
    PayPlan, PaymentError, PlaySource,
};

pub use crate::ai::{AiConfig, AiPlayer, Difficulty, ThinkScheduler};
