//! Duel state: aggregates, instances, resources, and the redacted
//! projection.
//!
//! ## Key Types
//!
//! - `GameState`: the root aggregate, owned exclusively by the engine
//! - `PlayerState` / `BattlefieldState`: the two seats and two locations
//! - `CardInstance` / `RuneInstance`: runtime card state
//! - `ResourcePool`: energy + per-domain power
//! - `ChainItem` / `Target`: pending effects and their targets
//! - `project`: the sole observation channel for external callers

pub mod battlefield;
pub mod chain;
pub mod game;
pub mod instance;
pub mod player;
pub mod pool;
pub mod target;
pub mod view;

pub use battlefield::{BattlefieldId, BattlefieldState, FaceDownCard};
pub use chain::{ChainItem, ChainKind};
pub use game::{CombatStep, GameState, Phase, Resolution, Window, VICTORY_THRESHOLD};
pub use instance::{CardInstance, InstanceId, RuneInstance};
pub use player::PlayerState;
pub use pool::ResourcePool;
pub use target::{Destination, Target, TargetRequirement, UnitRef, UnitZone};
pub use view::{project, PrivacyConfig};
