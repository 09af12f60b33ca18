//! Core types: seat identifiers, per-seat storage, deterministic RNG,
//! and the running game log.

pub mod log;
pub mod player;
pub mod rng;

pub use log::{GameLog, LogEntry};
pub use player::{PerPlayer, PlayerId};
pub use rng::{DuelRng, DuelRngState};
