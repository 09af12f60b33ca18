//! Engine error types.
//!
//! Illegal actions are ordinary, recoverable refusals: the engine rejects
//! the mutation, logs why, and leaves state untouched. Payment failures
//! after an affordability check are programming-logic failures; they abort
//! the in-flight action without committing its working clone.

use thiserror::Error;

use crate::cards::{CardId, Domain};
use crate::core::PlayerId;
use crate::state::{InstanceId, Phase};

/// Why an action was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("the duel is already over")]
    GameOver,

    #[error("{0} does not name a duel seat")]
    InvalidPlayer(PlayerId),

    #[error("only the priority holder may act")]
    NotPriorityHolder,

    #[error("only the turn player may do that")]
    NotTurnPlayer,

    #[error("not legal during the {0} phase")]
    WrongPhase(Phase),

    #[error("the chain must be empty to do that")]
    ChainNotEmpty,

    #[error("the chain is empty")]
    ChainEmpty,

    #[error("a reactive window is open")]
    WindowOpen,

    #[error("nothing to pass priority on")]
    NothingPending,

    #[error("unknown card {0}")]
    UnknownCard(CardId),

    #[error("unknown instance {0}")]
    UnknownInstance(InstanceId),

    #[error("card is not in the expected zone")]
    WrongZone,

    #[error("that card type cannot be played")]
    NotPlayable,

    #[error("a unit or gear play needs a destination")]
    MissingDestination,

    #[error("cannot afford the cost")]
    CannotAfford,

    #[error("no combination of runes covers the cost")]
    NoPayPlan,

    #[error("illegal target")]
    IllegalTarget,

    #[error("unit is not ready")]
    NotReady,

    #[error("unit is stunned")]
    Stunned,

    #[error("rune is already exhausted")]
    RuneExhausted,

    #[error("battlefield already holds a face-down card")]
    FaceDownOccupied,

    #[error("card lacks the Hidden keyword")]
    NotHidden,

    #[error("card lacks the Accelerate keyword")]
    NotAccelerate,

    #[error("mulligan already confirmed")]
    AlreadyConfirmed,

    #[error("legend ability already used this turn")]
    LegendUsed,

    #[error("malformed action: {0}")]
    Malformed(&'static str),

    #[error("internal payment failure: {0}")]
    Internal(#[from] PaymentError),
}

/// A payment step that should have been covered by an upstream
/// affordability check failed anyway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("energy underflow")]
    Energy,

    #[error("power underflow in {0}")]
    Power(Domain),
}
