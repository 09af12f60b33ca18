//! The action API: the closed set of operations external callers may
//! submit.
//!
//! Every action is validated for shape before it touches state (wrong
//! player tags and missing required fields are rejected up front), then
//! validated for legality against the current phase, priority, and window.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::state::{BattlefieldId, Destination, InstanceId, Target};

use super::error::ActionError;

/// Where a played card is coming from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaySource {
    /// The player's hand.
    Hand,
    /// The champion zone.
    Champion,
    /// The player's face-down card at a battlefield.
    FaceDown(BattlefieldId),
}

/// An operation submitted by a player (human or AI).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Step the turn machine forward. Turn player only; the chain must be
    /// empty and no window open.
    AdvancePhase,

    /// Pass priority. Two consecutive passes resolve the chain top or
    /// close the active window.
    PassPriority,

    /// Confirm the opening hand, recycling up to two cards to the bottom
    /// of the deck and drawing replacements.
    ConfirmMulligan {
        /// Hand cards to put back (at most 2).
        recycle: SmallVec<[InstanceId; 2]>,
    },

    /// Declare or replace targets for the top chain item.
    SetChainTargets {
        /// The new target list.
        targets: SmallVec<[Target; 2]>,
    },

    /// Play a card.
    PlayCard {
        /// Where the card is now.
        source: PlaySource,
        /// The instance being played.
        card: InstanceId,
        /// Where a unit or gear lands. Required for those types.
        destination: Option<Destination>,
        /// Pay the accelerate surcharge to arrive ready.
        accelerate: bool,
        /// Declared targets for the card's effect.
        targets: SmallVec<[Target; 2]>,
        /// Let the engine exhaust/recycle runes to cover the cost.
        auto_pay: bool,
    },

    /// Place a Hidden card face-down at a controlled battlefield.
    PlaceFaceDown {
        /// The hand card (must have the Hidden keyword).
        card: InstanceId,
        /// Where to hide it.
        battlefield: BattlefieldId,
    },

    /// Move ready units between base and a battlefield.
    StandardMove {
        /// The units to move. All must be ready and unstunned.
        units: SmallVec<[InstanceId; 4]>,
        /// Where they are going. `Base` retreats them home.
        to: Destination,
    },

    /// Exhaust a ready rune for one energy.
    ExhaustRune {
        /// The rune in play.
        rune: InstanceId,
    },

    /// Recycle a rune in play for one power of its domain; the rune goes
    /// to the bottom of the rune deck.
    RecycleRune {
        /// The rune in play.
        rune: InstanceId,
    },

    /// Exhaust ("seal") a gear to activate its ability.
    SealGear {
        /// The gear at the player's base.
        gear: InstanceId,
    },

    /// Activate the player's legend ability. Once per turn.
    ActivateLegend,
}

fn has_duplicates(ids: &[InstanceId]) -> bool {
    ids.iter()
        .enumerate()
        .any(|(i, id)| ids[..i].contains(id))
}

impl Action {
    /// Reject structurally malformed actions before any state is read.
    pub fn validate_shape(&self) -> Result<(), ActionError> {
        match self {
            Action::ConfirmMulligan { recycle } => {
                if recycle.len() > 2 {
                    return Err(ActionError::Malformed("at most 2 mulligan recycles"));
                }
                if has_duplicates(recycle) {
                    return Err(ActionError::Malformed("duplicate recycle ids"));
                }
                Ok(())
            }
            Action::StandardMove { units, .. } => {
                if units.is_empty() {
                    return Err(ActionError::Malformed("a move needs at least one unit"));
                }
                if has_duplicates(units) {
                    return Err(ActionError::Malformed("duplicate unit ids"));
                }
                Ok(())
            }
            Action::SetChainTargets { targets } => {
                if targets.is_empty() {
                    return Err(ActionError::Malformed("set-targets needs targets"));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Action::AdvancePhase => "advance phase",
            Action::PassPriority => "pass priority",
            Action::ConfirmMulligan { .. } => "confirm mulligan",
            Action::SetChainTargets { .. } => "set targets",
            Action::PlayCard { .. } => "play card",
            Action::PlaceFaceDown { .. } => "place face-down",
            Action::StandardMove { .. } => "standard move",
            Action::ExhaustRune { .. } => "exhaust rune",
            Action::RecycleRune { .. } => "recycle rune",
            Action::SealGear { .. } => "seal gear",
            Action::ActivateLegend => "activate legend",
        }
    }
}
