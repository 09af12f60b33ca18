//! The chain: pending plays and abilities awaiting resolution.
//!
//! Committing a play or activating an ability pushes a `ChainItem`; items
//! resolve top-first (LIFO) once both players pass priority, which is what
//! makes responses possible. Cost and play legality were already settled
//! when the item was pushed; resolution only re-validates targets.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardId;
use crate::core::PlayerId;

use super::battlefield::BattlefieldId;
use super::instance::InstanceId;
use super::target::{Destination, Target, TargetRequirement};

/// What happens beyond the effect text when a chain item resolves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainKind {
    /// A card being played. Units and gear enter `destination`;
    /// spells go to the trash.
    Play {
        /// The instance leaving hand/champion-zone/face-down.
        instance: InstanceId,
        /// Where a unit or gear lands. Ignored for spells.
        destination: Option<Destination>,
        /// Whether the accelerate surcharge was paid.
        accelerated: bool,
    },
    /// An activated or triggered ability; nothing moves zones.
    Ability {
        /// Source instance, when the ability came from a card in play.
        instance: Option<InstanceId>,
    },
}

/// A pending play or ability on the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainItem {
    /// Who committed this item and gets priority after it is pushed.
    pub controller: PlayerId,

    /// The card whose text is resolving.
    pub card: CardId,

    /// Effect text handed to the interpreter at resolution.
    pub effect: String,

    /// What the effect text wants targeted.
    pub needs_targets: TargetRequirement,

    /// Declared targets. May be amended via the set-targets action while
    /// the item is on top of the chain.
    pub targets: SmallVec<[Target; 2]>,

    /// Battlefield context for "here"-scoped effects.
    pub source_battlefield: Option<BattlefieldId>,

    /// Play vs ability behavior.
    pub kind: ChainKind,
}

impl ChainItem {
    /// True when the item still wants targets and has none declared.
    #[must_use]
    pub fn awaiting_targets(&self) -> bool {
        self.needs_targets.wants_targets() && self.targets.is_empty()
    }
}
