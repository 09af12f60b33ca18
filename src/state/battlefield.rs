//! Battlefield state.
//!
//! A duel is fought over two battlefields. Each tracks its controller,
//! an optional contester, per-player unit and gear lists, and at most one
//! face-down card. Control persists when units leave; it changes only
//! through showdown and combat resolution.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{PerPlayer, PlayerId};

use super::instance::InstanceId;

/// Index of a battlefield (0 or 1 in a duel).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BattlefieldId(pub u8);

impl BattlefieldId {
    /// Create a new battlefield ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over both duel battlefields.
    pub fn both() -> impl Iterator<Item = BattlefieldId> {
        (0..2u8).map(BattlefieldId)
    }
}

impl std::fmt::Display for BattlefieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Battlefield {}", self.0)
    }
}

/// A face-down card at a battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceDownCard {
    /// Who placed it (must control the battlefield to keep it).
    pub owner: PlayerId,
    /// The hidden instance.
    pub instance: InstanceId,
}

/// One contested location.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BattlefieldState {
    /// The battlefield card.
    pub card: CardId,

    /// Current controller. `None` until someone conquers it.
    pub controller: Option<PlayerId>,

    /// A player contesting control; set by moves and plays into hostile
    /// ground, cleared by showdown/combat resolution.
    pub contester: Option<PlayerId>,

    /// At most one face-down card, total, per battlefield.
    pub face_down: Option<FaceDownCard>,

    /// Units present, per player.
    pub units: PerPlayer<Vector<InstanceId>>,

    /// Gear present, per player. Gear never survives cleanup here.
    pub gear: PerPlayer<Vector<InstanceId>>,

    /// A showdown window is owed to this battlefield.
    pub pending_showdown: bool,
}

impl BattlefieldState {
    /// A fresh, uncontrolled battlefield.
    #[must_use]
    pub fn new(card: CardId) -> Self {
        Self {
            card,
            controller: None,
            contester: None,
            face_down: None,
            units: PerPlayer::with_default(),
            gear: PerPlayer::with_default(),
            pending_showdown: false,
        }
    }

    /// Number of units a player has here.
    #[must_use]
    pub fn unit_count(&self, player: PlayerId) -> usize {
        self.units[player].len()
    }

    /// True if the player has any units here.
    #[must_use]
    pub fn has_units(&self, player: PlayerId) -> bool {
        !self.units[player].is_empty()
    }

    /// True if the player controls this battlefield.
    #[must_use]
    pub fn is_controlled_by(&self, player: PlayerId) -> bool {
        self.controller == Some(player)
    }

    /// True if playing or moving units here contests it for `player`:
    /// the opponent controls it, has units here, or it is simply not
    /// yet controlled by `player`.
    #[must_use]
    pub fn is_hostile_to(&self, player: PlayerId) -> bool {
        !self.is_controlled_by(player) || self.has_units(player.opponent())
    }

    /// Remove a unit from this battlefield's lists.
    ///
    /// Returns true if the unit was present.
    pub fn remove_unit(&mut self, player: PlayerId, instance: InstanceId) -> bool {
        let units = &mut self.units[player];
        if let Some(pos) = units.iter().position(|&u| u == instance) {
            units.remove(pos);
            true
        } else {
            false
        }
    }

    /// Remove a gear from this battlefield's lists.
    pub fn remove_gear(&mut self, player: PlayerId, instance: InstanceId) -> bool {
        let gear = &mut self.gear[player];
        if let Some(pos) = gear.iter().position(|&g| g == instance) {
            gear.remove(pos);
            true
        } else {
            false
        }
    }
}
