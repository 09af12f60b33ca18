//! Card and rune instances - runtime card state.
//!
//! A `CardInstance` is a card's in-play identity: a reference to its static
//! definition plus the mutable fields the rules touch. An instance occupies
//! exactly one zone at a time; moving it between zones is the only way it
//! changes hands.
//!
//! `RuneInstance` is deliberately smaller: a rune is only ever ready or
//! exhausted, and only ever in the rune deck or in play.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{CardId, Domain, Keyword};

/// Unique identifier for a card or rune instance within one duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Create a new instance ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

/// A card's runtime state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique id of this copy.
    pub id: InstanceId,

    /// The definition this copy was printed from.
    pub card: CardId,

    /// Owner. Control is positional: whoever's zone/list holds the
    /// instance controls it.
    pub owner: crate::core::PlayerId,

    /// Ready (can move, be sealed) vs exhausted.
    pub ready: bool,

    /// Damage marked on the unit; cleared at end of turn and on zone change.
    pub damage: i32,

    /// Permanent might modifier from effects.
    pub buff: i32,

    /// Might modifier that expires at end of turn.
    pub turn_bonus: i32,

    /// Stunned units cannot move or be exhausted for abilities.
    pub stunned: bool,

    /// Keywords granted permanently by effects.
    pub granted: SmallVec<[Keyword; 2]>,

    /// Keywords granted until end of turn.
    pub granted_this_turn: SmallVec<[Keyword; 2]>,
}

impl CardInstance {
    /// Create a fresh instance. New instances start exhausted; the turn
    /// machinery readies them where appropriate.
    #[must_use]
    pub fn new(id: InstanceId, card: CardId, owner: crate::core::PlayerId) -> Self {
        Self {
            id,
            card,
            owner,
            ready: false,
            damage: 0,
            buff: 0,
            turn_bonus: 0,
            stunned: false,
            granted: SmallVec::new(),
            granted_this_turn: SmallVec::new(),
        }
    }

    /// Effective might given the definition's base might.
    ///
    /// Never negative: buffs can reduce might to zero but not below.
    #[must_use]
    pub fn effective_might(&self, base: i32) -> i32 {
        (base + self.buff + self.turn_bonus).max(0)
    }

    /// Check for a keyword of the given kind among grants
    /// (permanent or this-turn).
    #[must_use]
    pub fn has_granted(&self, keyword: Keyword) -> bool {
        self.granted.iter().any(|k| k.same_kind(keyword))
            || self.granted_this_turn.iter().any(|k| k.same_kind(keyword))
    }

    /// Sum the magnitudes of granted keywords of the given kind.
    #[must_use]
    pub fn granted_magnitude(&self, keyword: Keyword) -> i32 {
        let value = |k: &Keyword| match *k {
            Keyword::Assault(n) | Keyword::Shield(n) => i32::from(n),
            _ => 1,
        };
        self.granted
            .iter()
            .chain(self.granted_this_turn.iter())
            .filter(|k| k.same_kind(keyword))
            .map(value)
            .sum()
    }

    /// Exhaust the instance.
    pub fn exhaust(&mut self) {
        self.ready = false;
    }

    /// Ready the instance.
    pub fn ready_up(&mut self) {
        self.ready = true;
    }

    /// Clear state that expires at end of turn: damage, this-turn
    /// bonus, this-turn keyword grants. Stun is cleared separately,
    /// before this runs.
    pub fn clear_turn_state(&mut self) {
        self.damage = 0;
        self.turn_bonus = 0;
        self.granted_this_turn.clear();
    }

    /// Reset everything that does not survive leaving play.
    pub fn clear_on_leave_play(&mut self) {
        self.ready = false;
        self.damage = 0;
        self.buff = 0;
        self.turn_bonus = 0;
        self.stunned = false;
        self.granted.clear();
        self.granted_this_turn.clear();
    }
}

/// A rune's runtime state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuneInstance {
    /// Unique id of this rune.
    pub id: InstanceId,

    /// The rune card this copy was printed from.
    pub card: CardId,

    /// The domain of power this rune yields on recycle.
    pub domain: Domain,

    /// Ready runes can be exhausted for energy.
    pub ready: bool,
}

impl RuneInstance {
    /// Create a rune instance, ready.
    #[must_use]
    pub fn new(id: InstanceId, card: CardId, domain: Domain) -> Self {
        Self {
            id,
            card,
            domain,
            ready: true,
        }
    }
}
