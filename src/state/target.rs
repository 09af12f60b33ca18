//! Targets and destinations.
//!
//! Targets are declared when a play or ability is committed but only
//! consumed when the chain item resolves. Because state can change in
//! between, unit references carry their last-known zone and are
//! re-validated at resolution time.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

use super::battlefield::BattlefieldId;
use super::instance::InstanceId;

/// Where a unit was when it was targeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitZone {
    /// The owner's base.
    Base,
    /// A battlefield.
    Battlefield(BattlefieldId),
}

/// A reference to a unit in play, as seen at declaration time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitRef {
    /// The unit's owner.
    pub owner: PlayerId,
    /// The unit instance.
    pub instance: InstanceId,
    /// Last-known zone; the target is illegal if the unit has moved.
    pub zone: UnitZone,
}

/// A declared target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// No target declared.
    None,
    /// A unit in play.
    Unit(UnitRef),
    /// A battlefield.
    Battlefield(BattlefieldId),
}

impl Target {
    /// The unit reference, if this is a unit target.
    #[must_use]
    pub fn as_unit(&self) -> Option<&UnitRef> {
        match self {
            Target::Unit(unit) => Some(unit),
            _ => None,
        }
    }
}

/// Where a played card or moving unit ends up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    /// The acting player's base.
    Base,
    /// A battlefield.
    Battlefield(BattlefieldId),
}

/// How many targets a chain item's effect wants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRequirement {
    /// The effect takes no targets.
    #[default]
    None,
    /// The effect wants unit targets.
    Units {
        /// Maximum number of units.
        count: u8,
        /// If set, fewer (including zero) is legal.
        up_to: bool,
    },
}

impl TargetRequirement {
    /// True when at least one target must be declared for the effect to
    /// do anything.
    #[must_use]
    pub fn wants_targets(&self) -> bool {
        matches!(self, TargetRequirement::Units { .. })
    }

    /// The maximum number of declared targets this requirement accepts.
    #[must_use]
    pub fn max_targets(&self) -> usize {
        match self {
            TargetRequirement::None => 0,
            TargetRequirement::Units { count, .. } => *count as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_as_unit() {
        let unit = UnitRef {
            owner: PlayerId::new(0),
            instance: InstanceId::new(7),
            zone: UnitZone::Base,
        };

        assert!(Target::Unit(unit).as_unit().is_some());
        assert!(Target::None.as_unit().is_none());
        assert!(Target::Battlefield(BattlefieldId::new(0)).as_unit().is_none());
    }

    #[test]
    fn test_requirement_limits() {
        assert_eq!(TargetRequirement::None.max_targets(), 0);
        assert!(!TargetRequirement::None.wants_targets());

        let req = TargetRequirement::Units { count: 2, up_to: true };
        assert!(req.wants_targets());
        assert_eq!(req.max_targets(), 2);
    }

    #[test]
    fn test_serialization() {
        let target = Target::Unit(UnitRef {
            owner: PlayerId::new(1),
            instance: InstanceId::new(3),
            zone: UnitZone::Battlefield(BattlefieldId::new(1)),
        });

        let json = serde_json::to_string(&target).unwrap();
        let deserialized: Target = serde_json::from_str(&json).unwrap();
        assert_eq!(target, deserialized);
    }
}
