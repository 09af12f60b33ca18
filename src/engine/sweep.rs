//! The state-based-action sweep.
//!
//! A single idempotent cleanup pass re-establishes the data-model
//! invariants after every mutation: units with lethal damage die,
//! evaporated contests are cleared, orphaned face-down cards are voided,
//! stranded gear recalls to base, and resource pools are clamped to zero.
//! It runs after every chain resolution, phase change, and combat step.

use crate::cards::{CardId, CardRegistry};
use crate::core::PlayerId;
use crate::state::{BattlefieldId, GameState, InstanceId, UnitZone};

use super::primitives;

/// A unit removed by the sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KilledUnit {
    /// The dead instance (now in its owner's trash).
    pub instance: InstanceId,
    /// The card it was printed from, for death-trigger lookup.
    pub card: CardId,
    /// Its owner.
    pub owner: PlayerId,
    /// Where it died, if at a battlefield.
    pub battlefield: Option<BattlefieldId>,
}

/// What the sweep did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Units that died to lethal damage, in discovery order.
    pub killed: Vec<KilledUnit>,
}

/// Run the sweep until quiescent.
pub fn run(registry: &CardRegistry, state: &mut GameState) -> SweepReport {
    let mut report = SweepReport::default();

    kill_lethal_units(registry, state, &mut report);
    clear_evaporated_contests(state);
    void_orphaned_face_downs(state);
    recall_stranded_gear(state);
    clamp_pools(state);

    report
}

/// A unit with `damage >= effective_might > 0` dies. Zero-might units are
/// never killed by damage alone.
fn kill_lethal_units(registry: &CardRegistry, state: &mut GameState, report: &mut SweepReport) {
    let mut doomed: Vec<(InstanceId, CardId, PlayerId, UnitZone)> = Vec::new();

    for player in PlayerId::both() {
        for &instance in state.units_in_play(player).iter() {
            let Some(card) = state.card(instance) else {
                continue;
            };
            let Some(def) = registry.get(card.card) else {
                continue;
            };
            let Some(base) = def.might() else {
                continue;
            };
            let effective = card.effective_might(base);
            if effective > 0 && card.damage >= effective {
                if let Some((owner, zone)) = state.find_unit(instance) {
                    doomed.push((instance, card.card, owner, zone));
                }
            }
        }
    }

    for (instance, card_id, owner, zone) in doomed {
        let name = card_name(registry, state, instance);
        let battlefield = match zone {
            UnitZone::Base => {
                state.players[owner].remove_base_unit(instance);
                None
            }
            UnitZone::Battlefield(bf) => {
                state.battlefield_mut(bf).remove_unit(owner, instance);
                Some(bf)
            }
        };
        primitives::put_in_trash(state, owner, instance);
        report.killed.push(KilledUnit {
            instance,
            card: card_id,
            owner,
            battlefield,
        });

        state.log_event(format!("{name} is destroyed"));
    }
}

/// A contester with no units left has no claim; the contest (and any owed
/// showdown) evaporates. Battlefields under an open window are left for
/// the window machinery to resolve.
fn clear_evaporated_contests(state: &mut GameState) {
    let windowed = state.window.battlefield();

    for bf in BattlefieldId::both() {
        if windowed == Some(bf) {
            continue;
        }
        let battlefield = state.battlefield(bf);
        if let Some(contester) = battlefield.contester {
            if !battlefield.has_units(contester) {
                let battlefield = state.battlefield_mut(bf);
                battlefield.contester = None;
                battlefield.pending_showdown = false;
                state.log_event(format!("the contest at {bf} evaporates"));
            }
        }
    }
}

/// A face-down card is only legal while its owner controls the
/// battlefield; otherwise it is voided to the owner's trash.
fn void_orphaned_face_downs(state: &mut GameState) {
    for bf in BattlefieldId::both() {
        let battlefield = state.battlefield(bf);
        if let Some(face_down) = battlefield.face_down {
            if battlefield.controller != Some(face_down.owner) {
                state.battlefield_mut(bf).face_down = None;
                if let Some(card) = state.card_mut(face_down.instance) {
                    card.clear_on_leave_play();
                }
                state.players[face_down.owner]
                    .trash
                    .push_back(face_down.instance);
                state.log_event(format!("a face-down card at {bf} is voided"));
            }
        }
    }
}

/// Gear cannot hold ground on its own; with no friendly units at the
/// battlefield it recalls to base.
fn recall_stranded_gear(state: &mut GameState) {
    for bf in BattlefieldId::both() {
        for player in PlayerId::both() {
            let battlefield = state.battlefield(bf);
            if battlefield.gear[player].is_empty() || battlefield.has_units(player) {
                continue;
            }
            let stranded: Vec<InstanceId> =
                battlefield.gear[player].iter().copied().collect();
            let battlefield = state.battlefield_mut(bf);
            for &gear in &stranded {
                battlefield.remove_gear(player, gear);
            }
            for gear in stranded {
                state.players[player].base_gear.push_back(gear);
            }
            state.log_event(format!("{player}'s gear recalls to base from {bf}"));
        }
    }
}

/// Pools must never be negative. A clamp firing means an upstream payment
/// skipped its affordability check, so it is logged loudly.
fn clamp_pools(state: &mut GameState) {
    for player in PlayerId::both() {
        if state.players[player].pool.clamp_non_negative() {
            tracing::warn!(%player, "resource pool clamped to zero");
            state.log_event(format!("{player}'s resource pool was clamped"));
        }
    }
}

fn card_name(registry: &CardRegistry, state: &GameState, instance: InstanceId) -> String {
    state
        .card(instance)
        .and_then(|c| registry.get(c.card))
        .map_or_else(|| format!("{instance}"), |def| def.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDef, CardId};
    use crate::core::PerPlayer;
    use crate::state::CardInstance;

    fn setup() -> (CardRegistry, GameState) {
        let registry = CardRegistry::with_cards([
            CardDef::unit(CardId::new(1), "Grunt", "Fury", 2, 1, 3),
            CardDef::unit(CardId::new(2), "Pacifist", "Calm", 1, 0, 0),
            CardDef::gear(CardId::new(3), "Banner", "Order", 1, 0),
        ]);
        let state = GameState::new(
            PerPlayer::with_value(CardId::new(900)),
            [CardId::new(500), CardId::new(501)],
            42,
        );
        (registry, state)
    }

    fn spawn_unit(
        state: &mut GameState,
        card: CardId,
        owner: PlayerId,
        bf: Option<BattlefieldId>,
    ) -> InstanceId {
        let id = state.alloc_instance();
        state.add_card(CardInstance::new(id, card, owner));
        match bf {
            Some(bf) => state.battlefield_mut(bf).units[owner].push_back(id),
            None => state.players[owner].base_units.push_back(id),
        }
        id
    }

    #[test]
    fn test_lethal_damage_kills() {
        let (registry, mut state) = setup();
        let p0 = PlayerId::new(0);
        let unit = spawn_unit(&mut state, CardId::new(1), p0, Some(BattlefieldId::new(0)));

        state.card_mut(unit).unwrap().damage = 3;
        let report = run(&registry, &mut state);

        assert_eq!(report.killed.len(), 1);
        assert_eq!(report.killed[0].instance, unit);
        assert_eq!(report.killed[0].battlefield, Some(BattlefieldId::new(0)));
        assert!(state.players[p0].trash.contains(&unit));
        assert!(!state.battlefield(BattlefieldId::new(0)).has_units(p0));
    }

    #[test]
    fn test_sublethal_damage_survives() {
        let (registry, mut state) = setup();
        let unit = spawn_unit(&mut state, CardId::new(1), PlayerId::new(0), None);

        state.card_mut(unit).unwrap().damage = 2;
        let report = run(&registry, &mut state);

        assert!(report.killed.is_empty());
        assert!(state.players[PlayerId::new(0)].base_units.contains(&unit));
    }

    #[test]
    fn test_zero_might_never_dies_to_damage() {
        let (registry, mut state) = setup();
        let unit = spawn_unit(&mut state, CardId::new(2), PlayerId::new(0), None);

        state.card_mut(unit).unwrap().damage = 10;
        let report = run(&registry, &mut state);

        assert!(report.killed.is_empty());
    }

    #[test]
    fn test_buffed_unit_survives_old_lethal() {
        let (registry, mut state) = setup();
        let unit = spawn_unit(&mut state, CardId::new(1), PlayerId::new(0), None);

        let card = state.card_mut(unit).unwrap();
        card.damage = 3;
        card.turn_bonus = 1; // Effective might 4 now

        let report = run(&registry, &mut state);
        assert!(report.killed.is_empty());
    }

    #[test]
    fn test_contest_evaporates_when_contester_wiped() {
        let (registry, mut state) = setup();
        let p0 = PlayerId::new(0);
        let bf = BattlefieldId::new(0);
        let unit = spawn_unit(&mut state, CardId::new(1), p0, Some(bf));

        state.battlefield_mut(bf).contester = Some(p0);
        state.battlefield_mut(bf).pending_showdown = true;
        state.card_mut(unit).unwrap().damage = 5;

        run(&registry, &mut state);

        assert_eq!(state.battlefield(bf).contester, None);
        assert!(!state.battlefield(bf).pending_showdown);
    }

    #[test]
    fn test_face_down_voided_when_control_lost() {
        use crate::state::FaceDownCard;

        let (registry, mut state) = setup();
        let p0 = PlayerId::new(0);
        let bf = BattlefieldId::new(1);

        let hidden = state.alloc_instance();
        state.add_card(CardInstance::new(hidden, CardId::new(1), p0));
        state.battlefield_mut(bf).face_down = Some(FaceDownCard {
            owner: p0,
            instance: hidden,
        });
        // p1 controls the battlefield, so p0's face-down is illegal.
        state.battlefield_mut(bf).controller = Some(PlayerId::new(1));

        run(&registry, &mut state);

        assert!(state.battlefield(bf).face_down.is_none());
        assert!(state.players[p0].trash.contains(&hidden));
    }

    #[test]
    fn test_stranded_gear_recalls() {
        let (registry, mut state) = setup();
        let p0 = PlayerId::new(0);
        let bf = BattlefieldId::new(0);

        let gear = state.alloc_instance();
        state.add_card(CardInstance::new(gear, CardId::new(3), p0));
        state.battlefield_mut(bf).gear[p0].push_back(gear);

        run(&registry, &mut state);

        assert!(state.battlefield(bf).gear[p0].is_empty());
        assert!(state.players[p0].base_gear.contains(&gear));
    }

    #[test]
    fn test_gear_stays_with_friendly_units() {
        let (registry, mut state) = setup();
        let p0 = PlayerId::new(0);
        let bf = BattlefieldId::new(0);

        spawn_unit(&mut state, CardId::new(1), p0, Some(bf));
        let gear = state.alloc_instance();
        state.add_card(CardInstance::new(gear, CardId::new(3), p0));
        state.battlefield_mut(bf).gear[p0].push_back(gear);

        run(&registry, &mut state);

        assert!(state.battlefield(bf).gear[p0].contains(&gear));
    }

    #[test]
    fn test_pool_clamped() {
        let (registry, mut state) = setup();
        state.players[PlayerId::new(0)].pool.energy = -3;

        run(&registry, &mut state);

        assert_eq!(state.players[PlayerId::new(0)].pool.energy, 0);
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let (registry, mut state) = setup();
        let unit = spawn_unit(&mut state, CardId::new(1), PlayerId::new(0), None);
        state.card_mut(unit).unwrap().damage = 5;

        let first = run(&registry, &mut state);
        assert_eq!(first.killed.len(), 1);

        let second = run(&registry, &mut state);
        assert!(second.killed.is_empty());
    }
}
