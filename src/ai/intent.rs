//! Legal intent enumeration.
//!
//! Candidates are generated from the acting player's current
//! phase/priority/window context: mulligan choices, chain-target
//! choices, phase advancement, plays with destinations and optional
//! accelerate payment, standard moves, face-down placements and
//! hidden-card plays, gear seals, and legend activation. Every play
//! candidate auto-pays; the engine re-checks full legality when a
//! candidate is applied, so enumeration may stay permissive.

use smallvec::{smallvec, SmallVec};

use crate::cards::{AbilityTrigger, CardKind, Keyword};
use crate::core::PlayerId;
use crate::engine::{required_targets, Action, DuelEngine, PlaySource};
use crate::state::{
    BattlefieldId, Destination, InstanceId, Phase, Resolution, Target, TargetRequirement, UnitRef,
};

/// Enumerate candidate actions for `player`, bounded by `cap`.
#[must_use]
pub fn enumerate(engine: &DuelEngine, player: PlayerId, cap: usize) -> Vec<Action> {
    let state = engine.state();
    let mut intents = Vec::new();

    if state.is_over() {
        return intents;
    }

    if state.phase == Phase::Mulligan {
        if !state.players[player].mulligan_confirmed {
            mulligan_intents(engine, player, &mut intents);
        }
        intents.truncate(cap);
        return intents;
    }

    if state.priority != player {
        return intents;
    }

    // A chain item of ours waiting on targets comes first.
    if let Some(top) = state.chain_top() {
        if top.controller == player && top.awaiting_targets() {
            target_intents(engine, top.needs_targets, &mut intents);
        }
    }

    let reactive_context =
        state.window.is_open() || state.resolution == Resolution::Closed;
    if reactive_context {
        intents.push(Action::PassPriority);
        reactive_intents(engine, player, &mut intents);
    } else if state.phase == Phase::Action && state.turn_player == player {
        intents.push(Action::AdvancePhase);
        sorcery_intents(engine, player, &mut intents);
    } else if state.turn_player == player {
        intents.push(Action::AdvancePhase);
    }

    intents.truncate(cap);
    intents
}

/// Keep the hand, or recycle the most expensive one or two cards.
fn mulligan_intents(engine: &DuelEngine, player: PlayerId, out: &mut Vec<Action>) {
    let state = engine.state();

    let mut by_cost: Vec<(i32, InstanceId)> = state.players[player]
        .hand
        .iter()
        .filter_map(|&id| {
            let card = state.card(id)?;
            let def = engine.registry().get(card.card)?;
            Some((def.energy_cost + def.power_cost, id))
        })
        .collect();
    by_cost.sort_by_key(|(cost, _)| std::cmp::Reverse(*cost));

    out.push(Action::ConfirmMulligan {
        recycle: SmallVec::new(),
    });
    if let Some(&(_, worst)) = by_cost.first() {
        out.push(Action::ConfirmMulligan {
            recycle: smallvec![worst],
        });
    }
    if by_cost.len() >= 2 {
        out.push(Action::ConfirmMulligan {
            recycle: smallvec![by_cost[0].1, by_cost[1].1],
        });
    }
}

/// One candidate per legal unit target for the top chain item.
fn target_intents(
    engine: &DuelEngine,
    requirement: TargetRequirement,
    out: &mut Vec<Action>,
) {
    let state = engine.state();
    let mut unit_refs: Vec<UnitRef> = Vec::new();
    for owner in PlayerId::both() {
        for instance in state.units_in_play(owner) {
            if let Some((owner, zone)) = state.find_unit(instance) {
                unit_refs.push(UnitRef {
                    owner,
                    instance,
                    zone,
                });
            }
        }
    }

    for unit in &unit_refs {
        out.push(Action::SetChainTargets {
            targets: smallvec![Target::Unit(*unit)],
        });
    }
    // For multi-target effects, offer the first-k bundle as well.
    let max = requirement.max_targets();
    if max > 1 && unit_refs.len() >= 2 {
        let bundle: SmallVec<[Target; 2]> = unit_refs
            .iter()
            .take(max)
            .map(|u| Target::Unit(*u))
            .collect();
        out.push(Action::SetChainTargets { targets: bundle });
    }
}

/// Plays legal while responding: spells, hidden-card plays, gear seals,
/// the legend.
fn reactive_intents(engine: &DuelEngine, player: PlayerId, out: &mut Vec<Action>) {
    let state = engine.state();

    for &card in state.players[player].hand.iter() {
        let Some(instance) = state.card(card) else { continue };
        let Some(def) = engine.registry().get(instance.card) else {
            continue;
        };
        if def.is_spell() {
            spell_intents(engine, card, &def.ability.effect, out);
        }
    }

    for bf in BattlefieldId::both() {
        if let Some(face_down) = state.battlefield(bf).face_down {
            if face_down.owner == player {
                face_down_intents(engine, bf, face_down.instance, out);
            }
        }
    }

    seal_intents(engine, player, out);
    legend_intent(engine, player, out);
}

/// Sorcery-speed candidates for the turn player's action phase.
fn sorcery_intents(engine: &DuelEngine, player: PlayerId, out: &mut Vec<Action>) {
    let state = engine.state();

    // Plays from hand.
    let hand: Vec<InstanceId> = state.players[player].hand.iter().copied().collect();
    for card in hand {
        let Some(instance) = state.card(card) else { continue };
        let Some(def) = engine.registry().get(instance.card) else {
            continue;
        };
        match def.kind {
            CardKind::Unit { .. } => unit_play_intents(card, def.has_keyword(Keyword::Accelerate), out),
            CardKind::Gear => out.push(Action::PlayCard {
                source: PlaySource::Hand,
                card,
                destination: Some(Destination::Base),
                accelerate: false,
                targets: SmallVec::new(),
                auto_pay: true,
            }),
            CardKind::Spell => spell_intents(engine, card, &def.ability.effect, out),
            _ => {}
        }

        if def.has_keyword(Keyword::Hidden) {
            for bf in BattlefieldId::both() {
                if state.battlefield(bf).is_controlled_by(player)
                    && state.battlefield(bf).face_down.is_none()
                {
                    out.push(Action::PlaceFaceDown {
                        card,
                        battlefield: bf,
                    });
                }
            }
        }
    }

    // The champion-in-waiting.
    if let Some(champion) = state.players[player].champion {
        for bf in BattlefieldId::both() {
            out.push(Action::PlayCard {
                source: PlaySource::Champion,
                card: champion,
                destination: Some(Destination::Battlefield(bf)),
                accelerate: false,
                targets: SmallVec::new(),
                auto_pay: true,
            });
        }
        out.push(Action::PlayCard {
            source: PlaySource::Champion,
            card: champion,
            destination: Some(Destination::Base),
            accelerate: false,
            targets: SmallVec::new(),
            auto_pay: true,
        });
    }

    // Standard moves: the full ready squad to each battlefield, and full
    // retreats home.
    let squad: SmallVec<[InstanceId; 4]> = state.players[player]
        .base_units
        .iter()
        .copied()
        .filter(|&id| {
            state
                .card(id)
                .map_or(false, |c| c.ready && !c.stunned)
        })
        .collect();
    if !squad.is_empty() {
        for bf in BattlefieldId::both() {
            out.push(Action::StandardMove {
                units: squad.clone(),
                to: Destination::Battlefield(bf),
            });
        }
    }
    for bf in BattlefieldId::both() {
        let retreat: SmallVec<[InstanceId; 4]> = state.battlefield(bf).units[player]
            .iter()
            .copied()
            .filter(|&id| {
                state
                    .card(id)
                    .map_or(false, |c| c.ready && !c.stunned)
            })
            .collect();
        if !retreat.is_empty() {
            out.push(Action::StandardMove {
                units: retreat,
                to: Destination::Base,
            });
        }
    }

    seal_intents(engine, player, out);
    legend_intent(engine, player, out);
}

/// One unit-play candidate per destination; with Accelerate, a paid
/// variant for battlefield arrivals.
fn unit_play_intents(card: InstanceId, accelerate: bool, out: &mut Vec<Action>) {
    let mut destinations = vec![Destination::Base];
    destinations.extend(BattlefieldId::both().map(Destination::Battlefield));

    for destination in destinations {
        out.push(Action::PlayCard {
            source: PlaySource::Hand,
            card,
            destination: Some(destination),
            accelerate: false,
            targets: SmallVec::new(),
            auto_pay: true,
        });
        if accelerate && matches!(destination, Destination::Battlefield(_)) {
            out.push(Action::PlayCard {
                source: PlaySource::Hand,
                card,
                destination: Some(destination),
                accelerate: true,
                targets: SmallVec::new(),
                auto_pay: true,
            });
        }
    }
}

/// Spell candidates: untargeted, or one per legal unit target.
fn spell_intents(
    engine: &DuelEngine,
    card: InstanceId,
    effect: &str,
    out: &mut Vec<Action>,
) {
    let state = engine.state();
    let play = |targets: SmallVec<[Target; 2]>| Action::PlayCard {
        source: PlaySource::Hand,
        card,
        destination: None,
        accelerate: false,
        targets,
        auto_pay: true,
    };

    match required_targets(effect) {
        TargetRequirement::None => out.push(play(SmallVec::new())),
        TargetRequirement::Units { .. } => {
            let mut any = false;
            for owner in PlayerId::both() {
                for instance in state.units_in_play(owner) {
                    if let Some((owner, zone)) = state.find_unit(instance) {
                        out.push(play(smallvec![Target::Unit(UnitRef {
                            owner,
                            instance,
                            zone,
                        })]));
                        any = true;
                    }
                }
            }
            if !any {
                out.push(play(SmallVec::new()));
            }
        }
    }
}

/// A hidden card flips out for each destination a unit could take; other
/// types just resolve from where they hide.
fn face_down_intents(
    engine: &DuelEngine,
    bf: BattlefieldId,
    card: InstanceId,
    out: &mut Vec<Action>,
) {
    let state = engine.state();
    let Some(instance) = state.card(card) else { return };
    let Some(def) = engine.registry().get(instance.card) else {
        return;
    };

    match def.kind {
        CardKind::Unit { .. } => out.push(Action::PlayCard {
            source: PlaySource::FaceDown(bf),
            card,
            destination: Some(Destination::Battlefield(bf)),
            accelerate: false,
            targets: SmallVec::new(),
            auto_pay: true,
        }),
        CardKind::Spell => out.push(Action::PlayCard {
            source: PlaySource::FaceDown(bf),
            card,
            destination: None,
            accelerate: false,
            targets: SmallVec::new(),
            auto_pay: true,
        }),
        _ => {}
    }
}

fn seal_intents(engine: &DuelEngine, player: PlayerId, out: &mut Vec<Action>) {
    let state = engine.state();
    for &gear in state.players[player].base_gear.iter() {
        let Some(instance) = state.card(gear) else { continue };
        if !instance.ready {
            continue;
        }
        let Some(def) = engine.registry().get(instance.card) else {
            continue;
        };
        if def.ability.trigger == AbilityTrigger::Activated && !def.ability.effect.is_empty() {
            out.push(Action::SealGear { gear });
        }
    }
}

fn legend_intent(engine: &DuelEngine, player: PlayerId, out: &mut Vec<Action>) {
    let state = engine.state();
    if state.players[player].legend_used {
        return;
    }
    let Some(def) = engine.registry().get(state.players[player].legend) else {
        return;
    };
    if def.ability.trigger == AbilityTrigger::Activated && !def.ability.effect.is_empty() {
        out.push(Action::ActivateLegend);
    }
}
