//! Player-initiated plays and board actions: playing cards (with cost
//! payment and auto-pay), face-down placements, standard moves, manual
//! rune use, gear seals, and legend activation.
//!
//! Timing model: units and gear are sorcery-speed (turn player, open
//! state, action phase); spells, face-down plays, gear seals, and legend
//! abilities are reactive and only need priority.

use crate::cards::{AbilityTrigger, CardKind, CardRegistry, Keyword};
use crate::core::PlayerId;
use crate::state::{
    BattlefieldId, ChainItem, ChainKind, Destination, FaceDownCard, GameState, InstanceId,
    Phase, Resolution, Target, UnitZone,
};

use super::action::PlaySource;
use super::error::ActionError;
use super::{chain, cost, interpret};

/// Extra energy to arrive ready via Accelerate.
const ACCELERATE_SURCHARGE: i32 = 1;

/// Extra energy per enemy Deflect unit targeted.
const DEFLECT_SURCHARGE: i32 = 1;

fn require_priority(state: &GameState, player: PlayerId) -> Result<(), ActionError> {
    if state.phase == Phase::Mulligan {
        return Err(ActionError::WrongPhase(Phase::Mulligan));
    }
    if state.priority != player {
        return Err(ActionError::NotPriorityHolder);
    }
    Ok(())
}

fn require_sorcery_speed(state: &GameState, player: PlayerId) -> Result<(), ActionError> {
    require_priority(state, player)?;
    if state.phase != Phase::Action {
        return Err(ActionError::WrongPhase(state.phase));
    }
    if state.window.is_open() {
        return Err(ActionError::WindowOpen);
    }
    if state.resolution != Resolution::Open {
        return Err(ActionError::ChainNotEmpty);
    }
    if state.turn_player != player {
        return Err(ActionError::NotTurnPlayer);
    }
    Ok(())
}

/// The Deflect tax on a declared target list.
fn deflect_surcharge(
    registry: &CardRegistry,
    state: &GameState,
    player: PlayerId,
    targets: &[Target],
) -> i32 {
    targets
        .iter()
        .filter_map(Target::as_unit)
        .filter(|unit| unit.owner == player.opponent())
        .filter(|unit| {
            let Some(card) = state.card(unit.instance) else {
                return false;
            };
            let printed = registry
                .get(card.card)
                .is_some_and(|d| d.has_keyword(Keyword::Deflect));
            printed || card.has_granted(Keyword::Deflect)
        })
        .count() as i32
        * DEFLECT_SURCHARGE
}

/// Settle a cost from the pool, optionally planning rune usage first.
fn settle_cost(
    state: &mut GameState,
    player: PlayerId,
    spec: &cost::CostSpec,
    auto_pay: bool,
) -> Result<(), ActionError> {
    if spec.is_free() {
        return Ok(());
    }
    if auto_pay {
        let plan =
            cost::plan_auto_pay(&state.players[player], spec).ok_or(ActionError::NoPayPlan)?;
        cost::execute_plan(&mut state.players[player], &plan)?;
    } else if !cost::can_afford(&state.players[player].pool, spec) {
        return Err(ActionError::CannotAfford);
    }
    cost::pay(&mut state.players[player].pool, spec)?;
    Ok(())
}

/// Play a card from hand, champion zone, or face-down.
#[allow(clippy::too_many_arguments)]
pub(crate) fn play_card(
    registry: &CardRegistry,
    state: &mut GameState,
    player: PlayerId,
    source: PlaySource,
    instance: InstanceId,
    destination: Option<Destination>,
    accelerate: bool,
    targets: &[Target],
    auto_pay: bool,
) -> Result<(), ActionError> {
    // Locate the card in its claimed source zone.
    match source {
        PlaySource::Hand => {
            if !state.players[player].hand.contains(&instance) {
                return Err(ActionError::WrongZone);
            }
        }
        PlaySource::Champion => {
            if state.players[player].champion != Some(instance) {
                return Err(ActionError::WrongZone);
            }
        }
        PlaySource::FaceDown(bf) => {
            let face_down = state.battlefield(bf).face_down;
            if face_down.map(|f| (f.owner, f.instance)) != Some((player, instance)) {
                return Err(ActionError::WrongZone);
            }
        }
    }

    let card_id = state
        .card(instance)
        .ok_or(ActionError::UnknownInstance(instance))?
        .card;
    let def = registry.get(card_id).ok_or(ActionError::UnknownCard(card_id))?;

    // Timing: spells and face-down plays are reactive; units and gear
    // from hand or champion zone are sorcery-speed.
    let reactive = def.is_spell() || matches!(source, PlaySource::FaceDown(_));
    if reactive {
        require_priority(state, player)?;
    } else {
        require_sorcery_speed(state, player)?;
    }

    let destination = match def.kind {
        CardKind::Unit { .. } => {
            Some(destination.ok_or(ActionError::MissingDestination)?)
        }
        CardKind::Gear => match destination {
            Some(Destination::Battlefield(_)) => {
                return Err(ActionError::Malformed("gear plays to the base"));
            }
            _ => Some(Destination::Base),
        },
        CardKind::Spell => None,
        _ => return Err(ActionError::NotPlayable),
    };

    if accelerate && !def.has_keyword(Keyword::Accelerate) {
        return Err(ActionError::NotAccelerate);
    }

    let mut spec = cost::CostSpec::of_card(def);
    if accelerate {
        spec = spec.with_energy_surcharge(ACCELERATE_SURCHARGE);
    }
    spec = spec.with_energy_surcharge(deflect_surcharge(registry, state, player, targets));
    settle_cost(state, player, &spec, auto_pay)?;

    // Commit: the card leaves its zone and the play goes on the chain.
    match source {
        PlaySource::Hand => {
            state.players[player].remove_from_hand(instance);
        }
        PlaySource::Champion => state.players[player].champion = None,
        PlaySource::FaceDown(bf) => state.battlefield_mut(bf).face_down = None,
    }
    state.players[player].cards_played_this_turn += 1;

    let effect = if def.ability.trigger == AbilityTrigger::Play {
        def.ability.effect.clone()
    } else {
        String::new()
    };
    let source_battlefield = match (destination, source) {
        (Some(Destination::Battlefield(bf)), _) => Some(bf),
        (_, PlaySource::FaceDown(bf)) => Some(bf),
        _ => None,
    };

    state.log_event(format!("{player} plays {}", def.name));
    chain::push_item(
        state,
        ChainItem {
            controller: player,
            card: def.id,
            needs_targets: interpret::required_targets(&effect),
            effect,
            targets: targets.iter().copied().collect(),
            source_battlefield,
            kind: ChainKind::Play {
                instance,
                destination,
                accelerated: accelerate,
            },
        },
    );
    Ok(())
}

/// Place a Hidden card face-down at a controlled battlefield.
pub(crate) fn place_face_down(
    registry: &CardRegistry,
    state: &mut GameState,
    player: PlayerId,
    instance: InstanceId,
    bf: BattlefieldId,
) -> Result<(), ActionError> {
    require_sorcery_speed(state, player)?;

    if !state.players[player].hand.contains(&instance) {
        return Err(ActionError::WrongZone);
    }
    let card_id = state
        .card(instance)
        .ok_or(ActionError::UnknownInstance(instance))?
        .card;
    let def = registry.get(card_id).ok_or(ActionError::UnknownCard(card_id))?;
    if !def.has_keyword(Keyword::Hidden) {
        return Err(ActionError::NotHidden);
    }
    if !state.battlefield(bf).is_controlled_by(player) {
        return Err(ActionError::IllegalTarget);
    }
    if state.battlefield(bf).face_down.is_some() {
        return Err(ActionError::FaceDownOccupied);
    }

    state.players[player].remove_from_hand(instance);
    state.battlefield_mut(bf).face_down = Some(FaceDownCard {
        owner: player,
        instance,
    });
    state.log_event(format!("{player} places a card face-down at {bf}"));
    Ok(())
}

/// Move ready units between base and a battlefield.
pub(crate) fn standard_move(
    state: &mut GameState,
    player: PlayerId,
    units: &[InstanceId],
    to: Destination,
) -> Result<(), ActionError> {
    require_sorcery_speed(state, player)?;

    // Validate every unit before anything moves.
    for &unit in units {
        let (owner, zone) = state
            .find_unit(unit)
            .ok_or(ActionError::UnknownInstance(unit))?;
        if owner != player {
            return Err(ActionError::WrongZone);
        }
        let card = state
            .card(unit)
            .ok_or(ActionError::UnknownInstance(unit))?;
        if !card.ready {
            return Err(ActionError::NotReady);
        }
        if card.stunned {
            return Err(ActionError::Stunned);
        }
        match (to, zone) {
            (Destination::Battlefield(_), UnitZone::Base) => {}
            (Destination::Base, UnitZone::Battlefield(_)) => {}
            _ => return Err(ActionError::WrongZone),
        }
    }

    match to {
        Destination::Battlefield(bf) => {
            let hostile = state.battlefield(bf).is_hostile_to(player);
            for &unit in units {
                state.players[player].remove_base_unit(unit);
                state.battlefield_mut(bf).units[player].push_back(unit);
            }
            if hostile && state.battlefield(bf).contester.is_none() {
                let battlefield = state.battlefield_mut(bf);
                battlefield.contester = Some(player);
                battlefield.pending_showdown = true;
            }
            state.log_event(format!(
                "{player} moves {} unit(s) to {bf}",
                units.len()
            ));
        }
        Destination::Base => {
            for &unit in units {
                if let Some((_, UnitZone::Battlefield(bf))) = state.find_unit(unit) {
                    state.battlefield_mut(bf).remove_unit(player, unit);
                    state.players[player].base_units.push_back(unit);
                }
            }
            state.log_event(format!(
                "{player} recalls {} unit(s) to base",
                units.len()
            ));
        }
    }
    Ok(())
}

/// Exhaust a ready rune for one energy.
pub(crate) fn exhaust_rune(
    state: &mut GameState,
    player: PlayerId,
    rune_id: InstanceId,
) -> Result<(), ActionError> {
    require_priority(state, player)?;

    let rune = state.players[player]
        .runes_in_play
        .iter_mut()
        .find(|r| r.id == rune_id)
        .ok_or(ActionError::UnknownInstance(rune_id))?;
    if !rune.ready {
        return Err(ActionError::RuneExhausted);
    }
    rune.ready = false;
    state.players[player].pool.add_energy(1);
    state.log_event(format!("{player} exhausts a rune for energy"));
    Ok(())
}

/// Recycle a rune in play for one power of its domain; the rune returns
/// to the bottom of the rune deck.
pub(crate) fn recycle_rune(
    state: &mut GameState,
    player: PlayerId,
    rune_id: InstanceId,
) -> Result<(), ActionError> {
    require_priority(state, player)?;

    let pos = state.players[player]
        .runes_in_play
        .iter()
        .position(|r| r.id == rune_id)
        .ok_or(ActionError::UnknownInstance(rune_id))?;

    let mut rune = state.players[player].runes_in_play.remove(pos);
    let domain = rune.domain;
    state.players[player].pool.add_power(domain, 1);
    rune.ready = true;
    state.players[player].rune_deck.push_front(rune);
    state.log_event(format!("{player} recycles a rune for {domain} power"));
    Ok(())
}

/// Exhaust ("seal") a gear to activate its ability.
pub(crate) fn seal_gear(
    registry: &CardRegistry,
    state: &mut GameState,
    player: PlayerId,
    gear: InstanceId,
) -> Result<(), ActionError> {
    require_priority(state, player)?;

    let location = gear_location(state, player, gear).ok_or(ActionError::WrongZone)?;
    let card = state
        .card(gear)
        .ok_or(ActionError::UnknownInstance(gear))?;
    if !card.ready {
        return Err(ActionError::NotReady);
    }
    let def = registry.get(card.card).ok_or(ActionError::UnknownCard(card.card))?;
    if !def.is_gear()
        || def.ability.trigger != AbilityTrigger::Activated
        || def.ability.effect.is_empty()
    {
        return Err(ActionError::NotPlayable);
    }

    let def = def.clone();
    if let Some(card) = state.card_mut(gear) {
        card.exhaust();
    }
    state.log_event(format!("{player} seals {}", def.name));
    chain::push_item(
        state,
        ChainItem {
            controller: player,
            card: def.id,
            needs_targets: interpret::required_targets(&def.ability.effect),
            effect: def.ability.effect.clone(),
            targets: Default::default(),
            source_battlefield: location,
            kind: ChainKind::Ability {
                instance: Some(gear),
            },
        },
    );
    Ok(())
}

fn gear_location(
    state: &GameState,
    player: PlayerId,
    gear: InstanceId,
) -> Option<Option<BattlefieldId>> {
    if state.players[player].base_gear.contains(&gear) {
        return Some(None);
    }
    BattlefieldId::both()
        .find(|&bf| state.battlefield(bf).gear[player].contains(&gear))
        .map(Some)
}

/// Activate the legend's ability: once per turn, paid via auto-pay.
pub(crate) fn activate_legend(
    registry: &CardRegistry,
    state: &mut GameState,
    player: PlayerId,
) -> Result<(), ActionError> {
    require_priority(state, player)?;

    if state.players[player].legend_used {
        return Err(ActionError::LegendUsed);
    }
    let legend = state.players[player].legend;
    let def = registry.get(legend).ok_or(ActionError::UnknownCard(legend))?;
    if def.ability.trigger != AbilityTrigger::Activated || def.ability.effect.is_empty() {
        return Err(ActionError::NotPlayable);
    }

    let spec = cost::CostSpec::of_card(def);
    settle_cost(state, player, &spec, true)?;

    state.players[player].legend_used = true;
    state.log_event(format!("{player} calls on {}", def.name));
    chain::push_item(
        state,
        ChainItem {
            controller: player,
            card: def.id,
            needs_targets: interpret::required_targets(&def.ability.effect),
            effect: def.ability.effect.clone(),
            targets: Default::default(),
            source_battlefield: None,
            kind: ChainKind::Ability { instance: None },
        },
    );
    Ok(())
}
