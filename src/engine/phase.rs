//! The turn state machine.
//!
//! Linear cycle: Mulligan (once, simultaneous) then Awaken → Scoring →
//! Channel → Draw → Action → Ending → Awaken. Each phase's automatic
//! steps run on entry; advancing is only legal for the turn player with
//! an empty chain and no open window. Ending never rests: it cleans up
//! and rolls straight into the next turn's Awaken.

use crate::cards::{AbilityTrigger, CardRegistry};
use crate::core::PlayerId;
use crate::state::{BattlefieldId, GameState, InstanceId, Phase};

use super::error::ActionError;
use super::{chain, combat, primitives};

/// Runes channeled in a normal channel step.
const CHANNEL_PER_TURN: u32 = 2;

/// Advance to the next phase.
pub(crate) fn advance(
    registry: &CardRegistry,
    state: &mut GameState,
    player: PlayerId,
) -> Result<(), ActionError> {
    if player != state.turn_player {
        return Err(ActionError::NotTurnPlayer);
    }
    if !state.chain.is_empty() {
        return Err(ActionError::ChainNotEmpty);
    }
    if state.window.is_open() {
        return Err(ActionError::WindowOpen);
    }

    match state.phase {
        Phase::Mulligan | Phase::Ending => return Err(ActionError::WrongPhase(state.phase)),
        Phase::Awaken => {
            state.phase = Phase::Scoring;
            scoring_step(registry, state);
        }
        Phase::Scoring => {
            state.phase = Phase::Channel;
            channel_step(state);
        }
        Phase::Channel => {
            state.phase = Phase::Draw;
            primitives::draw_card(state, player);
        }
        Phase::Draw => {
            // The pool does not carry into the action phase.
            state.players[player].pool.clear();
            state.phase = Phase::Action;
            state.log_event(format!("{player} enters the action phase"));
        }
        Phase::Action => {
            state.phase = Phase::Ending;
            ending_step(state);
            begin_turn(state);
        }
    }

    chain::sweep_and_queue_deaths(registry, state);
    chain::settle(state);
    Ok(())
}

/// Confirm a mulligan, recycling up to two hand cards to the bottom of
/// the deck and drawing replacements. When both players have confirmed,
/// the duel proper begins.
pub(crate) fn confirm_mulligan(
    registry: &CardRegistry,
    state: &mut GameState,
    player: PlayerId,
    recycle: &[InstanceId],
) -> Result<(), ActionError> {
    if state.phase != Phase::Mulligan {
        return Err(ActionError::WrongPhase(state.phase));
    }
    if state.players[player].mulligan_confirmed {
        return Err(ActionError::AlreadyConfirmed);
    }
    for &instance in recycle {
        if !state.players[player].hand.contains(&instance) {
            return Err(ActionError::WrongZone);
        }
    }

    for &instance in recycle {
        state.players[player].remove_from_hand(instance);
        state.players[player].deck.push_front(instance);
    }
    primitives::draw_cards(state, player, recycle.len() as u32);
    state.players[player].mulligan_confirmed = true;
    state.log_event(format!(
        "{player} confirms their hand ({} recycled)",
        recycle.len()
    ));

    if PlayerId::both().all(|p| state.players[p].mulligan_confirmed) {
        state.turn_player = state.starting_player;
        state.phase = Phase::Awaken;
        state.log_event(format!("the duel begins; {} goes first", state.turn_player));
        awaken_step(state);
        chain::sweep_and_queue_deaths(registry, state);
        chain::settle(state);
    }
    Ok(())
}

/// Ready the turn player's permanents and runes.
fn awaken_step(state: &mut GameState) {
    let player = state.turn_player;
    state.priority = player;

    for instance in state.units_in_play(player) {
        if let Some(card) = state.card_mut(instance) {
            card.ready_up();
        }
    }
    let mut gear: Vec<InstanceId> = state.players[player].base_gear.iter().copied().collect();
    for bf in BattlefieldId::both() {
        gear.extend(state.battlefield(bf).gear[player].iter().copied());
    }
    for instance in gear {
        if let Some(card) = state.card_mut(instance) {
            card.ready_up();
        }
    }
    for rune in state.players[player].runes_in_play.iter_mut() {
        rune.ready = true;
    }

    state.log_event(format!("{player} awakens"));
}

/// Resolve Hold for every battlefield the turn player controls, in index
/// order, then fire Hold triggers on the battlefield card and the
/// player's units there.
fn scoring_step(registry: &CardRegistry, state: &mut GameState) {
    let player = state.turn_player;

    for bf in BattlefieldId::both() {
        if state.is_over() {
            return;
        }
        if !state.battlefield(bf).is_controlled_by(player) {
            continue;
        }
        combat::score_attempt(state, player, bf, false);

        if let Some(def) = registry.get(state.battlefield(bf).card) {
            if def.ability.trigger == AbilityTrigger::Hold && !def.ability.effect.is_empty() {
                chain::push_triggered(state, player, def, None, Some(bf));
            }
        }
        let units: Vec<InstanceId> =
            state.battlefield(bf).units[player].iter().copied().collect();
        for unit in units {
            let Some(card) = state.card(unit) else { continue };
            let Some(def) = registry.get(card.card) else {
                continue;
            };
            if def.ability.trigger == AbilityTrigger::Hold && !def.ability.effect.is_empty() {
                chain::push_triggered(state, player, def, Some(unit), Some(bf));
            }
        }
    }
}

/// Channel runes; the non-starting player's very first channel step gets
/// one extra.
fn channel_step(state: &mut GameState) {
    let player = state.turn_player;
    let mut count = CHANNEL_PER_TURN;
    if !state.players[player].has_channeled && player != state.starting_player {
        count += 1;
    }
    state.players[player].has_channeled = true;
    primitives::channel_runes(state, player, count);
}

/// End-of-turn cleanup: stun flags first, then expiring state, pools,
/// and gear stranded at battlefields.
fn ending_step(state: &mut GameState) {
    for player in PlayerId::both() {
        for instance in state.units_in_play(player) {
            if let Some(card) = state.card_mut(instance) {
                card.stunned = false;
            }
        }
        for instance in state.units_in_play(player) {
            if let Some(card) = state.card_mut(instance) {
                card.clear_turn_state();
            }
        }
        state.players[player].pool.clear();
        state.players[player].reset_turn_counters();

        for bf in BattlefieldId::both() {
            let stranded: Vec<InstanceId> =
                state.battlefield(bf).gear[player].iter().copied().collect();
            for gear in stranded {
                state.battlefield_mut(bf).remove_gear(player, gear);
                state.players[player].base_gear.push_back(gear);
            }
        }
    }
    state.log_event(format!("turn {} ends", state.turn));
}

/// Hand the turn over and awaken the new turn player.
fn begin_turn(state: &mut GameState) {
    state.turn += 1;
    state.turn_player = state.turn_player.opponent();
    state.phase = Phase::Awaken;
    awaken_step(state);
}
