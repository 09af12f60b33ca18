//! Combat resolution and battlefield scoring.
//!
//! A showdown closing with units on both sides becomes a combat window:
//! damage is auto-assigned simultaneously (Assault boosts attackers,
//! Shield boosts defenders, Tanks absorb first, leftover spills onto the
//! last unit), the sweep removes the dead, and a final resolution step
//! applies the outcome table. Ties favor the defender: surviving
//! attackers recall home exhausted.
//!
//! Scoring lives here too, including the Final Point restriction on
//! Conquer and its consolation draw.

use crate::cards::{AbilityTrigger, CardRegistry, Keyword};
use crate::core::PlayerId;
use crate::state::{
    BattlefieldId, CombatStep, GameState, InstanceId, Window, VICTORY_THRESHOLD,
};

use super::{chain, primitives};

/// Close or advance the active window after two consecutive passes on an
/// empty chain.
pub(crate) fn advance_window(registry: &CardRegistry, state: &mut GameState) {
    match state.window {
        Window::None => {}
        Window::Showdown(bf) => close_showdown(registry, state, bf),
        Window::Combat { battlefield, .. } => resolve_combat(registry, state, battlefield),
    }
}

/// End a showdown: unopposed contester conquers, both sides present means
/// combat, a contester with nothing left simply fails.
fn close_showdown(registry: &CardRegistry, state: &mut GameState, bf: BattlefieldId) {
    let battlefield = state.battlefield(bf);
    let Some(attacker) = battlefield.contester else {
        state.window = Window::None;
        chain::settle(state);
        return;
    };
    let defender = battlefield.controller.unwrap_or(attacker.opponent());
    let attacker_present = battlefield.has_units(attacker);
    let defender_present = defender != attacker && battlefield.has_units(defender);

    if attacker_present && defender_present {
        state.window = Window::Combat {
            battlefield: bf,
            step: CombatStep::Damage,
        };
        state.log_event(format!("combat begins at {bf}"));
        apply_damage_step(registry, state, bf, attacker, defender);
        state.passes = 0;
        state.priority = state.turn_player;
        return;
    }

    if attacker_present {
        state.window = Window::None;
        conquer(registry, state, bf, attacker);
    } else {
        let battlefield = state.battlefield_mut(bf);
        battlefield.contester = None;
        state.window = Window::None;
        state.log_event(format!("the showdown at {bf} ends with no attacker"));
    }
    chain::settle(state);
}

/// Auto-assigned simultaneous damage.
fn apply_damage_step(
    registry: &CardRegistry,
    state: &mut GameState,
    bf: BattlefieldId,
    attacker: PlayerId,
    defender: PlayerId,
) {
    let attack_total = primitives::side_might(registry, state, bf, attacker, true);
    let defense_total = primitives::side_might(registry, state, bf, defender, false);

    state.log_event(format!(
        "{attacker} attacks with {attack_total} might against {defense_total}"
    ));

    // Both totals are computed before any damage lands.
    assign_damage(registry, state, bf, defender, attack_total);
    assign_damage(registry, state, bf, attacker, defense_total);

    chain::sweep_and_queue_deaths(registry, state);
}

/// Distribute incoming damage across one side: Tanks first, then the
/// rest in list order, each taking up to its lethal amount; whatever is
/// left spills onto the last unit.
fn assign_damage(
    registry: &CardRegistry,
    state: &mut GameState,
    bf: BattlefieldId,
    side: PlayerId,
    total: i32,
) {
    if total <= 0 {
        return;
    }

    let units: Vec<InstanceId> = state.battlefield(bf).units[side].iter().copied().collect();
    let is_tank = |state: &GameState, id: InstanceId| -> bool {
        let Some(card) = state.card(id) else {
            return false;
        };
        let printed = registry
            .get(card.card)
            .is_some_and(|d| d.has_keyword(Keyword::Tank));
        printed || card.has_granted(Keyword::Tank)
    };

    let mut order: Vec<InstanceId> = units
        .iter()
        .copied()
        .filter(|&u| is_tank(state, u))
        .collect();
    order.extend(units.iter().copied().filter(|&u| !is_tank(state, u)));

    let mut remaining = total;
    let last = order.len().saturating_sub(1);
    for (i, unit) in order.into_iter().enumerate() {
        if remaining <= 0 {
            break;
        }
        let lethal = {
            let Some(card) = state.card(unit) else { continue };
            let base = registry.get(card.card).and_then(|d| d.might()).unwrap_or(0);
            (card.effective_might(base) - card.damage).max(0)
        };
        let dealt = if i == last {
            remaining
        } else {
            remaining.min(lethal)
        };
        if let Some(card) = state.card_mut(unit) {
            card.damage += dealt;
        }
        remaining -= dealt;
    }
}

/// The resolution step: apply the outcome table and close the window.
fn resolve_combat(registry: &CardRegistry, state: &mut GameState, bf: BattlefieldId) {
    state.window = Window::Combat {
        battlefield: bf,
        step: CombatStep::Resolution,
    };

    let battlefield = state.battlefield(bf);
    let Some(attacker) = battlefield.contester else {
        state.window = Window::None;
        chain::settle(state);
        return;
    };
    let defender = battlefield.controller.unwrap_or(attacker.opponent());
    let attacker_alive = battlefield.has_units(attacker);
    let defender_alive = battlefield.has_units(defender);

    state.window = Window::None;

    match (attacker_alive, defender_alive) {
        (true, true) => {
            // Tie favors the defender: attackers recall home exhausted.
            let survivors: Vec<InstanceId> =
                state.battlefield(bf).units[attacker].iter().copied().collect();
            for unit in survivors {
                primitives::recall_to_base(state, unit, true);
            }
            state.battlefield_mut(bf).contester = None;
            state.log_event(format!(
                "{attacker}'s survivors recall exhausted; {defender} holds {bf}"
            ));
        }
        (true, false) => conquer(registry, state, bf, attacker),
        (false, true) => {
            state.battlefield_mut(bf).contester = None;
            state.log_event(format!("{defender} repels the attack at {bf}"));
        }
        (false, false) => {
            let battlefield = state.battlefield_mut(bf);
            battlefield.contester = None;
            battlefield.controller = None;
            state.log_event(format!("{bf} lies unclaimed after combat"));
        }
    }

    chain::settle(state);
}

/// Take control of a battlefield; score if it was wrested from the
/// opponent, and fire Conquer triggers.
pub(crate) fn conquer(
    registry: &CardRegistry,
    state: &mut GameState,
    bf: BattlefieldId,
    player: PlayerId,
) {
    let previous = state.battlefield(bf).controller;
    {
        let battlefield = state.battlefield_mut(bf);
        battlefield.controller = Some(player);
        battlefield.contester = None;
    }
    state.log_event(format!("{player} conquers {bf}"));

    if previous == Some(player.opponent()) {
        score_attempt(state, player, bf, true);
    }

    // Conquer triggers on the conqueror's units here.
    let units: Vec<InstanceId> = state.battlefield(bf).units[player].iter().copied().collect();
    for unit in units {
        let Some(card) = state.card(unit) else { continue };
        let Some(def) = registry.get(card.card) else {
            continue;
        };
        if def.ability.trigger == AbilityTrigger::Conquer && !def.ability.effect.is_empty() {
            chain::push_triggered(state, player, def, Some(unit), Some(bf));
        }
    }
}

/// Attempt to score a battlefield.
///
/// A battlefield scores at most once per player per turn. The Final Point
/// (the point that would reach the victory threshold) cannot be taken via
/// Conquer unless every other battlefield was already scored this turn;
/// a denied attempt draws a card instead.
pub(crate) fn score_attempt(
    state: &mut GameState,
    player: PlayerId,
    bf: BattlefieldId,
    via_conquer: bool,
) {
    if state.is_over() {
        return;
    }
    if state.players[player].has_scored(bf) {
        state.log_event(format!("{player} has already scored {bf} this turn"));
        return;
    }

    let final_point = state.players[player].score == VICTORY_THRESHOLD - 1;
    if via_conquer && final_point && !state.players[player].has_scored_all_others(bf) {
        state.log_event(format!(
            "{player} is denied the Final Point at {bf} and draws a card"
        ));
        primitives::draw_card(state, player);
        return;
    }

    state.players[player].mark_scored(bf);
    let reason = if via_conquer { "Conquer" } else { "Hold" };
    primitives::score_point(state, player, reason);
}
