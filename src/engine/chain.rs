//! Priority passing, chain resolution, and window management.
//!
//! The protocol: committing a reactable play or ability pushes a chain
//! item, closes the resolution state, and hands priority to the item's
//! controller. One pass hands priority across; two consecutive passes
//! either resolve the top chain item (LIFO) or, with an empty chain,
//! close the active window. Whenever the chain re-empties the engine
//! re-opens and re-evaluates which battlefield is owed a window,
//! battlefields in index order, at most one window open at a time.

use crate::cards::{AbilityTrigger, CardDef, CardKind, CardRegistry, Keyword};
use crate::core::PlayerId;
use crate::state::{
    BattlefieldId, ChainItem, ChainKind, Destination, GameState, InstanceId, Phase, Resolution,
    Target, Window,
};

use super::error::ActionError;
use super::{combat, interpret, primitives, sweep};

/// Push a chain item: resolution closes and the controller takes
/// priority, giving the opponent a response opportunity on the pass.
pub(crate) fn push_item(state: &mut GameState, item: ChainItem) {
    state.priority = item.controller;
    state.chain.push_back(item);
    state.resolution = Resolution::Closed;
    state.passes = 0;
}

/// Push a triggered ability (hold, conquer, death) for `controller`.
pub(crate) fn push_triggered(
    state: &mut GameState,
    controller: PlayerId,
    def: &CardDef,
    instance: Option<InstanceId>,
    battlefield: Option<BattlefieldId>,
) {
    let item = ChainItem {
        controller,
        card: def.id,
        effect: def.ability.effect.clone(),
        needs_targets: interpret::required_targets(&def.ability.effect),
        targets: Default::default(),
        source_battlefield: battlefield,
        kind: ChainKind::Ability { instance },
    };
    state.log_event(format!("{}'s {} triggers", controller, def.name));
    push_item(state, item);
}

/// Pass priority.
pub(crate) fn pass_priority(
    registry: &CardRegistry,
    state: &mut GameState,
    player: PlayerId,
) -> Result<(), ActionError> {
    if player != state.priority {
        return Err(ActionError::NotPriorityHolder);
    }
    if state.chain.is_empty() && !state.window.is_open() {
        return Err(ActionError::NothingPending);
    }

    state.passes += 1;
    if state.passes < 2 {
        state.priority = player.opponent();
        return Ok(());
    }

    state.passes = 0;
    if state.chain.is_empty() {
        combat::advance_window(registry, state);
    } else {
        resolve_top(registry, state);
    }
    Ok(())
}

/// Declare or replace targets on the top chain item.
pub(crate) fn set_targets(
    state: &mut GameState,
    player: PlayerId,
    targets: &[Target],
) -> Result<(), ActionError> {
    if player != state.priority {
        return Err(ActionError::NotPriorityHolder);
    }
    let Some(top) = state.chain.last() else {
        return Err(ActionError::ChainEmpty);
    };
    if top.controller != player {
        return Err(ActionError::NotPriorityHolder);
    }
    if targets.len() > top.needs_targets.max_targets() {
        return Err(ActionError::IllegalTarget);
    }
    for target in targets {
        if let Target::Unit(unit) = target {
            if state.find_unit(unit.instance) != Some((unit.owner, unit.zone)) {
                return Err(ActionError::IllegalTarget);
            }
        }
    }

    if let Some(top) = state.chain.back_mut() {
        top.targets = targets.iter().copied().collect();
    }
    state.passes = 0;
    Ok(())
}

/// Pop and resolve the top chain item.
fn resolve_top(registry: &CardRegistry, state: &mut GameState) {
    let Some(item) = state.chain.pop_back() else {
        return;
    };

    match item.kind {
        ChainKind::Play {
            instance,
            destination,
            accelerated,
        } => resolve_play(registry, state, &item, instance, destination, accelerated),
        ChainKind::Ability { instance } => {
            let ctx = interpret::InterpretContext {
                controller: item.controller,
                source_card: item.card,
                source_instance: instance,
                source_battlefield: item.source_battlefield,
            };
            interpret::interpret(registry, state, &item.effect, &item.targets, &ctx);
        }
    }

    sweep_and_queue_deaths(registry, state);

    // Priority returns to the turn player unless something new was
    // pushed during resolution.
    if state.chain.is_empty() {
        state.priority = state.turn_player;
    }
    settle(state);
}

fn resolve_play(
    registry: &CardRegistry,
    state: &mut GameState,
    item: &ChainItem,
    instance: InstanceId,
    destination: Option<Destination>,
    accelerated: bool,
) {
    let controller = item.controller;
    let Some(def) = registry.get(item.card) else {
        return;
    };

    match def.kind {
        CardKind::Spell => {
            let ctx = interpret::InterpretContext {
                controller,
                source_card: item.card,
                source_instance: None,
                source_battlefield: item.source_battlefield,
            };
            interpret::interpret(registry, state, &item.effect, &item.targets, &ctx);
            primitives::put_in_trash(state, controller, instance);
        }
        CardKind::Unit { .. } => {
            match destination {
                Some(Destination::Battlefield(bf)) => {
                    let hostile = state.battlefield(bf).is_hostile_to(controller);
                    state.battlefield_mut(bf).units[controller].push_back(instance);
                    if hostile && state.battlefield(bf).contester.is_none() {
                        let battlefield = state.battlefield_mut(bf);
                        battlefield.contester = Some(controller);
                        battlefield.pending_showdown = true;
                    }
                }
                _ => state.players[controller].base_units.push_back(instance),
            }
            if let Some(card) = state.card_mut(instance) {
                card.ready = accelerated;
            }
            state.log_event(format!("{controller}'s {} enters play", def.name));
            fire_play_trigger(registry, state, item, def);
        }
        CardKind::Gear => {
            state.players[controller].base_gear.push_back(instance);
            if let Some(card) = state.card_mut(instance) {
                card.ready_up();
            }
            state.log_event(format!("{controller}'s {} enters play", def.name));
            fire_play_trigger(registry, state, item, def);
        }
        _ => {}
    }
}

/// Run a unit's or gear's Play-trigger text, gated by Legion: a Legion
/// card's play ability fires only if another card was already played
/// this turn.
fn fire_play_trigger(
    registry: &CardRegistry,
    state: &mut GameState,
    item: &ChainItem,
    def: &CardDef,
) {
    if def.ability.trigger != AbilityTrigger::Play || def.ability.effect.is_empty() {
        return;
    }
    if def.has_keyword(Keyword::Legion)
        && state.players[item.controller].cards_played_this_turn < 2
    {
        state.log_event(format!("{}'s Legion is not met", def.name));
        return;
    }

    let instance = match item.kind {
        ChainKind::Play { instance, .. } => Some(instance),
        ChainKind::Ability { instance } => instance,
    };
    let ctx = interpret::InterpretContext {
        controller: item.controller,
        source_card: item.card,
        source_instance: instance,
        source_battlefield: item.source_battlefield,
    };
    interpret::interpret(registry, state, &item.effect, &item.targets, &ctx);
}

/// Run the sweep and push Death triggers for anything it removed.
pub(crate) fn sweep_and_queue_deaths(registry: &CardRegistry, state: &mut GameState) {
    let report = sweep::run(registry, state);
    for killed in report.killed {
        let Some(def) = registry.get(killed.card) else {
            continue;
        };
        if def.ability.trigger == AbilityTrigger::Death && !def.ability.effect.is_empty() {
            push_triggered(state, killed.owner, def, None, killed.battlefield);
        }
    }
}

/// Re-establish the open/closed state and open the next owed window.
///
/// With an empty chain and no window, the first battlefield owed a
/// showdown (index order) opens one; otherwise the state is fully open
/// and priority rests with the turn player.
pub(crate) fn settle(state: &mut GameState) {
    state.resolution = if state.chain.is_empty() {
        Resolution::Open
    } else {
        Resolution::Closed
    };

    if state.is_over() || !state.chain.is_empty() || state.window.is_open() {
        return;
    }
    if state.phase == Phase::Mulligan {
        return;
    }

    for bf in BattlefieldId::both() {
        if state.battlefield(bf).pending_showdown {
            state.battlefield_mut(bf).pending_showdown = false;
            state.window = Window::Showdown(bf);
            state.passes = 0;
            state.priority = state.turn_player;
            state.log_event(format!("a showdown opens at {bf}"));
            return;
        }
    }

    state.priority = state.turn_player;
}
