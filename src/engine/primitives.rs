//! Low-level state mutations shared by the interpreter, the combat
//! resolver, and the turn machine: drawing (with Burn Out), channeling,
//! scoring raw points, token creation, and unit zone movement.
//!
//! These helpers mutate state directly and never consult priority or
//! timing; legality lives in the action layer above.

use crate::cards::{CardRegistry, Keyword};
use crate::core::PlayerId;
use crate::state::{
    BattlefieldId, CardInstance, GameState, InstanceId, UnitZone, VICTORY_THRESHOLD,
};

/// Award a raw point (Burn Out, effects). Battlefield scoring with its
/// Final Point restriction lives in the combat resolver.
pub fn score_point(state: &mut GameState, player: PlayerId, reason: &str) {
    state.players[player].score += 1;
    let score = state.players[player].score;
    state.log_event(format!("{player} scores a point ({reason}), now {score}"));

    if score >= VICTORY_THRESHOLD && state.winner.is_none() {
        state.winner = Some(player);
        state.log_event(format!("{player} wins the duel"));
    }
}

/// Draw one card, applying the Burn Out rule on an empty deck: shuffle
/// the trash back in and hand the opponent a point first; if the trash is
/// empty too, the opponent wins outright.
pub fn draw_card(state: &mut GameState, player: PlayerId) {
    if state.is_over() {
        return;
    }

    if state.players[player].deck.is_empty() {
        if state.players[player].trash.is_empty() {
            state.winner = Some(player.opponent());
            state.log_event(format!(
                "{player} burns out with an empty trash; {} wins",
                player.opponent()
            ));
            return;
        }

        let mut pile: Vec<InstanceId> = state.players[player].trash.iter().copied().collect();
        state.players[player].trash.clear();
        state.rng.shuffle(&mut pile);
        state.players[player].deck = pile.into_iter().collect();

        state.log_event(format!("{player} burns out; the trash is reshuffled"));
        score_point(state, player.opponent(), "Burn Out");
        if state.is_over() {
            return;
        }
    }

    if let Some(card) = state.players[player].deck.pop_back() {
        state.players[player].hand.push_back(card);
        state.log_event(format!("{player} draws a card"));
    }
}

/// Draw several cards.
pub fn draw_cards(state: &mut GameState, player: PlayerId, count: u32) {
    for _ in 0..count {
        if state.is_over() {
            return;
        }
        draw_card(state, player);
    }
}

/// Channel up to `count` runes from the top of the rune deck into play.
pub fn channel_runes(state: &mut GameState, player: PlayerId, count: u32) {
    let mut channeled = 0;
    for _ in 0..count {
        match state.players[player].rune_deck.pop_back() {
            Some(mut rune) => {
                rune.ready = true;
                state.players[player].runes_in_play.push_back(rune);
                channeled += 1;
            }
            None => break,
        }
    }
    if channeled > 0 {
        state.log_event(format!("{player} channels {channeled} rune(s)"));
    }
}

/// Create a token unit for `controller`, at the given battlefield or at
/// base. Tokens arrive exhausted, like any other fresh arrival, and are
/// never treated as contest-initiating moves.
pub fn create_token(
    state: &mut GameState,
    controller: PlayerId,
    might: i32,
    location: Option<BattlefieldId>,
) -> InstanceId {
    let id = state.alloc_instance();
    state.add_card(CardInstance::new(id, CardRegistry::token(might), controller));
    match location {
        Some(bf) => state.battlefield_mut(bf).units[controller].push_back(id),
        None => state.players[controller].base_units.push_back(id),
    }
    state.log_event(format!("{controller} puts a might-{might} token into play"));
    id
}

/// Remove a unit from whatever unit zone holds it.
///
/// Returns its owner and zone, or `None` if it was not in play.
pub fn remove_from_play(
    state: &mut GameState,
    instance: InstanceId,
) -> Option<(PlayerId, UnitZone)> {
    let (owner, zone) = state.find_unit(instance)?;
    match zone {
        UnitZone::Base => {
            state.players[owner].remove_base_unit(instance);
        }
        UnitZone::Battlefield(bf) => {
            state.battlefield_mut(bf).remove_unit(owner, instance);
        }
    }
    Some((owner, zone))
}

/// Put a dead or voided card into its owner's trash. Engine-created
/// tokens dissipate instead of hitting the trash.
pub fn put_in_trash(state: &mut GameState, owner: PlayerId, instance: InstanceId) {
    let is_token = state
        .card(instance)
        .is_some_and(|c| CardRegistry::is_token(c.card));
    if is_token {
        state.cards.remove(&instance);
        return;
    }
    if let Some(card) = state.card_mut(instance) {
        card.clear_on_leave_play();
    }
    state.players[owner].trash.push_back(instance);
}

/// Kill a unit in play. Returns true if it was in play.
pub fn kill_unit(state: &mut GameState, instance: InstanceId) -> bool {
    match remove_from_play(state, instance) {
        Some((owner, _)) => {
            put_in_trash(state, owner, instance);
            true
        }
        None => false,
    }
}

/// Banish a unit in play. Tokens dissipate; real cards leave the duel.
pub fn banish_unit(state: &mut GameState, instance: InstanceId) -> bool {
    match remove_from_play(state, instance) {
        Some((owner, _)) => {
            let is_token = state
                .card(instance)
                .is_some_and(|c| CardRegistry::is_token(c.card));
            if is_token {
                state.cards.remove(&instance);
            } else {
                if let Some(card) = state.card_mut(instance) {
                    card.clear_on_leave_play();
                }
                state.players[owner].banishment.push_back(instance);
            }
            true
        }
        None => false,
    }
}

/// Return a unit in play to its owner's hand. Tokens dissipate.
pub fn return_to_hand(state: &mut GameState, instance: InstanceId) -> bool {
    match remove_from_play(state, instance) {
        Some((owner, _)) => {
            let is_token = state
                .card(instance)
                .is_some_and(|c| CardRegistry::is_token(c.card));
            if is_token {
                state.cards.remove(&instance);
            } else {
                if let Some(card) = state.card_mut(instance) {
                    card.clear_on_leave_play();
                }
                state.players[owner].hand.push_back(instance);
            }
            true
        }
        None => false,
    }
}

/// Recall a unit from a battlefield to its owner's base, optionally
/// exhausting it on arrival.
pub fn recall_to_base(state: &mut GameState, instance: InstanceId, exhaust: bool) {
    if let Some((owner, UnitZone::Battlefield(bf))) = state.find_unit(instance) {
        state.battlefield_mut(bf).remove_unit(owner, instance);
        state.players[owner].base_units.push_back(instance);
        if exhaust {
            if let Some(card) = state.card_mut(instance) {
                card.exhaust();
            }
        }
    }
}

/// Sum a side's combat might at a battlefield, including Assault or
/// Shield bonuses from printed and granted keywords.
pub fn side_might(
    registry: &CardRegistry,
    state: &GameState,
    battlefield: BattlefieldId,
    player: PlayerId,
    attacking: bool,
) -> i32 {
    let bonus_kind = if attacking {
        Keyword::Assault(0)
    } else {
        Keyword::Shield(0)
    };

    state
        .battlefield(battlefield)
        .units[player]
        .iter()
        .filter_map(|&id| {
            let card = state.card(id)?;
            let def = registry.get(card.card)?;
            let base = def.might()?;
            let printed_bonus: i32 = def
                .ability
                .keywords
                .iter()
                .filter(|k| k.same_kind(bonus_kind))
                .map(|k| match *k {
                    Keyword::Assault(n) | Keyword::Shield(n) => i32::from(n),
                    _ => 0,
                })
                .sum();
            let granted_bonus = card.granted_magnitude(bonus_kind);
            Some(card.effective_might(base) + printed_bonus + granted_bonus)
        })
        .sum()
}
