//! The position heuristic.
//!
//! Candidate intents are scored on the quiescent state they lead to: a
//! weighted sum of score differential, battlefield control, board might,
//! permanent count, hand size, rune readiness, and proximity to the
//! victory threshold. Terminal states dominate everything else.

use crate::cards::CardRegistry;
use crate::core::PlayerId;
use crate::state::{BattlefieldId, GameState, VICTORY_THRESHOLD};

/// Heuristic weights.
#[derive(Clone, Copy, Debug)]
pub struct Weights {
    /// Per point of score differential.
    pub score: f64,
    /// Per battlefield controlled (differential).
    pub control: f64,
    /// Per point of total board might (differential).
    pub might: f64,
    /// Per unit or gear in play (differential).
    pub presence: f64,
    /// Per card in hand (differential).
    pub hand: f64,
    /// Per ready rune (differential).
    pub runes: f64,
    /// Bonus for sitting one point from victory.
    pub match_point: f64,
    /// Magnitude of a decided game.
    pub terminal: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            score: 100.0,
            control: 30.0,
            might: 4.0,
            presence: 3.0,
            hand: 2.0,
            runes: 1.0,
            match_point: 25.0,
            terminal: 1_000_000.0,
        }
    }
}

/// Score a state from `player`'s perspective; higher is better.
#[must_use]
pub fn evaluate(
    registry: &CardRegistry,
    state: &GameState,
    player: PlayerId,
    weights: &Weights,
) -> f64 {
    if let Some(winner) = state.winner {
        return if winner == player {
            weights.terminal
        } else {
            -weights.terminal
        };
    }

    let mut value = 0.0;
    let opponent = player.opponent();

    let score_diff = state.players[player].score - state.players[opponent].score;
    value += weights.score * f64::from(score_diff);

    let control_diff: i32 = BattlefieldId::both()
        .map(|bf| {
            let controller = state.battlefield(bf).controller;
            if controller == Some(player) {
                1
            } else if controller == Some(opponent) {
                -1
            } else {
                0
            }
        })
        .sum();
    value += weights.control * f64::from(control_diff);

    let might_diff = total_might(registry, state, player) - total_might(registry, state, opponent);
    value += weights.might * f64::from(might_diff);

    let presence_diff = presence(state, player) as i64 - presence(state, opponent) as i64;
    value += weights.presence * presence_diff as f64;

    let hand_diff =
        state.players[player].hand.len() as i64 - state.players[opponent].hand.len() as i64;
    value += weights.hand * hand_diff as f64;

    let rune_diff = state.players[player].ready_rune_count() as i64
        - state.players[opponent].ready_rune_count() as i64;
    value += weights.runes * rune_diff as f64;

    if state.players[player].score == VICTORY_THRESHOLD - 1 {
        value += weights.match_point;
    }
    if state.players[opponent].score == VICTORY_THRESHOLD - 1 {
        value -= weights.match_point;
    }

    value
}

fn total_might(registry: &CardRegistry, state: &GameState, player: PlayerId) -> i32 {
    state
        .units_in_play(player)
        .iter()
        .filter_map(|&id| {
            let card = state.card(id)?;
            let base = registry.get(card.card)?.might()?;
            Some(card.effective_might(base))
        })
        .sum()
}

fn presence(state: &GameState, player: PlayerId) -> usize {
    let gear_at_battlefields: usize = BattlefieldId::both()
        .map(|bf| state.battlefield(bf).gear[player].len())
        .sum();
    state.units_in_play(player).len()
        + state.players[player].base_gear.len()
        + gear_at_battlefields
}
