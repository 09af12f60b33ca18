//! Per-player state: legend, zones, runes, pool, score, per-turn counters.
//!
//! Zone order conventions follow the deck: index 0 is the bottom, the last
//! element is the top. Draws pop the top; recycled cards go to the bottom.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;

use super::battlefield::BattlefieldId;
use super::instance::{InstanceId, RuneInstance};
use super::pool::ResourcePool;

/// Everything one seat owns.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerState {
    /// The player's legend card.
    pub legend: CardId,

    /// Whether the legend's ability has been used this turn.
    pub legend_used: bool,

    /// Champion-in-waiting: a unit playable from the champion zone.
    pub champion: Option<InstanceId>,

    /// Hand (concealed from the opponent).
    pub hand: Vector<InstanceId>,

    /// Main deck; last element is the top.
    pub deck: Vector<InstanceId>,

    /// Trash (face-up discard).
    pub trash: Vector<InstanceId>,

    /// Banishment (removed from the duel).
    pub banishment: Vector<InstanceId>,

    /// Units at the player's base.
    pub base_units: Vector<InstanceId>,

    /// Gear at the player's base.
    pub base_gear: Vector<InstanceId>,

    /// Rune deck; last element is the top, recycles go to the front.
    pub rune_deck: Vector<RuneInstance>,

    /// Runes channeled into play.
    pub runes_in_play: Vector<RuneInstance>,

    /// Floating energy and power.
    pub pool: ResourcePool,

    /// Points scored. The duel ends at the victory threshold.
    pub score: i32,

    /// Cards played this turn (Legion reads this).
    pub cards_played_this_turn: u32,

    /// Battlefields scored this turn, as a bitmask by index.
    scored_this_turn: u8,

    /// Whether this player has taken their first channel step.
    pub has_channeled: bool,

    /// Mulligan confirmation; the duel is gated until both are set.
    pub mulligan_confirmed: bool,
}

impl PlayerState {
    /// Fresh state for a seat with the given legend.
    #[must_use]
    pub fn new(legend: CardId) -> Self {
        Self {
            legend,
            legend_used: false,
            champion: None,
            hand: Vector::new(),
            deck: Vector::new(),
            trash: Vector::new(),
            banishment: Vector::new(),
            base_units: Vector::new(),
            base_gear: Vector::new(),
            rune_deck: Vector::new(),
            runes_in_play: Vector::new(),
            pool: ResourcePool::new(),
            score: 0,
            cards_played_this_turn: 0,
            scored_this_turn: 0,
            has_channeled: false,
            mulligan_confirmed: false,
        }
    }

    /// Whether this player has scored the given battlefield this turn.
    #[must_use]
    pub fn has_scored(&self, battlefield: BattlefieldId) -> bool {
        self.scored_this_turn & (1 << battlefield.index()) != 0
    }

    /// Record a battlefield score for this turn.
    pub fn mark_scored(&mut self, battlefield: BattlefieldId) {
        self.scored_this_turn |= 1 << battlefield.index();
    }

    /// Whether every *other* battlefield has been scored this turn.
    ///
    /// This is the Final Point gate for Conquer scoring.
    #[must_use]
    pub fn has_scored_all_others(&self, battlefield: BattlefieldId) -> bool {
        BattlefieldId::both()
            .filter(|bf| *bf != battlefield)
            .all(|bf| self.has_scored(bf))
    }

    /// Reset per-turn counters at end of turn.
    pub fn reset_turn_counters(&mut self) {
        self.cards_played_this_turn = 0;
        self.scored_this_turn = 0;
        self.legend_used = false;
    }

    /// Remove an instance from the hand. Returns true if it was there.
    pub fn remove_from_hand(&mut self, instance: InstanceId) -> bool {
        if let Some(pos) = self.hand.iter().position(|&c| c == instance) {
            self.hand.remove(pos);
            true
        } else {
            false
        }
    }

    /// Remove a unit from the base. Returns true if it was there.
    pub fn remove_base_unit(&mut self, instance: InstanceId) -> bool {
        if let Some(pos) = self.base_units.iter().position(|&c| c == instance) {
            self.base_units.remove(pos);
            true
        } else {
            false
        }
    }

    /// Remove a gear from the base. Returns true if it was there.
    pub fn remove_base_gear(&mut self, instance: InstanceId) -> bool {
        if let Some(pos) = self.base_gear.iter().position(|&c| c == instance) {
            self.base_gear.remove(pos);
            true
        } else {
            false
        }
    }

    /// Find a rune in play by id.
    #[must_use]
    pub fn rune_in_play(&self, instance: InstanceId) -> Option<&RuneInstance> {
        self.runes_in_play.iter().find(|r| r.id == instance)
    }

    /// Number of ready runes in play.
    #[must_use]
    pub fn ready_rune_count(&self) -> usize {
        self.runes_in_play.iter().filter(|r| r.ready).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> PlayerState {
        PlayerState::new(CardId::new(900))
    }

    #[test]
    fn test_new_player() {
        let state = player();
        assert_eq!(state.score, 0);
        assert!(state.hand.is_empty());
        assert!(!state.mulligan_confirmed);
        assert!(!state.has_channeled);
    }

    #[test]
    fn test_scored_bitmask() {
        let mut state = player();
        let bf0 = BattlefieldId::new(0);
        let bf1 = BattlefieldId::new(1);

        assert!(!state.has_scored(bf0));
        assert!(!state.has_scored_all_others(bf1));

        state.mark_scored(bf0);
        assert!(state.has_scored(bf0));
        assert!(!state.has_scored(bf1));
        assert!(state.has_scored_all_others(bf1));
        assert!(!state.has_scored_all_others(bf0));

        state.reset_turn_counters();
        assert!(!state.has_scored(bf0));
    }

    #[test]
    fn test_turn_counter_reset() {
        let mut state = player();
        state.cards_played_this_turn = 3;
        state.legend_used = true;

        state.reset_turn_counters();

        assert_eq!(state.cards_played_this_turn, 0);
        assert!(!state.legend_used);
    }

    #[test]
    fn test_remove_from_hand() {
        let mut state = player();
        state.hand.push_back(InstanceId::new(1));
        state.hand.push_back(InstanceId::new(2));

        assert!(state.remove_from_hand(InstanceId::new(1)));
        assert!(!state.remove_from_hand(InstanceId::new(1)));
        assert_eq!(state.hand.len(), 1);
    }

    #[test]
    fn test_ready_rune_count() {
        use crate::cards::Domain;

        let mut state = player();
        state
            .runes_in_play
            .push_back(RuneInstance::new(InstanceId::new(1), CardId::new(10), Domain::Fury));
        let mut exhausted =
            RuneInstance::new(InstanceId::new(2), CardId::new(10), Domain::Calm);
        exhausted.ready = false;
        state.runes_in_play.push_back(exhausted);

        assert_eq!(state.ready_rune_count(), 1);
    }
}
