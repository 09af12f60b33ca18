//! The root game state aggregate.
//!
//! `GameState` owns everything: phase machinery, priority, the chain, both
//! players, both battlefields, all card instances, the log, and the RNG.
//! External callers never hold a mutable reference; they submit actions
//! through the engine and read redacted projections.
//!
//! Collections use `im` persistent structures so cloning the aggregate for
//! AI lookahead shares structure instead of deep-copying.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{DuelRng, GameLog, PerPlayer, PlayerId};

use super::battlefield::{BattlefieldId, BattlefieldState};
use super::chain::ChainItem;
use super::instance::{CardInstance, InstanceId};
use super::player::PlayerState;
use super::target::UnitZone;

/// Points needed to win the duel.
pub const VICTORY_THRESHOLD: i32 = 8;

/// Turn phases, in cycle order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Simultaneous opening-hand adjustment; gated until both confirm.
    Mulligan,
    /// Ready permanents and runes for the turn player.
    Awaken,
    /// Resolve Hold scoring for the turn player.
    Scoring,
    /// Channel runes from the rune deck.
    Channel,
    /// Draw for turn; the pool empties when this phase ends.
    Draw,
    /// Free-form play; advancing ends the turn.
    Action,
    /// End-of-turn cleanup. Never rests; control passes straight to the
    /// next turn's Awaken.
    Ending,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Mulligan => "Mulligan",
            Phase::Awaken => "Awaken",
            Phase::Scoring => "Scoring",
            Phase::Channel => "Channel",
            Phase::Draw => "Draw",
            Phase::Action => "Action",
            Phase::Ending => "Ending",
        };
        f.write_str(name)
    }
}

/// Steps of a combat window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatStep {
    /// Damage has been auto-assigned; players may respond.
    Damage,
    /// Outcome rules apply and the window closes.
    Resolution,
}

/// The active reactive window. At most one at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Window {
    /// No window open.
    #[default]
    None,
    /// A showdown at a contested battlefield, before control resolves.
    Showdown(BattlefieldId),
    /// A combat in progress at a battlefield.
    Combat {
        /// Where the fight is.
        battlefield: BattlefieldId,
        /// Current step.
        step: CombatStep,
    },
}

impl Window {
    /// True when any window is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, Window::None)
    }

    /// The battlefield the window concerns, if open.
    #[must_use]
    pub fn battlefield(&self) -> Option<BattlefieldId> {
        match self {
            Window::None => None,
            Window::Showdown(bf) => Some(*bf),
            Window::Combat { battlefield, .. } => Some(*battlefield),
        }
    }
}

/// Whether a reactable commitment is pending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Nothing pending; sorcery-speed play is legal.
    #[default]
    Open,
    /// The chain holds at least one item.
    Closed,
}

/// Full duel state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase.
    pub phase: Phase,

    /// Turn number, starting at 1.
    pub turn: u32,

    /// Whose turn it is.
    pub turn_player: PlayerId,

    /// Who went first (the non-starting player channels an extra rune on
    /// their first channel step).
    pub starting_player: PlayerId,

    /// Who may act right now.
    pub priority: PlayerId,

    /// Open/closed resolution state.
    pub resolution: Resolution,

    /// The active reactive window.
    pub window: Window,

    /// Consecutive priority passes since the last commitment.
    pub passes: u8,

    /// Pending plays and abilities; last element is the top.
    pub chain: Vector<ChainItem>,

    /// Both seats.
    pub players: PerPlayer<PlayerState>,

    /// Both battlefields.
    pub battlefields: [BattlefieldState; 2],

    /// Every card instance in the duel, by id.
    pub cards: OrdMap<InstanceId, CardInstance>,

    /// The running log.
    pub log: GameLog,

    /// Deterministic RNG.
    pub rng: DuelRng,

    /// Set when the duel ends.
    pub winner: Option<PlayerId>,

    /// Bumped on every committed action; the AI scheduler watches this.
    pub version: u64,

    next_instance: u32,
}

impl GameState {
    /// Create an empty duel state. The engine's setup routine populates
    /// decks, hands, and runes.
    #[must_use]
    pub fn new(legends: PerPlayer<CardId>, battlefield_cards: [CardId; 2], seed: u64) -> Self {
        Self {
            phase: Phase::Mulligan,
            turn: 1,
            turn_player: PlayerId::new(0),
            starting_player: PlayerId::new(0),
            priority: PlayerId::new(0),
            resolution: Resolution::Open,
            window: Window::None,
            passes: 0,
            chain: Vector::new(),
            players: PerPlayer::new(|p| PlayerState::new(*legends.get(p))),
            battlefields: [
                BattlefieldState::new(battlefield_cards[0]),
                BattlefieldState::new(battlefield_cards[1]),
            ],
            cards: OrdMap::new(),
            log: GameLog::new(),
            rng: DuelRng::new(seed),
            winner: None,
            version: 0,
            next_instance: 1,
        }
    }

    /// Allocate a fresh instance id.
    pub fn alloc_instance(&mut self) -> InstanceId {
        let id = InstanceId::new(self.next_instance);
        self.next_instance += 1;
        id
    }

    /// Register a card instance.
    pub fn add_card(&mut self, card: CardInstance) {
        self.cards.insert(card.id, card);
    }

    /// Look up a card instance.
    #[must_use]
    pub fn card(&self, instance: InstanceId) -> Option<&CardInstance> {
        self.cards.get(&instance)
    }

    /// Look up a card instance mutably.
    pub fn card_mut(&mut self, instance: InstanceId) -> Option<&mut CardInstance> {
        self.cards.get_mut(&instance)
    }

    /// A battlefield by id.
    #[must_use]
    pub fn battlefield(&self, id: BattlefieldId) -> &BattlefieldState {
        &self.battlefields[id.index()]
    }

    /// A battlefield by id, mutably.
    pub fn battlefield_mut(&mut self, id: BattlefieldId) -> &mut BattlefieldState {
        &mut self.battlefields[id.index()]
    }

    /// Where a unit currently is, if it is in play.
    #[must_use]
    pub fn find_unit(&self, instance: InstanceId) -> Option<(PlayerId, UnitZone)> {
        for player in PlayerId::both() {
            if self.players[player].base_units.contains(&instance) {
                return Some((player, UnitZone::Base));
            }
        }
        for bf in BattlefieldId::both() {
            for player in PlayerId::both() {
                if self.battlefield(bf).units[player].contains(&instance) {
                    return Some((player, UnitZone::Battlefield(bf)));
                }
            }
        }
        None
    }

    /// All of a player's units in play (base first, then battlefields in
    /// index order).
    #[must_use]
    pub fn units_in_play(&self, player: PlayerId) -> Vec<InstanceId> {
        let mut units: Vec<InstanceId> =
            self.players[player].base_units.iter().copied().collect();
        for bf in BattlefieldId::both() {
            units.extend(self.battlefield(bf).units[player].iter().copied());
        }
        units
    }

    /// The top of the chain.
    #[must_use]
    pub fn chain_top(&self) -> Option<&ChainItem> {
        self.chain.last()
    }

    /// Append a log entry stamped with the current turn.
    pub fn log_event(&mut self, message: impl Into<String>) {
        let turn = self.turn;
        self.log.push(turn, message);
    }

    /// True once a winner is decided.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(
            PerPlayer::with_value(CardId::new(900)),
            [CardId::new(500), CardId::new(501)],
            42,
        )
    }

    #[test]
    fn test_new_state() {
        let state = state();
        assert_eq!(state.phase, Phase::Mulligan);
        assert_eq!(state.turn, 1);
        assert_eq!(state.resolution, Resolution::Open);
        assert_eq!(state.window, Window::None);
        assert!(state.chain.is_empty());
        assert!(!state.is_over());
    }

    #[test]
    fn test_alloc_instance_monotonic() {
        let mut state = state();
        let a = state.alloc_instance();
        let b = state.alloc_instance();
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn test_find_unit() {
        let mut state = state();
        let id = state.alloc_instance();
        state.add_card(CardInstance::new(id, CardId::new(1), PlayerId::new(0)));
        state.players[PlayerId::new(0)].base_units.push_back(id);

        assert_eq!(state.find_unit(id), Some((PlayerId::new(0), UnitZone::Base)));

        state.players[PlayerId::new(0)].base_units.pop_back();
        state.battlefield_mut(BattlefieldId::new(1)).units[PlayerId::new(0)].push_back(id);

        assert_eq!(
            state.find_unit(id),
            Some((PlayerId::new(0), UnitZone::Battlefield(BattlefieldId::new(1))))
        );
    }

    #[test]
    fn test_units_in_play_order() {
        let mut state = state();
        let p0 = PlayerId::new(0);

        let base = state.alloc_instance();
        let field = state.alloc_instance();
        state.add_card(CardInstance::new(base, CardId::new(1), p0));
        state.add_card(CardInstance::new(field, CardId::new(1), p0));
        state.players[p0].base_units.push_back(base);
        state.battlefield_mut(BattlefieldId::new(0)).units[p0].push_back(field);

        assert_eq!(state.units_in_play(p0), vec![base, field]);
    }

    #[test]
    fn test_window_accessors() {
        assert!(!Window::None.is_open());
        assert!(Window::Showdown(BattlefieldId::new(0)).is_open());
        assert_eq!(
            Window::Combat {
                battlefield: BattlefieldId::new(1),
                step: CombatStep::Damage
            }
            .battlefield(),
            Some(BattlefieldId::new(1))
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let mut state = state();
        let snapshot = state.clone();

        state.log_event("after snapshot");
        state.players[PlayerId::new(0)].score = 3;

        assert_eq!(snapshot.log.len(), 0);
        assert_eq!(snapshot.players[PlayerId::new(0)].score, 0);
    }
}
