//! The duel rules engine.
//!
//! `DuelEngine` owns the authoritative `GameState` and exposes exactly
//! one mutating entry point: [`DuelEngine::submit`]. Every action is
//! shape-checked, then applied to a structural-sharing clone of the
//! state; the clone is swapped in only on success, so a refused or
//! internally-failed action can never leave partially-mutated state
//! behind and an observer always sees action boundaries.
//!
//! ## Submodules
//!
//! - `action` / `error`: the closed action API and its refusal reasons
//! - `cost`: cost solver and the auto-pay rune search
//! - `interpret`: the ability-text interpreter
//! - `chain`: priority passing, chain resolution, window management
//! - `combat`: combat and battlefield scoring
//! - `phase`: the turn state machine
//! - `sweep`: the state-based-action sweep
//! - `primitives`: shared low-level mutations

pub mod action;
pub mod chain;
pub mod combat;
pub mod cost;
pub mod error;
pub mod interpret;
pub mod phase;
pub mod play;
pub mod primitives;
pub mod sweep;

pub use action::{Action, PlaySource};
pub use cost::{can_afford, pay, plan_auto_pay, CostSpec, PayPlan};
pub use error::{ActionError, PaymentError};
pub use interpret::{
    detect, interpret as interpret_ability, required_targets, InterpretContext, InterpretOutcome,
};
pub use sweep::{KilledUnit, SweepReport};

use crate::cards::{CardId, CardRegistry};
use crate::core::{PerPlayer, PlayerId};
use crate::state::{project, CardInstance, GameState, PrivacyConfig, RuneInstance};

/// Initial configuration for one duel.
#[derive(Clone, Debug)]
pub struct DuelSetup {
    /// Main deck lists, by card id.
    pub decks: PerPlayer<Vec<CardId>>,
    /// Rune deck lists, by card id. Non-rune ids are skipped.
    pub rune_decks: PerPlayer<Vec<CardId>>,
    /// Each player's legend.
    pub legends: PerPlayer<CardId>,
    /// Optional champion-in-waiting unit per player.
    pub champions: PerPlayer<Option<CardId>>,
    /// The two contested battlefields.
    pub battlefields: [CardId; 2],
    /// Who goes first; `None` picks randomly.
    pub first_player: Option<PlayerId>,
    /// Opening hand size.
    pub starting_hand: usize,
}

impl DuelSetup {
    /// A setup with the given decks and sensible defaults.
    #[must_use]
    pub fn new(
        decks: PerPlayer<Vec<CardId>>,
        rune_decks: PerPlayer<Vec<CardId>>,
        legends: PerPlayer<CardId>,
        battlefields: [CardId; 2],
    ) -> Self {
        Self {
            decks,
            rune_decks,
            legends,
            champions: PerPlayer::with_value(None),
            battlefields,
            first_player: None,
            starting_hand: 4,
        }
    }

    /// Fix the starting player (builder).
    #[must_use]
    pub fn with_first_player(mut self, player: PlayerId) -> Self {
        self.first_player = Some(player);
        self
    }

    /// Set champions (builder).
    #[must_use]
    pub fn with_champions(mut self, champions: PerPlayer<Option<CardId>>) -> Self {
        self.champions = champions;
        self
    }
}

/// The engine: card definitions plus the authoritative state.
#[derive(Clone, Debug)]
pub struct DuelEngine {
    registry: CardRegistry,
    state: GameState,
}

impl DuelEngine {
    /// Set up a new duel: instances created, decks shuffled, opening
    /// hands drawn, state gated at the mulligan.
    #[must_use]
    pub fn new(registry: CardRegistry, setup: DuelSetup, seed: u64) -> Self {
        let mut state = GameState::new(setup.legends.clone(), setup.battlefields, seed);

        let first = setup
            .first_player
            .unwrap_or_else(|| PlayerId::new(state.rng.gen_range_usize(0..2) as u8));
        state.starting_player = first;
        state.turn_player = first;
        state.priority = first;

        for player in PlayerId::both() {
            let mut deck = Vec::new();
            for &card_id in &setup.decks[player] {
                let id = state.alloc_instance();
                state.add_card(CardInstance::new(id, card_id, player));
                deck.push(id);
            }
            state.rng.shuffle(&mut deck);
            state.players[player].deck = deck.into_iter().collect();

            let mut runes = Vec::new();
            for &card_id in &setup.rune_decks[player] {
                let Some(domain) = registry.get(card_id).and_then(|d| d.rune_domain()) else {
                    continue;
                };
                let id = state.alloc_instance();
                runes.push(RuneInstance::new(id, card_id, domain));
            }
            state.rng.shuffle(&mut runes);
            state.players[player].rune_deck = runes.into_iter().collect();

            if let Some(card_id) = setup.champions[player] {
                let id = state.alloc_instance();
                state.add_card(CardInstance::new(id, card_id, player));
                state.players[player].champion = Some(id);
            }

            for _ in 0..setup.starting_hand {
                if let Some(card) = state.players[player].deck.pop_back() {
                    state.players[player].hand.push_back(card);
                }
            }
        }

        state.log_event("the duel is set; both players adjust their hands");
        Self { registry, state }
    }

    /// Read-only access to the authoritative state. External clients
    /// should observe through [`DuelEngine::project`] instead.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct mutable access, for scenario setup in tests and trusted
    /// embedders. Everything else goes through [`DuelEngine::submit`].
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// The card definitions this duel was built from.
    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    /// The winner, if the duel has ended.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner
    }

    /// Redacted state projection for a viewer.
    #[must_use]
    pub fn project(&self, viewer: PlayerId, privacy: PrivacyConfig) -> GameState {
        project(&self.state, viewer, privacy)
    }

    /// Submit an action for a player.
    ///
    /// On refusal the state is unchanged apart from a log entry saying
    /// why; on success the action has fully applied, the sweep has run,
    /// and any owed reactive window is open.
    pub fn submit(&mut self, player: PlayerId, action: &Action) -> Result<(), ActionError> {
        let result = self.try_submit(player, action);
        if let Err(ref error) = result {
            tracing::debug!(%player, action = action.name(), %error, "action refused");
            self.state
                .log_event(format!("refused {} by {player}: {error}", action.name()));
        }
        result
    }

    fn try_submit(&mut self, player: PlayerId, action: &Action) -> Result<(), ActionError> {
        if !player.is_valid() {
            return Err(ActionError::InvalidPlayer(player));
        }
        action.validate_shape()?;
        if self.state.is_over() {
            return Err(ActionError::GameOver);
        }

        // Clone-then-mutate: cheap thanks to structural sharing, and the
        // authoritative state only advances on success.
        let mut next = self.state.clone();
        Self::apply(&self.registry, &mut next, player, action)?;
        next.version += 1;
        self.state = next;
        Ok(())
    }

    fn apply(
        registry: &CardRegistry,
        state: &mut GameState,
        player: PlayerId,
        action: &Action,
    ) -> Result<(), ActionError> {
        match action {
            Action::AdvancePhase => phase::advance(registry, state, player)?,
            Action::PassPriority => chain::pass_priority(registry, state, player)?,
            Action::ConfirmMulligan { recycle } => {
                phase::confirm_mulligan(registry, state, player, recycle)?;
            }
            Action::SetChainTargets { targets } => {
                chain::set_targets(state, player, targets)?;
            }
            Action::PlayCard {
                source,
                card,
                destination,
                accelerate,
                targets,
                auto_pay,
            } => play::play_card(
                registry,
                state,
                player,
                *source,
                *card,
                *destination,
                *accelerate,
                targets,
                *auto_pay,
            )?,
            Action::PlaceFaceDown { card, battlefield } => {
                play::place_face_down(registry, state, player, *card, *battlefield)?;
            }
            Action::StandardMove { units, to } => {
                play::standard_move(state, player, units, *to)?;
            }
            Action::ExhaustRune { rune } => play::exhaust_rune(state, player, *rune)?,
            Action::RecycleRune { rune } => play::recycle_rune(state, player, *rune)?,
            Action::SealGear { gear } => play::seal_gear(registry, state, player, *gear)?,
            Action::ActivateLegend => play::activate_legend(registry, state, player)?,
        }

        // Acting (other than passing) restarts the pass count.
        if !matches!(action, Action::PassPriority) {
            state.passes = 0;
        }

        // Every mutation is followed by the sweep and a window check.
        chain::sweep_and_queue_deaths(registry, state);
        chain::settle(state);
        Ok(())
    }
}
