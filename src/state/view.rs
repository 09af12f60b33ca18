//! Redacted state projection.
//!
//! The projection is the only channel through which a client (renderer,
//! network peer, scripted opponent UI) observes the duel. Concealed zones
//! keep their shape (counts and instance ids), but every concealed entry
//! is replaced by an opaque placeholder, so hidden information (opponent
//! hand, deck order, unrevealed face-down cards) never leaves the engine.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, Domain};
use crate::core::{DuelRng, PlayerId};

use super::battlefield::BattlefieldId;
use super::game::GameState;
use super::instance::{CardInstance, InstanceId, RuneInstance};

/// What a viewer is allowed to see beyond public state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyConfig {
    /// Reveal both hands (spectator/replay mode).
    pub reveal_hands: bool,
    /// Reveal face-down cards at battlefields.
    pub reveal_face_down: bool,
    /// Reveal deck and rune-deck order.
    pub reveal_deck_order: bool,
}

impl PrivacyConfig {
    /// Everything concealed (a normal opponent's view).
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Everything revealed (debugging, trusted replay).
    #[must_use]
    pub fn omniscient() -> Self {
        Self {
            reveal_hands: true,
            reveal_face_down: true,
            reveal_deck_order: true,
        }
    }
}

/// Produce a redacted copy of the state for `viewer`.
#[must_use]
pub fn project(state: &GameState, viewer: PlayerId, privacy: PrivacyConfig) -> GameState {
    let mut view = state.clone();

    // The RNG would let a client predict shuffles.
    view.rng = DuelRng::new(0);

    for player in PlayerId::both() {
        // Opponent hands are concealed.
        if player != viewer && !privacy.reveal_hands {
            let hand: Vec<InstanceId> = view.players[player].hand.iter().copied().collect();
            for instance in hand {
                conceal_card(&mut view, instance);
            }
        }

        // Deck order is concealed from everyone, own deck included.
        if !privacy.reveal_deck_order {
            let deck: Vec<InstanceId> = view.players[player].deck.iter().copied().collect();
            for instance in deck {
                conceal_card(&mut view, instance);
            }
            let rune_deck = &mut view.players[player].rune_deck;
            for i in 0..rune_deck.len() {
                let id = rune_deck[i].id;
                rune_deck.set(i, placeholder_rune(id));
            }
        }
    }

    if !privacy.reveal_face_down {
        for bf in BattlefieldId::both() {
            if let Some(face_down) = view.battlefield(bf).face_down {
                if face_down.owner != viewer {
                    conceal_card(&mut view, face_down.instance);
                }
            }
        }
    }

    view
}

/// Replace a card instance with an opaque placeholder, keeping its id
/// and owner so zone shapes stay intact.
fn conceal_card(view: &mut GameState, instance: InstanceId) {
    if let Some(card) = view.card(instance) {
        let owner = card.owner;
        view.add_card(CardInstance::new(instance, CardId::HIDDEN, owner));
    }
}

/// A placeholder rune entry. The domain is a fixed dummy value; it carries
/// no information because the card id is `HIDDEN`.
fn placeholder_rune(id: InstanceId) -> RuneInstance {
    RuneInstance::new(id, CardId::HIDDEN, Domain::Fury)
}
