//! Card definition lookup.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{CardDef, CardId, CardKind};

/// Reserved id range for engine-created token units.
const TOKEN_BASE: u32 = 1_000_000;

/// Maximum might a generated token definition can carry.
const TOKEN_MAX_MIGHT: i32 = 9;

/// Registry of card definitions.
///
/// The engine consumes definitions as input; it does not load or validate
/// card databases. Token definitions (might 0 through 9) are seeded at
/// construction so ability text like "play 2 might-1 tokens" always
/// resolves to a registered card.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDef>,
}

impl CardRegistry {
    /// Create a registry pre-seeded with token definitions.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            cards: FxHashMap::default(),
        };
        for might in 0..=TOKEN_MAX_MIGHT {
            let id = Self::token(might);
            registry.cards.insert(
                id,
                CardDef {
                    id,
                    name: format!("Recruit Token ({might})"),
                    domains: crate::cards::DomainSet::EMPTY,
                    kind: CardKind::Unit { might },
                    energy_cost: 0,
                    power_cost: 0,
                    ability: Default::default(),
                },
            );
        }
        registry
    }

    /// Create a registry from an iterator of definitions.
    #[must_use]
    pub fn with_cards(cards: impl IntoIterator<Item = CardDef>) -> Self {
        let mut registry = Self::new();
        for def in cards {
            registry.register(def);
        }
        registry
    }

    /// Register a definition, replacing any previous card with the same id.
    pub fn register(&mut self, def: CardDef) {
        self.cards.insert(def.id, def);
    }

    /// Get a definition by id.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDef> {
        self.cards.get(&id)
    }

    /// The id of the generated token with the given might.
    ///
    /// Might values outside the seeded range are clamped.
    #[must_use]
    pub fn token(might: i32) -> CardId {
        let might = might.clamp(0, TOKEN_MAX_MIGHT) as u32;
        CardId::new(TOKEN_BASE + might)
    }

    /// True if the id falls in the generated-token range.
    #[must_use]
    pub fn is_token(id: CardId) -> bool {
        id.raw() >= TOKEN_BASE
    }

    /// Number of registered definitions (tokens included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry has no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDef;

    #[test]
    fn test_register_and_get() {
        let mut registry = CardRegistry::new();
        registry.register(CardDef::unit(CardId::new(1), "Grunt", "Fury", 2, 1, 3));

        let def = registry.get(CardId::new(1)).unwrap();
        assert_eq!(def.name, "Grunt");
        assert!(registry.get(CardId::new(99)).is_none());
    }

    #[test]
    fn test_tokens_preseeded() {
        let registry = CardRegistry::new();

        let id = CardRegistry::token(2);
        let def = registry.get(id).unwrap();
        assert_eq!(def.might(), Some(2));
        assert_eq!(def.energy_cost, 0);
        assert!(CardRegistry::is_token(id));
        assert!(!CardRegistry::is_token(CardId::new(1)));
    }

    #[test]
    fn test_token_might_clamped() {
        let registry = CardRegistry::new();
        assert_eq!(CardRegistry::token(40), CardRegistry::token(9));
        assert_eq!(CardRegistry::token(-3), CardRegistry::token(0));
        assert!(registry.get(CardRegistry::token(40)).is_some());
    }

    #[test]
    fn test_with_cards() {
        let registry = CardRegistry::with_cards([
            CardDef::unit(CardId::new(1), "Grunt", "Fury", 2, 1, 3),
            CardDef::spell(CardId::new(2), "Zap", "Mind", 1, 0, "Deal 2 damage to a unit."),
        ]);

        assert!(registry.get(CardId::new(1)).is_some());
        assert!(registry.get(CardId::new(2)).is_some());
    }
}
