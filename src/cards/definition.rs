//! Card definitions - static card data.
//!
//! `CardDef` holds the immutable properties of a card. The external card
//! database hands the engine a loosely-typed record (id, name, domain
//! string, cost, type tag, optional stats, ability block); here that shape
//! is modeled as a tagged union over the six card types so that only the
//! fields relevant to each type exist.
//!
//! Instance-specific data (damage, exhaustion, grants) lives in
//! `state::CardInstance`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::domain::{Domain, DomainSet};

/// Unique identifier for a card definition.
///
/// Identifies the printed card, not a specific copy in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Placeholder id used in redacted projections for concealed cards.
    pub const HIDDEN: CardId = CardId(0);

    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card keywords with dedicated engine logic.
///
/// `Assault` and `Shield` carry a magnitude ("Assault 2" in card text).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    /// Absorbs combat damage before other units on its side.
    Tank,
    /// Bonus might while attacking.
    Assault(u8),
    /// Bonus might while defending.
    Shield(u8),
    /// Play ability fires only if another card was played this turn.
    Legion,
    /// May be placed face-down at a controlled battlefield.
    Hidden,
    /// May pay extra energy to arrive ready.
    Accelerate,
    /// Opposing targeted plays pay extra energy per targeted copy.
    Deflect,
}

impl Keyword {
    /// Parse a keyword from card text, e.g. "Tank" or "Assault 2".
    #[must_use]
    pub fn from_name(text: &str) -> Option<Self> {
        let text = text.trim().to_ascii_lowercase();
        let mut parts = text.split_whitespace();
        let name = parts.next()?;
        let value: u8 = parts.next().and_then(|n| n.parse().ok()).unwrap_or(1);
        match name {
            "tank" => Some(Keyword::Tank),
            "assault" => Some(Keyword::Assault(value)),
            "shield" => Some(Keyword::Shield(value)),
            "legion" => Some(Keyword::Legion),
            "hidden" => Some(Keyword::Hidden),
            "accelerate" => Some(Keyword::Accelerate),
            "deflect" => Some(Keyword::Deflect),
            _ => None,
        }
    }

    /// True when `self` is the same keyword as `other`, ignoring magnitude.
    #[must_use]
    pub fn same_kind(self, other: Keyword) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Keyword::Tank => write!(f, "Tank"),
            Keyword::Assault(n) => write!(f, "Assault {n}"),
            Keyword::Shield(n) => write!(f, "Shield {n}"),
            Keyword::Legion => write!(f, "Legion"),
            Keyword::Hidden => write!(f, "Hidden"),
            Keyword::Accelerate => write!(f, "Accelerate"),
            Keyword::Deflect => write!(f, "Deflect"),
        }
    }
}

/// When an ability block's effect text resolves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityTrigger {
    /// No automatic trigger; text is flavor or keyword restatement.
    #[default]
    Static,
    /// When the card resolves into play (the spell effect, for spells).
    Play,
    /// When the controller Holds the battlefield this card is at.
    Hold,
    /// When the controller Conquers the battlefield this card is at.
    Conquer,
    /// When this unit dies.
    Death,
    /// Activated by the owner (legend abilities, gear seals).
    Activated,
}

impl AbilityTrigger {
    /// Parse the external schema's trigger string.
    ///
    /// Unknown trigger strings fall back to `Static`; the interpreter will
    /// surface the gap if the text itself is ever asked to resolve.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "play" | "on play" | "when played" => AbilityTrigger::Play,
            "hold" => AbilityTrigger::Hold,
            "conquer" => AbilityTrigger::Conquer,
            "death" | "last breath" => AbilityTrigger::Death,
            "activated" | "seal" => AbilityTrigger::Activated,
            _ => AbilityTrigger::Static,
        }
    }
}

/// A card's ability block: trigger, free-text effect, keyword list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityBlock {
    /// When the effect text resolves.
    pub trigger: AbilityTrigger,
    /// Free-text effect, consumed by the interpreter.
    pub effect: String,
    /// Keywords printed on the card.
    pub keywords: SmallVec<[Keyword; 2]>,
}

impl AbilityBlock {
    /// An empty block (no trigger, no text, no keywords).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Check whether the block carries a keyword of the given kind.
    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.iter().any(|k| k.same_kind(keyword))
    }
}

/// Type-specific card data.
///
/// Only the fields relevant to each card type exist, so an unsupported
/// combination (a rune with might, a spell with a domain-less rune slot)
/// is unrepresentable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    /// A unit that fights at battlefields.
    Unit {
        /// Base might.
        might: i32,
    },
    /// A one-shot effect; goes to trash after resolving.
    Spell,
    /// A permanent at the base, activated by exhausting ("sealing") it.
    Gear,
    /// A resource card; exhaust for energy, recycle for domain power.
    Rune {
        /// The domain of power this rune provides on recycle.
        domain: Domain,
    },
    /// A contested location.
    Battlefield,
    /// The player's legend; its ability block is an activated ability.
    Legend,
}

impl CardKind {
    /// Short tag name, matching the external schema's type tags.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            CardKind::Unit { .. } => "Unit",
            CardKind::Spell => "Spell",
            CardKind::Gear => "Gear",
            CardKind::Rune { .. } => "Rune",
            CardKind::Battlefield => "Battlefield",
            CardKind::Legend => "Legend",
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use duelbound::cards::{AbilityTrigger, CardDef, CardId, Keyword};
///
/// let recruit = CardDef::unit(CardId::new(1), "Vanguard Recruit", "Order", 2, 1, 2)
///     .with_keyword(Keyword::Tank)
///     .with_effect(AbilityTrigger::Play, "Draw 1 card.");
///
/// assert_eq!(recruit.might(), Some(2));
/// assert!(recruit.has_keyword(Keyword::Tank));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDef {
    /// Unique identifier.
    pub id: CardId,
    /// Card name (display/debugging).
    pub name: String,
    /// Domain membership, parsed from the schema's comma-separated string.
    pub domains: DomainSet,
    /// Type-specific data.
    pub kind: CardKind,
    /// Energy component of the cost (activation cost, for legends).
    pub energy_cost: i32,
    /// Power-icon count; paid with power from this card's domains.
    pub power_cost: i32,
    /// Ability block.
    pub ability: AbilityBlock,
}

impl CardDef {
    fn new(id: CardId, name: impl Into<String>, domains: &str, kind: CardKind) -> Self {
        Self {
            id,
            name: name.into(),
            domains: DomainSet::parse(domains),
            kind,
            energy_cost: 0,
            power_cost: 0,
            ability: AbilityBlock::none(),
        }
    }

    /// A unit card.
    #[must_use]
    pub fn unit(
        id: CardId,
        name: impl Into<String>,
        domains: &str,
        energy: i32,
        power: i32,
        might: i32,
    ) -> Self {
        let mut def = Self::new(id, name, domains, CardKind::Unit { might });
        def.energy_cost = energy;
        def.power_cost = power;
        def
    }

    /// A spell card.
    #[must_use]
    pub fn spell(
        id: CardId,
        name: impl Into<String>,
        domains: &str,
        energy: i32,
        power: i32,
        effect: impl Into<String>,
    ) -> Self {
        let mut def = Self::new(id, name, domains, CardKind::Spell);
        def.energy_cost = energy;
        def.power_cost = power;
        def.ability.trigger = AbilityTrigger::Play;
        def.ability.effect = effect.into();
        def
    }

    /// A gear card.
    #[must_use]
    pub fn gear(
        id: CardId,
        name: impl Into<String>,
        domains: &str,
        energy: i32,
        power: i32,
    ) -> Self {
        let mut def = Self::new(id, name, domains, CardKind::Gear);
        def.energy_cost = energy;
        def.power_cost = power;
        def
    }

    /// A rune card of the given domain.
    #[must_use]
    pub fn rune(id: CardId, name: impl Into<String>, domain: Domain) -> Self {
        let mut def = Self::new(id, name, domain.name(), CardKind::Rune { domain });
        def.domains = DomainSet::single(domain);
        def
    }

    /// A battlefield card.
    #[must_use]
    pub fn battlefield(id: CardId, name: impl Into<String>) -> Self {
        Self::new(id, name, "", CardKind::Battlefield)
    }

    /// A legend card. `energy`/`power` are the activation cost of its
    /// ability.
    #[must_use]
    pub fn legend(
        id: CardId,
        name: impl Into<String>,
        domains: &str,
        energy: i32,
        power: i32,
        effect: impl Into<String>,
    ) -> Self {
        let mut def = Self::new(id, name, domains, CardKind::Legend);
        def.energy_cost = energy;
        def.power_cost = power;
        def.ability.trigger = AbilityTrigger::Activated;
        def.ability.effect = effect.into();
        def
    }

    /// Attach an effect with the given trigger (builder).
    #[must_use]
    pub fn with_effect(mut self, trigger: AbilityTrigger, effect: impl Into<String>) -> Self {
        self.ability.trigger = trigger;
        self.ability.effect = effect.into();
        self
    }

    /// Attach a keyword (builder).
    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.ability.keywords.push(keyword);
        self
    }

    /// Base might, for units.
    #[must_use]
    pub fn might(&self) -> Option<i32> {
        match self.kind {
            CardKind::Unit { might } => Some(might),
            _ => None,
        }
    }

    /// Rune domain, for runes.
    #[must_use]
    pub fn rune_domain(&self) -> Option<Domain> {
        match self.kind {
            CardKind::Rune { domain } => Some(domain),
            _ => None,
        }
    }

    /// Check for a printed keyword of the given kind.
    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.ability.has_keyword(keyword)
    }

    /// True for units.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        matches!(self.kind, CardKind::Unit { .. })
    }

    /// True for spells.
    #[must_use]
    pub fn is_spell(&self) -> bool {
        matches!(self.kind, CardKind::Spell)
    }

    /// True for gear.
    #[must_use]
    pub fn is_gear(&self) -> bool {
        matches!(self.kind, CardKind::Gear)
    }
}
