//! Power domains and domain sets.
//!
//! Every rune provides power of exactly one domain; card costs name the
//! domains their power component may be paid with. Multi-domain cards carry
//! a comma-separated domain string in the external schema, parsed here into
//! a `DomainSet` bitmask.

use serde::{Deserialize, Serialize};

/// The six power domains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Fury,
    Calm,
    Mind,
    Body,
    Order,
    Chaos,
}

impl Domain {
    /// All domains, in canonical order.
    pub const ALL: [Domain; 6] = [
        Domain::Fury,
        Domain::Calm,
        Domain::Mind,
        Domain::Body,
        Domain::Order,
        Domain::Chaos,
    ];

    /// Canonical index (0-based) of this domain.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parse a single domain name, case-insensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "fury" => Some(Domain::Fury),
            "calm" => Some(Domain::Calm),
            "mind" => Some(Domain::Mind),
            "body" => Some(Domain::Body),
            "order" => Some(Domain::Order),
            "chaos" => Some(Domain::Chaos),
            _ => None,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Domain::Fury => "Fury",
            Domain::Calm => "Calm",
            Domain::Mind => "Mind",
            Domain::Body => "Body",
            Domain::Order => "Order",
            Domain::Chaos => "Chaos",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of domains, packed into a bitmask.
///
/// ## Example
///
/// ```
/// use duelbound::cards::{Domain, DomainSet};
///
/// let set = DomainSet::parse("Fury, Mind");
/// assert!(set.contains(Domain::Fury));
/// assert!(set.contains(Domain::Mind));
/// assert!(!set.contains(Domain::Calm));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainSet(u8);

impl DomainSet {
    /// The empty set ("Colorless" in the external schema).
    pub const EMPTY: DomainSet = DomainSet(0);

    /// A set containing a single domain.
    #[must_use]
    pub const fn single(domain: Domain) -> Self {
        Self(1 << domain.index())
    }

    /// The set of all six domains.
    #[must_use]
    pub const fn all() -> Self {
        Self(0b11_1111)
    }

    /// Parse a comma-separated domain string.
    ///
    /// Unrecognized names (including "Colorless") contribute nothing.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut set = Self::EMPTY;
        for part in text.split(',') {
            if let Some(domain) = Domain::from_name(part) {
                set.insert(domain);
            }
        }
        set
    }

    /// Add a domain to the set.
    pub fn insert(&mut self, domain: Domain) {
        self.0 |= 1 << domain.index();
    }

    /// Check membership.
    #[must_use]
    pub const fn contains(self, domain: Domain) -> bool {
        self.0 & (1 << domain.index()) != 0
    }

    /// Number of domains in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check if the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over members in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Domain> {
        Domain::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl From<Domain> for DomainSet {
    fn from(domain: Domain) -> Self {
        Self::single(domain)
    }
}

impl std::fmt::Display for DomainSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for domain in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(domain.name())?;
            first = false;
        }
        Ok(())
    }
}
