//! The resource pool: one energy counter plus a per-domain power counter.
//!
//! Pools are scratch space: they fill from rune exhausts/recycles and
//! ability effects, are spent by the cost solver, and empty at the end of
//! the draw phase and at end of turn. Counters never go negative; the
//! state-based sweep clamps as a backstop.

use serde::{Deserialize, Serialize};

use crate::cards::Domain;

/// A player's floating resources.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    /// Colorless energy.
    pub energy: i32,
    /// Power counters, indexed by `Domain::index()`.
    power: [i32; 6],
}

impl ResourcePool {
    /// An empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add energy.
    pub fn add_energy(&mut self, amount: i32) {
        self.energy += amount;
    }

    /// Add power of a domain.
    pub fn add_power(&mut self, domain: Domain, amount: i32) {
        self.power[domain.index()] += amount;
    }

    /// Power available in a domain.
    #[must_use]
    pub fn power(&self, domain: Domain) -> i32 {
        self.power[domain.index()]
    }

    /// Directly set a domain's power counter. The cost solver uses this
    /// when committing payment.
    pub fn set_power(&mut self, domain: Domain, amount: i32) {
        self.power[domain.index()] = amount;
    }

    /// Total power across all domains.
    #[must_use]
    pub fn total_power(&self) -> i32 {
        self.power.iter().sum()
    }

    /// True when the pool holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.energy == 0 && self.power.iter().all(|&p| p == 0)
    }

    /// Empty the pool.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Clamp every counter to be non-negative.
    ///
    /// Returns true if anything was clamped; a clamp indicates an engine
    /// bug upstream, so callers log when it fires.
    pub fn clamp_non_negative(&mut self) -> bool {
        let mut clamped = false;
        if self.energy < 0 {
            self.energy = 0;
            clamped = true;
        }
        for p in &mut self.power {
            if *p < 0 {
                *p = 0;
                clamped = true;
            }
        }
        clamped
    }
}

impl std::fmt::Display for ResourcePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}E", self.energy)?;
        for domain in Domain::ALL {
            let p = self.power(domain);
            if p > 0 {
                write!(f, " {}x{}", p, domain)?;
            }
        }
        Ok(())
    }
}
