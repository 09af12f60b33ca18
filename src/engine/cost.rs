//! Cost computation, payment, and the auto-pay planner.
//!
//! A cost has four parts: energy, base power restricted to an
//! allowed-domain set, an optional extra domain-tagged power component,
//! and optional extra any-domain power. `can_afford` simulates payment on
//! a scratch pool; `pay` commits it, spending from the domain with the
//! largest surplus first (greedy, deterministic, ties broken in canonical
//! domain order).
//!
//! The auto-pay planner decides which runes to recycle or exhaust to
//! *generate* the missing resources before paying. It enumerates recycle
//! subsets as a bitmask over at most 12 runes-in-play (a brute-force
//! search with a fixed upper bound, not a heuristic), then covers any
//! energy shortfall by exhausting the fewest ready runes, preferring runes
//! already chosen for recycling (an exhaust-then-recycle combo counts as
//! one rune used).

use crate::cards::{CardDef, Domain, DomainSet};
use crate::state::{InstanceId, PlayerState, ResourcePool};

use super::error::PaymentError;

/// Upper bound on the rune subset search.
const MAX_SEARCH_RUNES: usize = 12;

/// A cost to be paid from a resource pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CostSpec {
    /// Energy component.
    pub energy: i32,
    /// Base power component; payable from `domains`.
    pub power: i32,
    /// Domains allowed to pay the base power component.
    pub domains: DomainSet,
    /// Extra power that must come from one specific domain.
    pub extra_tagged: Option<(Domain, i32)>,
    /// Extra power payable from any domain.
    pub extra_any: i32,
}

impl CostSpec {
    /// A free cost.
    #[must_use]
    pub fn free() -> Self {
        Self::default()
    }

    /// The printed cost of a card. Cards without domains (tokens,
    /// colorless cards) may pay their power component from any domain.
    #[must_use]
    pub fn of_card(def: &CardDef) -> Self {
        let domains = if def.domains.is_empty() {
            DomainSet::all()
        } else {
            def.domains
        };
        Self {
            energy: def.energy_cost,
            power: def.power_cost,
            domains,
            extra_tagged: None,
            extra_any: 0,
        }
    }

    /// Add an energy surcharge (accelerate, deflect).
    #[must_use]
    pub fn with_energy_surcharge(mut self, extra: i32) -> Self {
        self.energy += extra;
        self
    }

    /// True when nothing is owed.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.energy == 0
            && self.power == 0
            && self.extra_any == 0
            && self.extra_tagged.map_or(true, |(_, n)| n == 0)
    }
}

/// Simulate payment without mutating the pool.
#[must_use]
pub fn can_afford(pool: &ResourcePool, spec: &CostSpec) -> bool {
    let mut scratch = *pool;
    pay(&mut scratch, spec).is_ok()
}

/// Commit a payment.
///
/// Fails without partially applying only if the pool cannot cover the
/// cost; callers are expected to have checked `can_afford` first, so a
/// failure here is a programming-logic error upstream.
pub fn pay(pool: &mut ResourcePool, spec: &CostSpec) -> Result<(), PaymentError> {
    let mut scratch = *pool;

    if scratch.energy < spec.energy {
        return Err(PaymentError::Energy);
    }
    scratch.energy -= spec.energy;

    if let Some((domain, amount)) = spec.extra_tagged {
        if scratch.power(domain) < amount {
            return Err(PaymentError::Power(domain));
        }
        scratch.set_power(domain, scratch.power(domain) - amount);
    }

    spend_greedy(&mut scratch, spec.power, spec.domains)?;
    spend_greedy(&mut scratch, spec.extra_any, DomainSet::all())?;

    *pool = scratch;
    Ok(())
}

/// Spend `amount` power one unit at a time from the allowed domain with
/// the largest remaining surplus; ties break in canonical domain order.
fn spend_greedy(
    pool: &mut ResourcePool,
    amount: i32,
    allowed: DomainSet,
) -> Result<(), PaymentError> {
    for _ in 0..amount {
        let richest = allowed
            .iter()
            .max_by_key(|d| (pool.power(*d), std::cmp::Reverse(d.index())))
            .filter(|d| pool.power(*d) > 0);
        match richest {
            Some(domain) => pool.set_power(domain, pool.power(domain) - 1),
            None => {
                let blamed = allowed.iter().next().unwrap_or(Domain::Fury);
                return Err(PaymentError::Power(blamed));
            }
        }
    }
    Ok(())
}

/// A resource-generation plan: which runes to exhaust for energy and
/// which to recycle for power, before paying a cost.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PayPlan {
    /// Runes to recycle (power of their domain; rune goes to the bottom
    /// of the rune deck).
    pub recycle: Vec<InstanceId>,
    /// Runes to exhaust (one energy each). May overlap with `recycle`.
    pub exhaust: Vec<InstanceId>,
}

impl PayPlan {
    /// Total distinct runes the plan touches.
    #[must_use]
    pub fn runes_touched(&self) -> usize {
        let mut ids: Vec<InstanceId> = self
            .recycle
            .iter()
            .chain(self.exhaust.iter())
            .copied()
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

/// Search for the cheapest rune-usage plan that makes `spec` affordable.
///
/// Candidate plans are ranked by (fewest recycled runes, fewest
/// exhaust-only runes, fewest total runes touched); ties go to the
/// first-found plan. Returns `None` if no subset yields a legal payment.
#[must_use]
pub fn plan_auto_pay(player: &PlayerState, spec: &CostSpec) -> Option<PayPlan> {
    let runes: Vec<_> = player
        .runes_in_play
        .iter()
        .take(MAX_SEARCH_RUNES)
        .collect();
    let n = runes.len();

    let mut best: Option<((usize, usize, usize), PayPlan)> = None;

    for mask in 0u32..(1 << n) {
        let mut pool = player.pool;
        for (i, rune) in runes.iter().enumerate() {
            if mask & (1 << i) != 0 {
                pool.add_power(rune.domain, 1);
            }
        }

        // Cover the energy shortfall by exhausting ready runes, runes
        // already being recycled first.
        let shortfall = (spec.energy - pool.energy).max(0) as usize;
        let mut exhaust = Vec::new();
        if shortfall > 0 {
            let in_mask = |i: usize| mask & (1 << i) != 0;
            for (i, rune) in runes.iter().enumerate() {
                if exhaust.len() == shortfall {
                    break;
                }
                if rune.ready && in_mask(i) {
                    exhaust.push(rune.id);
                }
            }
            for (i, rune) in runes.iter().enumerate() {
                if exhaust.len() == shortfall {
                    break;
                }
                if rune.ready && !in_mask(i) {
                    exhaust.push(rune.id);
                }
            }
            if exhaust.len() < shortfall {
                continue;
            }
            pool.add_energy(exhaust.len() as i32);
        }

        if !can_afford(&pool, spec) {
            continue;
        }

        let recycle: Vec<InstanceId> = runes
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, r)| r.id)
            .collect();
        let exhaust_only = exhaust
            .iter()
            .filter(|id| !recycle.contains(id))
            .count();
        let plan = PayPlan { recycle, exhaust };
        let rank = (plan.recycle.len(), exhaust_only, plan.runes_touched());

        if best.as_ref().map_or(true, |(b, _)| rank < *b) {
            best = Some((rank, plan));
        }
    }

    best.map(|(_, plan)| plan)
}

/// Apply a plan to a player: exhaust for energy, recycle for power.
///
/// The order matters: a combo rune must be exhausted while it is still
/// in play, then recycled.
pub fn execute_plan(player: &mut PlayerState, plan: &PayPlan) -> Result<(), PaymentError> {
    for &id in &plan.exhaust {
        let rune = player
            .runes_in_play
            .iter_mut()
            .find(|r| r.id == id && r.ready)
            .ok_or(PaymentError::Energy)?;
        rune.ready = false;
        player.pool.add_energy(1);
    }
    for &id in &plan.recycle {
        let pos = player
            .runes_in_play
            .iter()
            .position(|r| r.id == id)
            .ok_or(PaymentError::Energy)?;
        let mut rune = player.runes_in_play.remove(pos);
        player.pool.add_power(rune.domain, 1);
        rune.ready = true;
        player.rune_deck.push_front(rune);
    }
    Ok(())
}
