//! Countermeasure budget.
//!
//! Decoys are paid for when ordered. A decoy the host refuses to register is
//! refunded, so the pool only ever shrinks by what was actually dispatched.
//! A decoy is affordable when its cost does not exceed what remains.

use serde::{Deserialize, Serialize};
use tracing::debug;

use duel_core::types::DecoySpec;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecoyBudget {
    total: f64,
    remaining: f64,
}

impl DecoyBudget {
    pub fn new(total: f64) -> Self {
        let total = total.max(0.0);
        Self {
            total,
            remaining: total,
        }
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn can_afford(&self, cost: f64) -> bool {
        cost >= 0.0 && cost <= self.remaining
    }

    /// Debit `cost` if affordable. Returns whether the debit happened.
    pub fn try_spend(&mut self, cost: f64) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.remaining = (self.remaining - cost).max(0.0);
        true
    }

    /// Return the cost of a paid-for decoy that was never dispatched.
    /// The pool never grows past its starting total.
    pub fn refund(&mut self, cost: f64) {
        if cost.is_finite() && cost > 0.0 {
            self.remaining = (self.remaining + cost).min(self.total);
        }
    }
}

/// Walk the loadout in order and debit every decoy that still fits.
/// Returns the decoys paid for; empty when nothing is affordable.
pub fn plan_salvo(loadout: &[DecoySpec], budget: &mut DecoyBudget) -> Vec<DecoySpec> {
    let mut salvo = Vec::new();
    for spec in loadout {
        let cost = spec.effective_cost();
        if budget.try_spend(cost) {
            salvo.push(spec.clone());
        } else {
            debug!(
                decoy = ?spec.decoy_type,
                cost,
                remaining = budget.remaining(),
                "decoy skipped, over budget"
            );
        }
    }
    salvo
}
