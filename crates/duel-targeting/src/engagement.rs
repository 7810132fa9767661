//! Per-controller engagement state.
//!
//! One instance per controller, mutated only inside that controller's tick.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use duel_core::enums::{BattlePhase, EngagementStrategy};
use duel_core::types::{ContactId, Position};

use crate::budget::DecoyBudget;
use crate::history::HistoryTracker;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementState {
    /// Currently locked contact.
    pub locked: Option<ContactId>,
    /// Ticks the current lock has been held. Reset to 0 on every switch.
    pub lock_count: u32,
    pub strategy: EngagementStrategy,
    pub phase: BattlePhase,
    pub budget: DecoyBudget,
    /// Tick of the last decoy launch.
    pub last_launch_tick: Option<u64>,
    /// Threat the current engagement is about; deployment re-arms when it changes.
    pub engaged_threat: Option<ContactId>,
    /// Decoys already deployed for the current engagement.
    pub decoy_deployed: bool,
    /// A decoy salvo has been seen at some point in this run.
    pub decoy_deployment_detected: bool,
    /// Last estimated genuine-target position, from salvo analysis.
    pub last_genuine_position: Option<Position>,
    pub confirmed_decoys: BTreeSet<ContactId>,
    /// Contacts currently failing the hard speed filter.
    pub suspected_decoys: BTreeSet<ContactId>,
    /// Contacts seen within the active window at the last strategy pass.
    pub threat_density: usize,
}

impl EngagementState {
    pub fn new(budget: f64) -> Self {
        Self {
            locked: None,
            lock_count: 0,
            strategy: EngagementStrategy::default(),
            phase: BattlePhase::default(),
            budget: DecoyBudget::new(budget),
            last_launch_tick: None,
            engaged_threat: None,
            decoy_deployed: false,
            decoy_deployment_detected: false,
            last_genuine_position: None,
            confirmed_decoys: BTreeSet::new(),
            suspected_decoys: BTreeSet::new(),
            threat_density: 0,
        }
    }

    /// Start a new engagement against `threat` if it differs from the current one.
    pub fn engage(&mut self, threat: ContactId) {
        if self.engaged_threat != Some(threat) {
            self.engaged_threat = Some(threat);
            self.decoy_deployed = false;
        }
    }

    /// Drop decoy ids whose history is no longer tracked.
    pub fn forget_untracked(&mut self, tracker: &HistoryTracker) {
        self.confirmed_decoys.retain(|id| tracker.get(*id).is_some());
        self.suspected_decoys.retain(|id| tracker.get(*id).is_some());
    }

    /// Whether the launch interval has elapsed since the last launch.
    pub fn launch_interval_elapsed(&self, tick: u64, min_interval: u64) -> bool {
        self.last_launch_tick
            .map_or(true, |last| tick.saturating_sub(last) >= min_interval)
    }
}
