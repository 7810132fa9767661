//! Engagement strategy and battle phase selection.

use serde::{Deserialize, Serialize};

use duel_core::constants::*;
use duel_core::enums::{BattlePhase, EngagementStrategy, SuspectedType};

use crate::engagement::EngagementState;
use crate::history::HistoryTracker;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Contacts seen within this many ticks count as active.
    pub active_ticks: u64,
    /// Genuine candidates above this confidence select PrioritizeGenuine.
    pub genuine_confidence: f64,
    /// Decoy classifications at or above this confidence are confirmed.
    pub decoy_confirm_confidence: f64,
    /// Confirmed decoys needed, after a salvo, to bypass decoys.
    pub bypass_min_confirmed: usize,
    /// Range at which an engagement becomes terminal.
    pub terminal_distance: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            active_ticks: ACTIVE_CONTACT_TICKS,
            genuine_confidence: GENUINE_STRATEGY_CONFIDENCE,
            decoy_confirm_confidence: DECOY_CONFIRM_CONFIDENCE,
            bypass_min_confirmed: 2,
            terminal_distance: DANGER_DISTANCE,
        }
    }
}

/// Add every confidently classified decoy to the confirmed set.
pub fn confirm_decoys(tracker: &HistoryTracker, state: &mut EngagementState, config: &StrategyConfig) {
    for (id, history) in tracker.iter() {
        if history.suspected_type.is_decoy()
            && history.confidence >= config.decoy_confirm_confidence
        {
            state.confirmed_decoys.insert(*id);
        } else {
            state.confirmed_decoys.remove(id);
        }
    }
    state
        .confirmed_decoys
        .retain(|id| tracker.get(*id).is_some());
}

/// Choose the engagement strategy for this tick and update threat density.
pub fn select_strategy(
    tracker: &HistoryTracker,
    state: &mut EngagementState,
    now: u64,
    config: &StrategyConfig,
) -> EngagementStrategy {
    state.threat_density = tracker
        .iter()
        .filter(|(_, h)| now.saturating_sub(h.last_seen) <= config.active_ticks)
        .count();

    let genuine_candidates = tracker
        .iter()
        .filter(|(_, h)| {
            h.suspected_type == SuspectedType::GenuineTarget
                && h.confidence > config.genuine_confidence
        })
        .count();

    let strategy = if genuine_candidates >= 1 {
        EngagementStrategy::PrioritizeGenuine
    } else if state.decoy_deployment_detected
        && state.confirmed_decoys.len() >= config.bypass_min_confirmed
    {
        EngagementStrategy::BypassDecoys
    } else {
        EngagementStrategy::Exhaustive
    };
    state.strategy = strategy;
    strategy
}

/// Battle phase from the current lock and its range.
pub fn battle_phase(locked_range: Option<f64>, config: &StrategyConfig) -> BattlePhase {
    match locked_range {
        None => BattlePhase::Search,
        Some(range) if range < config.terminal_distance => BattlePhase::Terminal,
        Some(_) => BattlePhase::Engage,
    }
}
