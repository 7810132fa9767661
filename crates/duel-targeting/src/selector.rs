//! Target selection with switching hysteresis.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use duel_core::types::ContactReport;

use crate::engagement::EngagementState;
use crate::history::HistoryTracker;
use crate::scoring::ScoredContact;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HysteresisConfig {
    /// Lock cycles before a held lock resists switching.
    pub min_lock_cycles: u32,
    /// Relative improvement the best contact needs over the lock.
    pub switch_threshold: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub contact: ContactReport,
    pub score: f64,
    /// Horizontal range to the chosen contact.
    pub distance: f64,
    /// The lock moved to a different contact this tick.
    pub switched: bool,
    /// The lock was kept although another contact scored higher.
    pub held: bool,
}

/// `(best - current) / max(current, 1)`.
pub fn improvement_ratio(best: f64, current: f64) -> f64 {
    (best - current) / current.max(1.0)
}

/// Pick the contact to lock from a ranking sorted best first.
///
/// A lock held for at least `min_lock_cycles` survives unless the best
/// contact improves on it by `switch_threshold` or more. The chosen
/// contact's tracking count is incremented.
pub fn select_target(
    ranked: &[ScoredContact],
    state: &mut EngagementState,
    tracker: &mut HistoryTracker,
    hysteresis: Option<&HysteresisConfig>,
) -> Option<Selection> {
    let best = ranked.first()?;

    if let (Some(h), Some(locked)) = (hysteresis, state.locked) {
        let current = ranked.iter().find(|s| s.contact.id == locked);
        if let Some(current) = current {
            if state.lock_count >= h.min_lock_cycles {
                let ratio = improvement_ratio(best.score.total, current.score.total);
                if ratio < h.switch_threshold {
                    state.lock_count += 1;
                    bump_tracking(tracker, current);
                    debug!(
                        contact = %locked,
                        lock_count = state.lock_count,
                        ratio,
                        "lock held"
                    );
                    return Some(Selection {
                        contact: current.contact.clone(),
                        score: current.score.total,
                        distance: current.score.distance_raw,
                        switched: false,
                        held: best.contact.id != locked,
                    });
                }
            }
        }
    }

    let switched = state.locked != Some(best.contact.id);
    if switched {
        info!(
            from = ?state.locked,
            to = %best.contact.id,
            score = best.score.total,
            "target switch"
        );
        state.locked = Some(best.contact.id);
        state.lock_count = 0;
    } else {
        state.lock_count += 1;
    }
    bump_tracking(tracker, best);

    Some(Selection {
        contact: best.contact.clone(),
        score: best.score.total,
        distance: best.score.distance_raw,
        switched,
        held: false,
    })
}

fn bump_tracking(tracker: &mut HistoryTracker, scored: &ScoredContact) {
    if let Some(history) = tracker.get_mut(scored.contact.id) {
        history.tracking_count += 1;
    }
}
