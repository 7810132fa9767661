//! Kinematic classification of contacts.
//!
//! Pure functions: the same history always yields the same classification.
//! Thresholds encode the game rule that the genuine target cruises at 3.0
//! with evasive turns, self-propelled decoys run slower on a straight line,
//! and stationary decoys barely move.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use duel_core::constants::*;
use duel_core::enums::SuspectedType;
use duel_core::types::Velocity;

use crate::history::{step_velocity, ContactHistory};

/// Classification rule thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    pub genuine_speed_min: f64,
    pub genuine_speed_max: f64,
    pub genuine_max_variance: f64,
    pub genuine_min_heading_change: f64,
    pub genuine_confidence: f64,
    pub self_propelled_speed_min: f64,
    pub self_propelled_speed_max: f64,
    pub self_propelled_max_variance: f64,
    pub self_propelled_max_heading_change: f64,
    pub self_propelled_confidence: f64,
    pub stationary_max_speed: f64,
    pub stationary_confidence: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            genuine_speed_min: GENUINE_SPEED_MIN,
            genuine_speed_max: GENUINE_SPEED_MAX,
            genuine_max_variance: GENUINE_MAX_SPEED_VARIANCE,
            genuine_min_heading_change: GENUINE_MIN_HEADING_CHANGE,
            genuine_confidence: GENUINE_CONFIDENCE,
            self_propelled_speed_min: SELF_PROPELLED_SPEED_MIN,
            self_propelled_speed_max: SELF_PROPELLED_SPEED_MAX,
            self_propelled_max_variance: SELF_PROPELLED_MAX_SPEED_VARIANCE,
            self_propelled_max_heading_change: SELF_PROPELLED_MAX_HEADING_CHANGE,
            self_propelled_confidence: SELF_PROPELLED_CONFIDENCE,
            stationary_max_speed: STATIONARY_MAX_SPEED,
            stationary_confidence: STATIONARY_CONFIDENCE,
        }
    }
}

/// Summary statistics of a contact's recent motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicSignature {
    pub avg_speed: f64,
    /// Population variance of per-step speed.
    pub speed_variance: f64,
    /// Mean absolute heading change between consecutive steps, in [0, π].
    pub avg_heading_change: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub kind: SuspectedType,
    pub confidence: f64,
}

/// Per-step velocities over the position window, skipping zero-Δtick pairs.
pub fn window_velocities(history: &ContactHistory) -> Vec<Velocity> {
    history
        .positions
        .iter()
        .zip(history.positions.iter().skip(1))
        .filter_map(|(prev, curr)| step_velocity(prev, curr))
        .collect()
}

/// Compute the kinematic signature of a set of step velocities.
/// Returns None for an empty slice.
pub fn signature_of(velocities: &[Velocity]) -> Option<KinematicSignature> {
    if velocities.is_empty() {
        return None;
    }

    let speeds: Vec<f64> = velocities.iter().map(|v| v.horizontal_speed()).collect();
    let n = speeds.len() as f64;
    let avg_speed = speeds.iter().sum::<f64>() / n;
    let speed_variance = speeds.iter().map(|s| (s - avg_speed).powi(2)).sum::<f64>() / n;

    let changes: Vec<f64> = velocities
        .windows(2)
        .map(|pair| heading_change(&pair[0], &pair[1]))
        .collect();
    let avg_heading_change = if changes.is_empty() {
        0.0
    } else {
        changes.iter().sum::<f64>() / changes.len() as f64
    };

    Some(KinematicSignature {
        avg_speed,
        speed_variance,
        avg_heading_change,
    })
}

/// Absolute direction change between two step vectors, folded into [0, π].
pub fn heading_change(prev: &Velocity, curr: &Velocity) -> f64 {
    let a = prev.y.atan2(prev.x);
    let b = curr.y.atan2(curr.x);
    let diff = (b - a).abs();
    if diff > PI {
        TAU - diff
    } else {
        diff
    }
}

/// Apply the rule table to a signature. First matching rule wins; None if no rule matches.
pub fn classify_signature(
    sig: &KinematicSignature,
    t: &ClassifierThresholds,
) -> Option<Classification> {
    let in_band = |v: f64, lo: f64, hi: f64| v >= lo && v <= hi;

    if in_band(sig.avg_speed, t.genuine_speed_min, t.genuine_speed_max)
        && sig.speed_variance < t.genuine_max_variance
        && sig.avg_heading_change > t.genuine_min_heading_change
    {
        return Some(Classification {
            kind: SuspectedType::GenuineTarget,
            confidence: t.genuine_confidence,
        });
    }

    if in_band(
        sig.avg_speed,
        t.self_propelled_speed_min,
        t.self_propelled_speed_max,
    ) && sig.speed_variance < t.self_propelled_max_variance
        && sig.avg_heading_change < t.self_propelled_max_heading_change
    {
        return Some(Classification {
            kind: SuspectedType::SelfPropelledDecoy,
            confidence: t.self_propelled_confidence,
        });
    }

    if sig.avg_speed < t.stationary_max_speed {
        return Some(Classification {
            kind: SuspectedType::StationaryDecoy,
            confidence: t.stationary_confidence,
        });
    }

    None
}

/// Classify a contact from its history.
///
/// With fewer than two samples, or when no rule matches, the history's
/// current classification is returned unchanged.
pub fn classify(history: &ContactHistory, thresholds: &ClassifierThresholds) -> Classification {
    let current = Classification {
        kind: history.suspected_type,
        confidence: history.confidence,
    };
    if history.positions.len() < 2 {
        return current;
    }

    let velocities = window_velocities(history);
    signature_of(&velocities)
        .and_then(|sig| classify_signature(&sig, thresholds))
        .unwrap_or(current)
}

/// Hard speed filter: rejects a contact whose measured average speed lies
/// outside the genuine band. Contacts with fewer than two velocity samples pass.
pub fn passes_speed_filter(history: Option<&ContactHistory>, t: &ClassifierThresholds) -> bool {
    let Some(history) = history else {
        return true;
    };
    if history.velocities.len() < 2 {
        return true;
    }
    match history.average_speed() {
        Some(avg) => avg >= t.genuine_speed_min && avg <= t.genuine_speed_max,
        None => true,
    }
}
