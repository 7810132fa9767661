//! Multi-factor contact scoring.
//!
//! total = w_d * distance + w_c * class + w_p * persistence, with strategy
//! overrides applied to the class term.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use duel_core::constants::*;
use duel_core::enums::{EngagementStrategy, Signature, SuspectedType};
use duel_core::types::{ContactReport, Position};

use crate::engagement::EngagementState;
use crate::history::HistoryTracker;

/// How the classification term is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ClassScoring {
    /// From the classifier's suspected type, scaled by confidence.
    SuspectedType {
        genuine: f64,
        self_propelled: f64,
        stationary: f64,
        /// Flat value for unclassified or untracked contacts.
        unknown: f64,
    },
    /// Same value for every candidate that reaches scoring.
    Flat { value: f64 },
    /// From the sensor-reported signature and speed.
    Signature,
}

/// How the persistence term is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PersistenceScoring {
    None,
    /// Fixed bonus for the currently locked contact.
    LockBonus { bonus: f64 },
    /// Grows with the number of times the contact has been selected.
    Tracking { base: f64, per_track: f64, cap: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Distance at which the distance term reaches zero (at slope 1).
    pub distance_cap: f64,
    /// Points lost per unit of distance.
    pub distance_slope: f64,
    pub distance_weight: f64,
    pub class_weight: f64,
    pub persistence_weight: f64,
    pub class: ClassScoring,
    pub persistence: PersistenceScoring,
    /// Apply the engagement strategy's class overrides.
    #[serde(default)]
    pub strategy_overrides: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            distance_cap: 50.0,
            distance_slope: 1.0,
            distance_weight: 1.0,
            class_weight: 1.0,
            persistence_weight: 1.0,
            class: ClassScoring::SuspectedType {
                genuine: 100.0,
                self_propelled: 20.0,
                stationary: 5.0,
                unknown: 30.0,
            },
            persistence: PersistenceScoring::None,
            strategy_overrides: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub distance_raw: f64,
    pub distance: f64,
    pub class: f64,
    pub persistence: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredContact {
    pub contact: ContactReport,
    pub score: ScoreBreakdown,
}

/// Score one contact as seen from `origin`.
pub fn score_contact(
    contact: &ContactReport,
    origin: &Position,
    tracker: &HistoryTracker,
    state: &EngagementState,
    config: &ScoringConfig,
) -> ScoreBreakdown {
    let distance_raw = origin.horizontal_range_to(&contact.position);
    let distance = (config.distance_cap - config.distance_slope * distance_raw).max(0.0);

    let history = tracker.get(contact.id);
    let mut class = match &config.class {
        ClassScoring::SuspectedType {
            genuine,
            self_propelled,
            stationary,
            unknown,
        } => match history {
            Some(h) => match h.suspected_type {
                SuspectedType::GenuineTarget => genuine * h.confidence,
                SuspectedType::SelfPropelledDecoy => self_propelled * h.confidence,
                SuspectedType::StationaryDecoy => stationary * h.confidence,
                SuspectedType::Unknown => *unknown,
            },
            None => *unknown,
        },
        ClassScoring::Flat { value } => *value,
        ClassScoring::Signature => signature_score(contact),
    };

    if config.strategy_overrides {
        let is_genuine = history.is_some_and(|h| h.suspected_type == SuspectedType::GenuineTarget);
        let is_confirmed_decoy = state.confirmed_decoys.contains(&contact.id);
        match state.strategy {
            EngagementStrategy::PrioritizeGenuine => {
                if is_genuine {
                    class += PRIORITIZE_GENUINE_BONUS;
                } else if is_confirmed_decoy {
                    class = CONFIRMED_DECOY_SCORE;
                }
            }
            EngagementStrategy::BypassDecoys => {
                if is_confirmed_decoy {
                    class = CONFIRMED_DECOY_SCORE;
                } else if let Some(genuine_pos) = state.last_genuine_position {
                    if contact.position.horizontal_range_to(&genuine_pos) < BYPASS_PROXIMITY_RADIUS
                    {
                        class += BYPASS_PROXIMITY_BONUS;
                    }
                }
            }
            EngagementStrategy::Exhaustive => {}
        }
    }

    let persistence = match config.persistence {
        PersistenceScoring::None => 0.0,
        PersistenceScoring::LockBonus { bonus } => {
            if state.locked == Some(contact.id) {
                bonus
            } else {
                0.0
            }
        }
        PersistenceScoring::Tracking {
            base,
            per_track,
            cap,
        } => {
            let count = history.map_or(0, |h| h.tracking_count);
            (base + per_track * count as f64).min(cap)
        }
    };

    let total = config.distance_weight * distance
        + config.class_weight * class
        + config.persistence_weight * persistence;

    ScoreBreakdown {
        distance_raw,
        distance,
        class,
        persistence,
        total,
    }
}

/// Score every contact and sort best first. Ties keep input order.
pub fn rank_contacts(
    contacts: &[ContactReport],
    origin: &Position,
    tracker: &HistoryTracker,
    state: &EngagementState,
    config: &ScoringConfig,
) -> Vec<ScoredContact> {
    let mut scored: Vec<ScoredContact> = contacts
        .iter()
        .map(|c| ScoredContact {
            contact: c.clone(),
            score: score_contact(c, origin, tracker, state, config),
        })
        .collect();
    scored.sort_by(|a, b| {
        b.score
            .total
            .partial_cmp(&a.score.total)
            .unwrap_or(Ordering::Equal)
    });
    scored
}

/// Movement score from a sensor-reported signature.
///
/// Contacts without a reported speed are assumed to move at ship speed.
pub fn signature_score(contact: &ContactReport) -> f64 {
    let speed = contact.xy_speed.unwrap_or(SHIP_STANDARD_SPEED);
    let deviation = (speed - SHIP_STANDARD_SPEED).abs();
    match contact.signature {
        Some(Signature::Surface) => {
            if deviation < 0.1 {
                40.0
            } else {
                (40.0 - deviation * 15.0).max(0.0)
            }
        }
        Some(Signature::SelfPropelledDecoy) => {
            if speed == 0.0 {
                8.0
            } else if deviation < 0.5 {
                25.0
            } else {
                20.0
            }
        }
        Some(Signature::StationaryDecoy) => {
            if speed == 0.0 {
                5.0
            } else {
                2.0
            }
        }
        None => (25.0 - speed * 3.0).max(0.0),
    }
}
