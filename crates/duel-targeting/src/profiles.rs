//! Role-specific targeting profiles.
//!
//! All controller variants share one engine; what differs between them is
//! captured here as data. Profiles can be adjusted from JSON by overlaying a
//! partial document on a role's defaults.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use duel_core::constants::*;
use duel_core::enums::ControllerRole;

use crate::classifier::ClassifierThresholds;
use crate::deployment::GroupDeploymentConfig;
use crate::history::HistoryConfig;
use crate::planner::PlannerConfig;
use crate::pursuit::PursuitConfig;
use crate::scoring::{ClassScoring, PersistenceScoring, ScoringConfig};
use crate::selector::HysteresisConfig;
use crate::strategy::StrategyConfig;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed profile JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid profile value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Everything that parameterizes one controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetingProfile {
    pub role: ControllerRole,
    pub history: HistoryConfig,
    pub classifier: ClassifierThresholds,
    pub deployment: GroupDeploymentConfig,
    pub strategy: StrategyConfig,
    pub scoring: ScoringConfig,
    /// None ranks without lock hysteresis.
    pub hysteresis: Option<HysteresisConfig>,
    /// Reject contacts outside the genuine speed band before scoring.
    pub speed_filter: bool,
    pub planner: PlannerConfig,
    pub pursuit: PursuitConfig,
    /// Countermeasure budget for the run.
    pub budget: f64,
}

/// Default profile for a controller role.
pub fn get_profile(role: ControllerRole) -> TargetingProfile {
    match role {
        ControllerRole::AttackCommand => TargetingProfile {
            role,
            history: HistoryConfig::default(),
            classifier: ClassifierThresholds::default(),
            deployment: GroupDeploymentConfig::default(),
            strategy: StrategyConfig::default(),
            scoring: ScoringConfig::default(),
            hysteresis: None,
            speed_filter: false,
            planner: PlannerConfig {
                jitter_deg: EVASION_JITTER_DEG,
                ..PlannerConfig::default()
            },
            pursuit: PursuitConfig::default(),
            budget: DEFAULT_DECOY_BUDGET,
        },
        ControllerRole::AttackTorpedo => TargetingProfile {
            role,
            history: HistoryConfig {
                position_window: TORPEDO_POSITION_WINDOW,
                ..HistoryConfig::default()
            },
            classifier: ClassifierThresholds::default(),
            deployment: GroupDeploymentConfig::default(),
            strategy: StrategyConfig::default(),
            scoring: ScoringConfig {
                distance_cap: 30.0,
                distance_slope: 1.0,
                distance_weight: 0.3,
                class_weight: 0.4,
                persistence_weight: 0.3,
                class: ClassScoring::Flat { value: 40.0 },
                persistence: PersistenceScoring::Tracking {
                    base: 10.0,
                    per_track: 30.0,
                    cap: 100.0,
                },
                strategy_overrides: false,
            },
            hysteresis: Some(HysteresisConfig {
                min_lock_cycles: ATTACK_TORPEDO_MIN_LOCK_CYCLES,
                switch_threshold: ATTACK_TORPEDO_SWITCH_THRESHOLD,
            }),
            speed_filter: true,
            planner: PlannerConfig::default(),
            pursuit: PursuitConfig::default(),
            budget: 0.0,
        },
        ControllerRole::DefenseCommand => TargetingProfile {
            role,
            history: HistoryConfig::default(),
            classifier: ClassifierThresholds::default(),
            deployment: GroupDeploymentConfig::default(),
            strategy: StrategyConfig::default(),
            scoring: ScoringConfig::default(),
            hysteresis: None,
            speed_filter: false,
            planner: PlannerConfig {
                pattern_evasion: true,
                speed_factor: 1.0,
                ..PlannerConfig::default()
            },
            pursuit: PursuitConfig::default(),
            budget: DEFAULT_DECOY_BUDGET,
        },
        ControllerRole::DefenseTorpedo => TargetingProfile {
            role,
            history: HistoryConfig {
                position_window: TORPEDO_POSITION_WINDOW,
                ..HistoryConfig::default()
            },
            classifier: ClassifierThresholds::default(),
            deployment: GroupDeploymentConfig::default(),
            strategy: StrategyConfig::default(),
            scoring: ScoringConfig {
                distance_cap: 30.0,
                distance_slope: 0.5,
                distance_weight: 1.0,
                class_weight: 1.0,
                persistence_weight: 1.0,
                class: ClassScoring::Signature,
                persistence: PersistenceScoring::LockBonus { bonus: 30.0 },
                strategy_overrides: false,
            },
            hysteresis: Some(HysteresisConfig {
                min_lock_cycles: DEFENSE_TORPEDO_MIN_LOCK_CYCLES,
                switch_threshold: DEFENSE_TORPEDO_SWITCH_THRESHOLD,
            }),
            speed_filter: false,
            planner: PlannerConfig::default(),
            pursuit: PursuitConfig::default(),
            budget: 0.0,
        },
    }
}

impl TargetingProfile {
    /// Role defaults with a partial JSON document merged on top.
    pub fn with_overrides(
        role: ControllerRole,
        overrides: &serde_json::Value,
    ) -> Result<Self, ProfileError> {
        let mut base = serde_json::to_value(get_profile(role))?;
        merge_json(&mut base, overrides);
        let profile: TargetingProfile = serde_json::from_value(base)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Reject values that would make the decision path misbehave: NaN or
    /// infinite numbers, negative distances and weights, confidences outside
    /// [0, 1] and inverted speed bands.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.history.position_window < 2 {
            return Err(invalid("history.position_window", "must be at least 2"));
        }
        if self.history.velocity_window < 1 {
            return Err(invalid("history.velocity_window", "must be at least 1"));
        }

        let c = &self.classifier;
        for (field, value) in [
            ("classifier.genuine_speed_min", c.genuine_speed_min),
            ("classifier.genuine_speed_max", c.genuine_speed_max),
            ("classifier.genuine_max_variance", c.genuine_max_variance),
            ("classifier.genuine_min_heading_change", c.genuine_min_heading_change),
            ("classifier.self_propelled_speed_min", c.self_propelled_speed_min),
            ("classifier.self_propelled_speed_max", c.self_propelled_speed_max),
            ("classifier.self_propelled_max_variance", c.self_propelled_max_variance),
            (
                "classifier.self_propelled_max_heading_change",
                c.self_propelled_max_heading_change,
            ),
            ("classifier.stationary_max_speed", c.stationary_max_speed),
        ] {
            non_negative(field, value)?;
        }
        if c.genuine_speed_min > c.genuine_speed_max {
            return Err(invalid("classifier.genuine_speed_min", "exceeds genuine_speed_max"));
        }
        if c.self_propelled_speed_min > c.self_propelled_speed_max {
            return Err(invalid(
                "classifier.self_propelled_speed_min",
                "exceeds self_propelled_speed_max",
            ));
        }

        for (field, value) in [
            ("classifier.genuine_confidence", c.genuine_confidence),
            ("classifier.self_propelled_confidence", c.self_propelled_confidence),
            ("classifier.stationary_confidence", c.stationary_confidence),
            ("deployment.candidate_confidence", self.deployment.candidate_confidence),
            ("strategy.genuine_confidence", self.strategy.genuine_confidence),
            ("strategy.decoy_confirm_confidence", self.strategy.decoy_confirm_confidence),
        ] {
            unit_interval(field, value)?;
        }

        let s = &self.scoring;
        for (field, value) in [
            ("scoring.distance_weight", s.distance_weight),
            ("scoring.class_weight", s.class_weight),
            ("scoring.persistence_weight", s.persistence_weight),
            ("scoring.distance_cap", s.distance_cap),
            ("scoring.distance_slope", s.distance_slope),
            ("strategy.terminal_distance", self.strategy.terminal_distance),
            ("budget", self.budget),
        ] {
            non_negative(field, value)?;
        }
        match s.class {
            ClassScoring::SuspectedType {
                genuine,
                self_propelled,
                stationary,
                unknown,
            } => {
                non_negative("scoring.class.genuine", genuine)?;
                non_negative("scoring.class.self_propelled", self_propelled)?;
                non_negative("scoring.class.stationary", stationary)?;
                non_negative("scoring.class.unknown", unknown)?;
            }
            ClassScoring::Flat { value } => non_negative("scoring.class.value", value)?,
            ClassScoring::Signature => {}
        }
        match s.persistence {
            PersistenceScoring::None => {}
            PersistenceScoring::LockBonus { bonus } => {
                non_negative("scoring.persistence.bonus", bonus)?
            }
            PersistenceScoring::Tracking {
                base,
                per_track,
                cap,
            } => {
                non_negative("scoring.persistence.base", base)?;
                non_negative("scoring.persistence.per_track", per_track)?;
                non_negative("scoring.persistence.cap", cap)?;
            }
        }

        if let Some(h) = &self.hysteresis {
            non_negative("hysteresis.switch_threshold", h.switch_threshold)?;
        }

        let p = &self.planner;
        if let Some(step) = p.max_turn_deg {
            if !step.is_finite() || step <= 0.0 {
                return Err(invalid("planner.max_turn_deg", "must be finite and > 0 when set"));
            }
        }
        non_negative("planner.jitter_deg", p.jitter_deg)?;
        if p.jitter_deg > MAX_JITTER_DEG {
            return Err(invalid(
                "planner.jitter_deg",
                format!("must be at most {MAX_JITTER_DEG}, got {}", p.jitter_deg),
            ));
        }
        for (field, value) in [
            ("planner.safe_distance", p.safe_distance),
            ("planner.cooldown_secs", p.cooldown_secs),
            ("planner.danger_distance", p.danger_distance),
            ("planner.speed_factor", p.speed_factor),
            ("planner.deploy_distance", p.deploy_distance),
            ("pursuit.turn_deg", self.pursuit.turn_deg),
        ] {
            non_negative(field, value)?;
        }
        if !self.pursuit.closing_rate.is_finite() {
            return Err(invalid("pursuit.closing_rate", "must be finite"));
        }
        if self.pursuit.min_samples < 2 {
            return Err(invalid("pursuit.min_samples", "must be at least 2"));
        }
        Ok(())
    }
}

/// Per-role override documents, as stored in a profiles file.
pub type ProfileOverrides = BTreeMap<ControllerRole, serde_json::Value>;

/// Parse a profiles document: a JSON object keyed by role name.
pub fn parse_overrides(json: &str) -> Result<ProfileOverrides, ProfileError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a profiles file.
pub fn load_overrides(path: &Path) -> Result<ProfileOverrides, ProfileError> {
    let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_overrides(&text)
}

/// Resolve the profile for `role`, applying overrides when present.
pub fn resolve_profile(
    role: ControllerRole,
    overrides: &ProfileOverrides,
) -> Result<TargetingProfile, ProfileError> {
    match overrides.get(&role) {
        Some(doc) => TargetingProfile::with_overrides(role, doc),
        None => Ok(get_profile(role)),
    }
}

/// Largest accepted heading jitter; a wider spread is no longer an offset.
const MAX_JITTER_DEG: f64 = 180.0;

fn non_negative(field: &'static str, value: f64) -> Result<(), ProfileError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite and >= 0, got {value}")))
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<(), ProfileError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be within [0, 1], got {value}")))
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ProfileError {
    ProfileError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Recursively overlay `patch` onto `base`. Objects merge key by key;
/// anything else replaces.
fn merge_json(base: &mut serde_json::Value, patch: &serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                let slot = base_map
                    .entry(key.clone())
                    .or_insert(serde_json::Value::Null);
                merge_json(slot, value);
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}
