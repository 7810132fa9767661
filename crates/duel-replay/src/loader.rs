//! Scenario loading with the checks the engine does not do itself.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use duel_sim::scenario::Scenario;
use duel_targeting::profiles::{self, ProfileError, ProfileOverrides};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed scenario JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error("invalid scenario: {reason}")]
    Invalid { reason: String },
}

pub fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let scenario = Scenario::from_json_str(&text)?;
    validate(&scenario)?;
    Ok(scenario)
}

pub fn load_profiles(path: Option<&Path>) -> Result<ProfileOverrides, ScenarioError> {
    match path {
        Some(path) => Ok(profiles::load_overrides(path)?),
        None => Ok(ProfileOverrides::default()),
    }
}

/// Platform names must be unique, pinned targets must name a platform, and
/// the sensor and arena figures must be usable ranges.
pub fn validate(scenario: &Scenario) -> Result<(), ScenarioError> {
    if scenario.platforms.is_empty() {
        return Err(ScenarioError::Invalid {
            reason: "no platforms".into(),
        });
    }
    let mut names = HashSet::new();
    for p in &scenario.platforms {
        if !names.insert(p.name.as_str()) {
            return Err(ScenarioError::Invalid {
                reason: format!("duplicate platform name `{}`", p.name),
            });
        }
    }
    for p in &scenario.platforms {
        if let Some(pinned) = &p.pinned_target {
            if !names.contains(pinned.as_str()) {
                return Err(ScenarioError::Invalid {
                    reason: format!("`{}` pins unknown platform `{pinned}`", p.name),
                });
            }
        }
    }
    if scenario.sensor_range <= 0.0 || !scenario.sensor_range.is_finite() {
        return Err(ScenarioError::Invalid {
            reason: format!("sensor_range must be positive, got {}", scenario.sensor_range),
        });
    }
    if !scenario.sensor_noise.is_finite()
        || scenario.sensor_noise < 0.0
        || scenario.sensor_noise > scenario.sensor_range
    {
        return Err(ScenarioError::Invalid {
            reason: format!(
                "sensor_noise must be within [0, sensor_range], got {}",
                scenario.sensor_noise
            ),
        });
    }
    if scenario.arena_radius <= 0.0 || !scenario.arena_radius.is_finite() {
        return Err(ScenarioError::Invalid {
            reason: format!("arena_radius must be positive, got {}", scenario.arena_radius),
        });
    }
    Ok(())
}
