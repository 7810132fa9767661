//! Scripted duel scenarios.
//!
//! A scenario lists the platforms on both sides with their starting
//! kinematics, the controller each one carries, and its decoy loadout.

use serde::{Deserialize, Serialize};

use duel_core::enums::ControllerRole;
use duel_core::types::{DecoySpec, Position};

use crate::components::{PlatformKind, Side};

fn default_sensor_range() -> f64 {
    80.0
}

fn default_arena_radius() -> f64 {
    500.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Horizontal detection range of every platform.
    #[serde(default = "default_sensor_range")]
    pub sensor_range: f64,
    /// Uniform position error (±) added to every reported contact.
    #[serde(default)]
    pub sensor_noise: f64,
    /// Entities beyond this range from the origin are removed.
    #[serde(default = "default_arena_radius")]
    pub arena_radius: f64,
    /// Decoys the host accepts in total. None is unlimited.
    #[serde(default)]
    pub max_decoys: Option<usize>,
    pub platforms: Vec<PlatformSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub name: String,
    pub side: Side,
    pub kind: PlatformKind,
    pub position: Position,
    /// Degrees, 0 = North, clockwise.
    #[serde(default)]
    pub heading: f64,
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub weave_deg: f64,
    #[serde(default)]
    pub weave_period: u64,
    #[serde(default)]
    pub controller: Option<ControllerRole>,
    #[serde(default)]
    pub loadout: Vec<DecoySpec>,
    /// Name of a platform the torpedo is told to chase, overriding its own
    /// choice once.
    #[serde(default)]
    pub pinned_target: Option<String>,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn platform(&self, name: &str) -> Option<&PlatformSpec> {
        self.platforms.iter().find(|p| p.name == name)
    }
}
