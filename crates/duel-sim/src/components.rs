//! ECS components for harness entities.
//!
//! Components are plain data. Position and Velocity come from `duel-core`.

use serde::{Deserialize, Serialize};

use duel_core::enums::{DecoyType, Signature};
use duel_core::types::ContactId;

/// Which side an entity fights on. Sensors only report the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Attack,
    Defense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    Ship,
    Submarine,
    Torpedo,
}

impl PlatformKind {
    /// Sensor signature reported for this kind of platform.
    pub fn signature(self) -> Option<Signature> {
        match self {
            PlatformKind::Ship => Some(Signature::Surface),
            PlatformKind::Submarine | PlatformKind::Torpedo => None,
        }
    }
}

/// A scenario platform.
#[derive(Debug, Clone)]
pub struct Platform {
    pub name: String,
    pub kind: PlatformKind,
}

/// Stable identity as seen by the other side's sensors.
#[derive(Debug, Clone, Copy)]
pub struct ContactTag {
    pub id: ContactId,
    pub signature: Option<Signature>,
}

/// Commanded course. Velocity is rebuilt from this every tick.
#[derive(Debug, Clone, Copy)]
pub struct Steering {
    pub heading_deg: f64,
    pub speed: f64,
    /// Speed before any maneuver speed factor.
    pub cruise_speed: f64,
    /// Alternating heading offset, in degrees. 0 sails straight.
    pub weave_deg: f64,
    /// Ticks per weave leg.
    pub weave_period: u64,
}

/// A launched decoy.
#[derive(Debug, Clone, Copy)]
pub struct Decoy {
    pub decoy_type: DecoyType,
    /// Tick at which the decoy is despawned.
    pub destroy_tick: u64,
}

/// Platform-level target override for torpedo controllers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetOverride(pub Option<ContactId>);
