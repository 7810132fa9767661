//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::TICK_SECS;
use crate::enums::{DecoyType, Signature};

/// Position in simulation space. x = East, y = North, z = Up (or depth when negative).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// Velocity in simulation units per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// Simulation time as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

/// Stable contact identifier, assigned by the host at first detection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContactId(pub u32);

/// One detected contact as delivered by the host in a contact-list event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactReport {
    pub id: ContactId,
    pub position: Position,
    /// Horizontal speed, when the sensor exposes it.
    #[serde(default)]
    pub xy_speed: Option<f64>,
    #[serde(default)]
    pub z_speed: Option<f64>,
    /// Heading in degrees, 0 = North, clockwise.
    #[serde(default)]
    pub heading: Option<f64>,
    /// Sensor-reported kind hint. Only the signature scorer reads it.
    #[serde(default)]
    pub signature: Option<Signature>,
}

/// A contact-list event: everything the host detected at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactFrame {
    pub time: SimTime,
    pub contacts: Vec<ContactReport>,
}

/// Own-platform kinematic state at decision time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnShipState {
    pub position: Position,
    /// Heading in degrees, 0 = North, clockwise.
    pub heading_deg: f64,
    pub xy_speed: f64,
}

/// One entry of a platform's decoy loadout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoySpec {
    #[serde(rename = "type")]
    pub decoy_type: DecoyType,
    /// Lifespan in seconds of simulated time.
    pub lifespan: f64,
    /// Cruise speed for self-propelled decoys.
    #[serde(default)]
    pub speed: f64,
    /// Heading in degrees for self-propelled decoys.
    #[serde(default)]
    pub heading: f64,
    /// Budget cost. `None` uses the default cost for the decoy type.
    #[serde(default)]
    pub cost: Option<f64>,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar position at z = 0.
    pub fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Horizontal components as a vector.
    pub fn xy(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Horizontal range (ignoring z). All targeting distances are horizontal.
    pub fn horizontal_range_to(&self, other: &Position) -> f64 {
        (other.xy() - self.xy()).length()
    }

    /// Bearing to another position in degrees (0 = North, clockwise), in [0, 360).
    pub fn bearing_deg_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.atan2(dy).to_degrees().rem_euclid(360.0)
    }

    /// Position advanced along `velocity` for `dt` ticks.
    pub fn advanced(&self, velocity: &Velocity, dt: f64) -> Position {
        Position::new(
            self.x + velocity.x * dt,
            self.y + velocity.y * dt,
            self.z + velocity.z * dt,
        )
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Velocity with the given horizontal speed along a heading in degrees.
    pub fn from_heading(speed: f64, heading_deg: f64) -> Self {
        let h = heading_deg.to_radians();
        Self::new(speed * h.sin(), speed * h.cos(), 0.0)
    }

    /// Horizontal components as a vector.
    pub fn xy(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Horizontal speed (ignoring vertical component).
    pub fn horizontal_speed(&self) -> f64 {
        self.xy().length()
    }

    /// Heading in degrees (0 = North, clockwise), in [0, 360).
    pub fn heading_deg(&self) -> f64 {
        self.x.atan2(self.y).to_degrees().rem_euclid(360.0)
    }
}

impl SimTime {
    pub fn new(tick: u64, elapsed_secs: f64) -> Self {
        Self { tick, elapsed_secs }
    }

    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

impl ContactReport {
    /// Report carrying only an id and a position.
    pub fn at(id: u32, position: Position) -> Self {
        Self {
            id: ContactId(id),
            position,
            xy_speed: None,
            z_speed: None,
            heading: None,
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: Signature, xy_speed: f64) -> Self {
        self.signature = Some(signature);
        self.xy_speed = Some(xy_speed);
        self
    }
}

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "C{}", self.0)
    }
}

impl DecoySpec {
    /// Budget cost of this decoy, falling back to the per-type default.
    pub fn effective_cost(&self) -> f64 {
        self.cost.unwrap_or_else(|| self.decoy_type.default_cost())
    }

    /// Lifespan converted to ticks, rounded up.
    pub fn lifespan_ticks(&self) -> u64 {
        (self.lifespan.max(0.0) / TICK_SECS).ceil() as u64
    }
}
