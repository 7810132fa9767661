//! Enumeration types used throughout the targeting engine.

use serde::{Deserialize, Serialize};

use crate::constants::{SELF_PROPELLED_DECOY_COST, STATIONARY_DECOY_COST};

/// What a contact is suspected to be, derived from its kinematic signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuspectedType {
    #[default]
    Unknown,
    /// The real vessel.
    GenuineTarget,
    /// Mobile decoy, slow and near-linear.
    SelfPropelledDecoy,
    /// Decoy without propulsion.
    StationaryDecoy,
}

impl SuspectedType {
    pub fn is_decoy(self) -> bool {
        matches!(
            self,
            SuspectedType::SelfPropelledDecoy | SuspectedType::StationaryDecoy
        )
    }
}

/// Sensor-reported kind hint attached to a contact report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signature {
    Surface,
    SelfPropelledDecoy,
    StationaryDecoy,
}

/// Decoy type carried in a loadout and requested in deploy orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoyType {
    Stationary,
    SelfPropelled,
}

impl DecoyType {
    pub fn default_cost(self) -> f64 {
        match self {
            DecoyType::Stationary => STATIONARY_DECOY_COST,
            DecoyType::SelfPropelled => SELF_PROPELLED_DECOY_COST,
        }
    }

    pub fn signature(self) -> Signature {
        match self {
            DecoyType::Stationary => Signature::StationaryDecoy,
            DecoyType::SelfPropelled => Signature::SelfPropelledDecoy,
        }
    }
}

/// Engagement strategy chosen by the attacking command controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementStrategy {
    /// At least one confident genuine-target candidate exists: go for it.
    PrioritizeGenuine,
    /// A decoy salvo was detected and decoys are confirmed: ignore them.
    BypassDecoys,
    /// Nothing is known: evaluate every contact.
    #[default]
    Exhaustive,
}

/// Coarse battle phase of a controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Search,
    Engage,
    Terminal,
}

/// Two-state controller machine driven by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerPhase {
    /// Idle, waiting for the next contact report.
    #[default]
    Wait,
    /// A contact list arrived; decisions are emitted on the next output call.
    Decision,
}

/// Which decision unit a controller plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerRole {
    /// Attacking platform's command and control: ranks contacts, evades when close.
    AttackCommand,
    /// Attacking torpedo: hard speed filter, persistent tracking.
    AttackTorpedo,
    /// Defending ship's command and control: pattern-based evasion and decoy deployment.
    DefenseCommand,
    /// Defending torpedo: signature scoring with lock bonus.
    DefenseTorpedo,
}

impl ControllerRole {
    /// Wire name, as used in profile files and controller names.
    pub fn as_str(self) -> &'static str {
        match self {
            ControllerRole::AttackCommand => "attack_command",
            ControllerRole::AttackTorpedo => "attack_torpedo",
            ControllerRole::DefenseCommand => "defense_command",
            ControllerRole::DefenseTorpedo => "defense_torpedo",
        }
    }
}

/// Inferred pursuit behaviour of the closest incoming threat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PursuitPattern {
    #[default]
    Unknown,
    /// Closes range steadily with few direction changes.
    DistancePriority,
    /// Changes direction frequently to follow movement.
    MovementTracking,
}
