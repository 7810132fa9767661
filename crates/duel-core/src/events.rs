//! Decisions emitted by controllers for the host to dispatch.

use serde::{Deserialize, Serialize};

use crate::enums::DecoyType;
use crate::types::{ContactId, DecoySpec};

/// One output of a controller's decision step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Decision {
    /// Contacts ranked by priority, best first.
    PriorityList { ids: Vec<ContactId> },
    /// Single chosen contact.
    Target { id: ContactId },
    /// Steer to a new heading.
    Maneuver { heading_deg: f64, speed_factor: f64 },
    /// Order the launcher to deploy countermeasures. The decoys are already
    /// paid for; any the host refuses are refunded.
    DeployDecoys { decoys: Vec<DecoySpec> },
    /// Decoys actually launched by a launcher.
    DecoysLaunched { types: Vec<DecoyType> },
}

/// A decision tagged with its origin, as written by the replay tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub tick: u64,
    pub controller: String,
    pub decision: Decision,
}
