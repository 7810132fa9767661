//! Decoy salvo detection.
//!
//! Several contacts appearing in the same tick indicate that the opponent
//! just launched decoys. The launching vessel sits near the salvo's centroid,
//! so the tracked contact closest to it becomes the best genuine candidate.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::info;

use duel_core::constants::{GROUP_DEPLOYMENT_CONFIDENCE, GROUP_DEPLOYMENT_MIN_NEW};
use duel_core::enums::SuspectedType;
use duel_core::types::{ContactId, ContactReport, Position};

use crate::history::HistoryTracker;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupDeploymentConfig {
    /// Newly seen contacts in one tick that count as a salvo.
    pub min_new_contacts: usize,
    /// Confidence given to the candidate nearest the centroid.
    pub candidate_confidence: f64,
}

impl Default for GroupDeploymentConfig {
    fn default() -> Self {
        Self {
            min_new_contacts: GROUP_DEPLOYMENT_MIN_NEW,
            candidate_confidence: GROUP_DEPLOYMENT_CONFIDENCE,
        }
    }
}

/// Result of a detected salvo.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDeployment {
    pub new_contacts: usize,
    pub centroid: DVec2,
    /// Tracked contact nearest the centroid, now marked genuine.
    pub candidate: Option<(ContactId, Position)>,
}

/// Check this tick's contacts for a salvo and promote the best genuine candidate.
///
/// `new_ids` are the contacts whose history was created this tick. The
/// candidate search covers every tracked contact, not only the new ones.
pub fn detect_group_deployment(
    tracker: &mut HistoryTracker,
    contacts: &[ContactReport],
    new_ids: &[ContactId],
    config: &GroupDeploymentConfig,
) -> Option<GroupDeployment> {
    if contacts.len() <= 1 || new_ids.len() < config.min_new_contacts {
        return None;
    }

    let new_positions: Vec<DVec2> = contacts
        .iter()
        .filter(|c| new_ids.contains(&c.id))
        .map(|c| c.position.xy())
        .collect();
    if new_positions.is_empty() {
        return None;
    }
    let centroid = new_positions.iter().copied().sum::<DVec2>() / new_positions.len() as f64;
    info!(
        new_contacts = new_positions.len(),
        centroid_x = centroid.x,
        centroid_y = centroid.y,
        "decoy salvo detected"
    );

    let mut best: Option<(ContactId, Position, f64)> = None;
    for (id, history) in tracker.iter() {
        let Some(pos) = history.latest_position() else {
            continue;
        };
        let dist = pos.xy().distance(centroid);
        if best.map_or(true, |(_, _, d)| dist < d) {
            best = Some((*id, pos, dist));
        }
    }

    let candidate = best.map(|(id, pos, _)| (id, pos));
    if let Some((id, pos)) = candidate {
        if let Some(history) = tracker.get_mut(id) {
            history.set_classification(SuspectedType::GenuineTarget, config.candidate_confidence);
        }
        info!(contact = %id, x = pos.x, y = pos.y, "estimated genuine target");
    }

    Some(GroupDeployment {
        new_contacts: new_positions.len(),
        centroid,
        candidate,
    })
}
