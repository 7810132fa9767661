//! Bounded per-contact position and velocity windows.
//!
//! Histories are keyed by the host's stable `ContactId`. Entries are created
//! on first sighting, refreshed every tick the contact reappears, and evicted
//! once they have gone unseen for longer than the staleness window.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use duel_core::constants::*;
use duel_core::enums::SuspectedType;
use duel_core::types::{ContactId, ContactReport, Position, Velocity};

/// Window sizes and staleness for a tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub position_window: usize,
    pub velocity_window: usize,
    pub stale_ticks: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            position_window: COMMAND_POSITION_WINDOW,
            velocity_window: VELOCITY_WINDOW,
            stale_ticks: HISTORY_STALE_TICKS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub tick: u64,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocitySample {
    pub tick: u64,
    pub velocity: Velocity,
}

/// Everything remembered about one contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactHistory {
    /// Oldest first.
    pub positions: VecDeque<PositionSample>,
    /// Oldest first.
    pub velocities: VecDeque<VelocitySample>,
    pub first_seen: u64,
    pub last_seen: u64,
    pub suspected_type: SuspectedType,
    /// Always within [0, 1].
    pub confidence: f64,
    /// Times this contact was the selected target.
    pub tracking_count: u32,
}

impl ContactHistory {
    fn new(tick: u64) -> Self {
        Self {
            positions: VecDeque::new(),
            velocities: VecDeque::new(),
            first_seen: tick,
            last_seen: tick,
            suspected_type: SuspectedType::Unknown,
            confidence: INITIAL_CONFIDENCE,
            tracking_count: 0,
        }
    }

    pub fn latest_position(&self) -> Option<Position> {
        self.positions.back().map(|s| s.position)
    }

    /// Average horizontal speed over the stored velocity samples.
    pub fn average_speed(&self) -> Option<f64> {
        if self.velocities.is_empty() {
            return None;
        }
        let sum: f64 = self
            .velocities
            .iter()
            .map(|s| s.velocity.horizontal_speed())
            .sum();
        Some(sum / self.velocities.len() as f64)
    }

    /// Set classification, clamping confidence into [0, 1].
    pub fn set_classification(&mut self, kind: SuspectedType, confidence: f64) {
        self.suspected_type = kind;
        self.confidence = confidence.clamp(0.0, 1.0);
    }
}

/// Per-controller map of contact histories.
#[derive(Debug, Clone, Default)]
pub struct HistoryTracker {
    config: HistoryConfig,
    entries: BTreeMap<ContactId, ContactHistory>,
}

impl HistoryTracker {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            config,
            entries: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Record a sighting. Returns true when the contact had no history yet.
    pub fn update(&mut self, contact: &ContactReport, tick: u64) -> bool {
        let is_new = !self.entries.contains_key(&contact.id);
        let entry = self
            .entries
            .entry(contact.id)
            .or_insert_with(|| ContactHistory::new(tick));

        entry.positions.push_back(PositionSample {
            tick,
            position: contact.position,
        });
        entry.last_seen = tick;
        while entry.positions.len() > self.config.position_window {
            entry.positions.pop_front();
        }

        let n = entry.positions.len();
        if n >= 2 {
            let prev = entry.positions[n - 2];
            let curr = entry.positions[n - 1];
            if let Some(velocity) = step_velocity(&prev, &curr) {
                entry.velocities.push_back(VelocitySample { tick, velocity });
                while entry.velocities.len() > self.config.velocity_window {
                    entry.velocities.pop_front();
                }
            }
        }

        is_new
    }

    /// Drop histories not seen within the staleness window. Returns how many went.
    pub fn evict_stale(&mut self, now: u64) -> usize {
        let stale_ticks = self.config.stale_ticks;
        let before = self.entries.len();
        self.entries
            .retain(|_, h| now.saturating_sub(h.last_seen) <= stale_ticks);
        before - self.entries.len()
    }

    pub fn get(&self, id: ContactId) -> Option<&ContactHistory> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: ContactId) -> Option<&mut ContactHistory> {
        self.entries.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ContactId, &ContactHistory)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ContactId, &mut ContactHistory)> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Displacement per tick between two samples. None when both share a tick.
pub fn step_velocity(prev: &PositionSample, curr: &PositionSample) -> Option<Velocity> {
    if curr.tick == prev.tick {
        return None;
    }
    let dt = curr.tick as f64 - prev.tick as f64;
    Some(Velocity::new(
        (curr.position.x - prev.position.x) / dt,
        (curr.position.y - prev.position.y) / dt,
        (curr.position.z - prev.position.z) / dt,
    ))
}
