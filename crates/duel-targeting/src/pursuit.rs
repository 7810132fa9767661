//! Pursuit pattern inference for the closest incoming threat.
//!
//! A threat that closes range steadily without turning pursues by distance;
//! one that keeps turning tracks our movement. Confidence grows while the
//! same pattern keeps being observed.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::info;

use duel_core::constants::*;
use duel_core::enums::PursuitPattern;
use duel_core::types::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitConfig {
    pub window: usize,
    pub min_samples: usize,
    /// Direction change in degrees that counts as a turn.
    pub turn_deg: f64,
    /// Average range change per sample below which the threat is closing.
    pub closing_rate: f64,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            window: PURSUIT_WINDOW,
            min_samples: PURSUIT_MIN_SAMPLES,
            turn_deg: PURSUIT_TURN_DEG,
            closing_rate: PURSUIT_CLOSING_RATE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PursuitSample {
    threat: Position,
    range: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PursuitAnalyzer {
    config: PursuitConfig,
    samples: VecDeque<PursuitSample>,
    pattern: PursuitPattern,
    confidence: f64,
}

impl PursuitAnalyzer {
    pub fn new(config: PursuitConfig) -> Self {
        Self {
            config,
            samples: VecDeque::new(),
            pattern: PursuitPattern::Unknown,
            confidence: 0.0,
        }
    }

    pub fn pattern(&self) -> PursuitPattern {
        self.pattern
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Record the closest threat's position. Returns true when the inferred
    /// pattern changed.
    pub fn observe(&mut self, threat: Position, own: Position) -> bool {
        self.samples.push_back(PursuitSample {
            threat,
            range: own.horizontal_range_to(&threat),
        });
        while self.samples.len() > self.config.window {
            self.samples.pop_front();
        }
        if self.samples.len() < self.config.min_samples {
            return false;
        }

        let ranges: Vec<f64> = self.samples.iter().map(|s| s.range).collect();
        let avg_change = ranges.windows(2).map(|w| w[1] - w[0]).sum::<f64>()
            / (ranges.len() - 1) as f64;
        let turns = self.count_turns();

        if avg_change < self.config.closing_rate && turns <= 1 {
            self.advance(PursuitPattern::DistancePriority, 0.6, 0.2)
        } else if turns >= 2 {
            self.advance(PursuitPattern::MovementTracking, 0.5, 0.15)
        } else {
            false
        }
    }

    fn advance(&mut self, pattern: PursuitPattern, initial: f64, step: f64) -> bool {
        if self.pattern != pattern {
            self.pattern = pattern;
            self.confidence = initial;
            info!(?pattern, confidence = initial, "pursuit pattern identified");
            true
        } else {
            self.confidence = (self.confidence + step).min(1.0);
            false
        }
    }

    fn count_turns(&self) -> usize {
        let pts: Vec<_> = self.samples.iter().map(|s| s.threat.xy()).collect();
        pts.windows(3)
            .filter(|w| {
                let prev = w[1] - w[0];
                let curr = w[2] - w[1];
                if prev.length_squared() == 0.0 || curr.length_squared() == 0.0 {
                    return false;
                }
                let cos = (prev.dot(curr) / (prev.length() * curr.length())).clamp(-1.0, 1.0);
                cos.acos().to_degrees() > self.config.turn_deg
            })
            .count()
    }
}
