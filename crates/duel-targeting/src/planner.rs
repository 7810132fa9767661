//! Reactive planning: escape headings and decoy deployment triggers.
//!
//! Headings are degrees, 0 = North, clockwise, normalized to [0, 360).

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use duel_core::constants::*;
use duel_core::enums::PursuitPattern;
use duel_core::types::{OwnShipState, Position, SimTime};

use crate::engagement::EngagementState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Heading change allowed per tick. None turns instantly.
    pub max_turn_deg: Option<f64>,
    /// Uniform random offset (±) added to the escape heading.
    pub jitter_deg: f64,
    /// Adapt the escape heading to the inferred pursuit pattern.
    pub pattern_evasion: bool,
    /// Opening-range samples in a row that count as an escape.
    pub escape_run_length: u32,
    /// Range beyond which the platform counts as escaped.
    pub safe_distance: f64,
    /// Heading freeze after an escape, in simulated seconds.
    pub cooldown_secs: f64,
    /// Threat range that triggers evasion (and zigzag under movement tracking).
    pub danger_distance: f64,
    pub speed_factor: f64,
    /// Threat range at which decoys are deployed.
    pub deploy_distance: f64,
    pub min_launch_interval: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_turn_deg: Some(MAX_TURN_DEG_PER_TICK),
            jitter_deg: 0.0,
            pattern_evasion: false,
            escape_run_length: ESCAPE_RUN_LENGTH,
            safe_distance: ESCAPE_SAFE_DISTANCE,
            cooldown_secs: ESCAPE_COOLDOWN_SECS,
            danger_distance: DANGER_DISTANCE,
            speed_factor: EVASION_SPEED_FACTOR,
            deploy_distance: DECOY_DEPLOY_DISTANCE,
            min_launch_interval: MIN_LAUNCH_INTERVAL_TICKS,
        }
    }
}

pub fn normalize_deg(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// Reciprocal of the bearing from `own` to `threat`.
pub fn escape_bearing(own: &Position, threat: &Position) -> f64 {
    normalize_deg(own.bearing_deg_to(threat) + 180.0)
}

/// Signed shortest rotation from `from` to `to`, in (-180, 180].
pub fn heading_delta(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Turn from `current` towards `desired` by at most `max_step` degrees.
pub fn limit_turn(current: f64, desired: f64, max_step: f64) -> f64 {
    let delta = heading_delta(current, desired);
    normalize_deg(current + delta.clamp(-max_step, max_step))
}

/// Freezes the heading once the platform is getting away.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EscapeLatch {
    last_range: Option<f64>,
    opening_run: u32,
    frozen: Option<(f64, f64)>,
}

impl EscapeLatch {
    /// Heading to hold while frozen. Clears the latch once the cooldown ends.
    pub fn frozen_heading(&mut self, now_secs: f64) -> Option<f64> {
        match self.frozen {
            Some((heading, until)) if now_secs < until => Some(heading),
            Some(_) => {
                self.frozen = None;
                self.opening_run = 0;
                self.last_range = None;
                None
            }
            None => None,
        }
    }

    /// Feed a range sample. Returns true when the escape criteria are met.
    pub fn observe(&mut self, range: f64, run_length: u32, safe_distance: f64) -> bool {
        match self.last_range {
            Some(last) if range > last => self.opening_run += 1,
            _ => self.opening_run = 0,
        }
        self.last_range = Some(range);
        self.opening_run >= run_length || range >= safe_distance
    }

    pub fn freeze(&mut self, heading: f64, until_secs: f64) {
        self.frozen = Some((heading, until_secs));
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReactivePlanner {
    config: PlannerConfig,
    latch: EscapeLatch,
    fixed_escape: Option<f64>,
}

impl ReactivePlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            latch: EscapeLatch::default(),
            fixed_escape: None,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn latch(&self) -> &EscapeLatch {
        &self.latch
    }

    /// Forget the latched straight-line escape angle.
    pub fn reset_fixed_escape(&mut self) {
        self.fixed_escape = None;
    }

    /// Heading to steer away from `threat` this tick.
    pub fn plan_heading(
        &mut self,
        own: &OwnShipState,
        threat: &Position,
        now: SimTime,
        pursuit: (PursuitPattern, f64),
        rng: &mut ChaCha8Rng,
    ) -> f64 {
        if let Some(heading) = self.latch.frozen_heading(now.elapsed_secs) {
            debug!(heading, "escape heading frozen");
            return heading;
        }

        let range = own.position.horizontal_range_to(threat);
        let escaped =
            self.latch
                .observe(range, self.config.escape_run_length, self.config.safe_distance);

        let mut desired = self.desired_heading(&own.position, threat, range, now, pursuit);
        if self.config.jitter_deg > 0.0 {
            let j = self.config.jitter_deg;
            desired = normalize_deg(desired + rng.gen_range(-j..=j));
        }

        let heading = match self.config.max_turn_deg {
            Some(max_step) => limit_turn(own.heading_deg, desired, max_step),
            None => desired,
        };

        if escaped {
            let until = now.elapsed_secs + self.config.cooldown_secs;
            self.latch.freeze(heading, until);
            info!(heading, range, until, "escape confirmed, heading frozen");
        }
        heading
    }

    fn desired_heading(
        &mut self,
        own: &Position,
        threat: &Position,
        range: f64,
        now: SimTime,
        (pattern, confidence): (PursuitPattern, f64),
    ) -> f64 {
        let reciprocal = escape_bearing(own, threat);
        if !self.config.pattern_evasion || confidence <= PURSUIT_MIN_CONFIDENCE {
            return reciprocal;
        }
        match pattern {
            PursuitPattern::DistancePriority => *self.fixed_escape.get_or_insert_with(|| {
                info!(heading = reciprocal, "straight-line escape heading fixed");
                reciprocal
            }),
            PursuitPattern::MovementTracking => {
                if range < self.config.danger_distance {
                    let leg = (now.elapsed_secs / ZIGZAG_PERIOD_SECS).floor() as i64;
                    let offset = if leg.rem_euclid(2) == 0 {
                        ZIGZAG_OFFSET_DEG
                    } else {
                        -ZIGZAG_OFFSET_DEG
                    };
                    normalize_deg(reciprocal + offset)
                } else {
                    normalize_deg(reciprocal + PREDICTIVE_OFFSET_DEG)
                }
            }
            PursuitPattern::Unknown => reciprocal,
        }
    }

    /// Whether decoys should be deployed against a threat at `distance`.
    ///
    /// Fires once per engagement, only inside the deploy distance, after the
    /// launch interval, and only if the cheapest loadout item is affordable.
    pub fn should_deploy(
        &self,
        state: &EngagementState,
        distance: f64,
        tick: u64,
        cheapest_cost: Option<f64>,
    ) -> bool {
        !state.decoy_deployed
            && distance <= self.config.deploy_distance
            && state.launch_interval_elapsed(tick, self.config.min_launch_interval)
            && cheapest_cost.is_some_and(|c| state.budget.can_afford(c))
    }
}
