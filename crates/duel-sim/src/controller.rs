//! Targeting controllers and their Wait/Decision state machine.
//!
//! A controller idles in `Wait` until the host delivers a contact frame,
//! moves to `Decision`, emits its decisions on the next `output` call, and
//! returns to `Wait` on the internal transition. Every role runs the same
//! `TargetingEngine`; the role only decides which outputs are produced.

use tracing::debug;

use duel_core::enums::{ControllerPhase, ControllerRole};
use duel_core::events::Decision;
use duel_core::types::{ContactFrame, DecoySpec};
use duel_targeting::profiles::TargetingProfile;
use duel_targeting::scoring::ScoredContact;
use duel_targeting::TargetingEngine;

use crate::host::OwnPlatform;

/// A decision unit driven by the host.
pub trait Controller {
    fn name(&self) -> &str;

    fn phase(&self) -> ControllerPhase;

    /// External transition: a contact frame arrived.
    fn ext_trans(&mut self, frame: &ContactFrame);

    /// Emit decisions for the pending frame. Empty outside `Decision`.
    fn output(&mut self, host: &mut dyn OwnPlatform) -> Vec<Decision>;

    /// Internal transition back to `Wait`.
    fn int_trans(&mut self);
}

pub struct TargetingController {
    name: String,
    engine: TargetingEngine,
    phase: ControllerPhase,
    frame: Option<ContactFrame>,
}

impl TargetingController {
    pub fn new(name: impl Into<String>, profile: TargetingProfile, seed: u64) -> Self {
        Self {
            name: name.into(),
            engine: TargetingEngine::new(profile, seed),
            phase: ControllerPhase::Wait,
            frame: None,
        }
    }

    pub fn role(&self) -> ControllerRole {
        self.engine.profile().role
    }

    pub fn engine(&self) -> &TargetingEngine {
        &self.engine
    }

    /// Refund decoys this controller ordered that the launcher could not
    /// dispatch.
    pub fn refund_decoys(&mut self, refused: &[DecoySpec]) {
        self.engine.refund_decoys(refused);
    }

    /// Rank every contact, lock the best, and evade the nearest live threat
    /// when something is inside the danger distance.
    fn attack_command(&mut self, frame: &ContactFrame, host: &dyn OwnPlatform) -> Vec<Decision> {
        let own = host.own_state();
        let candidates = self.engine.candidates(&frame.contacts);
        let ranked = self.engine.rank(&candidates, &own.position);
        if ranked.is_empty() {
            return Vec::new();
        }
        self.engine.select(&ranked);

        let mut decisions = vec![Decision::PriorityList {
            ids: ranked.iter().map(|s| s.contact.id).collect(),
        }];

        let planner = self.engine.profile().planner.clone();
        let closest = ranked
            .iter()
            .map(|s| s.score.distance_raw)
            .fold(f64::INFINITY, f64::min);
        if closest >= planner.danger_distance {
            return decisions;
        }

        let confirmed = &self.engine.state().confirmed_decoys;
        let threat = nearest(ranked.iter().filter(|s| !confirmed.contains(&s.contact.id)))
            .or_else(|| nearest(ranked.iter()))
            .map(|s| s.contact.position);

        if let Some(threat) = threat {
            let heading = self.engine.plan_evasion(&own, &threat, frame.time);
            decisions.push(Decision::Maneuver {
                heading_deg: heading,
                speed_factor: planner.speed_factor,
            });
        }
        decisions
    }

    /// Pick a single target, letting the platform override the choice.
    fn torpedo(&mut self, frame: &ContactFrame, host: &mut dyn OwnPlatform) -> Vec<Decision> {
        let own = host.own_state();
        let candidates = self.engine.candidates(&frame.contacts);
        let ranked = self.engine.rank(&candidates, &own.position);
        let target = self
            .engine
            .select(&ranked)
            .map(|s| host.get_target(&s.contact).unwrap_or(s.contact));
        host.reset_target();

        match target {
            Some(target) => vec![Decision::Target { id: target.id }],
            None => {
                debug!(controller = %self.name, "no target this tick");
                Vec::new()
            }
        }
    }

    /// React to the first evaluated threat: deploy decoys once when it closes
    /// in, and steer away from it.
    fn defense_command(&mut self, frame: &ContactFrame, host: &dyn OwnPlatform) -> Vec<Decision> {
        let own = host.own_state();
        let nearest = frame.contacts.iter().min_by(|a, b| {
            own.position
                .horizontal_range_to(&a.position)
                .total_cmp(&own.position.horizontal_range_to(&b.position))
        });
        if let Some(nearest) = nearest {
            self.engine.observe_pursuit(nearest.position, own.position);
        }

        let Some(threat) = frame.contacts.iter().find(|c| host.threat_evaluation(c)) else {
            return Vec::new();
        };
        let distance = own.position.horizontal_range_to(&threat.position);

        let mut decisions = Vec::new();
        if let Some(decoys) =
            self.engine
                .try_deploy(threat.id, distance, frame.time.tick, host.decoy_loadout())
        {
            decisions.push(Decision::DeployDecoys { decoys });
        }

        let heading = self.engine.plan_evasion(&own, &threat.position, frame.time);
        decisions.push(Decision::Maneuver {
            heading_deg: heading,
            speed_factor: self.engine.profile().planner.speed_factor,
        });
        decisions
    }
}

impl Controller for TargetingController {
    fn name(&self) -> &str {
        &self.name
    }

    fn phase(&self) -> ControllerPhase {
        self.phase
    }

    fn ext_trans(&mut self, frame: &ContactFrame) {
        let observation = self.engine.observe(frame);
        debug!(
            controller = %self.name,
            tick = frame.time.tick,
            contacts = frame.contacts.len(),
            new = observation.new_contacts.len(),
            reclassified = observation.reclassified.len(),
            "contact frame received"
        );
        self.frame = Some(frame.clone());
        self.phase = ControllerPhase::Decision;
    }

    fn output(&mut self, host: &mut dyn OwnPlatform) -> Vec<Decision> {
        if self.phase != ControllerPhase::Decision {
            return Vec::new();
        }
        let Some(frame) = self.frame.take() else {
            return Vec::new();
        };
        if frame.contacts.is_empty() {
            if matches!(
                self.role(),
                ControllerRole::AttackTorpedo | ControllerRole::DefenseTorpedo
            ) {
                host.reset_target();
            }
            return Vec::new();
        }

        match self.role() {
            ControllerRole::AttackCommand => self.attack_command(&frame, host),
            ControllerRole::AttackTorpedo | ControllerRole::DefenseTorpedo => {
                self.torpedo(&frame, host)
            }
            ControllerRole::DefenseCommand => self.defense_command(&frame, host),
        }
    }

    fn int_trans(&mut self) {
        if self.phase == ControllerPhase::Decision {
            self.phase = ControllerPhase::Wait;
        }
    }
}

fn nearest<'a>(scored: impl Iterator<Item = &'a ScoredContact>) -> Option<&'a ScoredContact> {
    scored.min_by(|a, b| a.score.distance_raw.total_cmp(&b.score.distance_raw))
}
