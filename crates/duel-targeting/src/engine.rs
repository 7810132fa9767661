//! The targeting engine shared by every controller role.
//!
//! Owns the per-controller history, engagement state, planner and RNG.
//! Controllers call the steps in a fixed order within one tick:
//! `observe` → `candidates` → `rank` → `select` → planning.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use duel_core::types::{
    ContactFrame, ContactId, ContactReport, DecoySpec, OwnShipState, Position, SimTime,
};

use crate::budget::plan_salvo;
use crate::classifier::{classify, passes_speed_filter};
use crate::deployment::{detect_group_deployment, GroupDeployment};
use crate::engagement::EngagementState;
use crate::history::HistoryTracker;
use crate::planner::ReactivePlanner;
use crate::profiles::TargetingProfile;
use crate::pursuit::PursuitAnalyzer;
use crate::scoring::{rank_contacts, ScoredContact};
use crate::selector::{select_target, Selection};
use crate::strategy::{battle_phase, confirm_decoys, select_strategy};

/// What `observe` learned from one contact frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    /// Contacts seen for the first time this tick.
    pub new_contacts: Vec<ContactId>,
    /// Histories dropped as stale.
    pub evicted: usize,
    /// Contacts whose classification changed.
    pub reclassified: Vec<ContactId>,
    pub deployment: Option<GroupDeployment>,
}

pub struct TargetingEngine {
    profile: TargetingProfile,
    tracker: HistoryTracker,
    state: EngagementState,
    planner: ReactivePlanner,
    pursuit: PursuitAnalyzer,
    rng: ChaCha8Rng,
}

impl TargetingEngine {
    /// Create an engine. `seed` drives heading jitter only.
    pub fn new(profile: TargetingProfile, seed: u64) -> Self {
        Self {
            tracker: HistoryTracker::new(profile.history.clone()),
            state: EngagementState::new(profile.budget),
            planner: ReactivePlanner::new(profile.planner.clone()),
            pursuit: PursuitAnalyzer::new(profile.pursuit.clone()),
            rng: ChaCha8Rng::seed_from_u64(seed),
            profile,
        }
    }

    pub fn profile(&self) -> &TargetingProfile {
        &self.profile
    }

    pub fn tracker(&self) -> &HistoryTracker {
        &self.tracker
    }

    pub fn state(&self) -> &EngagementState {
        &self.state
    }

    pub fn planner(&self) -> &ReactivePlanner {
        &self.planner
    }

    pub fn pursuit(&self) -> &PursuitAnalyzer {
        &self.pursuit
    }

    /// Update histories, detect salvos, classify, and pick a strategy.
    /// An empty frame only evicts stale histories.
    pub fn observe(&mut self, frame: &ContactFrame) -> Observation {
        let tick = frame.time.tick;
        let evicted = self.tracker.evict_stale(tick);
        if evicted > 0 {
            debug!(evicted, tick, "stale histories evicted");
            self.state.forget_untracked(&self.tracker);
        }
        if frame.contacts.is_empty() {
            return Observation {
                evicted,
                ..Observation::default()
            };
        }

        let mut new_contacts = Vec::new();
        for contact in &frame.contacts {
            if self.tracker.update(contact, tick) {
                new_contacts.push(contact.id);
            }
        }

        let deployment = detect_group_deployment(
            &mut self.tracker,
            &frame.contacts,
            &new_contacts,
            &self.profile.deployment,
        );
        if let Some(d) = &deployment {
            self.state.decoy_deployment_detected = true;
            if let Some((_, pos)) = d.candidate {
                self.state.last_genuine_position = Some(pos);
            }
        }

        let thresholds = &self.profile.classifier;
        let mut reclassified = Vec::new();
        for (id, history) in self.tracker.iter_mut() {
            if history.positions.len() < 2 {
                continue;
            }
            let result = classify(history, thresholds);
            if result.kind != history.suspected_type {
                debug!(
                    contact = %id,
                    from = ?history.suspected_type,
                    to = ?result.kind,
                    confidence = result.confidence,
                    "contact reclassified"
                );
                reclassified.push(*id);
            }
            history.set_classification(result.kind, result.confidence);
        }

        confirm_decoys(&self.tracker, &mut self.state, &self.profile.strategy);
        let previous = self.state.strategy;
        let strategy = select_strategy(&self.tracker, &mut self.state, tick, &self.profile.strategy);
        if strategy != previous {
            info!(?previous, ?strategy, density = self.state.threat_density, "strategy changed");
        }

        Observation {
            new_contacts,
            evicted,
            reclassified,
            deployment,
        }
    }

    /// Apply the hard speed filter, if the profile uses one.
    ///
    /// Rejected contacts become suspected decoys. When every contact is
    /// rejected the full list is returned instead.
    pub fn candidates(&mut self, contacts: &[ContactReport]) -> Vec<ContactReport> {
        if !self.profile.speed_filter {
            return contacts.to_vec();
        }

        let mut valid = Vec::with_capacity(contacts.len());
        for contact in contacts {
            if passes_speed_filter(self.tracker.get(contact.id), &self.profile.classifier) {
                self.state.suspected_decoys.remove(&contact.id);
                valid.push(contact.clone());
            } else {
                self.state.suspected_decoys.insert(contact.id);
            }
        }

        if valid.is_empty() {
            warn!(
                contacts = contacts.len(),
                "every contact failed the speed filter, using the full list"
            );
            return contacts.to_vec();
        }
        debug!(total = contacts.len(), valid = valid.len(), "speed filter applied");
        valid
    }

    /// Score and sort contacts as seen from `origin`.
    pub fn rank(&self, contacts: &[ContactReport], origin: &Position) -> Vec<ScoredContact> {
        let ranked = rank_contacts(
            contacts,
            origin,
            &self.tracker,
            &self.state,
            &self.profile.scoring,
        );
        for (i, s) in ranked.iter().take(3).enumerate() {
            debug!(
                rank = i + 1,
                contact = %s.contact.id,
                total = s.score.total,
                distance = s.score.distance_raw,
                strategy = ?self.state.strategy,
                "ranking"
            );
        }
        ranked
    }

    /// Resolve the lock from a ranking and update the battle phase.
    pub fn select(&mut self, ranked: &[ScoredContact]) -> Option<Selection> {
        let selection = select_target(
            ranked,
            &mut self.state,
            &mut self.tracker,
            self.profile.hysteresis.as_ref(),
        );
        self.state.phase = battle_phase(
            selection.as_ref().map(|s| s.distance),
            &self.profile.strategy,
        );
        selection
    }

    /// Feed the closest threat to the pursuit analyzer.
    pub fn observe_pursuit(&mut self, threat: Position, own: Position) {
        if self.pursuit.observe(threat, own) {
            self.planner.reset_fixed_escape();
        }
    }

    /// Escape heading away from `threat`.
    pub fn plan_evasion(&mut self, own: &OwnShipState, threat: &Position, now: SimTime) -> f64 {
        let pursuit = (self.pursuit.pattern(), self.pursuit.confidence());
        self.planner
            .plan_heading(own, threat, now, pursuit, &mut self.rng)
    }

    /// Decide whether to deploy decoys against `threat` and pay for them.
    ///
    /// Returns the paid-for salvo, or None when no deployment happens.
    pub fn try_deploy(
        &mut self,
        threat: ContactId,
        distance: f64,
        tick: u64,
        loadout: &[DecoySpec],
    ) -> Option<Vec<DecoySpec>> {
        self.state.engage(threat);
        let cheapest = loadout
            .iter()
            .map(DecoySpec::effective_cost)
            .min_by(|a, b| a.total_cmp(b));
        if !self.planner.should_deploy(&self.state, distance, tick, cheapest) {
            return None;
        }

        let salvo = plan_salvo(loadout, &mut self.state.budget);
        if salvo.is_empty() {
            return None;
        }
        self.state.decoy_deployed = true;
        self.state.last_launch_tick = Some(tick);
        info!(
            threat = %threat,
            distance,
            decoys = salvo.len(),
            remaining_budget = self.state.budget.remaining(),
            "decoy deployment ordered"
        );
        Some(salvo)
    }

    /// Give back the budget for ordered decoys the host did not dispatch.
    pub fn refund_decoys(&mut self, refused: &[DecoySpec]) {
        for spec in refused {
            self.state.budget.refund(spec.effective_cost());
        }
        if !refused.is_empty() {
            info!(
                refunded = refused.len(),
                remaining_budget = self.state.budget.remaining(),
                "undispatched decoys refunded"
            );
        }
    }
}
