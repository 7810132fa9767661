//! Headless duel harness.
//!
//! `DuelEngine` owns a hecs world with the scenario's platforms, plays the
//! host's part for every controller (sensing, target overrides, decoy
//! registration) and integrates straight-line kinematics. Same scenario and
//! seed give the same decisions.

use std::collections::{BTreeMap, BTreeSet};

use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use duel_core::constants::TICK_SECS;
use duel_core::enums::DecoyType;
use duel_core::error::RegistrationError;
use duel_core::events::{Decision, DecisionRecord};
use duel_core::types::{
    ContactId, ContactReport, DecoySpec, OwnShipState, Position, SimTime, Velocity,
};
use duel_targeting::profiles::{resolve_profile, ProfileError, ProfileOverrides};

use crate::components::{
    ContactTag, Decoy, Platform, PlatformKind, Side, Steering, TargetOverride,
};
use crate::controller::{Controller, TargetingController};
use crate::host::{EntityRegistrar, OwnPlatform};
use crate::launcher::Launcher;
use crate::scenario::{PlatformSpec, Scenario};
use crate::systems;

/// Configuration for starting a harness run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed. Same seed = same run.
    pub seed: u64,
    /// Per-role profile overrides.
    pub overrides: ProfileOverrides,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            overrides: ProfileOverrides::new(),
        }
    }
}

struct ControllerSlot {
    entity: Entity,
    side: Side,
    controller: TargetingController,
    launcher: Option<Launcher>,
    loadout: Vec<DecoySpec>,
}

#[derive(Debug, Clone)]
struct PendingDecoy {
    spec: DecoySpec,
    origin: Position,
    side: Side,
    activation_tick: u64,
    destroy_tick: u64,
}

pub struct DuelEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    sensor_range: f64,
    sensor_noise: f64,
    arena_radius: f64,
    /// Decoys the host still accepts. None is unlimited.
    decoy_capacity: Option<usize>,
    slots: Vec<ControllerSlot>,
    pending_decoys: Vec<PendingDecoy>,
    next_contact_id: u32,
    despawn_buffer: Vec<Entity>,
}

impl DuelEngine {
    /// Spawn the scenario's platforms and build one controller per platform
    /// that carries one.
    pub fn new(scenario: &Scenario, config: SimConfig) -> Result<Self, ProfileError> {
        let mut engine = Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            sensor_range: scenario.sensor_range,
            sensor_noise: scenario.sensor_noise,
            arena_radius: scenario.arena_radius,
            decoy_capacity: scenario.max_decoys,
            slots: Vec::new(),
            pending_decoys: Vec::new(),
            next_contact_id: 1,
            despawn_buffer: Vec::new(),
        };

        let mut ids = BTreeMap::new();
        let mut entities = Vec::with_capacity(scenario.platforms.len());
        for spec in &scenario.platforms {
            let (entity, id) = engine.spawn_platform(spec);
            ids.insert(spec.name.clone(), id);
            entities.push(entity);
        }

        for (spec, &entity) in scenario.platforms.iter().zip(&entities) {
            if let Some(pinned) = &spec.pinned_target {
                match ids.get(pinned) {
                    Some(&id) => {
                        if let Ok(mut o) = engine.world.get::<&mut TargetOverride>(entity) {
                            o.0 = Some(id);
                        }
                    }
                    None => warn!(platform = %spec.name, target = %pinned, "unknown pinned target"),
                }
            }

            let Some(role) = spec.controller else {
                continue;
            };
            let profile = resolve_profile(role, &config.overrides)?;
            let seed: u64 = engine.rng.gen();
            let name = format!("{}/{}", spec.name, role.as_str());
            let launcher = (!spec.loadout.is_empty())
                .then(|| Launcher::new(format!("{}/launcher", spec.name)));
            info!(controller = %name, seed, "controller created");
            engine.slots.push(ControllerSlot {
                entity,
                side: spec.side,
                controller: TargetingController::new(name, profile, seed),
                launcher,
                loadout: spec.loadout.clone(),
            });
        }

        Ok(engine)
    }

    /// Advance one tick and return every decision made during it.
    pub fn tick(&mut self) -> Vec<DecisionRecord> {
        let tick = self.time.tick;
        let threats = torpedo_ids(&self.world);
        let mut records = Vec::new();

        for slot in &mut self.slots {
            if !self.world.contains(slot.entity) {
                continue;
            }
            let frame = systems::sensor::contact_frame(
                &self.world,
                slot.entity,
                self.sensor_range,
                self.sensor_noise,
                &mut self.rng,
                self.time,
            );
            slot.controller.ext_trans(&frame);

            let pinned = self
                .world
                .get::<&TargetOverride>(slot.entity)
                .ok()
                .and_then(|o| o.0)
                .and_then(|id| frame.contacts.iter().find(|c| c.id == id).cloned());
            let mut view = PlatformView {
                own: own_state(&self.world, slot.entity),
                loadout: &slot.loadout,
                threats: &threats,
                pinned,
                reset: false,
            };
            let decisions = slot.controller.output(&mut view);
            slot.controller.int_trans();
            let own = view.own;
            if view.reset {
                if let Ok(mut o) = self.world.get::<&mut TargetOverride>(slot.entity) {
                    o.0 = None;
                }
            }

            for decision in decisions {
                match &decision {
                    Decision::Maneuver {
                        heading_deg,
                        speed_factor,
                    } => {
                        if let Ok(mut s) = self.world.get::<&mut Steering>(slot.entity) {
                            s.heading_deg = *heading_deg;
                            s.speed = s.cruise_speed * speed_factor;
                        }
                    }
                    Decision::Target { id } => {
                        if let Some(target) = position_of(&self.world, *id) {
                            if let Ok(mut s) = self.world.get::<&mut Steering>(slot.entity) {
                                s.heading_deg = own.position.bearing_deg_to(&target);
                            }
                        }
                    }
                    Decision::DeployDecoys { decoys } => match &mut slot.launcher {
                        Some(launcher) => launcher.ext_trans(decoys.clone()),
                        None => warn!(
                            controller = %slot.controller.name(),
                            "deploy order without a launcher"
                        ),
                    },
                    Decision::PriorityList { .. } | Decision::DecoysLaunched { .. } => {}
                }
                records.push(DecisionRecord {
                    tick,
                    controller: slot.controller.name().to_string(),
                    decision,
                });
            }

            if let Some(launcher) = &mut slot.launcher {
                let mut registrar = DecoyRegistrar {
                    pending: &mut self.pending_decoys,
                    capacity: &mut self.decoy_capacity,
                    side: slot.side,
                    now: tick,
                };
                for decision in launcher.output(own.position, &mut registrar) {
                    records.push(DecisionRecord {
                        tick,
                        controller: launcher.name().to_string(),
                        decision,
                    });
                }
                launcher.int_trans();
                let refused = launcher.take_refused();
                if !refused.is_empty() {
                    slot.controller.refund_decoys(&refused);
                }
            }
        }

        self.spawn_due_decoys(tick);
        systems::movement::steer(&mut self.world, tick);
        systems::movement::run(&mut self.world);
        let expired =
            systems::cleanup::run(&mut self.world, tick, self.arena_radius, &mut self.despawn_buffer);
        if expired > 0 {
            debug!(tick, expired, "decoys expired");
        }
        self.time.advance(TICK_SECS);
        records
    }

    /// Run `ticks` ticks and collect every decision.
    pub fn run(&mut self, ticks: u64) -> Vec<DecisionRecord> {
        let mut records = Vec::new();
        for _ in 0..ticks {
            records.extend(self.tick());
        }
        records
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn controllers(&self) -> impl Iterator<Item = &TargetingController> {
        self.slots.iter().map(|s| &s.controller)
    }

    pub fn controller(&self, name: &str) -> Option<&TargetingController> {
        self.controllers().find(|c| c.name() == name)
    }

    /// Contact id of a scenario platform, if it still exists.
    pub fn contact_id(&self, platform: &str) -> Option<ContactId> {
        let mut query = self.world.query::<(&Platform, &ContactTag)>();
        query
            .iter()
            .find(|(_, (p, _))| p.name == platform)
            .map(|(_, (_, tag))| tag.id)
    }

    pub fn live_decoys(&self) -> usize {
        let mut query = self.world.query::<&Decoy>();
        query.iter().count()
    }

    fn next_id(&mut self) -> ContactId {
        let id = ContactId(self.next_contact_id);
        self.next_contact_id += 1;
        id
    }

    fn spawn_platform(&mut self, spec: &PlatformSpec) -> (Entity, ContactId) {
        let id = self.next_id();
        let steering = Steering {
            heading_deg: spec.heading,
            speed: spec.speed,
            cruise_speed: spec.speed,
            weave_deg: spec.weave_deg,
            weave_period: spec.weave_period,
        };
        let entity = self.world.spawn((
            Platform {
                name: spec.name.clone(),
                kind: spec.kind,
            },
            spec.side,
            spec.position,
            Velocity::from_heading(spec.speed, spec.heading),
            steering,
            ContactTag {
                id,
                signature: spec.kind.signature(),
            },
            TargetOverride::default(),
        ));
        (entity, id)
    }

    fn spawn_due_decoys(&mut self, tick: u64) {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending_decoys)
            .into_iter()
            .partition(|d| d.activation_tick <= tick);
        self.pending_decoys = waiting;

        for d in due {
            let id = self.next_id();
            let velocity = match d.spec.decoy_type {
                DecoyType::Stationary => Velocity::default(),
                DecoyType::SelfPropelled => Velocity::from_heading(d.spec.speed, d.spec.heading),
            };
            self.world.spawn((
                d.side,
                d.origin,
                velocity,
                ContactTag {
                    id,
                    signature: Some(d.spec.decoy_type.signature()),
                },
                Decoy {
                    decoy_type: d.spec.decoy_type,
                    destroy_tick: d.destroy_tick,
                },
            ));
            debug!(contact = %id, decoy = ?d.spec.decoy_type, destroy_tick = d.destroy_tick, "decoy spawned");
        }
    }
}

/// The host's view of one platform, handed to its controller.
struct PlatformView<'a> {
    own: OwnShipState,
    loadout: &'a [DecoySpec],
    threats: &'a BTreeSet<ContactId>,
    pinned: Option<ContactReport>,
    reset: bool,
}

impl OwnPlatform for PlatformView<'_> {
    fn position(&self) -> Position {
        self.own.position
    }

    fn heading(&self) -> f64 {
        self.own.heading_deg
    }

    fn xy_speed(&self) -> f64 {
        self.own.xy_speed
    }

    fn threat_evaluation(&self, contact: &ContactReport) -> bool {
        self.threats.contains(&contact.id)
    }

    fn get_target(&self, _chosen: &ContactReport) -> Option<ContactReport> {
        self.pinned.clone()
    }

    fn reset_target(&mut self) {
        self.pinned = None;
        self.reset = true;
    }

    fn decoy_loadout(&self) -> &[DecoySpec] {
        self.loadout
    }

    fn own_state(&self) -> OwnShipState {
        self.own
    }
}

/// Queues launched decoys for spawning at the end of the controller phase.
struct DecoyRegistrar<'a> {
    pending: &'a mut Vec<PendingDecoy>,
    capacity: &'a mut Option<usize>,
    side: Side,
    now: u64,
}

impl EntityRegistrar for DecoyRegistrar<'_> {
    fn register_decoy(
        &mut self,
        spec: &DecoySpec,
        origin: Position,
        activation_tick: u64,
        destroy_tick: u64,
    ) -> Result<(), RegistrationError> {
        if destroy_tick < activation_tick {
            return Err(RegistrationError::InvalidLifespan {
                activation_tick,
                destroy_tick,
            });
        }
        if let Some(remaining) = self.capacity {
            if *remaining == 0 {
                return Err(RegistrationError::Refused {
                    name: format!("{:?} decoy", spec.decoy_type),
                    reason: "decoy capacity exhausted".to_string(),
                });
            }
            *remaining -= 1;
        }
        self.pending.push(PendingDecoy {
            spec: spec.clone(),
            origin,
            side: self.side,
            activation_tick: self.now + activation_tick,
            destroy_tick: self.now + destroy_tick,
        });
        Ok(())
    }
}

fn own_state(world: &World, entity: Entity) -> OwnShipState {
    let position = world.get::<&Position>(entity).map(|p| *p).unwrap_or_default();
    let xy_speed = world
        .get::<&Velocity>(entity)
        .map(|v| v.horizontal_speed())
        .unwrap_or_default();
    let heading_deg = world
        .get::<&Steering>(entity)
        .map(|s| s.heading_deg)
        .unwrap_or_default();
    OwnShipState {
        position,
        heading_deg,
        xy_speed,
    }
}

fn position_of(world: &World, id: ContactId) -> Option<Position> {
    let mut query = world.query::<(&ContactTag, &Position)>();
    query
        .iter()
        .find(|(_, (tag, _))| tag.id == id)
        .map(|(_, (_, pos))| *pos)
}

fn torpedo_ids(world: &World) -> BTreeSet<ContactId> {
    let mut query = world.query::<(&Platform, &ContactTag)>();
    query
        .iter()
        .filter(|(_, (p, _))| p.kind == PlatformKind::Torpedo)
        .map(|(_, (_, tag))| tag.id)
        .collect()
}
