//! Tests for the controllers, the launcher and the harness systems.

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use duel_core::enums::*;
use duel_core::error::RegistrationError;
use duel_core::events::Decision;
use duel_core::types::*;
use duel_targeting::profiles::get_profile;

use crate::components::{ContactTag, Decoy, Side, Steering};
use crate::controller::{Controller, TargetingController};
use crate::host::{EntityRegistrar, OwnPlatform};
use crate::launcher::{Launcher, LauncherPhase};
use crate::systems::{cleanup, movement, sensor};

struct MockPlatform {
    own: OwnShipState,
    loadout: Vec<DecoySpec>,
    threats: Vec<ContactId>,
    override_target: Option<ContactReport>,
    resets: u32,
}

impl MockPlatform {
    fn at(x: f64, y: f64) -> Self {
        Self {
            own: OwnShipState {
                position: Position::planar(x, y),
                heading_deg: 0.0,
                xy_speed: 3.0,
            },
            loadout: Vec::new(),
            threats: Vec::new(),
            override_target: None,
            resets: 0,
        }
    }
}

impl OwnPlatform for MockPlatform {
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
        self.override_target.clone()
    }

    fn reset_target(&mut self) {
        self.override_target = None;
        self.resets += 1;
    }

    fn decoy_loadout(&self) -> &[DecoySpec] {
        &self.loadout
    }
}

#[derive(Default)]
struct RecordingRegistrar {
    registered: Vec<(DecoyType, u64, u64)>,
    accept: Option<usize>,
}

impl EntityRegistrar for RecordingRegistrar {
    fn register_decoy(
        &mut self,
        spec: &DecoySpec,
        _origin: Position,
        activation_tick: u64,
        destroy_tick: u64,
    ) -> Result<(), RegistrationError> {
        if self.accept.is_some_and(|n| self.registered.len() >= n) {
            return Err(RegistrationError::Refused {
                name: format!("{:?}", spec.decoy_type),
                reason: "full".into(),
            });
        }
        self.registered
            .push((spec.decoy_type, activation_tick, destroy_tick));
        Ok(())
    }
}

fn frame(tick: u64, contacts: &[(u32, f64, f64)]) -> ContactFrame {
    ContactFrame {
        time: SimTime::new(tick, tick as f64),
        contacts: contacts
            .iter()
            .map(|(id, x, y)| ContactReport::at(*id, Position::planar(*x, *y)))
            .collect(),
    }
}

fn decoy(decoy_type: DecoyType, lifespan: f64) -> DecoySpec {
    DecoySpec {
        decoy_type,
        lifespan,
        speed: 0.0,
        heading: 0.0,
        cost: None,
    }
}

fn controller(role: ControllerRole) -> TargetingController {
    TargetingController::new(role.as_str(), get_profile(role), 7)
}

// ---- Controller state machine ----

#[test]
fn test_controller_wait_decision_cycle() {
    let mut c = controller(ControllerRole::AttackCommand);
    let mut host = MockPlatform::at(0.0, 0.0);
    assert_eq!(c.phase(), ControllerPhase::Wait);
    assert!(c.output(&mut host).is_empty());

    c.ext_trans(&frame(0, &[(1, 30.0, 0.0)]));
    assert_eq!(c.phase(), ControllerPhase::Decision);
    let out = c.output(&mut host);
    assert_eq!(out.len(), 1);
    c.int_trans();
    assert_eq!(c.phase(), ControllerPhase::Wait);

    // The frame is consumed by the first output.
    assert!(c.output(&mut host).is_empty());
}

#[test]
fn test_empty_frame_emits_nothing() {
    let mut c = controller(ControllerRole::AttackCommand);
    let mut host = MockPlatform::at(0.0, 0.0);
    c.ext_trans(&frame(0, &[]));
    assert!(c.output(&mut host).is_empty());
}

// ---- Attack command ----

#[test]
fn test_attack_command_ranks_and_evades_when_close() {
    let mut c = controller(ControllerRole::AttackCommand);
    let mut host = MockPlatform::at(0.0, 0.0);

    c.ext_trans(&frame(0, &[(2, 30.0, 0.0), (1, 10.0, 0.0)]));
    let out = c.output(&mut host);
    assert_eq!(
        out[0],
        Decision::PriorityList {
            ids: vec![ContactId(1), ContactId(2)]
        }
    );
    match out[1] {
        Decision::Maneuver {
            heading_deg,
            speed_factor,
        } => {
            // Escape is due west; the turn limit allows 20 degrees from north.
            assert!((heading_deg - 340.0).abs() < 1e-9);
            assert_eq!(speed_factor, 1.2);
        }
        ref other => panic!("expected maneuver, got {other:?}"),
    }
    assert_eq!(c.engine().state().locked, Some(ContactId(1)));
}

#[test]
fn test_attack_command_no_maneuver_outside_danger_distance() {
    let mut c = controller(ControllerRole::AttackCommand);
    let mut host = MockPlatform::at(0.0, 0.0);
    c.ext_trans(&frame(0, &[(1, 20.0, 0.0)]));
    let out = c.output(&mut host);
    assert_eq!(out.len(), 1);
    assert!(matches!(out[0], Decision::PriorityList { .. }));
}

// ---- Torpedoes ----

#[test]
fn test_torpedo_platform_override_and_reset() {
    let mut c = controller(ControllerRole::AttackTorpedo);
    let mut host = MockPlatform::at(0.0, 0.0);
    host.override_target = Some(ContactReport::at(2, Position::planar(20.0, 0.0)));

    c.ext_trans(&frame(0, &[(1, 10.0, 0.0), (2, 20.0, 0.0)]));
    let out = c.output(&mut host);
    assert_eq!(out, vec![Decision::Target { id: ContactId(2) }]);
    assert_eq!(host.resets, 1);
    // The engine still locked its own choice.
    assert_eq!(c.engine().state().locked, Some(ContactId(1)));
    c.int_trans();

    c.ext_trans(&frame(1, &[(1, 10.0, 0.0), (2, 20.0, 0.0)]));
    let out = c.output(&mut host);
    assert_eq!(out, vec![Decision::Target { id: ContactId(1) }]);
    assert_eq!(host.resets, 2);
}

#[test]
fn test_torpedo_resets_target_on_empty_frame() {
    let mut c = controller(ControllerRole::DefenseTorpedo);
    let mut host = MockPlatform::at(0.0, 0.0);
    c.ext_trans(&frame(0, &[]));
    assert!(c.output(&mut host).is_empty());
    assert_eq!(host.resets, 1);
}

#[test]
fn test_defense_torpedo_prefers_surface_signature() {
    let mut c = controller(ControllerRole::DefenseTorpedo);
    let mut host = MockPlatform::at(0.0, 0.0);
    let mut f = frame(0, &[]);
    f.contacts = vec![
        ContactReport::at(1, Position::planar(10.0, 0.0)).with_signature(Signature::StationaryDecoy, 0.0),
        ContactReport::at(2, Position::planar(12.0, 0.0)).with_signature(Signature::Surface, 3.0),
    ];
    c.ext_trans(&f);
    assert_eq!(c.output(&mut host), vec![Decision::Target { id: ContactId(2) }]);
}

// ---- Defense command ----

#[test]
fn test_defense_command_deploys_once_and_evades_first_threat() {
    let mut c = controller(ControllerRole::DefenseCommand);
    let mut host = MockPlatform::at(0.0, 0.0);
    host.loadout = vec![decoy(DecoyType::Stationary, 10.0)];
    host.threats = vec![ContactId(5), ContactId(6)];

    c.ext_trans(&frame(0, &[(3, 0.0, 20.0), (5, 0.0, 30.0), (6, 0.0, 25.0)]));
    let out = c.output(&mut host);
    assert_eq!(out.len(), 2);
    assert_eq!(
        out[0],
        Decision::DeployDecoys {
            decoys: vec![decoy(DecoyType::Stationary, 10.0)]
        }
    );
    match out[1] {
        Decision::Maneuver {
            heading_deg,
            speed_factor,
        } => {
            assert!((heading_deg - 20.0).abs() < 1e-9);
            assert_eq!(speed_factor, 1.0);
        }
        ref other => panic!("expected maneuver, got {other:?}"),
    }
    assert_eq!(c.engine().state().engaged_threat, Some(ContactId(5)));
    c.int_trans();

    c.ext_trans(&frame(1, &[(3, 0.0, 20.0), (5, 0.0, 28.0)]));
    let out = c.output(&mut host);
    assert_eq!(out.len(), 1);
    assert!(matches!(out[0], Decision::Maneuver { .. }));
}

#[test]
fn test_defense_command_ignores_non_threats() {
    let mut c = controller(ControllerRole::DefenseCommand);
    let mut host = MockPlatform::at(0.0, 0.0);
    c.ext_trans(&frame(0, &[(3, 0.0, 10.0)]));
    assert!(c.output(&mut host).is_empty());
}

#[test]
fn test_defense_command_without_budget_only_maneuvers() {
    let mut profile = get_profile(ControllerRole::DefenseCommand);
    profile.budget = 0.5;
    let mut c = TargetingController::new("dc", profile, 1);
    let mut host = MockPlatform::at(0.0, 0.0);
    host.loadout = vec![decoy(DecoyType::Stationary, 10.0)];
    host.threats = vec![ContactId(1)];

    c.ext_trans(&frame(0, &[(1, 0.0, 10.0)]));
    let out = c.output(&mut host);
    assert_eq!(out.len(), 1);
    assert!(matches!(out[0], Decision::Maneuver { .. }));
    assert_eq!(c.engine().state().budget.remaining(), 0.5);
}

// ---- Launcher ----

#[test]
fn test_launcher_registers_with_rounded_lifespan() {
    let mut launcher = Launcher::new("launcher");
    let mut registrar = RecordingRegistrar::default();
    assert!(launcher
        .output(Position::default(), &mut registrar)
        .is_empty());

    launcher.ext_trans(vec![
        decoy(DecoyType::Stationary, 7.2),
        decoy(DecoyType::SelfPropelled, 3.0),
    ]);
    assert_eq!(launcher.phase(), LauncherPhase::Launch);
    let out = launcher.output(Position::planar(1.0, 2.0), &mut registrar);
    assert_eq!(
        out,
        vec![Decision::DecoysLaunched {
            types: vec![DecoyType::Stationary, DecoyType::SelfPropelled]
        }]
    );
    assert_eq!(
        registrar.registered,
        vec![(DecoyType::Stationary, 0, 8), (DecoyType::SelfPropelled, 0, 3)]
    );
    launcher.int_trans();
    assert_eq!(launcher.phase(), LauncherPhase::Wait);
}

#[test]
fn test_launcher_skips_refused_registrations() {
    let mut launcher = Launcher::new("launcher");
    let mut registrar = RecordingRegistrar {
        accept: Some(1),
        ..Default::default()
    };
    launcher.ext_trans(vec![
        decoy(DecoyType::Stationary, 5.0),
        decoy(DecoyType::Stationary, 5.0),
    ]);
    let out = launcher.output(Position::default(), &mut registrar);
    assert_eq!(
        out,
        vec![Decision::DecoysLaunched {
            types: vec![DecoyType::Stationary]
        }]
    );
    let refused = launcher.take_refused();
    assert_eq!(refused.len(), 1);
    assert!(launcher.take_refused().is_empty());

    let mut refuse_all = RecordingRegistrar {
        accept: Some(0),
        ..Default::default()
    };
    launcher.int_trans();
    launcher.ext_trans(vec![decoy(DecoyType::Stationary, 5.0)]);
    assert!(launcher
        .output(Position::default(), &mut refuse_all)
        .is_empty());
    assert_eq!(launcher.take_refused().len(), 1);
}

// ---- Systems ----

#[test]
fn test_weaved_heading_alternates_per_leg() {
    let steering = Steering {
        heading_deg: 0.0,
        speed: 3.0,
        cruise_speed: 3.0,
        weave_deg: 30.0,
        weave_period: 2,
    };
    assert_eq!(movement::weaved_heading(&steering, 0), 30.0);
    assert_eq!(movement::weaved_heading(&steering, 1), 30.0);
    assert_eq!(movement::weaved_heading(&steering, 2), 330.0);
    assert_eq!(movement::weaved_heading(&steering, 4), 30.0);

    let straight = Steering {
        weave_period: 0,
        ..steering
    };
    assert_eq!(movement::weaved_heading(&straight, 3), 0.0);
}

#[test]
fn test_movement_integrates_steering() {
    let mut world = World::new();
    let e = world.spawn((
        Position::planar(0.0, 0.0),
        Velocity::default(),
        Steering {
            heading_deg: 90.0,
            speed: 2.0,
            cruise_speed: 2.0,
            weave_deg: 0.0,
            weave_period: 0,
        },
    ));
    movement::steer(&mut world, 0);
    movement::run(&mut world);
    let pos = *world.get::<&Position>(e).unwrap();
    assert!((pos.x - 2.0).abs() < 1e-9);
    assert!(pos.y.abs() < 1e-9);
}

#[test]
fn test_cleanup_expires_decoys() {
    let mut world = World::new();
    let mut buffer = Vec::new();
    let d = world.spawn((
        Position::default(),
        Decoy {
            decoy_type: DecoyType::Stationary,
            destroy_tick: 5,
        },
    ));
    let far = world.spawn((Position::planar(900.0, 0.0),));

    assert_eq!(cleanup::run(&mut world, 4, 500.0, &mut buffer), 0);
    assert!(world.contains(d));
    assert!(!world.contains(far));

    assert_eq!(cleanup::run(&mut world, 5, 500.0, &mut buffer), 1);
    assert!(!world.contains(d));
}

#[test]
fn test_sensor_reports_other_side_in_range() {
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let tag = |id: u32| ContactTag {
        id: ContactId(id),
        signature: None,
    };
    let observer = world.spawn((Side::Attack, Position::default(), Velocity::default(), tag(1)));
    world.spawn((Side::Defense, Position::planar(0.0, 50.0), Velocity::new(3.0, 0.0, 0.0), tag(4)));
    world.spawn((Side::Defense, Position::planar(10.0, 0.0), Velocity::default(), tag(2)));
    world.spawn((Side::Defense, Position::planar(100.0, 0.0), Velocity::default(), tag(3)));
    world.spawn((Side::Attack, Position::planar(5.0, 0.0), Velocity::default(), tag(5)));

    let f = sensor::contact_frame(&world, observer, 80.0, 0.0, &mut rng, SimTime::new(3, 3.0));
    assert_eq!(f.time.tick, 3);
    let ids: Vec<ContactId> = f.contacts.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![ContactId(2), ContactId(4)]);
    assert_eq!(f.contacts[1].xy_speed, Some(3.0));
    assert!((f.contacts[1].heading.unwrap() - 90.0).abs() < 1e-9);
}
