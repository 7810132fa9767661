//! Kinematic integration.
//!
//! Steered entities get their velocity rebuilt from the commanded course;
//! then every entity advances by velocity * dt.

use hecs::World;

use duel_core::constants::TICK_SECS;
use duel_core::types::{Position, Velocity};

use crate::components::Steering;

/// Heading actually sailed this tick, including the weave offset.
pub fn weaved_heading(steering: &Steering, tick: u64) -> f64 {
    if steering.weave_period == 0 || steering.weave_deg == 0.0 {
        return steering.heading_deg;
    }
    let leg = tick / steering.weave_period;
    let offset = if leg % 2 == 0 {
        steering.weave_deg
    } else {
        -steering.weave_deg
    };
    (steering.heading_deg + offset).rem_euclid(360.0)
}

/// Rebuild velocities from steering.
pub fn steer(world: &mut World, tick: u64) {
    for (_entity, (steering, vel)) in world.query_mut::<(&Steering, &mut Velocity)>() {
        *vel = Velocity::from_heading(steering.speed, weaved_heading(steering, tick));
    }
}

/// Advance every moving entity by one tick.
pub fn run(world: &mut World) {
    for (_entity, (pos, vel)) in world.query_mut::<(&mut Position, &Velocity)>() {
        *pos = pos.advanced(vel, TICK_SECS);
    }
}
