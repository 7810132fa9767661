//! Sensor system: builds the contact frame one platform sees.
//!
//! A platform detects every entity of the other side within the sensor
//! range. Contacts are ordered by id so frames are reproducible.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use duel_core::types::{ContactFrame, ContactReport, Position, SimTime, Velocity};

use crate::components::{ContactTag, Side};

/// Contact frame for `observer`. Empty if the observer no longer exists.
pub fn contact_frame(
    world: &World,
    observer: Entity,
    range: f64,
    noise: f64,
    rng: &mut ChaCha8Rng,
    time: SimTime,
) -> ContactFrame {
    let Ok(own_pos) = world.get::<&Position>(observer).map(|p| *p) else {
        return ContactFrame {
            time,
            contacts: Vec::new(),
        };
    };
    let Ok(own_side) = world.get::<&Side>(observer).map(|s| *s) else {
        return ContactFrame {
            time,
            contacts: Vec::new(),
        };
    };

    let mut contacts = Vec::new();
    let mut query = world.query::<(&Position, &Velocity, &ContactTag, &Side)>();
    for (entity, (pos, vel, tag, side)) in query.iter() {
        if entity == observer || *side == own_side {
            continue;
        }
        if own_pos.horizontal_range_to(pos) > range {
            continue;
        }
        contacts.push(ContactReport {
            id: tag.id,
            position: *pos,
            xy_speed: Some(vel.horizontal_speed()),
            z_speed: Some(vel.z),
            heading: Some(vel.heading_deg()),
            signature: tag.signature,
        });
    }
    contacts.sort_by_key(|c| c.id);

    // A spread whose width overflows cannot be sampled.
    if noise > 0.0 && (2.0 * noise).is_finite() {
        for c in &mut contacts {
            c.position.x += rng.gen_range(-noise..=noise);
            c.position.y += rng.gen_range(-noise..=noise);
        }
    }

    ContactFrame { time, contacts }
}
