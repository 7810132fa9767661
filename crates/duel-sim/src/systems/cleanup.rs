//! Cleanup: removes expired decoys and entities that left the arena.

use hecs::{Entity, World};

use duel_core::types::Position;

use crate::components::Decoy;

/// Despawn decoys whose lifespan ran out and anything beyond `arena_radius`.
/// Returns how many decoys expired.
pub fn run(
    world: &mut World,
    tick: u64,
    arena_radius: f64,
    despawn_buffer: &mut Vec<Entity>,
) -> usize {
    despawn_buffer.clear();

    for (entity, decoy) in world.query_mut::<&Decoy>() {
        if tick >= decoy.destroy_tick {
            despawn_buffer.push(entity);
        }
    }
    let expired = despawn_buffer.len();

    let origin = Position::default();
    for (entity, pos) in world.query_mut::<&Position>() {
        if origin.horizontal_range_to(pos) > arena_radius && !despawn_buffer.contains(&entity) {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    expired
}
