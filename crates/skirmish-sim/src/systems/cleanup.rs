//! Cleanup system: despawns everything other systems flagged this tick.

use hecs::{Entity, World};

/// Despawn the flagged entities. The same entity may be flagged more than
/// once; repeats are ignored.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
