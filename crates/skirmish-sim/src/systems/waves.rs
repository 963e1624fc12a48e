//! Wave system: advances the director and places the enemies it orders.

use hecs::World;
use rand::Rng;

use skirmish_core::events::GameEvent;
use skirmish_nav::NavigationProvider;

use crate::wave_director::WaveDirector;
use crate::world_setup::{self, entity_id};

/// Tick the director once and spawn every enemy it orders this tick.
pub fn run<N, R>(
    world: &mut World,
    director: &mut WaveDirector,
    nav: &N,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) where
    N: NavigationProvider + ?Sized,
    R: Rng + ?Sized,
{
    for order in director.tick(rng, events) {
        let entity = world_setup::spawn_enemy(world, nav, rng, order.archetype, order.point);
        log::debug!(
            "spawned {:?} at ({:.1}, {:.1})",
            order.archetype,
            order.point.x,
            order.point.y
        );
        events.push(GameEvent::EnemySpawned {
            id: entity_id(entity),
            archetype: order.archetype,
            position: order.point,
        });
    }
}
