//! Pickup system: the player collects any pickup it overlaps.
//!
//! Ammo tops up the magazine and health heals the ledger, both clamped to
//! their maximum. The pickup is consumed even when nothing was added.

use hecs::{Entity, World};

use skirmish_core::components::{Hitbox, Pickup, Player};
use skirmish_core::enums::{Faction, PickupKind};
use skirmish_core::events::GameEvent;
use skirmish_core::types::Position;

use crate::health::HealthLedger;
use crate::systems::damage::push_low_health_event;
use crate::weapon::Weapon;
use crate::world_setup::entity_id;

pub fn run(world: &mut World, events: &mut Vec<GameEvent>, despawn_buffer: &mut Vec<Entity>) {
    let player = world
        .query::<(&Player, &Position, &Hitbox)>()
        .iter()
        .next()
        .map(|(e, (_, pos, hitbox))| (e, *pos, hitbox.radius));
    let Some((player, player_pos, player_radius)) = player else {
        return;
    };

    let touched: Vec<(Entity, Pickup)> = world
        .query::<(&Pickup, &Position, &Hitbox)>()
        .iter()
        .filter(|(e, (_, pos, hitbox))| {
            !despawn_buffer.contains(e)
                && pos.distance_to(&player_pos) <= hitbox.radius + player_radius
        })
        .map(|(e, (pickup, _, _))| (e, *pickup))
        .collect();

    for (entity, pickup) in touched {
        match pickup.kind {
            PickupKind::Ammo => {
                if let Ok(mut weapon) = world.get::<&mut Weapon>(player) {
                    weapon.add_ammo(pickup.amount);
                }
            }
            PickupKind::Health => {
                if let Ok(mut health) = world.get::<&mut HealthLedger>(player) {
                    let change = health.add_health(pickup.amount);
                    push_low_health_event(events, entity_id(player), Faction::Player, &change);
                }
            }
        }
        events.push(GameEvent::PickupCollected {
            kind: pickup.kind,
            amount: pickup.amount,
        });
        despawn_buffer.push(entity);
    }
}
