//! Damage system: applies projectile hits to health ledgers and resolves
//! deaths.
//!
//! A dead enemy emits EnemyKilled, rolls its loot table, and is despawned.
//! A dead player is reported back so the engine can end the level.

use hecs::{Entity, World};
use rand::Rng;

use skirmish_core::components::{Enemy, LootTable, Player};
use skirmish_core::enums::{Faction, PickupKind};
use skirmish_core::events::GameEvent;
use skirmish_core::types::Position;

use crate::health::{HealthChange, HealthLedger, LowHealthTransition};
use crate::systems::projectiles::Hit;
use crate::world_setup::{self, entity_id};

/// What the damage pass did this tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Casualties {
    /// Ids of enemies that died, in the order they died.
    pub killed: Vec<u64>,
    pub player_died: bool,
}

pub fn run<R: Rng + ?Sized>(
    world: &mut World,
    rng: &mut R,
    hits: &[Hit],
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) -> Casualties {
    let mut casualties = Casualties::default();
    let mut dead_enemies: Vec<(Entity, Position)> = Vec::new();

    for hit in hits {
        let faction = if world.get::<&Player>(hit.target).is_ok() {
            Faction::Player
        } else if world.get::<&Enemy>(hit.target).is_ok() {
            Faction::Enemy
        } else {
            continue;
        };

        let (change, remaining) = match world.get::<&mut HealthLedger>(hit.target) {
            Ok(mut health) => {
                if health.is_dead() {
                    continue;
                }
                (health.take_damage(hit.amount), health.current())
            }
            Err(_) => continue,
        };

        let id = entity_id(hit.target);
        if faction == Faction::Player {
            events.push(GameEvent::PlayerDamaged {
                amount: hit.amount,
                remaining,
            });
        }
        push_low_health_event(events, id, faction, &change);

        if change.died {
            match faction {
                Faction::Player => {
                    log::info!("player died");
                    events.push(GameEvent::PlayerDied);
                    casualties.player_died = true;
                }
                Faction::Enemy => {
                    let position = match world.get::<&Position>(hit.target) {
                        Ok(p) => *p,
                        Err(_) => continue,
                    };
                    events.push(GameEvent::EnemyKilled { id, position });
                    dead_enemies.push((hit.target, position));
                    casualties.killed.push(id);
                }
            }
        }
    }

    for (entity, position) in dead_enemies {
        let drops = match world.get::<&LootTable>(entity) {
            Ok(table) => roll_loot(&table, rng),
            Err(_) => Vec::new(),
        };
        for kind in drops {
            world_setup::spawn_pickup(world, kind, position);
            events.push(GameEvent::LootDropped { kind, position });
        }
        despawn_buffer.push(entity);
    }

    casualties
}

/// Emit the event matching a low-health transition, if any.
pub fn push_low_health_event(
    events: &mut Vec<GameEvent>,
    id: u64,
    faction: Faction,
    change: &HealthChange,
) {
    match change.low_health {
        Some(LowHealthTransition::Entered) => {
            events.push(GameEvent::LowHealthEntered { id, faction })
        }
        Some(LowHealthTransition::Cleared) => {
            events.push(GameEvent::LowHealthCleared { id, faction })
        }
        None => {}
    }
}

/// Roll every loot entry independently. An entry drops when a uniform roll
/// in [0, 100] lands at or below its chance.
pub fn roll_loot<R: Rng + ?Sized>(table: &LootTable, rng: &mut R) -> Vec<PickupKind> {
    table
        .entries
        .iter()
        .filter(|entry| rng.gen_range(0.0..=100.0) <= entry.drop_chance)
        .map(|entry| entry.kind)
        .collect()
}
