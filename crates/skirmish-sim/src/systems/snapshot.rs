//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use skirmish_core::components::*;
use skirmish_core::enums::*;
use skirmish_core::events::GameEvent;
use skirmish_core::state::*;
use skirmish_core::types::{Position, SimTime};

use crate::health::HealthLedger;
use crate::weapon::Weapon;
use crate::world_setup::entity_id;

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    level: Option<&str>,
    waves: WaveView,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        level: level.map(str::to_owned),
        player: build_player(world),
        enemies: build_enemies(world),
        projectiles: build_projectiles(world),
        pickups: build_pickups(world),
        waves,
        events,
    }
}

fn build_player(world: &World) -> Option<PlayerView> {
    world
        .query::<(&Player, &Position, &Facing, &HealthLedger, &Weapon)>()
        .iter()
        .next()
        .map(|(_, (_, pos, facing, health, weapon))| PlayerView {
            position: *pos,
            facing: facing.angle,
            health: health.current(),
            max_health: health.max(),
            low_health: health.is_low(),
            ammo: weapon.ammo().unwrap_or(0),
            max_ammo: weapon.max_ammo().unwrap_or(0),
            weapon_state: weapon.state(),
        })
}

/// Enemies sorted by id so the output order is stable.
fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Enemy, &Position, &Facing, &AgentBrain, &HealthLedger)>()
        .iter()
        .map(|(entity, (enemy, pos, facing, brain, health))| EnemyView {
            id: entity_id(entity),
            archetype: enemy.archetype,
            position: *pos,
            facing: facing.angle,
            state: brain.state,
            health: health.current(),
            low_health: health.is_low(),
        })
        .collect();

    enemies.sort_by_key(|e| e.id);
    enemies
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    world
        .query::<(&Projectile, &Position)>()
        .iter()
        .map(|(_, (projectile, pos))| ProjectileView {
            position: *pos,
            faction: projectile.faction,
        })
        .collect()
}

fn build_pickups(world: &World) -> Vec<PickupView> {
    world
        .query::<(&Pickup, &Position)>()
        .iter()
        .map(|(_, (pickup, pos))| PickupView {
            position: *pos,
            kind: pickup.kind,
        })
        .collect()
}
