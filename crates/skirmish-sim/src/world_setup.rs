//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the player, enemies, projectiles, and pickups with
//! appropriate component bundles.

use hecs::{Entity, World};
use rand::Rng;

use skirmish_ai::fsm::initial_state;
use skirmish_ai::patrol::PatrolRoute;
use skirmish_ai::profiles::get_profile;
use skirmish_core::components::*;
use skirmish_core::constants::*;
use skirmish_core::enums::*;
use skirmish_core::types::{forward_from_facing, Position, Velocity};
use skirmish_nav::{NavAgent, NavigationProvider};

use crate::health::HealthLedger;
use crate::weapon::Weapon;

/// Stable numeric id for an entity, used in events and snapshots.
pub fn entity_id(entity: Entity) -> u64 {
    entity.to_bits().get()
}

/// Spawn the player at `position` with full health and a full magazine.
pub fn spawn_player(world: &mut World, position: Position, look_sensitivity: f64) -> Entity {
    world.spawn((
        Player,
        position,
        Velocity::zero(),
        Facing::default(),
        Hitbox {
            radius: PLAYER_HIT_RADIUS,
        },
        HealthLedger::new(
            PLAYER_MAX_HEALTH,
            PLAYER_LOW_HEALTH_THRESHOLD,
            LowHealthRecovery::Restore,
        ),
        Weapon::with_magazine(PLAYER_FIRE_INTERVAL_SECS, PLAYER_MAX_AMMO, PLAYER_RELOAD_SECS),
        PlayerInput::default(),
        PlayerMotor {
            move_speed: PLAYER_MOVE_SPEED,
            turn_rate_deg: look_sensitivity * LOOK_SENSITIVITY_MULTIPLIER,
        },
    ))
}

/// Spawn an enemy of `archetype` at `position`.
///
/// Patrol waypoints are sampled once here. With a route the enemy starts
/// Patrolling toward its first waypoint; without one it starts Chasing.
pub fn spawn_enemy<N, R>(
    world: &mut World,
    nav: &N,
    rng: &mut R,
    archetype: EnemyArchetype,
    position: Position,
) -> Entity
where
    N: NavigationProvider + ?Sized,
    R: Rng + ?Sized,
{
    let profile = get_profile(archetype);
    let mut route = PatrolRoute::generate(
        position,
        profile.patrol_radius,
        profile.patrol_point_count,
        nav,
        rng,
    );

    let mut agent = NavAgent::new(profile.patrol_speed);
    match route.advance() {
        Some(first) => agent.set_destination(first),
        None => log::warn!(
            "{archetype:?} at ({:.1}, {:.1}) has no patrol points; chasing",
            position.x,
            position.y
        ),
    }
    let state = initial_state(!route.is_empty());

    world.spawn((
        Enemy { archetype },
        position,
        Velocity::zero(),
        Facing::default(),
        Hitbox {
            radius: ENEMY_HIT_RADIUS,
        },
        HealthLedger::new(
            profile.max_health,
            profile.low_health_threshold,
            LowHealthRecovery::Latch,
        ),
        Weapon::unlimited(profile.fire_interval_secs),
        agent,
        route,
        AgentBrain { state },
        profile.loot.clone(),
        profile,
    ))
}

/// Spawn a projectile leaving the muzzle of a shooter at `origin` facing
/// `facing`. Returns the entity and the muzzle position.
pub fn spawn_projectile(
    world: &mut World,
    origin: Position,
    facing: f64,
    faction: Faction,
) -> (Entity, Position) {
    let forward = forward_from_facing(facing);
    let muzzle = origin.offset(forward, FIRE_POINT_OFFSET);
    let entity = world.spawn((
        Projectile {
            damage: PROJECTILE_DAMAGE,
            faction,
            remaining_secs: PROJECTILE_LIFETIME_SECS,
        },
        muzzle,
        Velocity::from_vec(forward * PROJECTILE_SPEED),
    ));
    (entity, muzzle)
}

/// Spawn a collectable of `kind` at `position`.
pub fn spawn_pickup(world: &mut World, kind: PickupKind, position: Position) -> Entity {
    let amount = match kind {
        PickupKind::Ammo => AMMO_PICKUP_AMOUNT,
        PickupKind::Health => HEALTH_PICKUP_AMOUNT,
    };
    world.spawn((
        Pickup { kind, amount },
        position,
        Hitbox {
            radius: PICKUP_RADIUS,
        },
    ))
}
