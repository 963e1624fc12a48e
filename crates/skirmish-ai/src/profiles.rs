//! Archetype-specific behavioral profiles.
//!
//! Consolidates per-archetype parameters for the enemy FSM, its weapon,
//! its health ledger, and its loot.

use skirmish_core::components::{LootEntry, LootTable};
use skirmish_core::enums::{EnemyArchetype, PickupKind};

/// Behavioral profile for an enemy archetype.
#[derive(Debug, Clone)]
pub struct EnemyProfile {
    /// Travel speed while patrolling (units/s).
    pub patrol_speed: f64,
    /// Travel speed while chasing (units/s).
    pub chase_speed: f64,
    /// Radius around the spawn point in which waypoints are sampled.
    pub patrol_radius: f64,
    pub patrol_point_count: usize,
    /// Uniform wait range at each waypoint (seconds).
    pub patrol_wait_secs: (f64, f64),
    pub arrival_threshold: f64,
    /// Sight range that triggers a chase from patrol.
    pub chase_range: f64,
    /// Distance beyond which a chase is abandoned.
    pub patrol_range: f64,
    /// Distance under which a chase turns into an attack.
    pub attack_range: f64,
    /// Seconds between shots.
    pub fire_interval_secs: f64,
    pub max_health: u32,
    pub low_health_threshold: u32,
    pub loot: LootTable,
}

/// Get the behavioral profile for a given archetype.
pub fn get_profile(archetype: EnemyArchetype) -> EnemyProfile {
    use skirmish_core::constants::*;

    match archetype {
        EnemyArchetype::Grunt => EnemyProfile {
            patrol_speed: ENEMY_PATROL_SPEED,
            chase_speed: ENEMY_CHASE_SPEED,
            patrol_radius: ENEMY_PATROL_RADIUS,
            patrol_point_count: ENEMY_PATROL_POINT_COUNT,
            patrol_wait_secs: (ENEMY_PATROL_WAIT_MIN_SECS, ENEMY_PATROL_WAIT_MAX_SECS),
            arrival_threshold: ENEMY_WAYPOINT_ARRIVAL_THRESHOLD,
            chase_range: ENEMY_CHASE_RANGE,
            patrol_range: ENEMY_PATROL_RANGE,
            attack_range: ENEMY_ATTACK_RANGE,
            fire_interval_secs: ENEMY_FIRE_INTERVAL_SECS,
            max_health: ENEMY_MAX_HEALTH,
            low_health_threshold: ENEMY_LOW_HEALTH_THRESHOLD,
            loot: loot(&[(PickupKind::Ammo, 30.0), (PickupKind::Health, 10.0)]),
        },
        // Fast and fragile; closes in before shooting.
        EnemyArchetype::Runner => EnemyProfile {
            patrol_speed: ENEMY_PATROL_SPEED * 1.5,
            chase_speed: ENEMY_CHASE_SPEED * 1.5,
            patrol_radius: ENEMY_PATROL_RADIUS,
            patrol_point_count: ENEMY_PATROL_POINT_COUNT,
            patrol_wait_secs: (1.0, 2.5),
            arrival_threshold: ENEMY_WAYPOINT_ARRIVAL_THRESHOLD,
            chase_range: 12.0,
            patrol_range: 18.0,
            attack_range: 4.0,
            fire_interval_secs: 0.6,
            max_health: 30,
            low_health_threshold: 10,
            loot: loot(&[(PickupKind::Ammo, 20.0)]),
        },
        // Slow, long sight lines, holds at range.
        EnemyArchetype::Marksman => EnemyProfile {
            patrol_speed: ENEMY_PATROL_SPEED * 0.75,
            chase_speed: ENEMY_CHASE_SPEED * 0.75,
            patrol_radius: ENEMY_PATROL_RADIUS * 0.5,
            patrol_point_count: 3,
            patrol_wait_secs: (3.0, 6.0),
            arrival_threshold: ENEMY_WAYPOINT_ARRIVAL_THRESHOLD,
            chase_range: 14.0,
            patrol_range: 20.0,
            attack_range: 11.0,
            fire_interval_secs: 1.8,
            max_health: 40,
            low_health_threshold: ENEMY_LOW_HEALTH_THRESHOLD,
            loot: loot(&[(PickupKind::Ammo, 40.0), (PickupKind::Health, 25.0)]),
        },
    }
}

fn loot(entries: &[(PickupKind, f64)]) -> LootTable {
    LootTable {
        entries: entries
            .iter()
            .map(|&(kind, drop_chance)| LootEntry { kind, drop_chance })
            .collect(),
    }
}
