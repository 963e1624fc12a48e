//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Marks the player-controlled entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player;

/// Marks an enemy entity and records which archetype it was spawned from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy {
    pub archetype: EnemyArchetype,
}

/// Enemy AI state holder.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AgentBrain {
    pub state: AgentState,
}

/// Sprite rotation in radians. Zero means the sprite's up axis points along +y.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Facing {
    pub angle: f64,
}

/// Circular collision shape used for projectile and pickup overlap tests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hitbox {
    pub radius: f64,
}

/// A projectile in flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub damage: u32,
    pub faction: Faction,
    /// Seconds until the projectile expires on its own.
    pub remaining_secs: f64,
}

/// A collectable lying in the world.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    pub amount: u32,
}

/// One possible drop from a loot table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LootEntry {
    pub kind: PickupKind,
    /// Drop chance in percent (0..=100). Rolled independently per entry.
    pub drop_chance: f64,
}

/// Items an enemy may drop on death.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LootTable {
    pub entries: Vec<LootEntry>,
}

/// Latest input state for the player, written by commands.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Raw movement axis input; normalized by the movement system.
    pub move_x: f64,
    pub move_y: f64,
    /// World-space point the player is aiming at.
    pub aim_target: Option<Position>,
    /// Whether the fire button is held.
    pub trigger: bool,
}

/// Player locomotion parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerMotor {
    /// Units per second.
    pub move_speed: f64,
    /// Aim rotation limit in degrees per second.
    pub turn_rate_deg: f64,
}
