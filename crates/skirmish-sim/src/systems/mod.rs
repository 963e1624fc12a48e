//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions that take `&mut World` (or `&World` for
//! read-only work). Apart from the ammo spawner's timer they hold no state;
//! everything else lives in components or in the engine.

pub mod ammo_spawner;
pub mod cleanup;
pub mod damage;
pub mod enemy_ai;
pub mod movement;
pub mod pickups;
pub mod player_control;
pub mod projectiles;
pub mod snapshot;
pub mod waves;
pub mod weapons;
