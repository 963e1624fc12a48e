//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy AI state. An agent is in exactly one of these at any tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    #[default]
    Patrolling,
    Chasing,
    Attacking,
}

/// Which side fired a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

/// Enemy archetype category. Each maps to a behavior profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyArchetype {
    /// Baseline rifleman.
    Grunt,
    /// Fast, fragile flanker that fires often.
    Runner,
    /// Slow, long-range shooter.
    Marksman,
}

/// Collectable pickup kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Ammo,
    Health,
}

/// Weapon state. Firing and reloading are mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponState {
    #[default]
    Ready,
    Reloading,
}

/// Whether the low-health flag clears again when health rises above the threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LowHealthRecovery {
    /// Flag clears when healed strictly above the threshold.
    #[default]
    Restore,
    /// Once set, the flag stays set.
    Latch,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Active,
    Paused,
    /// The player died.
    GameOver,
    /// Every wave was cleared.
    Victory,
}

impl GamePhase {
    /// Whether the level has ended, one way or the other.
    pub fn is_finished(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }
}
