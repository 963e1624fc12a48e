//! Events emitted by the simulation for audio and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Gameplay events collected during a tick and attached to the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A wave began spawning.
    WaveStarted { index: usize, name: String, count: u32 },
    /// A wave was skipped because it had no archetypes.
    WaveSkipped { index: usize, name: String },
    /// Every enemy of a wave has been eliminated.
    WaveCleared { index: usize },
    /// The final wave was cleared.
    AllWavesCleared,
    /// An enemy entered the world.
    EnemySpawned {
        id: u64,
        archetype: EnemyArchetype,
        position: Position,
    },
    /// An enemy's AI state changed.
    AgentStateChanged {
        id: u64,
        from: AgentState,
        to: AgentState,
    },
    /// A shot left a weapon.
    ShotFired { faction: Faction, position: Position },
    /// The player's weapon started reloading.
    ReloadStarted,
    /// The player's weapon finished reloading.
    ReloadFinished,
    /// Health crossed into the low-health band.
    LowHealthEntered { id: u64, faction: Faction },
    /// Health recovered above the low-health band.
    LowHealthCleared { id: u64, faction: Faction },
    /// The player took damage.
    PlayerDamaged { amount: u32, remaining: u32 },
    /// The player died.
    PlayerDied,
    /// An enemy died.
    EnemyKilled { id: u64, position: Position },
    /// A loot item dropped.
    LootDropped { kind: PickupKind, position: Position },
    /// The player collected a pickup.
    PickupCollected { kind: PickupKind, amount: u32 },
}
