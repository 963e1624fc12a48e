//! Game state snapshot: the complete visible state published each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{Position, SimTime};

/// Complete game state published after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub level: Option<String>,
    pub player: Option<PlayerView>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub pickups: Vec<PickupView>,
    pub waves: WaveView,
    pub events: Vec<GameEvent>,
}

/// The player's visible state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub facing: f64,
    pub health: u32,
    pub max_health: u32,
    pub low_health: bool,
    pub ammo: u32,
    pub max_ammo: u32,
    pub weapon_state: WeaponState,
}

/// One enemy on the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u64,
    pub archetype: EnemyArchetype,
    pub position: Position,
    pub facing: f64,
    pub state: AgentState,
    pub health: u32,
    pub low_health: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Position,
    pub faction: Faction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupView {
    pub position: Position,
    pub kind: PickupKind,
}

/// Wave director progress for the HUD.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    /// 1-based wave number currently running (0 before the first wave).
    pub current_wave: usize,
    pub total_waves: usize,
    pub enemies_alive: u32,
    pub finished: bool,
    /// The director could not run (for example, no spawn points).
    pub disabled: bool,
}
