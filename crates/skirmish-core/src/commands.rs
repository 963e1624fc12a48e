//! Player commands sent from the app layer to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Input ---
    /// Movement axis input. Normalized by the simulation.
    SetMoveInput { x: f64, y: f64 },
    /// World-space point to aim at.
    SetAimTarget { target: Position },
    /// Fire button held or released.
    SetTrigger { pressed: bool },

    // --- Session control ---
    /// Start the level that was loaded into the engine.
    StartLevel,
    /// Leave a running or finished level and return to the menu.
    ReturnToMenu,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
    /// Set time scale (1.0 = normal, 2.0 = double, 0.0 = paused).
    SetTimeScale { scale: f64 },
    /// Update the aim turn rate from the mouse sensitivity setting.
    SetLookSensitivity { sensitivity: f64 },
}
