//! State shared between the driver and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use skirmish_core::commands::PlayerCommand;
use skirmish_core::state::GameStateSnapshot;
use skirmish_sim::LevelConfig;

/// Commands sent from the driver to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Validate and load a level; it starts on the next `StartLevel`.
    LoadLevel(Box<LevelConfig>),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handle to a running game loop thread.
pub struct GameLoopHandle {
    /// Channel to forward commands to the game loop thread.
    pub command_tx: mpsc::Sender<GameLoopCommand>,
    /// Every snapshot, in tick order. Bounded: read it or the loop stalls.
    pub snapshots: mpsc::Receiver<GameStateSnapshot>,
    /// Latest snapshot for synchronous polling.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    pub(crate) join: Option<JoinHandle<()>>,
}

impl GameLoopHandle {
    pub fn send(&self, command: PlayerCommand) -> bool {
        self.command_tx
            .send(GameLoopCommand::PlayerCommand(command))
            .is_ok()
    }

    pub fn latest(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }

    /// Ask the loop to stop and wait for the thread to exit.
    pub fn shutdown(self) {
        let GameLoopHandle {
            command_tx,
            snapshots,
            join,
            ..
        } = self;
        let _ = command_tx.send(GameLoopCommand::Shutdown);
        // Unblocks a loop waiting on a full snapshot buffer.
        drop(snapshots);
        if let Some(join) = join {
            if join.join().is_err() {
                log::error!("game loop thread panicked");
            }
        }
    }
}
