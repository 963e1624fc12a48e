//! Errors surfaced by the application layer.

use std::io;

use thiserror::Error;

use skirmish_sim::LevelError;

use crate::settings::SettingsError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to start the game loop")]
    Thread(#[source] io::Error),
    #[error("game loop stopped unexpectedly")]
    LoopStopped,
}
