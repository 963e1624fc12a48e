//! Skirmish application layer.
//!
//! Runs the simulation on its own thread and wires the services around it:
//! settings, audio, and scene transitions. The `skirmish` binary drives a
//! headless session through `runner`.

pub mod audio;
pub mod autopilot;
pub mod error;
pub mod game_loop;
pub mod logging;
pub mod runner;
pub mod services;
pub mod settings;
pub mod state;
pub mod transition;

pub use error::AppError;
pub use skirmish_core as core;
