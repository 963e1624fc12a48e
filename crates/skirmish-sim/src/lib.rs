//! Simulation engine for SKIRMISH.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for the app layer.

pub mod engine;
pub mod health;
pub mod level;
pub mod systems;
pub mod wave_director;
pub mod weapon;
pub mod world_setup;

pub use skirmish_core as core;
pub use engine::{SimConfig, SimulationEngine};
pub use level::{LevelConfig, LevelError};
