//! Navigation and visibility for SKIRMISH.
//!
//! Walkable-surface grid, A* path planning, per-agent path following,
//! and line-of-sight queries.

pub use skirmish_core as core;

pub mod agent;
pub mod grid;
pub mod layers;
pub mod los;
pub mod provider;

// Re-export key types for convenience.
pub use agent::NavAgent;
pub use grid::{CellKind, GridError, NavGrid, NavGridHeader};
pub use layers::LayerMask;
pub use los::has_line_of_sight;
pub use provider::{NavigationProvider, VisibilityOracle};
