//! Enemy AI for SKIRMISH.
//!
//! Implements the enemy behavior state machine, patrol routes,
//! and archetype-driven behavior profiles.

pub mod fsm;
pub mod patrol;
pub mod profiles;

pub use skirmish_core as core;

#[cfg(test)]
mod tests;
