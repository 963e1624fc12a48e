//! Ammo spawner: keeps one ammo pickup on the field.
//!
//! The first pickup appears as soon as the level starts. Once it has been
//! collected the spawner waits `interval_secs` and drops a fresh one at a
//! random configured point.

use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand::Rng;

use skirmish_core::components::Pickup;
use skirmish_core::enums::PickupKind;

use crate::level::AmmoSpawnerConfig;
use crate::world_setup;

#[derive(Debug, Clone)]
pub struct AmmoSpawner {
    config: AmmoSpawnerConfig,
    current: Option<Entity>,
    respawn_in: Option<f64>,
}

impl AmmoSpawner {
    pub fn new(config: AmmoSpawnerConfig) -> Self {
        Self {
            config,
            current: None,
            respawn_in: Some(0.0),
        }
    }

    /// The pickup this spawner placed, while it is still on the field.
    pub fn current(&self) -> Option<Entity> {
        self.current
    }

    pub fn run<R: Rng + ?Sized>(&mut self, world: &mut World, rng: &mut R, dt: f64) {
        if let Some(entity) = self.current {
            if world.get::<&Pickup>(entity).is_ok() {
                return;
            }
            self.current = None;
            self.respawn_in = Some(self.config.interval_secs);
        }

        let Some(remaining) = self.respawn_in.as_mut() else {
            return;
        };
        *remaining -= dt;
        if *remaining > 0.0 {
            return;
        }

        let point = match self.config.points.choose(rng) {
            Some(p) => *p,
            None => {
                log::warn!("ammo spawner has no spawn points; using the fallback position");
                self.config.fallback
            }
        };
        self.current = Some(world_setup::spawn_pickup(world, PickupKind::Ammo, point));
        self.respawn_in = None;
    }
}
