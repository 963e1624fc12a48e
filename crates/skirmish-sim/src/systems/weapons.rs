//! Player weapon system: reload timers, trigger handling, projectile spawn.

use hecs::World;

use skirmish_core::components::{Facing, Player, PlayerInput};
use skirmish_core::enums::Faction;
use skirmish_core::events::GameEvent;
use skirmish_core::types::Position;

use crate::weapon::{Weapon, WeaponOutcome};
use crate::world_setup;

pub fn run(world: &mut World, now: f64, dt: f64, events: &mut Vec<GameEvent>) {
    let mut shots: Vec<(Position, f64)> = Vec::new();

    for (_entity, (_player, input, weapon, pos, facing)) in
        world.query_mut::<(&Player, &PlayerInput, &mut Weapon, &Position, &Facing)>()
    {
        match weapon.update(now, dt, input.trigger) {
            WeaponOutcome::Fired => shots.push((*pos, facing.angle)),
            WeaponOutcome::ReloadStarted => {
                log::debug!("player reloading");
                events.push(GameEvent::ReloadStarted);
            }
            WeaponOutcome::ReloadFinished => events.push(GameEvent::ReloadFinished),
            WeaponOutcome::Idle | WeaponOutcome::Reloading => {}
        }
    }

    for (pos, angle) in shots {
        let (_, muzzle) = world_setup::spawn_projectile(world, pos, angle, Faction::Player);
        events.push(GameEvent::ShotFired {
            faction: Faction::Player,
            position: muzzle,
        });
    }
}
