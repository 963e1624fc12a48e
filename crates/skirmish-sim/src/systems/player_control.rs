//! Player control system: turns the latest input into velocity and aim.
//!
//! Movement input is normalized and scaled by the motor's move speed. Each
//! axis is dropped separately when it would carry the player into a blocked
//! cell, so the player slides along walls. Aim turns toward the aim point at
//! no more than the motor's turn rate.

use glam::DVec2;
use hecs::World;

use skirmish_core::components::{Facing, Player, PlayerInput, PlayerMotor};
use skirmish_core::types::{facing_toward, wrap_angle, Position, Velocity};
use skirmish_nav::NavGrid;

pub fn run(world: &mut World, grid: &NavGrid, dt: f64) {
    for (_entity, (_player, input, motor, pos, vel, facing)) in world.query_mut::<(
        &Player,
        &PlayerInput,
        &PlayerMotor,
        &Position,
        &mut Velocity,
        &mut Facing,
    )>() {
        *vel = Velocity::from_vec(steer(grid, pos, input, motor.move_speed, dt));

        if let Some(target) = input.aim_target {
            let look = target.to_vec() - pos.to_vec();
            if look.length_squared() > f64::EPSILON {
                let max_step = motor.turn_rate_deg.to_radians() * dt;
                facing.angle = rotate_towards(facing.angle, facing_toward(look), max_step);
            }
        }
    }
}

fn steer(grid: &NavGrid, pos: &Position, input: &PlayerInput, speed: f64, dt: f64) -> DVec2 {
    let mut v = DVec2::new(input.move_x, input.move_y).normalize_or_zero() * speed;

    if !grid.is_walkable(&Position::new(pos.x + v.x * dt, pos.y)) {
        v.x = 0.0;
    }
    if !grid.is_walkable(&Position::new(pos.x + v.x * dt, pos.y + v.y * dt)) {
        v.y = 0.0;
    }
    v
}

/// Rotate `current` toward `target` by at most `max_step` radians along the
/// shorter arc.
pub fn rotate_towards(current: f64, target: f64, max_step: f64) -> f64 {
    let delta = wrap_angle(target - current);
    wrap_angle(current + delta.clamp(-max_step, max_step))
}
