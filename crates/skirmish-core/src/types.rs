//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position in world space (world units, Cartesian).
/// x = right, y = up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D velocity in world space (units/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_vec(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_vec(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    /// Straight-line distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.to_vec().distance(other.to_vec())
    }

    /// Unit vector toward `other`, or zero when the points coincide.
    pub fn direction_to(&self, other: &Position) -> DVec2 {
        (other.to_vec() - self.to_vec()).normalize_or_zero()
    }

    /// Point `distance` units along `direction` from this position.
    pub fn offset(&self, direction: DVec2, distance: f64) -> Position {
        Position::from_vec(self.to_vec() + direction * distance)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn to_vec(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_vec(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    /// Speed magnitude (units/s).
    pub fn speed(&self) -> f64 {
        self.to_vec().length()
    }

    pub fn speed_squared(&self) -> f64 {
        self.to_vec().length_squared()
    }
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// Whole ticks covering `secs` at the fixed tick rate (rounded to nearest).
pub fn secs_to_ticks(secs: f64) -> u64 {
    (secs.max(0.0) * crate::constants::TICK_RATE as f64).round() as u64
}

/// Facing angle (radians) for a sprite whose "up" axis should point along
/// `direction`. Sprites are authored facing +y, hence the quarter-turn offset.
pub fn facing_toward(direction: DVec2) -> f64 {
    direction.y.atan2(direction.x) - std::f64::consts::FRAC_PI_2
}

/// Unit "up" vector of a sprite rotated by `facing` radians.
pub fn forward_from_facing(facing: f64) -> DVec2 {
    DVec2::new(-facing.sin(), facing.cos())
}

/// Wrap an angle into (-PI, PI].
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(std::f64::consts::TAU);
    if wrapped > std::f64::consts::PI {
        wrapped - std::f64::consts::TAU
    } else {
        wrapped
    }
}
