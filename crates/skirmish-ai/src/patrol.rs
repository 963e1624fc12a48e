//! Patrol route: waypoint list, wrap-around cursor, and the cancellable
//! deferred advance used while an agent idles at a waypoint.

use rand::Rng;
use serde::{Deserialize, Serialize};

use skirmish_core::types::Position;
use skirmish_nav::NavigationProvider;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatrolRoute {
    waypoints: Vec<Position>,
    next_index: usize,
    /// Seconds until the pending advance fires. None when not waiting.
    wait_remaining: Option<f64>,
}

impl PatrolRoute {
    pub fn from_waypoints(waypoints: Vec<Position>) -> Self {
        Self {
            waypoints,
            ..Default::default()
        }
    }

    /// Sample `count` waypoints around `origin`. Each sample is a uniform
    /// point in the disc of `radius`, snapped to the nearest walkable point
    /// within `radius`; failed samples fall back to `origin`.
    pub fn generate<N, R>(origin: Position, radius: f64, count: usize, nav: &N, rng: &mut R) -> Self
    where
        N: NavigationProvider + ?Sized,
        R: Rng + ?Sized,
    {
        let waypoints = (0..count)
            .map(|_| {
                let candidate = origin.offset(random_in_unit_disc(rng), radius);
                nav.sample_position(&candidate, radius).unwrap_or(origin)
            })
            .collect();
        Self::from_waypoints(waypoints)
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoints(&self) -> &[Position] {
        &self.waypoints
    }

    /// Index of the waypoint the next advance will head for.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn is_waiting(&self) -> bool {
        self.wait_remaining.is_some()
    }

    /// Clear any pending wait and return the waypoint to head for, moving
    /// the cursor on (wrapping). None when the route is empty.
    pub fn advance(&mut self) -> Option<Position> {
        self.wait_remaining = None;
        let target = *self.waypoints.get(self.next_index)?;
        self.next_index = (self.next_index + 1) % self.waypoints.len();
        Some(target)
    }

    /// Schedule an advance after a uniform wait drawn from `range`.
    pub fn begin_wait<R: Rng + ?Sized>(&mut self, range: (f64, f64), rng: &mut R) {
        let (lo, hi) = range;
        let secs = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
        self.wait_remaining = Some(secs.max(0.0));
    }

    /// Drop the pending advance; it will never fire.
    pub fn cancel_wait(&mut self) {
        self.wait_remaining = None;
    }

    /// Count down the pending wait. Returns the new destination when the
    /// wait expires this step.
    pub fn tick_wait(&mut self, dt: f64) -> Option<Position> {
        let remaining = self.wait_remaining.as_mut()?;
        *remaining -= dt;
        if *remaining <= 0.0 {
            self.advance()
        } else {
            None
        }
    }
}

/// Uniform point in the unit disc (rejection sampling).
fn random_in_unit_disc<R: Rng + ?Sized>(rng: &mut R) -> glam::DVec2 {
    loop {
        let p = glam::DVec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}
