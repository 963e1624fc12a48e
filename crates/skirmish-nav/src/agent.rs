//! NavAgent: per-entity path following on a walkable surface.
//!
//! A destination change marks the path pending; the next `steer` call plans
//! the route and starts producing velocity along it. While `stopped` the agent
//! keeps its path but produces no velocity.

use std::collections::VecDeque;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use skirmish_core::types::Position;

use crate::provider::NavigationProvider;

/// Distance at which an intermediate corner counts as reached.
const CORNER_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavAgent {
    /// Travel speed in world units per second.
    pub speed: f64,
    /// When set the agent holds position but keeps its destination.
    pub stopped: bool,
    destination: Option<Position>,
    path: VecDeque<Position>,
    path_pending: bool,
    remaining_distance: f64,
    velocity: DVec2,
}

impl NavAgent {
    pub fn new(speed: f64) -> Self {
        Self {
            speed,
            ..Default::default()
        }
    }

    /// Request a route to `destination`. Re-requesting the current
    /// destination leaves the existing path alone.
    pub fn set_destination(&mut self, destination: Position) {
        if self.destination == Some(destination) {
            return;
        }
        self.destination = Some(destination);
        self.path_pending = true;
    }

    pub fn destination(&self) -> Option<Position> {
        self.destination
    }

    /// True between a destination change and the next planning step.
    pub fn path_pending(&self) -> bool {
        self.path_pending
    }

    /// Distance left along the current path. Zero with no path.
    pub fn remaining_distance(&self) -> f64 {
        self.remaining_distance
    }

    /// Velocity produced by the last `steer` call.
    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn has_arrived(&self, threshold: f64) -> bool {
        !self.path_pending && self.remaining_distance <= threshold
    }

    /// Plan if needed, then return the velocity that moves the agent along
    /// its path for one step of `dt` seconds without overshooting corners.
    pub fn steer<N: NavigationProvider + ?Sized>(
        &mut self,
        nav: &N,
        position: &Position,
        dt: f64,
    ) -> DVec2 {
        if self.path_pending {
            self.plan(nav, position);
        }

        while let Some(corner) = self.path.front() {
            if self.path.len() > 1 && corner.distance_to(position) <= CORNER_TOLERANCE {
                self.path.pop_front();
            } else {
                break;
            }
        }

        self.remaining_distance = self.measure_remaining(position);

        self.velocity = match (self.stopped, self.path.front()) {
            (false, Some(corner)) if dt > 0.0 => {
                let offset = corner.to_vec() - position.to_vec();
                let dist = offset.length();
                if dist <= f64::EPSILON {
                    DVec2::ZERO
                } else {
                    let speed = self.speed.min(dist / dt);
                    offset / dist * speed
                }
            }
            _ => DVec2::ZERO,
        };
        self.velocity
    }

    fn plan<N: NavigationProvider + ?Sized>(&mut self, nav: &N, position: &Position) {
        self.path_pending = false;
        self.path.clear();
        let Some(destination) = self.destination else {
            return;
        };
        match nav.find_path(position, &destination) {
            Some(corners) => self.path.extend(corners),
            None => {
                log::debug!(
                    "no route from ({:.1}, {:.1}) to ({:.1}, {:.1})",
                    position.x,
                    position.y,
                    destination.x,
                    destination.y
                );
            }
        }
    }

    fn measure_remaining(&self, position: &Position) -> f64 {
        let mut total = 0.0;
        let mut last = *position;
        for corner in &self.path {
            total += last.distance_to(corner);
            last = *corner;
        }
        total
    }
}
