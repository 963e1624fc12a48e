//! Query seams between the AI and the level geometry.
//!
//! Systems only talk to the level through these traits so the behavior code
//! can be driven by any walkable-surface representation.

use skirmish_core::types::Position;

use crate::grid::NavGrid;
use crate::layers::LayerMask;
use crate::los;

/// Walkable-surface queries: sampling and path planning.
pub trait NavigationProvider {
    /// Nearest point on the walkable surface to `point`, searching no
    /// farther than `max_distance`.
    fn sample_position(&self, point: &Position, max_distance: f64) -> Option<Position>;

    /// Corner list from `from` to `to`, ending at `to`. None when unreachable.
    fn find_path(&self, from: &Position, to: &Position) -> Option<Vec<Position>>;
}

/// Straight-line visibility and ray queries.
pub trait VisibilityOracle {
    /// Whether the segment `from`→`to` is within `max_distance` and free of
    /// anything on `mask`.
    fn is_unobstructed(
        &self,
        from: &Position,
        to: &Position,
        max_distance: f64,
        mask: LayerMask,
    ) -> bool;

    /// Whether a point itself sits inside something on `mask`.
    fn is_blocked(&self, point: &Position, mask: LayerMask) -> bool;
}

impl NavigationProvider for NavGrid {
    fn sample_position(&self, point: &Position, max_distance: f64) -> Option<Position> {
        self.nearest_walkable(point, max_distance)
    }

    fn find_path(&self, from: &Position, to: &Position) -> Option<Vec<Position>> {
        NavGrid::find_path(self, from, to)
    }
}

impl VisibilityOracle for NavGrid {
    fn is_unobstructed(
        &self,
        from: &Position,
        to: &Position,
        max_distance: f64,
        mask: LayerMask,
    ) -> bool {
        los::has_line_of_sight(self, from, to, max_distance, mask)
    }

    fn is_blocked(&self, point: &Position, mask: LayerMask) -> bool {
        self.blocks(point, mask)
    }
}
