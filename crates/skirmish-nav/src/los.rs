//! Line-of-sight and ray queries against the nav grid.
//!
//! Uses stepped ray traversal: the segment is sampled at a fraction of the
//! cell size and each sample is checked against the requested layers.

use skirmish_core::types::Position;

use crate::grid::NavGrid;
use crate::layers::LayerMask;

/// Samples per cell along a ray.
const SAMPLES_PER_CELL: f64 = 4.0;

/// Walk a ray from `from` along `to - from` and return the first sampled
/// point that lands on a blocking layer, if any. The endpoints themselves
/// are not tested.
pub fn first_blocking_point(
    grid: &NavGrid,
    from: &Position,
    to: &Position,
    mask: LayerMask,
) -> Option<Position> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let dist = (dx * dx + dy * dy).sqrt();
    let step = grid.header.cell_size / SAMPLES_PER_CELL;

    if dist < step {
        return None;
    }

    let num_samples = ((dist / step).ceil() as usize).max(2);
    for i in 1..num_samples {
        let t = i as f64 / num_samples as f64;
        let sample = Position::new(from.x + dx * t, from.y + dy * t);
        if grid.blocks(&sample, mask) {
            return Some(sample);
        }
    }
    None
}

/// Check line of sight between two points within `max_distance`.
///
/// Returns false if the points are farther apart than `max_distance` or if
/// anything on `mask` lies between them.
pub fn has_line_of_sight(
    grid: &NavGrid,
    from: &Position,
    to: &Position,
    max_distance: f64,
    mask: LayerMask,
) -> bool {
    if from.distance_to(to) > max_distance {
        return false;
    }
    first_blocking_point(grid, from, to, mask).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_flat_grid() -> NavGrid {
        NavGrid::open(Position::new(-50.0, -50.0), 1.0, 100, 100)
    }

    /// Open field with a vertical wall at x ∈ [0, 1), y ∈ [-10, 10) and a pond.
    fn make_wall_grid() -> NavGrid {
        let mut rows = vec![".".repeat(40); 40];
        // Grid spans x,y ∈ [-20, 20); column 20 is x ∈ [0, 1).
        for row in rows.iter_mut().take(30).skip(10) {
            row.replace_range(20..21, "#");
        }
        rows[5].replace_range(10..15, "~~~~~");
        NavGrid::from_rows(Position::new(-20.0, -20.0), 1.0, &rows).unwrap()
    }

    #[test]
    fn test_flat_clear_los() {
        let grid = make_flat_grid();
        let a = Position::new(-30.0, 0.0);
        let b = Position::new(30.0, 10.0);
        assert!(has_line_of_sight(&grid, &a, &b, 100.0, LayerMask::ENVIRONMENT));
    }

    #[test]
    fn test_wall_blocks_los() {
        let grid = make_wall_grid();
        let a = Position::new(-10.0, 0.0);
        let b = Position::new(10.0, 0.0);
        assert!(!has_line_of_sight(&grid, &a, &b, 100.0, LayerMask::ENVIRONMENT));

        let hit = first_blocking_point(&grid, &a, &b, LayerMask::ENVIRONMENT).unwrap();
        assert!(
            (0.0..1.0).contains(&hit.x),
            "hit should be inside the wall, got {hit:?}"
        );
    }

    #[test]
    fn test_los_over_wall_end() {
        let grid = make_wall_grid();
        // Row 0 is y ∈ [19, 20); the wall only covers y ∈ [-10, 10).
        let a = Position::new(-10.0, 17.0);
        let b = Position::new(10.0, 17.0);
        assert!(has_line_of_sight(&grid, &a, &b, 100.0, LayerMask::ENVIRONMENT));
    }

    #[test]
    fn test_water_is_transparent_to_environment_mask() {
        let grid = make_wall_grid();
        // rows[5] spans y ∈ [14, 15), columns 10..15 span x ∈ [-10, -5).
        let a = Position::new(-12.0, 14.5);
        let b = Position::new(-3.0, 14.5);
        assert!(has_line_of_sight(&grid, &a, &b, 100.0, LayerMask::ENVIRONMENT));
        assert!(!has_line_of_sight(&grid, &a, &b, 100.0, LayerMask::WATER));
    }

    #[test]
    fn test_range_limit() {
        let grid = make_flat_grid();
        let a = Position::new(0.0, 0.0);
        let b = Position::new(10.0, 0.0);
        assert!(has_line_of_sight(&grid, &a, &b, 10.0, LayerMask::ENVIRONMENT));
        assert!(!has_line_of_sight(&grid, &a, &b, 9.99, LayerMask::ENVIRONMENT));
    }

    #[test]
    fn test_short_ray_always_clear() {
        let grid = make_wall_grid();
        let a = Position::new(-0.1, 0.0);
        let b = Position::new(-0.05, 0.0);
        assert!(first_blocking_point(&grid, &a, &b, LayerMask::ALL).is_none());
    }
}
