//! NavGrid: walkable-surface grid with cell queries and A* paths.

use pathfinding::prelude::astar;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use skirmish_core::types::Position;

use crate::layers::LayerMask;

/// Cost of a straight step between neighbouring cells.
const STRAIGHT_COST: u32 = 10;
/// Cost of a diagonal step (≈ 10·√2).
const DIAGONAL_COST: u32 = 14;

/// What occupies a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    /// Walkable floor.
    Open,
    /// Solid wall: blocks movement, sight, and projectiles.
    Wall,
    /// Water: blocks movement only.
    Water,
}

impl CellKind {
    pub fn is_walkable(self) -> bool {
        self == CellKind::Open
    }

    /// Layer this cell occupies for visibility and collision queries.
    pub fn layer(self) -> LayerMask {
        match self {
            CellKind::Open => LayerMask::NONE,
            CellKind::Wall => LayerMask::ENVIRONMENT,
            CellKind::Water => LayerMask::WATER,
        }
    }

    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' | ' ' => Some(CellKind::Open),
            '#' => Some(CellKind::Wall),
            '~' => Some(CellKind::Water),
            _ => None,
        }
    }
}

/// Grid placement metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavGridHeader {
    /// World position of the bottom-left corner of the grid.
    pub origin: Position,
    /// Side length of one cell in world units.
    pub cell_size: f64,
    /// Number of columns (left to right).
    pub width: u32,
    /// Number of rows (top to bottom).
    pub height: u32,
}

impl NavGridHeader {
    /// World y of the top edge.
    pub fn top(&self) -> f64 {
        self.origin.y + self.height as f64 * self.cell_size
    }

    /// World x of the right edge.
    pub fn right(&self) -> f64 {
        self.origin.x + self.width as f64 * self.cell_size
    }
}

/// Errors while building a grid from a text layout.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("layout has no rows")]
    Empty,
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("unknown cell glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
    #[error("cell size must be positive, got {0}")]
    BadCellSize(f64),
}

/// Integer cell coordinate: (column, row), row 0 is the top edge.
pub type Cell = (i32, i32);

/// Walkability grid, row-major (top-to-bottom, left-to-right).
#[derive(Debug, Clone)]
pub struct NavGrid {
    pub header: NavGridHeader,
    cells: Vec<CellKind>,
}

impl NavGrid {
    /// Create a grid from pre-built cell data.
    pub fn new(header: NavGridHeader, cells: Vec<CellKind>) -> Self {
        debug_assert_eq!(cells.len(), (header.width * header.height) as usize);
        Self { header, cells }
    }

    /// An all-open grid, handy for arenas and tests.
    pub fn open(origin: Position, cell_size: f64, width: u32, height: u32) -> Self {
        let header = NavGridHeader {
            origin,
            cell_size,
            width,
            height,
        };
        Self::new(header, vec![CellKind::Open; (width * height) as usize])
    }

    /// Parse a text layout. `.` is floor, `#` is wall, `~` is water.
    /// The first row is the top edge of the map.
    pub fn from_rows<S: AsRef<str>>(
        origin: Position,
        cell_size: f64,
        rows: &[S],
    ) -> Result<Self, GridError> {
        if cell_size <= 0.0 || !cell_size.is_finite() {
            return Err(GridError::BadCellSize(cell_size));
        }
        let first = rows.first().ok_or(GridError::Empty)?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(GridError::RaggedRow {
                    row,
                    found,
                    expected: width,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                let kind =
                    CellKind::from_glyph(glyph).ok_or(GridError::UnknownGlyph { glyph, row, col })?;
                cells.push(kind);
            }
        }

        Ok(Self::new(
            NavGridHeader {
                origin,
                cell_size,
                width: width as u32,
                height: rows.len() as u32,
            },
            cells,
        ))
    }

    /// Cell containing a world position, or None outside the grid.
    pub fn cell_of(&self, pos: &Position) -> Option<Cell> {
        let h = &self.header;
        let col = ((pos.x - h.origin.x) / h.cell_size).floor();
        let row = ((h.top() - pos.y) / h.cell_size).floor();
        if col < 0.0 || row < 0.0 || col >= h.width as f64 || row >= h.height as f64 {
            return None;
        }
        Some((col as i32, row as i32))
    }

    /// World position of a cell's center.
    pub fn cell_center(&self, cell: Cell) -> Position {
        let h = &self.header;
        Position::new(
            h.origin.x + (cell.0 as f64 + 0.5) * h.cell_size,
            h.top() - (cell.1 as f64 + 0.5) * h.cell_size,
        )
    }

    /// Cell kind at integer coordinates; None outside the grid.
    pub fn kind(&self, cell: Cell) -> Option<CellKind> {
        let (col, row) = cell;
        if col < 0 || row < 0 || col >= self.header.width as i32 || row >= self.header.height as i32
        {
            return None;
        }
        self.cells
            .get(row as usize * self.header.width as usize + col as usize)
            .copied()
    }

    /// Cell kind at a world position; None outside the grid.
    pub fn kind_at(&self, pos: &Position) -> Option<CellKind> {
        self.cell_of(pos).and_then(|c| self.kind(c))
    }

    /// Whether an agent may stand at this position.
    pub fn is_walkable(&self, pos: &Position) -> bool {
        self.kind_at(pos).is_some_and(CellKind::is_walkable)
    }

    /// Whether something on `mask` occupies this position.
    /// Everything outside the grid counts as a wall.
    pub fn blocks(&self, pos: &Position, mask: LayerMask) -> bool {
        match self.kind_at(pos) {
            Some(kind) => kind.layer().intersects(mask),
            None => mask.intersects(LayerMask::ENVIRONMENT),
        }
    }

    fn cell_walkable(&self, cell: Cell) -> bool {
        self.kind(cell).is_some_and(CellKind::is_walkable)
    }

    /// Nearest walkable point to `point` within `max_distance`.
    ///
    /// The point itself is returned when it is already walkable; otherwise the
    /// closest walkable cell center within range.
    pub fn nearest_walkable(&self, point: &Position, max_distance: f64) -> Option<Position> {
        if self.is_walkable(point) {
            return Some(*point);
        }

        let h = &self.header;
        let reach = (max_distance / h.cell_size).ceil() as i32 + 1;
        let col_c = ((point.x - h.origin.x) / h.cell_size).floor() as i32;
        let row_c = ((h.top() - point.y) / h.cell_size).floor() as i32;

        let mut best: Option<(f64, Position)> = None;
        for row in (row_c - reach)..=(row_c + reach) {
            for col in (col_c - reach)..=(col_c + reach) {
                if !self.cell_walkable((col, row)) {
                    continue;
                }
                let center = self.cell_center((col, row));
                let d = center.distance_to(point);
                if d <= max_distance && best.map_or(true, |(bd, _)| d < bd) {
                    best = Some((d, center));
                }
            }
        }
        best.map(|(_, p)| p)
    }

    /// Walkable neighbours of a cell. Diagonals are only allowed when both
    /// adjacent orthogonal cells are walkable, so paths never clip corners.
    fn successors(&self, cell: Cell) -> Vec<(Cell, u32)> {
        let (c, r) = cell;
        let mut out = Vec::with_capacity(8);
        for (dc, dr) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let next = (c + dc, r + dr);
            if self.cell_walkable(next) {
                out.push((next, STRAIGHT_COST));
            }
        }
        for (dc, dr) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
            let next = (c + dc, r + dr);
            if self.cell_walkable(next)
                && self.cell_walkable((c + dc, r))
                && self.cell_walkable((c, r + dr))
            {
                out.push((next, DIAGONAL_COST));
            }
        }
        out
    }

    /// A* path between two world positions as a list of corners, ending at
    /// `to`. Returns None when either end is off the walkable surface or no
    /// route exists.
    pub fn find_path(&self, from: &Position, to: &Position) -> Option<Vec<Position>> {
        let start = self.cell_of(from)?;
        let goal = self.cell_of(to)?;
        if !self.cell_walkable(goal) {
            return None;
        }
        if start == goal {
            return Some(vec![*to]);
        }

        let (cells, _cost) = astar(
            &start,
            |&cell| self.successors(cell),
            |&(c, r)| octile(c - goal.0, r - goal.1),
            |&cell| cell == goal,
        )?;

        // Skip the start cell; replace the goal cell center with the exact target.
        let mut corners: Vec<Position> = cells
            .iter()
            .skip(1)
            .take(cells.len().saturating_sub(2))
            .map(|&c| self.cell_center(c))
            .collect();
        corners.push(*to);
        Some(corners)
    }
}

/// Octile distance heuristic in path-cost units.
fn octile(dx: i32, dy: i32) -> u32 {
    let (dx, dy) = (dx.unsigned_abs(), dy.unsigned_abs());
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    DIAGONAL_COST * lo + STRAIGHT_COST * (hi - lo)
}
