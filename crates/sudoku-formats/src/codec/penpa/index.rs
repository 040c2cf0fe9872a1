//! Penpa index space.
//!
//! Penpa addresses everything on its canvas with a single integer. The board
//! is padded by a 2-cell border on every side plus the margin described by
//! the `space` vector `[top, bottom, left, right]`. On top of the cell plane,
//! further planes of the same size hold vertices, dots and cell corners.
//!
//! Coordinates here are signed: decoded indices can land outside the grid and
//! it's the caller's job to reject them. Board sides and margins are capped at
//! [`PENPA_MAX_SIDE`], which keeps the inverse mappings in range for any `i64`
//! key.

use crate::error::GridError;
use crate::limits::PENPA_MAX_SIDE;
use crate::model::{CellPosition, PenpaConstraints};
use crate::util::geometry::ensure_grid_size;

/// A corner of a cell, in penpa's numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    fn from_offset(offset: i64) -> Corner {
        match offset {
            0 => Corner::TopLeft,
            1 => Corner::TopRight,
            2 => Corner::BottomLeft,
            _ => Corner::BottomRight,
        }
    }
}

/// Band of the dot plane used for vertically adjacent cells.
const VERTICAL_DOT_BAND: i64 = 2;

/// Band of the dot plane used for horizontally adjacent cells.
const HORIZONTAL_DOT_BAND: i64 = 3;

/// Penpa board geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpace {
    row_count: i64,
    col_count: i64,
    space: [i64; 4],
}

impl IndexSpace {
    /// A board of `row_count` by `col_count` cells, margins included.
    ///
    /// Returns `None` when a side or margin is negative or exceeds
    /// [`PENPA_MAX_SIDE`].
    pub fn new(row_count: i64, col_count: i64, space: [i64; 4]) -> Option<Self> {
        let bounded = |value: i64| (0..=PENPA_MAX_SIDE).contains(&value);
        (bounded(row_count) && bounded(col_count) && space.into_iter().all(bounded)).then_some(Self {
            row_count,
            col_count,
            space,
        })
    }

    /// A square board with no margins.
    pub fn square(grid_size: usize) -> Result<Self, GridError> {
        let size = ensure_grid_size(grid_size)? as i64;
        Ok(Self {
            row_count: size,
            col_count: size,
            space: [0; 4],
        })
    }

    /// The geometry a decoded puzzle was written with.
    pub fn of(puzzle: &PenpaConstraints) -> Option<Self> {
        Self::new(puzzle.row_count, puzzle.col_count, puzzle.space)
    }

    /// Margin rows above and below the grid.
    pub fn margin_rows(&self) -> i64 {
        self.space[0] + self.space[1]
    }

    /// Margin columns left and right of the grid.
    pub fn margin_cols(&self) -> i64 {
        self.space[2] + self.space[3]
    }

    fn stride(&self) -> i64 {
        self.col_count + 4
    }

    /// Number of indices in one plane.
    pub fn plane(&self) -> i64 {
        (self.row_count + 4) * (self.col_count + 4)
    }

    pub fn cell_to_index(&self, row: i64, col: i64) -> i64 {
        (row + 2 + self.space[0]) * self.stride() + col + 2 + self.space[2]
    }

    /// Inverse of [`IndexSpace::cell_to_index`].
    pub fn index_to_cell(&self, index: i64) -> (i64, i64) {
        (
            index.div_euclid(self.stride()) - 2 - self.space[0],
            index.rem_euclid(self.stride()) - 2 - self.space[2],
        )
    }

    pub fn position_index(&self, cell: CellPosition) -> i64 {
        self.cell_to_index(cell.row as i64, cell.col as i64)
    }

    pub fn cell_corner_index(&self, row: i64, col: i64, corner: Corner) -> i64 {
        4 * (self.cell_to_index(row, col) + self.plane()) + corner as i64
    }

    /// Inverse of [`IndexSpace::cell_corner_index`].
    pub fn corner_index_to_cell(&self, index: i64) -> ((i64, i64), Corner) {
        let cell = self.index_to_cell(index.div_euclid(4) - self.plane());
        (cell, Corner::from_offset(index.rem_euclid(4)))
    }

    /// Index of a dot between two edge-adjacent cells.
    ///
    /// The dot is addressed by the smaller cell in (row, col) order.
    pub fn kropki_dot_index(&self, a: (i64, i64), b: (i64, i64)) -> i64 {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        let band = if first.0 == second.0 {
            HORIZONTAL_DOT_BAND
        } else {
            VERTICAL_DOT_BAND
        };
        band * self.plane() + self.cell_to_index(first.0, first.1)
    }

    /// Inverse of [`IndexSpace::kropki_dot_index`], smaller cell first.
    ///
    /// `None` when the index sits below the dot planes far enough that the
    /// shift out of its band overflows.
    pub fn kropki_dot_cells(&self, index: i64) -> Option<((i64, i64), (i64, i64))> {
        let horizontal_start = HORIZONTAL_DOT_BAND * self.plane() + self.cell_to_index(0, 0);
        if index >= horizontal_start {
            let (row, col) = self.index_to_cell(index - HORIZONTAL_DOT_BAND * self.plane());
            Some(((row, col), (row, col + 1)))
        } else {
            let shifted = index.checked_sub(VERTICAL_DOT_BAND * self.plane())?;
            let (row, col) = self.index_to_cell(shifted);
            Some(((row, col), (row + 1, col)))
        }
    }

    /// Index of the grid vertex at the top-left of cell `(row, col)`.
    ///
    /// `row` and `col` range over `0..=n`, so the bottom and right edges of the
    /// grid are addressable too.
    pub fn vertex_index(&self, row: i64, col: i64) -> i64 {
        self.cell_to_index(row, col) - self.stride() - 1 + self.plane()
    }
}
