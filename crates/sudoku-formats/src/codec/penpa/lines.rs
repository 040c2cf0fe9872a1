//! Line sets drawn on a penpa board: cage outlines, diagonals and box borders.
//!
//! Each function returns segments keyed the way penpa stores them, as
//! `"from,to"` index pairs mapped to a line style.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::codec::penpa::index::{Corner, IndexSpace};
use crate::error::GridError;
use crate::limits::{PENPA_BOX_STYLE, PENPA_CAGE_STYLE, PENPA_DIAGONAL_STYLE};
use crate::model::CellPosition;
use crate::util::geometry::block_dimensions;

/// Segment map in penpa's `lineE`/`cage` shape.
pub type LineMap = BTreeMap<String, i64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Side {
    Up,
    Right,
    Down,
    Left,
}

impl Side {
    const ALL: [Side; 4] = [Side::Up, Side::Right, Side::Down, Side::Left];

    fn neighbour(self, (row, col): (i64, i64)) -> (i64, i64) {
        match self {
            Side::Up => (row - 1, col),
            Side::Right => (row, col + 1),
            Side::Down => (row + 1, col),
            Side::Left => (row, col - 1),
        }
    }

    /// Corners a boundary edge on this side runs between.
    fn corners(self) -> (Corner, Corner) {
        match self {
            Side::Up => (Corner::TopLeft, Corner::TopRight),
            Side::Right => (Corner::TopRight, Corner::BottomRight),
            Side::Down => (Corner::BottomLeft, Corner::BottomRight),
            Side::Left => (Corner::TopLeft, Corner::BottomLeft),
        }
    }

    /// The cell whose edge on this side a run continues from.
    fn run_predecessor(self, (row, col): (i64, i64)) -> (i64, i64) {
        match self {
            Side::Up | Side::Down => (row, col - 1),
            Side::Right | Side::Left => (row - 1, col),
        }
    }
}

fn segment_key(from: i64, to: i64) -> String {
    format!("{from},{to}")
}

/// Traces the outline of a cage as corner-index segments.
///
/// Every side of a cell whose neighbour lies outside the cage is a boundary
/// edge. Boundary edges on the same side of a straight run of cells are
/// joined into one segment running from the first cell's start corner to the
/// last cell's end corner. Cells are visited in row-major order, so each edge
/// either opens a segment or extends the one its predecessor opened.
pub fn cage_outline(space: &IndexSpace, region: &[CellPosition]) -> LineMap {
    let cells: FxHashSet<(i64, i64)> = region
        .iter()
        .map(|cell| (cell.row as i64, cell.col as i64))
        .collect();
    let mut ordered: Vec<(i64, i64)> = cells.iter().copied().collect();
    ordered.sort_unstable();

    let mut segments: Vec<(i64, i64)> = Vec::new();
    let mut open: FxHashMap<((i64, i64), Side), usize> = FxHashMap::default();

    for &cell in &ordered {
        for side in Side::ALL {
            if cells.contains(&side.neighbour(cell)) {
                continue;
            }
            let (start, end) = side.corners();
            let end_index = space.cell_corner_index(cell.0, cell.1, end);
            let segment = match open.get(&(side.run_predecessor(cell), side)) {
                Some(&segment) => {
                    segments[segment].1 = end_index;
                    segment
                }
                None => {
                    segments.push((space.cell_corner_index(cell.0, cell.1, start), end_index));
                    segments.len() - 1
                }
            };
            open.insert((cell, side), segment);
        }
    }

    segments
        .into_iter()
        .map(|(from, to)| (segment_key(from, to), PENPA_CAGE_STYLE))
        .collect()
}

/// Main diagonal, top-left to bottom-right, one segment per cell.
pub fn primary_diagonal(space: &IndexSpace, grid_size: usize) -> LineMap {
    let n = grid_size as i64;
    (1..=n)
        .map(|k| {
            let key = segment_key(space.vertex_index(k - 1, k - 1), space.vertex_index(k, k));
            (key, PENPA_DIAGONAL_STYLE)
        })
        .collect()
}

/// Anti-diagonal, drawn from bottom-left to top-right, one segment per cell.
pub fn secondary_diagonal(space: &IndexSpace, grid_size: usize) -> LineMap {
    let n = grid_size as i64;
    (1..=n)
        .map(|k| {
            let key = segment_key(
                space.vertex_index(k, n - k),
                space.vertex_index(k - 1, n + 1 - k),
            );
            (key, PENPA_DIAGONAL_STYLE)
        })
        .collect()
}

/// Unit segments along every internal block boundary.
pub fn box_borders(space: &IndexSpace, grid_size: usize) -> Result<LineMap, GridError> {
    let (height, width) = block_dimensions(grid_size)?;
    let n = grid_size as i64;
    let mut lines = LineMap::new();

    for col in (width..grid_size).step_by(width).map(|c| c as i64) {
        for row in 0..n {
            let key = segment_key(space.vertex_index(row, col), space.vertex_index(row + 1, col));
            lines.insert(key, PENPA_BOX_STYLE);
        }
    }
    for row in (height..grid_size).step_by(height).map(|r| r as i64) {
        for col in 0..n {
            let key = segment_key(space.vertex_index(row, col), space.vertex_index(row, col + 1));
            lines.insert(key, PENPA_BOX_STYLE);
        }
    }
    Ok(lines)
}
