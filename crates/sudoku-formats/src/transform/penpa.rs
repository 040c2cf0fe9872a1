//! penpa-edit ⇄ canonical.
//!
//! Penpa positions are indices in [`IndexSpace`]. A decoded board may carry
//! margins, so every index is mapped back through the board's own geometry
//! and anything landing outside the playable grid is dropped.

use crate::codec::penpa::index::{Corner, IndexSpace};
use crate::codec::penpa::lines::{box_borders, cage_outline, primary_diagonal, secondary_diagonal};
use crate::error::TransformError;
use crate::limits::{
    PENPA_CELL_SIZE, PENPA_CONSECUTIVE_CODE, PENPA_DOUBLE_CODE, PENPA_PARITY_CODE,
    PENPA_SYMBOL_LAYER,
};
use crate::model::constraints::{flag, non_empty};
use crate::model::penpa::{CornerNumber, NumberEntry, SymbolEntry};
use crate::model::{
    Arrow, CellPosition, Constraints, FixedNumber, KillerCage, KropkiDot, KropkiDotType,
    PenpaConstraints, PuzzleFormat,
};
use crate::transform::{Converted, Ignored};
use crate::util::geometry::ensure_grid_size;

const ODD_SHAPE: &str = "circle_L";
const EVEN_SHAPE: &str = "square_L";
const KROPKI_SHAPE: &str = "circle_SS";

/// Symbol codes penpa uses for a white dot.
const WHITE_DOT_CODES: [i64; 2] = [1, PENPA_CONSECUTIVE_CODE];

/// Maps board indices to grid cells, rejecting anything off the grid.
struct Board {
    space: IndexSpace,
    grid_size: i64,
}

impl Board {
    fn cell(&self, (row, col): (i64, i64)) -> Option<CellPosition> {
        let range = 0..self.grid_size;
        (range.contains(&row) && range.contains(&col))
            .then(|| CellPosition::new(row as usize, col as usize))
    }

    fn cell_at(&self, index: i64) -> Option<CellPosition> {
        self.cell(self.space.index_to_cell(index))
    }

    fn dot_at(&self, index: i64) -> Option<(CellPosition, CellPosition)> {
        let (a, b) = self.space.kropki_dot_cells(index)?;
        self.cell(a).zip(self.cell(b))
    }

    fn cells_at(&self, indices: &[i64]) -> Option<Vec<CellPosition>> {
        indices.iter().map(|&index| self.cell_at(index)).collect()
    }
}

// =============================================================================
// penpa → canonical
// =============================================================================

pub fn to_canonical(puzzle: &PenpaConstraints) -> Result<Converted<Constraints>, TransformError> {
    let invalid_board = || TransformError::InvalidBoard {
        row_count: puzzle.row_count,
        col_count: puzzle.col_count,
        space: puzzle.space,
    };
    let (rows, cols) = puzzle.grid_dimensions().ok_or_else(invalid_board)?;
    if rows != cols {
        return Err(TransformError::GridNotSquare { rows, cols });
    }
    let grid_size = ensure_grid_size(usize::try_from(rows).unwrap_or(0))?;
    let board = Board {
        space: IndexSpace::of(puzzle).ok_or_else(invalid_board)?,
        grid_size: rows,
    };
    let mut ignored = Ignored::default();

    let mut fixed_numbers = Vec::new();
    for (&index, NumberEntry(text, _, _)) in &puzzle.number {
        // Pencil marks and letters aren't givens.
        let Ok(value) = text.trim().parse::<i64>() else {
            continue;
        };
        let (row, col) = board.space.index_to_cell(index);
        match board.cell((row, col)) {
            Some(position) if (1..=rows).contains(&value) => fixed_numbers.push(FixedNumber {
                position,
                value: value as u32,
            }),
            _ => return Err(TransformError::ConstraintsOutOfRange { row, col, value }),
        }
    }

    let mut thermos = Vec::new();
    for thermo in puzzle.thermo.iter().filter(|thermo| thermo.len() >= 2) {
        match board.cells_at(thermo) {
            Some(cells) => thermos.push(cells),
            None => ignored.add("thermo"),
        }
    }

    let mut arrows = Vec::new();
    for arrow in &puzzle.arrows {
        match board.cells_at(arrow) {
            Some(cells) if cells.len() >= 2 => arrows.push(Arrow {
                circle_cells: vec![cells[0]],
                arrow_cells: cells[1..].to_vec(),
            }),
            _ => ignored.add("arrows"),
        }
    }

    let mut killer_cages = Vec::new();
    for cage in &puzzle.killercages {
        match board.cells_at(cage) {
            Some(region) if region.len() >= 2 => killer_cages.push(KillerCage {
                sum: cage_sum(puzzle, &board.space, &region),
                region,
            }),
            _ => ignored.add("killercages"),
        }
    }

    let mut odd_cells = Vec::new();
    let mut even_cells = Vec::new();
    let mut kropki_dots = Vec::new();
    for (&index, SymbolEntry(code, shape, _)) in &puzzle.symbol {
        let placed = match shape.as_str() {
            ODD_SHAPE => board.cell_at(index).map(|cell| odd_cells.push(cell)),
            EVEN_SHAPE => board.cell_at(index).map(|cell| even_cells.push(cell)),
            KROPKI_SHAPE => {
                board.dot_at(index).map(|(a, b)| {
                    let dot_type = if WHITE_DOT_CODES.contains(code) {
                        KropkiDotType::Consecutive
                    } else {
                        KropkiDotType::Double
                    };
                    kropki_dots.push(KropkiDot::new(dot_type, a, b));
                })
            }
            _ => None,
        };
        if placed.is_none() {
            ignored.add("symbol");
        }
    }

    for field in puzzle.unsupported.keys() {
        ignored.add(field);
    }

    let constraints = Constraints {
        fixed_numbers: Some(fixed_numbers),
        thermos: Some(thermos),
        arrows: Some(arrows),
        killer_cages: Some(killer_cages),
        kropki_dots: Some(kropki_dots),
        odd_cells: Some(odd_cells),
        even_cells: Some(even_cells),
        primary_diagonal: Some(puzzle.sudoku[0] != 0),
        secondary_diagonal: Some(puzzle.sudoku[3] != 0),
        ..Constraints::new(grid_size)
    };
    Ok(Converted::new(
        constraints.normalized(),
        ignored.into_warning(PuzzleFormat::Penpa),
    ))
}

/// The cage total, read from the first cage cell with a corner label.
fn cage_sum(puzzle: &PenpaConstraints, space: &IndexSpace, region: &[CellPosition]) -> Option<u32> {
    region
        .iter()
        .find_map(|cell| {
            let corner = space.cell_corner_index(cell.row as i64, cell.col as i64, Corner::TopLeft);
            puzzle.number_s.get(&corner)
        })
        .and_then(|CornerNumber(label, _)| label.trim().parse().ok())
}

// =============================================================================
// canonical → penpa
// =============================================================================

/// Rejects any cell that would map to an index outside the grid.
fn check_cells(c: &Constraints) -> Result<(), TransformError> {
    let grid_size = c.grid_size;
    let in_grid = |cell: &CellPosition| cell.row < grid_size && cell.col < grid_size;

    for fixed in c.fixed_numbers.iter().flatten() {
        if !in_grid(&fixed.position) || fixed.value == 0 || fixed.value as usize > grid_size {
            return Err(TransformError::ConstraintsOutOfRange {
                row: fixed.position.row as i64,
                col: fixed.position.col as i64,
                value: fixed.value.into(),
            });
        }
    }

    let groups = [&c.thermos, &c.extra_regions, &c.renbans, &c.palindromes, &c.regions];
    let cells = groups
        .into_iter()
        .flatten()
        .flatten()
        .flatten()
        .chain(c.arrows.iter().flatten().flat_map(|arrow| {
            arrow.circle_cells.iter().chain(&arrow.arrow_cells)
        }))
        .chain(c.killer_cages.iter().flatten().flat_map(|cage| &cage.region))
        .chain(c.kropki_dots.iter().flatten().flat_map(|dot| [&dot.cell1, &dot.cell2]))
        .chain(c.odd_cells.iter().flatten())
        .chain(c.even_cells.iter().flatten());
    for cell in cells {
        if !in_grid(cell) {
            return Err(TransformError::CellOutOfRange {
                row: cell.row,
                col: cell.col,
                grid_size,
            });
        }
    }
    Ok(())
}

pub fn from_canonical(
    constraints: &Constraints,
) -> Result<Converted<PenpaConstraints>, TransformError> {
    let c = constraints.normalized();
    let grid_size = ensure_grid_size(c.grid_size)?;
    check_cells(&c)?;
    let n = grid_size as i64;
    let space = IndexSpace::square(grid_size)?;
    let mut ignored = Ignored::default();
    ignored.add_if(c.has_irregular_regions(), "regions");
    ignored.add_if(non_empty(&c.extra_regions), "extraRegions");

    let mut puzzle = PenpaConstraints {
        row_count: n,
        col_count: n,
        cell_size: PENPA_CELL_SIZE,
        canvas_width: (n + 1) * PENPA_CELL_SIZE,
        canvas_height: (n + 1) * PENPA_CELL_SIZE,
        center_cell_index: space.cell_to_index(n / 2, n / 2),
        space: [0; 4],
        sudoku: [
            i64::from(flag(c.primary_diagonal)),
            0,
            0,
            i64::from(flag(c.secondary_diagonal)),
        ],
        ..Default::default()
    };

    let mut previous = 0;
    for row in 0..n {
        for col in 0..n {
            let index = space.cell_to_index(row, col);
            puzzle.centerlist.push(index - previous);
            previous = index;
        }
    }

    let indices = |cells: &[CellPosition]| -> Vec<i64> {
        cells.iter().map(|&cell| space.position_index(cell)).collect()
    };

    for fixed in c.fixed_numbers.iter().flatten() {
        puzzle.number.insert(
            space.position_index(fixed.position),
            NumberEntry(fixed.value.to_string(), 1, "1".to_string()),
        );
    }

    puzzle.thermo = c.thermos.iter().flatten().map(|thermo| indices(thermo)).collect();

    for arrow in c.arrows.iter().flatten() {
        let [circle] = arrow.circle_cells.as_slice() else {
            ignored.add("arrows");
            continue;
        };
        let mut path = vec![space.position_index(*circle)];
        path.extend(indices(&arrow.arrow_cells));
        puzzle.arrows.push(path);
    }

    for cage in c.killer_cages.iter().flatten() {
        if cage.region.len() < 2 {
            ignored.add("killerCages");
            continue;
        }
        puzzle.killercages.push(indices(&cage.region));
        puzzle.cage.extend(cage_outline(&space, &cage.region));
        if let Some(sum) = cage.sum {
            let first = cage.region[0];
            let corner = space.cell_corner_index(first.row as i64, first.col as i64, Corner::TopLeft);
            puzzle.number_s.insert(corner, CornerNumber(format!(" {sum}"), 1));
        }
    }

    for dot in c.kropki_dots.iter().flatten() {
        let to_pair = |cell: CellPosition| (cell.row as i64, cell.col as i64);
        let code = match dot.dot_type {
            KropkiDotType::Consecutive => PENPA_CONSECUTIVE_CODE,
            KropkiDotType::Double => PENPA_DOUBLE_CODE,
        };
        puzzle.symbol.insert(
            space.kropki_dot_index(to_pair(dot.cell1), to_pair(dot.cell2)),
            SymbolEntry(code, KROPKI_SHAPE.to_string(), PENPA_SYMBOL_LAYER),
        );
    }
    for (cells, shape) in [(&c.odd_cells, ODD_SHAPE), (&c.even_cells, EVEN_SHAPE)] {
        for &cell in cells.iter().flatten() {
            puzzle.symbol.insert(
                space.position_index(cell),
                SymbolEntry(PENPA_PARITY_CODE, shape.to_string(), PENPA_SYMBOL_LAYER),
            );
        }
    }

    puzzle.line_e = box_borders(&space, grid_size)?;
    if flag(c.primary_diagonal) {
        puzzle.line_e.extend(primary_diagonal(&space, grid_size));
    }
    if flag(c.secondary_diagonal) {
        puzzle.line_e.extend(secondary_diagonal(&space, grid_size));
    }

    ignored.add_if(non_empty(&c.renbans), "renbans");
    ignored.add_if(non_empty(&c.palindromes), "palindromes");
    ignored.add_if(flag(c.anti_knight), "antiKnight");
    ignored.add_if(flag(c.anti_king), "antiKing");
    ignored.add_if(flag(c.kropki_negative), "kropkiNegative");
    ignored.add_if(flag(c.top_bottom), "topBottom");

    Ok(Converted::new(puzzle, ignored.into_warning(PuzzleFormat::Penpa)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_puzzle(grid_size: i64) -> PenpaConstraints {
        PenpaConstraints {
            row_count: grid_size,
            col_count: grid_size,
            ..Default::default()
        }
    }

    #[test]
    fn test_grid_shape_errors() {
        let mut puzzle = square_puzzle(9);
        puzzle.space = [0, 0, 0, 1];
        assert_eq!(
            to_canonical(&puzzle).unwrap_err(),
            TransformError::GridNotSquare { rows: 9, cols: 8 }
        );
        assert!(matches!(
            to_canonical(&square_puzzle(5)),
            Err(TransformError::Grid(_))
        ));
    }

    #[test]
    fn test_unbounded_geometry_is_an_error() {
        let mut puzzle = square_puzzle(9);
        puzzle.space = [i64::MIN, 1, 0, 0];
        assert_eq!(
            to_canonical(&puzzle).unwrap_err(),
            TransformError::InvalidBoard {
                row_count: 9,
                col_count: 9,
                space: [i64::MIN, 1, 0, 0]
            }
        );
        assert!(matches!(
            to_canonical(&square_puzzle(i64::MAX)),
            Err(TransformError::InvalidBoard { .. })
        ));
    }

    #[test]
    fn test_extreme_symbol_keys_are_dropped() {
        let mut puzzle = square_puzzle(9);
        for index in [i64::MIN + 5, i64::MIN, i64::MAX] {
            puzzle
                .symbol
                .insert(index, SymbolEntry(1, KROPKI_SHAPE.to_string(), 2));
        }
        puzzle
            .symbol
            .insert(i64::MIN + 1, SymbolEntry(3, ODD_SHAPE.to_string(), 2));
        let converted = to_canonical(&puzzle).unwrap();
        assert_eq!(
            converted.warning.as_deref(),
            Some("Ignored some constraints: symbol")
        );
        assert_eq!(converted.constraints, Constraints::new(9));
    }

    #[test]
    fn test_margins_shift_indices() {
        // One spare row on top and one spare column on the left.
        let mut puzzle = square_puzzle(7);
        puzzle.space = [1, 0, 1, 0];
        let space = IndexSpace::of(&puzzle).unwrap();
        puzzle.number.insert(
            space.cell_to_index(0, 0),
            NumberEntry("6".to_string(), 1, "1".to_string()),
        );
        puzzle.number.insert(
            space.cell_to_index(2, 3),
            NumberEntry(" ".to_string(), 1, "1".to_string()),
        );
        let converted = to_canonical(&puzzle).unwrap();
        assert_eq!(converted.constraints.grid_size, 6);
        assert_eq!(
            converted.constraints.fixed_numbers,
            Some(vec![FixedNumber::new(0, 0, 6)])
        );
    }

    #[test]
    fn test_numeric_given() {
        let mut puzzle = square_puzzle(4);
        let index = IndexSpace::of(&puzzle).unwrap().cell_to_index(2, 1);
        let entry: NumberEntry = serde_json::from_value(serde_json::json!([3, 1, "1"])).unwrap();
        puzzle.number.insert(index, entry);
        let converted = to_canonical(&puzzle).unwrap();
        assert_eq!(
            converted.constraints.fixed_numbers,
            Some(vec![FixedNumber::new(2, 1, 3)])
        );
    }

    #[test]
    fn test_given_out_of_range() {
        let mut puzzle = square_puzzle(4);
        let space = IndexSpace::of(&puzzle).unwrap();
        puzzle.number.insert(
            space.cell_to_index(1, 1),
            NumberEntry("5".to_string(), 1, "1".to_string()),
        );
        assert_eq!(
            to_canonical(&puzzle).unwrap_err(),
            TransformError::ConstraintsOutOfRange {
                row: 1,
                col: 1,
                value: 5
            }
        );

        let mut puzzle = square_puzzle(4);
        puzzle.number.insert(
            space.cell_to_index(4, 0),
            NumberEntry("1".to_string(), 1, "1".to_string()),
        );
        assert!(matches!(
            to_canonical(&puzzle),
            Err(TransformError::ConstraintsOutOfRange { row: 4, col: 0, .. })
        ));
    }

    #[test]
    fn test_drops_and_reports() {
        let mut puzzle = square_puzzle(4);
        let space = IndexSpace::of(&puzzle).unwrap();
        let inside = space.cell_to_index(0, 0);
        let outside = space.cell_to_index(0, 5);
        puzzle.thermo = vec![vec![], vec![inside, outside]];
        puzzle.killercages = vec![vec![inside]];
        puzzle.symbol.insert(
            space.cell_to_index(3, 3),
            SymbolEntry(1, "star".to_string(), 1),
        );
        puzzle
            .unsupported
            .insert("surface".to_string(), serde_json::json!({ "28": 1 }));

        let converted = to_canonical(&puzzle).unwrap();
        assert_eq!(
            converted.warning.as_deref(),
            Some("Ignored some constraints: thermo, killercages, symbol, surface")
        );
        assert_eq!(converted.constraints, Constraints::new(4));
    }

    #[test]
    fn test_from_canonical_header() {
        let constraints = Constraints {
            secondary_diagonal: Some(true),
            ..Constraints::new(9)
        };
        let converted = from_canonical(&constraints).unwrap();
        assert_eq!(converted.warning, None);
        let puzzle = converted.constraints;
        assert_eq!(puzzle.cell_size, 38);
        assert_eq!((puzzle.canvas_width, puzzle.canvas_height), (380, 380));
        assert_eq!(puzzle.center_cell_index, 84);
        assert_eq!(puzzle.sudoku, [0, 0, 0, 1]);
        assert_eq!(puzzle.centerlist.len(), 81);
        assert_eq!(&puzzle.centerlist[..3], &[28, 1, 1]);
        assert_eq!(puzzle.centerlist[9], 5);
        assert_eq!(puzzle.line_e.len(), 36 + 9);
        assert_eq!(puzzle.line_e.get("204,192"), Some(&12));
    }

    #[test]
    fn test_from_canonical_features() {
        let constraints = Constraints {
            fixed_numbers: Some(vec![FixedNumber::new(1, 2, 1)]),
            killer_cages: Some(vec![
                KillerCage {
                    sum: Some(22),
                    region: vec![
                        CellPosition::new(2, 0),
                        CellPosition::new(2, 1),
                        CellPosition::new(3, 0),
                    ],
                },
                KillerCage {
                    sum: Some(3),
                    region: vec![CellPosition::new(8, 8)],
                },
            ]),
            arrows: Some(vec![
                Arrow {
                    circle_cells: vec![CellPosition::new(3, 5)],
                    arrow_cells: vec![CellPosition::new(3, 6)],
                },
                Arrow {
                    circle_cells: vec![CellPosition::new(0, 0), CellPosition::new(0, 1)],
                    arrow_cells: vec![CellPosition::new(1, 1)],
                },
            ]),
            kropki_dots: Some(vec![KropkiDot::new(
                KropkiDotType::Consecutive,
                CellPosition::new(8, 4),
                CellPosition::new(8, 3),
            )]),
            odd_cells: Some(vec![CellPosition::new(6, 0)]),
            anti_king: Some(true),
            renbans: Some(vec![vec![CellPosition::new(0, 0), CellPosition::new(0, 1)]]),
            ..Constraints::new(9)
        };
        let converted = from_canonical(&constraints).unwrap();
        assert_eq!(
            converted.warning.as_deref(),
            Some("Ignored some constraints: arrows, killerCages, renbans, antiKing")
        );
        let puzzle = converted.constraints;
        assert_eq!(puzzle.number[&43], NumberEntry("1".to_string(), 1, "1".to_string()));
        assert_eq!(puzzle.arrows, vec![vec![72, 73]]);
        assert_eq!(puzzle.killercages, vec![vec![54, 55, 67]]);
        assert_eq!(puzzle.number_s[&892], CornerNumber(" 22".to_string(), 1));
        assert_eq!(puzzle.cage.len(), 6);
        assert_eq!(puzzle.symbol[&642], SymbolEntry(8, "circle_SS".to_string(), 2));
        assert_eq!(puzzle.symbol[&106], SymbolEntry(3, "circle_L".to_string(), 2));
    }

    #[test]
    fn test_from_canonical_rejects_cells_off_grid() {
        let given = Constraints {
            fixed_numbers: Some(vec![FixedNumber::new(0, 4, 1)]),
            ..Constraints::new(4)
        };
        assert_eq!(
            from_canonical(&given).unwrap_err(),
            TransformError::ConstraintsOutOfRange {
                row: 0,
                col: 4,
                value: 1
            }
        );

        let off_grid = CellPosition::new(2, 6);
        let on_grid = CellPosition::new(2, 3);
        let cases = [
            Constraints {
                thermos: Some(vec![vec![on_grid, off_grid]]),
                ..Constraints::new(6)
            },
            Constraints {
                arrows: Some(vec![Arrow {
                    circle_cells: vec![on_grid],
                    arrow_cells: vec![off_grid],
                }]),
                ..Constraints::new(6)
            },
            Constraints {
                killer_cages: Some(vec![KillerCage {
                    sum: Some(5),
                    region: vec![on_grid, off_grid],
                }]),
                ..Constraints::new(6)
            },
            Constraints {
                kropki_dots: Some(vec![KropkiDot::new(
                    KropkiDotType::Double,
                    off_grid,
                    on_grid,
                )]),
                ..Constraints::new(6)
            },
            Constraints {
                extra_regions: Some(vec![vec![off_grid]]),
                ..Constraints::new(6)
            },
            Constraints {
                even_cells: Some(vec![off_grid]),
                ..Constraints::new(6)
            },
        ];
        for constraints in cases {
            assert_eq!(
                from_canonical(&constraints).unwrap_err(),
                TransformError::CellOutOfRange {
                    row: 2,
                    col: 6,
                    grid_size: 6
                },
                "{constraints:?}"
            );
        }
    }

    #[test]
    fn test_roundtrip_through_canonical() {
        let constraints = Constraints {
            fixed_numbers: Some(vec![FixedNumber::new(0, 0, 1), FixedNumber::new(5, 5, 6)]),
            thermos: Some(vec![vec![
                CellPosition::new(1, 0),
                CellPosition::new(1, 1),
                CellPosition::new(2, 1),
            ]]),
            killer_cages: Some(vec![KillerCage {
                sum: None,
                region: vec![CellPosition::new(4, 4), CellPosition::new(4, 5)],
            }]),
            kropki_dots: Some(vec![
                KropkiDot::new(
                    KropkiDotType::Double,
                    CellPosition::new(3, 1),
                    CellPosition::new(4, 1),
                ),
                KropkiDot::new(
                    KropkiDotType::Consecutive,
                    CellPosition::new(0, 4),
                    CellPosition::new(0, 5),
                ),
            ]),
            even_cells: Some(vec![CellPosition::new(2, 2)]),
            primary_diagonal: Some(true),
            ..Constraints::new(6)
        };
        let lowered = from_canonical(&constraints).unwrap();
        assert_eq!(lowered.warning, None);
        let lifted = to_canonical(&lowered.constraints).unwrap();
        assert_eq!(lifted.warning, None);

        assert_eq!(lifted.constraints, constraints);
    }
}
