//! f-puzzles ⇄ canonical.

use serde_json::Value;

use crate::error::TransformError;
use crate::model::fpuzzles::{
    CellGroup, CellName, CosmeticLine, FpuzzlesArrow, FpuzzlesCage, FpuzzlesDot, GridCell,
    LineGroup, ParityCell,
};
use crate::model::{
    Arrow, CellPosition, Constraints, FixedNumber, FpuzzlesConstraints, KillerCage, KropkiDot,
    KropkiDotType, PuzzleFormat,
};
use crate::transform::{Converted, Ignored};
use crate::util::geometry::{default_regions, ensure_grid_size, grid_to_regions, regions_to_grid};

/// Constraint kinds f-puzzles supports and the canonical model doesn't.
const UNIMPLEMENTED: [&str; 19] = [
    "disjointgroups",
    "littlekillersum",
    "minimum",
    "maximum",
    "rowindexer",
    "columnindexer",
    "boxindexer",
    "whispers",
    "regionsumline",
    "xv",
    "clone",
    "quadruple",
    "betweenline",
    "sandwichsum",
    "xsum",
    "skyscraper",
    "entropicline",
    "cage",
    "text",
];

const RENBAN_LINE_COLOR: &str = "gray";
const RENBAN_LINE_WIDTH: f64 = 0.2;

// =============================================================================
// Cell names
// =============================================================================

/// `R{row}C{col}`, 1-based.
pub fn cell_name(cell: CellPosition) -> CellName {
    format!("R{}C{}", cell.row + 1, cell.col + 1)
}

/// Parses `R{row}C{col}` into a 0-based position.
pub fn parse_cell_name(name: &str) -> Result<CellPosition, TransformError> {
    let invalid = || TransformError::InvalidCellName {
        name: name.to_string(),
    };
    let (row, col) = name
        .strip_prefix('R')
        .and_then(|rest| rest.split_once('C'))
        .ok_or_else(invalid)?;
    let index = |part: &str| {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        part.parse::<usize>().ok()?.checked_sub(1)
    };
    match (index(row), index(col)) {
        (Some(row), Some(col)) => Ok(CellPosition::new(row, col)),
        _ => Err(invalid()),
    }
}

fn parse_cells(names: &[CellName]) -> Result<Vec<CellPosition>, TransformError> {
    names.iter().map(|name| parse_cell_name(name)).collect()
}

fn cell_names(cells: &[CellPosition]) -> Vec<CellName> {
    cells.iter().copied().map(cell_name).collect()
}

fn parse_lines(groups: &Option<Vec<LineGroup>>) -> Result<Vec<Vec<CellPosition>>, TransformError> {
    groups
        .iter()
        .flatten()
        .flat_map(|group| &group.lines)
        .map(|line| parse_cells(line))
        .collect()
}

fn line_groups(lines: &Option<Vec<Vec<CellPosition>>>) -> Option<Vec<LineGroup>> {
    let lines = lines.as_ref()?;
    Some(
        lines
            .iter()
            .map(|line| LineGroup {
                lines: vec![cell_names(line)],
            })
            .collect(),
    )
}

fn parse_sum(value: &Value) -> Option<u32> {
    match value {
        Value::String(text) => text.trim().parse().ok(),
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
}

// =============================================================================
// f-puzzles → canonical
// =============================================================================

pub fn to_canonical(puzzle: &FpuzzlesConstraints) -> Result<Converted<Constraints>, TransformError> {
    let grid_size = ensure_grid_size(puzzle.size)?;
    let mut ignored = Ignored::default();

    let mut region_grid = regions_to_grid(grid_size, &default_regions(grid_size)?)?;
    let mut fixed_numbers = Vec::new();
    for (row, cells) in puzzle.grid.iter().enumerate().take(grid_size) {
        for (col, cell) in cells.iter().enumerate().take(grid_size) {
            if let Some(value) = cell.value {
                if value == 0 || value as usize > grid_size {
                    return Err(TransformError::ConstraintsOutOfRange {
                        row: row as i64,
                        col: col as i64,
                        value: value.into(),
                    });
                }
                fixed_numbers.push(FixedNumber::new(row, col, value));
            }
            if let Some(region) = cell.region {
                if region >= grid_size {
                    return Err(TransformError::RegionOutOfRange { row, col, region });
                }
                region_grid[row][col] = region + 1;
            }
        }
    }

    let mut arrows = Vec::new();
    for arrow in puzzle.arrow.iter().flatten() {
        ignored.add_if(arrow.lines.len() > 1, "arrow");
        let arrow_cells = match arrow.lines.first() {
            Some(line) => parse_cells(line.get(1..).unwrap_or_default())?,
            None => Vec::new(),
        };
        arrows.push(Arrow {
            circle_cells: parse_cells(&arrow.cells)?,
            arrow_cells,
        });
    }

    let mut kropki_dots = Vec::new();
    let dot_kinds = [
        ("difference", &puzzle.difference, KropkiDotType::Consecutive),
        ("ratio", &puzzle.ratio, KropkiDotType::Double),
    ];
    for (kind, dots, dot_type) in dot_kinds {
        for dot in dots.iter().flatten() {
            // Dots with a custom value have no canonical counterpart.
            if dot.value.is_some() || dot.cells.len() != 2 {
                ignored.add(kind);
                continue;
            }
            let cells = parse_cells(&dot.cells)?;
            kropki_dots.push(KropkiDot::new(dot_type, cells[0], cells[1]));
        }
    }

    let killer_cages = puzzle
        .killercage
        .iter()
        .flatten()
        .map(|cage| {
            Ok(KillerCage {
                sum: cage.value.as_ref().and_then(parse_sum),
                region: parse_cells(&cage.cells)?,
            })
        })
        .collect::<Result<Vec<_>, TransformError>>()?;

    let parity = |cells: &Option<Vec<ParityCell>>| -> Result<Vec<CellPosition>, TransformError> {
        cells
            .iter()
            .flatten()
            .map(|parity| parse_cell_name(&parity.cell))
            .collect()
    };

    let negative_ratio = puzzle
        .negative
        .as_ref()
        .is_some_and(|kinds| kinds.iter().any(|kind| kind == "ratio"));

    for kind in UNIMPLEMENTED {
        ignored.add_if(puzzle.has_key(kind), kind);
    }

    let constraints = Constraints {
        grid_size,
        fixed_numbers: Some(fixed_numbers),
        regions: Some(grid_to_regions(&region_grid)?),
        extra_regions: Some(
            puzzle
                .extraregion
                .iter()
                .flatten()
                .map(|group| parse_cells(&group.cells))
                .collect::<Result<_, _>>()?,
        ),
        thermos: Some(parse_lines(&puzzle.thermometer)?),
        arrows: Some(arrows),
        killer_cages: Some(killer_cages),
        kropki_dots: Some(kropki_dots),
        odd_cells: Some(parity(&puzzle.odd)?),
        even_cells: Some(parity(&puzzle.even)?),
        renbans: Some(parse_lines(&puzzle.renban)?),
        palindromes: Some(parse_lines(&puzzle.palindrome)?),
        primary_diagonal: puzzle.diagonal_negative,
        secondary_diagonal: puzzle.diagonal_positive,
        anti_knight: puzzle.antiknight,
        anti_king: puzzle.antiking,
        kropki_negative: Some(negative_ratio || puzzle.nonconsecutive.unwrap_or(false)),
        top_bottom: None,
    };
    Ok(Converted::new(
        constraints.normalized(),
        ignored.into_warning(PuzzleFormat::Fpuzzles),
    ))
}

// =============================================================================
// canonical → f-puzzles
// =============================================================================

/// Starts the arrow line at the circle cell closest to the arrow.
fn arrow_line(arrow: &Arrow) -> Vec<CellPosition> {
    let start = match arrow.arrow_cells.first() {
        Some(first) => arrow
            .circle_cells
            .iter()
            .min_by_key(|circle| circle.distance(first))
            .copied(),
        None => arrow.circle_cells.first().copied(),
    };
    start.into_iter().chain(arrow.arrow_cells.iter().copied()).collect()
}

fn dots_of(dots: &[KropkiDot], dot_type: KropkiDotType) -> Option<Vec<FpuzzlesDot>> {
    let dots: Vec<FpuzzlesDot> = dots
        .iter()
        .filter(|dot| dot.dot_type == dot_type)
        .map(|dot| FpuzzlesDot {
            cells: vec![cell_name(dot.cell1), cell_name(dot.cell2)],
            value: None,
        })
        .collect();
    (!dots.is_empty()).then_some(dots)
}

fn parity_cells(cells: &Option<Vec<CellPosition>>) -> Option<Vec<ParityCell>> {
    Some(
        cells
            .as_ref()?
            .iter()
            .map(|&cell| ParityCell {
                cell: cell_name(cell),
            })
            .collect(),
    )
}

pub fn from_canonical(
    constraints: &Constraints,
) -> Result<Converted<FpuzzlesConstraints>, TransformError> {
    let c = constraints.normalized();
    let grid_size = ensure_grid_size(c.grid_size)?;
    let mut ignored = Ignored::default();
    let mut puzzle = FpuzzlesConstraints::new(grid_size);

    if let Some(regions) = &c.regions {
        let defaults = regions_to_grid(grid_size, &default_regions(grid_size)?)?;
        let actual = regions_to_grid(grid_size, regions)?;
        for (row, cells) in puzzle.grid.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                let region = actual[row][col];
                if region != defaults[row][col] {
                    cell.region = region.checked_sub(1);
                }
            }
        }
    }

    for fixed in c.fixed_numbers.iter().flatten() {
        let CellPosition { row, col } = fixed.position;
        let cell: &mut GridCell = puzzle
            .grid
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
            .ok_or(TransformError::ConstraintsOutOfRange {
                row: row as i64,
                col: col as i64,
                value: fixed.value.into(),
            })?;
        cell.value = Some(fixed.value);
        cell.given = Some(true);
    }

    puzzle.extraregion = c.extra_regions.as_ref().map(|regions| {
        regions
            .iter()
            .map(|region| CellGroup {
                cells: cell_names(region),
            })
            .collect()
    });
    puzzle.thermometer = line_groups(&c.thermos);
    puzzle.arrow = c.arrows.as_ref().map(|arrows| {
        arrows
            .iter()
            .map(|arrow| FpuzzlesArrow {
                cells: cell_names(&arrow.circle_cells),
                lines: vec![cell_names(&arrow_line(arrow))],
            })
            .collect()
    });
    puzzle.diagonal_positive = c.secondary_diagonal;
    puzzle.diagonal_negative = c.primary_diagonal;
    puzzle.antiknight = c.anti_knight;
    puzzle.antiking = c.anti_king;

    let dots = c.kropki_dots.as_deref().unwrap_or_default();
    puzzle.difference = dots_of(dots, KropkiDotType::Consecutive);
    puzzle.ratio = dots_of(dots, KropkiDotType::Double);
    puzzle.nonconsecutive = c.kropki_negative;

    puzzle.odd = parity_cells(&c.odd_cells);
    puzzle.even = parity_cells(&c.even_cells);
    puzzle.killercage = c.killer_cages.as_ref().map(|cages| {
        cages
            .iter()
            .map(|cage| FpuzzlesCage {
                cells: cell_names(&cage.region),
                value: cage.sum.map(|sum| Value::String(sum.to_string())),
            })
            .collect()
    });

    puzzle.renban = line_groups(&c.renbans);
    // f-puzzles draws renbans through a separate cosmetic line.
    puzzle.line = c.renbans.as_ref().map(|renbans| {
        renbans
            .iter()
            .map(|renban| CosmeticLine {
                lines: vec![cell_names(renban)],
                outline_c: RENBAN_LINE_COLOR.to_string(),
                width: RENBAN_LINE_WIDTH,
                is_new_constraint: true,
            })
            .collect()
    });
    puzzle.palindrome = line_groups(&c.palindromes);

    ignored.add_if(c.top_bottom.unwrap_or(false), "topBottom");

    Ok(Converted::new(puzzle, ignored.into_warning(PuzzleFormat::Fpuzzles)))
}
