//! Grid geometry: sizes, default regions and digit grids.

use crate::error::{DecodeError, GridError};
use crate::limits::GRID_SIZES;
use crate::model::{CellPosition, FixedNumber, Region};

/// Checks that a grid size is supported.
pub fn ensure_grid_size(grid_size: usize) -> Result<usize, GridError> {
    if GRID_SIZES.contains(&grid_size) {
        Ok(grid_size)
    } else {
        Err(GridError::UnsupportedGridSize { size: grid_size })
    }
}

/// Block `(height, width)` for a grid size.
pub fn block_dimensions(grid_size: usize) -> Result<(usize, usize), GridError> {
    match ensure_grid_size(grid_size)? {
        4 => Ok((2, 2)),
        6 => Ok((2, 3)),
        _ => Ok((3, 3)),
    }
}

/// Standard block tiling.
///
/// Blocks are numbered left to right, top to bottom; cells inside a block are
/// row-major.
pub fn default_regions(grid_size: usize) -> Result<Vec<Region>, GridError> {
    let (height, width) = block_dimensions(grid_size)?;
    let mut regions = Vec::with_capacity(grid_size);
    for block_row in (0..grid_size).step_by(height) {
        for block_col in (0..grid_size).step_by(width) {
            let mut region = Vec::with_capacity(grid_size);
            for row in block_row..block_row + height {
                for col in block_col..block_col + width {
                    region.push(CellPosition::new(row, col));
                }
            }
            regions.push(region);
        }
    }
    Ok(regions)
}

fn check_cell(grid_size: usize, cell: &CellPosition) -> Result<(), GridError> {
    if cell.row < grid_size && cell.col < grid_size {
        Ok(())
    } else {
        Err(GridError::CellOutOfRange {
            row: cell.row,
            col: cell.col,
            grid_size,
        })
    }
}

/// Maps each cell to its 1-based region index. Uncovered cells stay `0`.
pub fn regions_to_grid(grid_size: usize, regions: &[Region]) -> Result<Vec<Vec<usize>>, GridError> {
    let mut grid = vec![vec![0; grid_size]; grid_size];
    for (index, region) in regions.iter().enumerate() {
        for cell in region {
            check_cell(grid_size, cell)?;
            grid[cell.row][cell.col] = index + 1;
        }
    }
    Ok(grid)
}

/// Inverse of [`regions_to_grid`]. Empty regions are dropped.
///
/// A grid of side `n` holds at most `n` regions; larger indices are rejected.
pub fn grid_to_regions(grid: &[Vec<usize>]) -> Result<Vec<Region>, GridError> {
    let count = grid.iter().flatten().copied().max().unwrap_or(0);
    if count > grid.len() {
        return Err(GridError::RegionOutOfRange {
            region: count,
            grid_size: grid.len(),
        });
    }
    let mut regions: Vec<Region> = vec![Vec::new(); count];
    for (row, cells) in grid.iter().enumerate() {
        for (col, &index) in cells.iter().enumerate() {
            if index > 0 {
                regions[index - 1].push(CellPosition::new(row, col));
            }
        }
    }
    regions.retain(|region| !region.is_empty());
    Ok(regions)
}

/// Collects the non-zero digits of a grid, row-major.
pub fn digit_grid_to_fixed_numbers(grid: &[Vec<u32>]) -> Vec<FixedNumber> {
    let mut fixed = Vec::new();
    for (row, digits) in grid.iter().enumerate() {
        for (col, &value) in digits.iter().enumerate() {
            if value != 0 {
                fixed.push(FixedNumber::new(row, col, value));
            }
        }
    }
    fixed
}

/// Places fixed numbers on an empty grid. `0` marks an empty cell.
pub fn fixed_numbers_to_digit_grid(
    grid_size: usize,
    fixed_numbers: &[FixedNumber],
) -> Result<Vec<Vec<u32>>, GridError> {
    let mut grid = vec![vec![0; grid_size]; grid_size];
    for fixed in fixed_numbers {
        check_cell(grid_size, &fixed.position)?;
        if fixed.value == 0 || fixed.value as usize > grid_size {
            return Err(GridError::ValueOutOfRange {
                value: fixed.value,
                grid_size,
            });
        }
        grid[fixed.position.row][fixed.position.col] = fixed.value;
    }
    Ok(grid)
}

/// Side length for a grid string, if its length is a perfect square.
pub fn grid_size_from_len(len: usize) -> Option<usize> {
    let root = (len as f64).sqrt().round() as usize;
    (root * root == len).then_some(root)
}

/// Whether the input is a digit grid of a supported size with in-range digits.
pub fn is_grid_string(input: &str) -> bool {
    let Some(grid_size) = grid_size_from_len(input.len()) else {
        return false;
    };
    GRID_SIZES.contains(&grid_size)
        && input
            .chars()
            .all(|ch| ch.to_digit(10).is_some_and(|digit| digit as usize <= grid_size))
}

/// Parses a row-major digit string into its size and fixed numbers.
pub fn grid_string_to_fixed_numbers(input: &str) -> Result<(usize, Vec<FixedNumber>), DecodeError> {
    let grid_size = grid_size_from_len(input.len())
        .filter(|&size| size > 0)
        .ok_or(DecodeError::UnsupportedLength { len: input.len() })?;
    ensure_grid_size(grid_size)?;

    let mut fixed = Vec::new();
    for (i, ch) in input.chars().enumerate() {
        let value = ch.to_digit(10).ok_or(DecodeError::InvalidDigit { digit: ch, grid_size })?;
        if value as usize > grid_size {
            return Err(DecodeError::InvalidDigit { digit: ch, grid_size });
        }
        if value != 0 {
            fixed.push(FixedNumber::new(i / grid_size, i % grid_size, value));
        }
    }
    Ok((grid_size, fixed))
}

/// Writes fixed numbers as a row-major digit string.
pub fn fixed_numbers_to_grid_string(
    grid_size: usize,
    fixed_numbers: &[FixedNumber],
) -> Result<String, GridError> {
    ensure_grid_size(grid_size)?;
    let grid = fixed_numbers_to_digit_grid(grid_size, fixed_numbers)?;
    Ok(grid
        .iter()
        .flatten()
        .map(|&digit| char::from_digit(digit, 10).unwrap_or('0'))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_regions_9() {
        let regions = default_regions(9).unwrap();
        assert_eq!(regions.len(), 9);
        assert_eq!(regions[1][0], CellPosition::new(0, 3));
        assert_eq!(regions[1][3], CellPosition::new(1, 3));
        assert_eq!(regions[8][8], CellPosition::new(8, 8));
    }

    #[test]
    fn test_default_regions_6_is_two_by_three() {
        let regions = default_regions(6).unwrap();
        assert_eq!(regions.len(), 6);
        assert_eq!(
            regions[0],
            vec![
                CellPosition::new(0, 0),
                CellPosition::new(0, 1),
                CellPosition::new(0, 2),
                CellPosition::new(1, 0),
                CellPosition::new(1, 1),
                CellPosition::new(1, 2),
            ]
        );
        assert_eq!(regions[1][0], CellPosition::new(0, 3));
        assert_eq!(regions[2][0], CellPosition::new(2, 0));
    }

    #[test]
    fn test_unsupported_size() {
        assert_eq!(
            default_regions(5),
            Err(GridError::UnsupportedGridSize { size: 5 })
        );
    }

    #[test]
    fn test_regions_grid_roundtrip() {
        for size in [4, 6, 9] {
            let regions = default_regions(size).unwrap();
            let grid = regions_to_grid(size, &regions).unwrap();
            assert!(grid.iter().flatten().all(|&index| index > 0));
            assert_eq!(grid_to_regions(&grid).unwrap(), regions);
        }
    }

    #[test]
    fn test_grid_to_regions_rejects_large_index() {
        let mut grid = regions_to_grid(4, &default_regions(4).unwrap()).unwrap();
        grid[2][1] = usize::MAX / 64;
        assert_eq!(
            grid_to_regions(&grid),
            Err(GridError::RegionOutOfRange {
                region: usize::MAX / 64,
                grid_size: 4
            })
        );

        grid[2][1] = 4;
        assert_eq!(grid_to_regions(&grid).unwrap().len(), 4);
    }

    #[test]
    fn test_grid_string_errors() {
        assert_eq!(
            grid_string_to_fixed_numbers(&"0".repeat(80)),
            Err(DecodeError::UnsupportedLength { len: 80 })
        );
        assert_eq!(
            grid_string_to_fixed_numbers(&"0".repeat(25)),
            Err(DecodeError::Grid(GridError::UnsupportedGridSize { size: 5 }))
        );
        assert_eq!(
            grid_string_to_fixed_numbers("0000000000000500"),
            Err(DecodeError::InvalidDigit {
                digit: '5',
                grid_size: 4
            })
        );
    }

    #[test]
    fn test_grid_string_values() {
        let (size, fixed) = grid_string_to_fixed_numbers("1000020000300004").unwrap();
        assert_eq!(size, 4);
        assert_eq!(
            fixed,
            vec![
                FixedNumber::new(0, 0, 1),
                FixedNumber::new(1, 1, 2),
                FixedNumber::new(2, 2, 3),
                FixedNumber::new(3, 3, 4),
            ]
        );
        assert_eq!(
            fixed_numbers_to_grid_string(4, &fixed).unwrap(),
            "1000020000300004"
        );
    }

    #[test]
    fn test_is_grid_string() {
        assert!(is_grid_string(&"0".repeat(81)));
        assert!(is_grid_string(&"1".repeat(36)));
        assert!(!is_grid_string(&"0".repeat(25)));
        assert!(!is_grid_string("12a4"));
        assert!(!is_grid_string("0000000000000500"));
        assert!(!is_grid_string(""));
    }

    fn fixed_numbers_strategy() -> impl Strategy<Value = (usize, Vec<FixedNumber>)> {
        prop::sample::select(vec![4usize, 6, 9]).prop_flat_map(|size| {
            let cells = prop::collection::btree_map(
                (0..size, 0..size),
                1..=size as u32,
                0..=size * size,
            );
            cells.prop_map(move |cells| {
                let fixed = cells
                    .into_iter()
                    .map(|((row, col), value)| FixedNumber::new(row, col, value))
                    .collect();
                (size, fixed)
            })
        })
    }

    proptest! {
        #[test]
        fn test_digit_grid_roundtrip((size, fixed) in fixed_numbers_strategy()) {
            let grid = fixed_numbers_to_digit_grid(size, &fixed).unwrap();
            prop_assert_eq!(digit_grid_to_fixed_numbers(&grid), fixed);
        }
    }
}
