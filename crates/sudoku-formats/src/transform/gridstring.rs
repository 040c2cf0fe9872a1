//! Digit grids carry only given digits, so only classic puzzles convert.

use crate::error::TransformError;
use crate::model::{Constraints, Variant};
use crate::transform::Converted;
use crate::util::geometry::{digit_grid_to_fixed_numbers, ensure_grid_size, fixed_numbers_to_digit_grid};

pub fn to_canonical(grid: &Constraints) -> Result<Converted<Constraints>, TransformError> {
    let grid_size = ensure_grid_size(grid.grid_size)?;
    let fixed = grid.fixed_numbers.as_deref().unwrap_or_default();
    // Placing the digits validates them and orders them row-major.
    let digits = fixed_numbers_to_digit_grid(grid_size, fixed)?;
    let constraints = Constraints {
        fixed_numbers: Some(digit_grid_to_fixed_numbers(&digits)),
        ..Constraints::new(grid_size)
    };
    Ok(Converted::new(constraints.normalized(), None))
}

pub fn from_canonical(constraints: &Constraints) -> Result<Converted<Constraints>, TransformError> {
    let variant = constraints.variant();
    if variant != Variant::Classic {
        return Err(TransformError::NotClassic { variant });
    }
    let grid_size = ensure_grid_size(constraints.grid_size)?;
    let fixed = constraints.fixed_numbers.as_deref().unwrap_or_default();
    let digits = fixed_numbers_to_digit_grid(grid_size, fixed)?;
    let grid = Constraints {
        fixed_numbers: Some(digit_grid_to_fixed_numbers(&digits)),
        ..Constraints::new(grid_size)
    };
    Ok(Converted::new(grid, None))
}
