//! Compact digit grid: `gridSize²` digits, row-major, `0` for an empty cell.

use crate::codec::Codec;
use crate::error::{DecodeError, EncodeError};
use crate::limits::LISUDOKU_SOLVER_URL;
use crate::model::{Constraints, EncodeResult, MatchResult, NativeConstraints, PuzzleFormat};
use crate::util::geometry::{fixed_numbers_to_grid_string, grid_string_to_fixed_numbers};

#[derive(Debug, Clone, Copy, Default)]
pub struct GridStringCodec;

impl Codec for GridStringCodec {
    fn format(&self) -> PuzzleFormat {
        PuzzleFormat::GridString
    }

    fn url_patterns(&self) -> Vec<String> {
        Vec::new()
    }

    /// Any all-digit input is claimed, so a wrong length or digit surfaces as
    /// a grid string error.
    fn detect(&self, input: &str) -> MatchResult {
        if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
            return MatchResult::NoMatch;
        }
        MatchResult::matched(input, self.decode(input))
    }

    fn decode(&self, data: &str) -> Result<NativeConstraints, DecodeError> {
        let (grid_size, fixed_numbers) = grid_string_to_fixed_numbers(data)?;
        Ok(NativeConstraints::GridString(Constraints {
            fixed_numbers: Some(fixed_numbers),
            ..Constraints::new(grid_size)
        }))
    }
}

/// Writes the fixed numbers as a grid string.
pub fn encode(constraints: &Constraints) -> Result<EncodeResult, EncodeError> {
    let fixed = constraints.fixed_numbers.as_deref().unwrap_or_default();
    let data_string = fixed_numbers_to_grid_string(constraints.grid_size, fixed)?;
    Ok(EncodeResult {
        url: format!("{LISUDOKU_SOLVER_URL}{data_string}"),
        data_string,
    })
}
