//! Error types for decoding, encoding and transforming sudoku formats.

use thiserror::Error;

use crate::model::Variant;

/// Error from grid geometry helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("unsupported grid size {size}")]
    UnsupportedGridSize { size: usize },

    #[error("cell ({row}, {col}) is outside a grid of size {grid_size}")]
    CellOutOfRange {
        row: usize,
        col: usize,
        grid_size: usize,
    },

    #[error("value {value} is out of range for a grid of size {grid_size}")]
    ValueOutOfRange { value: u32, grid_size: usize },

    #[error("region {region} is out of range for a grid of size {grid_size}")]
    RegionOutOfRange { region: usize, grid_size: usize },
}

/// Error while decoding an input string into native constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Format not supported")]
    FormatNotSupported,

    #[error("Error while parsing inline data: {context}")]
    InlineDecode { context: String },

    #[error("Error while parsing constraint json: {message}")]
    JsonParse { message: String },

    #[error("Invalid constraints json schema: {reason}")]
    SchemaInvalid { reason: String },

    #[error("Grid string has unsupported length {len}")]
    UnsupportedLength { len: usize },

    #[error("Grid of size {grid_size} has invalid digit {digit}")]
    InvalidDigit { digit: char, grid_size: usize },

    #[error("Invalid data: found {found} lines, expected at least {min}")]
    NotEnoughLines { found: usize, min: usize },

    #[error("Invalid grid type {found:?}")]
    InvalidGridType { found: String },

    #[error("Invalid header field {field}: {value:?}")]
    MalformedHeader { field: &'static str, value: String },

    #[error("Puzzle with id {id} not found")]
    NotFound { id: String },

    #[error("Request for puzzle with id {id} failed: {reason}")]
    LookupFailed { id: String, reason: String },

    #[error("No lookup service configured for puzzle with id {id}")]
    LookupUnavailable { id: String },

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Error while encoding native constraints into a data string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("failed to serialize constraints: {message}")]
    Json { message: String },

    #[error("compression failed: {message}")]
    Compression { message: String },

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Error while converting between native and canonical constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("Grid is not square ({rows} rows, {cols} columns)")]
    GridNotSquare { rows: i64, cols: i64 },

    #[error("Invalid board geometry: {row_count} rows, {col_count} columns, margins {space:?}")]
    InvalidBoard {
        row_count: i64,
        col_count: i64,
        space: [i64; 4],
    },

    #[error("Given digits out of range: {value} at ({row}, {col})")]
    ConstraintsOutOfRange { row: i64, col: i64, value: i64 },

    #[error("Region index {region} out of range at ({row}, {col})")]
    RegionOutOfRange { row: usize, col: usize, region: usize },

    #[error("Cell ({row}, {col}) is outside a grid of size {grid_size}")]
    CellOutOfRange {
        row: usize,
        col: usize,
        grid_size: usize,
    },

    #[error("Invalid cell name {name:?}")]
    InvalidCellName { name: String },

    #[error("Can only convert classic sudoku into grid string (got {variant})")]
    NotClassic { variant: Variant },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Error from a network collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetError {
    #[error("invalid url {url:?}")]
    InvalidUrl { url: String },

    #[error("request failed: {message}")]
    Transport { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = DecodeError::UnsupportedLength { len: 80 };
        assert!(err.to_string().contains("80"));

        let err = DecodeError::InvalidDigit {
            digit: '7',
            grid_size: 4,
        };
        assert!(err.to_string().contains("invalid digit 7"));

        let err = TransformError::ConstraintsOutOfRange {
            row: 9,
            col: 0,
            value: 3,
        };
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_grid_error_converts() {
        let err: DecodeError = GridError::UnsupportedGridSize { size: 5 }.into();
        assert_eq!(err.to_string(), "unsupported grid size 5");

        let err: TransformError = EncodeError::Json {
            message: "boom".to_string(),
        }
        .into();
        assert!(matches!(err, TransformError::Encode(_)));
    }
}
