//! Sudoku puzzle interchange: detection, decoding, encoding and conversion
//! between puzzle formats.
//!
//! # Overview
//!
//! Four formats are supported:
//! - **gridstring**: a compact row-major digit grid
//! - **lisudoku**: canonical constraint JSON, the hub every conversion goes through
//! - **fpuzzles**: f-puzzles JSON, lz-string compressed
//! - **penpa**: penpa-edit documents, deflated and base64 encoded
//!
//! # Quick Start
//!
//! ```rust
//! use sudoku_formats::{decode, transform, PuzzleFormat};
//!
//! // A 9x9 grid with a single 7 in the second row
//! let grid = format!("{}7{}", "0".repeat(16), "0".repeat(64));
//! let decoded = decode(&grid).unwrap();
//! assert_eq!(decoded.format, PuzzleFormat::Lisudoku);
//!
//! let converted = transform(&decoded.constraints, PuzzleFormat::Fpuzzles).unwrap();
//! assert!(converted.url.starts_with("https://f-puzzles.com/?load="));
//! assert_eq!(converted.warning, None);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Canonical constraints and each format's native shape
//! - [`codec`]: Per-format detection, decoding and encoding
//! - [`transform`]: Native ⇄ canonical conversion
//! - [`dispatch`]: Decoder chain and the encode/transform entry points
//! - [`net`]: Redirect and puzzle lookup collaborators
//! - [`util`]: Compression, key casing and grid geometry
//! - [`error`]: Error types
//! - [`limits`]: Fixed tables and constants
//!
//! # Network
//!
//! Decoding is offline unless a [`net::Fetcher`] or [`net::PuzzleLookup`] is
//! plugged in. The `http` feature provides both on top of `ureq`.

pub mod codec;
pub mod dispatch;
pub mod error;
pub mod limits;
pub mod model;
pub mod net;
pub mod transform;
pub mod util;

// Re-export commonly used types at crate root
pub use codec::{default_codecs, Codec, FpuzzlesCodec, GridStringCodec, LisudokuCodec, PenpaCodec};
pub use dispatch::{decode, encode, transform, DecodeOptions, Decoder};
pub use error::{DecodeError, EncodeError, GridError, NetError, TransformError};
pub use model::{
    CellPosition, Constraints, DecodeFailure, DecodeOutput, Decoded, EncodeResult, FormatInfo,
    FpuzzlesConstraints, MatchResult, NativeConstraints, PenpaConstraints, PuzzleFormat,
    Transformed, Variant,
};
pub use net::{FetchResponse, Fetcher, LookupResponse, PuzzleLookup};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
