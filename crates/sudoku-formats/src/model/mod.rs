//! Data model: the canonical constraint set and each format's native shape.

pub mod constraints;
pub mod format;
pub mod fpuzzles;
pub mod penpa;
pub mod variant;

pub use constraints::{
    same_regions, Arrow, CellPosition, Constraints, FixedNumber, KillerCage, KropkiDot,
    KropkiDotType, Palindrome, Region, Renban, Thermo,
};
pub use format::{
    DecodeFailure, DecodeOutput, Decoded, EncodeResult, FormatInfo, MatchResult,
    NativeConstraints, PuzzleFormat, Transformed,
};
pub use fpuzzles::FpuzzlesConstraints;
pub use penpa::PenpaConstraints;
pub use variant::{detect_variant, normalize, Variant};
