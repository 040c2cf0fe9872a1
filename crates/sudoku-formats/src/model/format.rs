//! Format tags and the values passed between codecs and dispatchers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::model::{Constraints, FpuzzlesConstraints, PenpaConstraints};

/// A supported external representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleFormat {
    /// Compact digit grid.
    GridString,
    /// Canonical JSON, the hub format.
    Lisudoku,
    Fpuzzles,
    Penpa,
}

impl PuzzleFormat {
    pub const ALL: [PuzzleFormat; 4] = [
        PuzzleFormat::Lisudoku,
        PuzzleFormat::GridString,
        PuzzleFormat::Fpuzzles,
        PuzzleFormat::Penpa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PuzzleFormat::GridString => "gridstring",
            PuzzleFormat::Lisudoku => "lisudoku",
            PuzzleFormat::Fpuzzles => "fpuzzles",
            PuzzleFormat::Penpa => "penpa",
        }
    }
}

impl fmt::Display for PuzzleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PuzzleFormat {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PuzzleFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or(DecodeError::FormatNotSupported)
    }
}

/// Constraints in the native shape of some format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", content = "constraints", rename_all = "lowercase")]
pub enum NativeConstraints {
    /// Grid strings decode straight into the canonical shape.
    GridString(Constraints),
    Lisudoku(Constraints),
    Fpuzzles(FpuzzlesConstraints),
    Penpa(PenpaConstraints),
}

impl NativeConstraints {
    pub fn format(&self) -> PuzzleFormat {
        match self {
            NativeConstraints::GridString(_) => PuzzleFormat::GridString,
            NativeConstraints::Lisudoku(_) => PuzzleFormat::Lisudoku,
            NativeConstraints::Fpuzzles(_) => PuzzleFormat::Fpuzzles,
            NativeConstraints::Penpa(_) => PuzzleFormat::Penpa,
        }
    }

    /// Returns the canonical constraints if this is a canonical-shaped format.
    pub fn as_canonical(&self) -> Option<&Constraints> {
        match self {
            NativeConstraints::GridString(c) | NativeConstraints::Lisudoku(c) => Some(c),
            _ => None,
        }
    }
}

/// Outcome of one codec looking at an input.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    /// The input doesn't have this codec's shape.
    NoMatch,
    /// The input has this codec's shape. `result` says whether it decoded.
    Matched {
        data_string: String,
        result: Result<NativeConstraints, DecodeError>,
    },
}

impl MatchResult {
    pub fn matched(data_string: impl Into<String>, result: Result<NativeConstraints, DecodeError>) -> Self {
        MatchResult::Matched {
            data_string: data_string.into(),
            result,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }
}

/// A successful decode.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub format: PuzzleFormat,
    pub data_string: String,
    pub constraints: NativeConstraints,
}

/// A failed decode. `format` and `data_string` are set when a codec matched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct DecodeFailure {
    pub format: Option<PuzzleFormat>,
    pub data_string: Option<String>,
    pub error: DecodeError,
}

impl DecodeFailure {
    pub fn unmatched(error: DecodeError) -> Self {
        Self {
            format: None,
            data_string: None,
            error,
        }
    }
}

pub type DecodeOutput = Result<Decoded, DecodeFailure>;

/// An encoded data string and a link that opens it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeResult {
    pub data_string: String,
    pub url: String,
}

/// Result of converting a puzzle into another format.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub constraints: NativeConstraints,
    pub data_string: String,
    pub url: String,
    /// Features that couldn't be carried over.
    pub warning: Option<String>,
}

/// A format and the URL shapes it recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatInfo {
    pub format: PuzzleFormat,
    pub url_patterns: Vec<String>,
}
