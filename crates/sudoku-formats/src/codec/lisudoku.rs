//! Canonical JSON codec.
//!
//! Payloads are either a compact digit grid or lz-string compressed JSON
//! wrapped in percent-encoding. Puzzles stored server-side are reached
//! through a `/p/<id>` URL and a [`PuzzleLookup`].

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::codec::{capture, detect_inline, Codec};
use crate::error::{DecodeError, EncodeError};
use crate::limits::LISUDOKU_SOLVER_URL;
use crate::model::{Constraints, EncodeResult, MatchResult, NativeConstraints, PuzzleFormat, Variant};
use crate::net::PuzzleLookup;
use crate::util::case::camel_case_keys;
use crate::util::compress::{decode_uri_component, encode_uri_component, Compressor, LzBase64};
use crate::util::geometry::{grid_string_to_fixed_numbers, is_grid_string};

const HOST: &str = r"(?:https://(?:www\.)?lisudoku\.xyz|http://localhost:\d+)";

lazy_static! {
    static ref EXTERNAL_PUZZLE: Regex = Regex::new(&format!(r"^{HOST}/e\?import=(.+)$")).unwrap();
    static ref SOLVER_PUZZLE: Regex = Regex::new(&format!(r"^{HOST}/solver\?import=(.+)$")).unwrap();
    static ref DB_PUZZLE: Regex = Regex::new(&format!(r"^{HOST}/p/(.+)$")).unwrap();
}

/// Codec for the canonical format.
#[derive(Clone, Default)]
pub struct LisudokuCodec {
    lookup: Option<Arc<dyn PuzzleLookup>>,
}

impl LisudokuCodec {
    /// A codec that can't resolve stored puzzles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `/p/<id>` URLs through `lookup`.
    pub fn with_lookup(mut self, lookup: Arc<dyn PuzzleLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    fn fetch_stored(&self, id: &str) -> Result<NativeConstraints, DecodeError> {
        let Some(lookup) = &self.lookup else {
            return Err(DecodeError::LookupUnavailable { id: id.to_string() });
        };
        tracing::debug!(id, "looking up stored puzzle");
        let response = lookup.lookup(id).map_err(|e| DecodeError::LookupFailed {
            id: id.to_string(),
            reason: e.to_string(),
        })?;
        match response.status {
            404 => return Err(DecodeError::NotFound { id: id.to_string() }),
            _ if !response.is_success() => {
                return Err(DecodeError::LookupFailed {
                    id: id.to_string(),
                    reason: format!("status {}", response.status),
                });
            }
            _ => {}
        }

        let body: Value = serde_json::from_str(&response.body).map_err(|e| DecodeError::JsonParse {
            message: e.to_string(),
        })?;
        let mut puzzle = camel_case_keys(body);
        let constraints = puzzle
            .get_mut("constraints")
            .map(Value::take)
            .ok_or_else(|| DecodeError::SchemaInvalid {
                reason: "\"constraints\" not found".to_string(),
            })?;
        Ok(NativeConstraints::Lisudoku(parse_constraints(constraints)?))
    }
}

impl std::fmt::Debug for LisudokuCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LisudokuCodec")
            .field("lookup", &self.lookup.is_some())
            .finish()
    }
}

impl Codec for LisudokuCodec {
    fn format(&self) -> PuzzleFormat {
        PuzzleFormat::Lisudoku
    }

    fn url_patterns(&self) -> Vec<String> {
        [&*EXTERNAL_PUZZLE, &*SOLVER_PUZZLE, &*DB_PUZZLE]
            .iter()
            .map(|pattern| pattern.as_str().to_string())
            .collect()
    }

    fn detect(&self, input: &str) -> MatchResult {
        match detect_inline(self, &[&*EXTERNAL_PUZZLE, &*SOLVER_PUZZLE], input) {
            MatchResult::NoMatch => match capture(&DB_PUZZLE, input) {
                Some(id) => MatchResult::matched(id, self.fetch_stored(id)),
                None => MatchResult::NoMatch,
            },
            matched => matched,
        }
    }

    fn decode(&self, data: &str) -> Result<NativeConstraints, DecodeError> {
        decode_inline(data).map(NativeConstraints::Lisudoku)
    }
}

/// Decodes an inline payload: a digit grid or compressed JSON.
pub fn decode_inline(data: &str) -> Result<Constraints, DecodeError> {
    if is_grid_string(data) {
        let (grid_size, fixed_numbers) = grid_string_to_fixed_numbers(data)?;
        return Ok(Constraints {
            fixed_numbers: Some(fixed_numbers),
            ..Constraints::with_default_regions(grid_size)?
        });
    }

    let unescaped = decode_uri_component(data)?;
    let json = LzBase64.decompress(&unescaped)?;
    let value: Value = serde_json::from_str(&json).map_err(|e| DecodeError::JsonParse {
        message: e.to_string(),
    })?;
    parse_constraints(camel_case_keys(value))
}

/// Reads canonical constraints out of camelCased JSON.
fn parse_constraints(value: Value) -> Result<Constraints, DecodeError> {
    if value.get("gridSize").is_none() {
        return Err(DecodeError::SchemaInvalid {
            reason: "\"gridSize\" not found".to_string(),
        });
    }
    serde_json::from_value(value).map_err(|e| DecodeError::SchemaInvalid {
        reason: e.to_string(),
    })
}

/// Encodes canonical constraints.
///
/// Classic puzzles become a digit grid; everything else is normalized,
/// serialized with sorted keys and compressed.
pub fn encode(constraints: &Constraints) -> Result<EncodeResult, EncodeError> {
    if constraints.variant() == Variant::Classic {
        return crate::codec::gridstring::encode(constraints);
    }
    let json = to_sorted_json(&constraints.normalized())?;
    let data_string = encode_uri_component(&LzBase64.compress(&json)?);
    Ok(EncodeResult {
        url: format!("{LISUDOKU_SOLVER_URL}{data_string}"),
        data_string,
    })
}

fn to_sorted_json(constraints: &Constraints) -> Result<String, EncodeError> {
    let failed = |e: serde_json::Error| EncodeError::Json {
        message: e.to_string(),
    };
    // Going through `Value` orders object keys alphabetically.
    let value = serde_json::to_value(constraints).map_err(failed)?;
    serde_json::to_string(&value).map_err(failed)
}
