//! f-puzzles codec: lz-string compressed JSON.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::codec::{detect_inline, Codec};
use crate::error::{DecodeError, EncodeError};
use crate::limits::FPUZZLES_LOAD_URL;
use crate::model::{EncodeResult, FpuzzlesConstraints, MatchResult, NativeConstraints, PuzzleFormat};
use crate::util::compress::{Compressor, LzBase64};

lazy_static! {
    static ref INLINE_DATA: Regex =
        Regex::new(r"^(?:https://)?(?:www\.)?f-puzzles\.com/\?load=(.+)$").unwrap();
    // Short links need the f-puzzles backend, so they are listed but not decoded.
    static ref SHORT_URL: Regex = Regex::new(r"^(?:https://)?(?:www\.)?f-puzzles\.com/\?id=(.+)$").unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FpuzzlesCodec;

impl Codec for FpuzzlesCodec {
    fn format(&self) -> PuzzleFormat {
        PuzzleFormat::Fpuzzles
    }

    fn url_patterns(&self) -> Vec<String> {
        vec![INLINE_DATA.as_str().to_string(), SHORT_URL.as_str().to_string()]
    }

    fn detect(&self, input: &str) -> MatchResult {
        detect_inline(self, &[&*INLINE_DATA], input)
    }

    fn decode(&self, data: &str) -> Result<NativeConstraints, DecodeError> {
        let json = LzBase64.decompress(data)?;
        let value: Value = serde_json::from_str(&json).map_err(|e| DecodeError::JsonParse {
            message: e.to_string(),
        })?;
        if value.get("size").is_none() {
            return Err(DecodeError::SchemaInvalid {
                reason: "\"size\" not found".to_string(),
            });
        }
        let puzzle: FpuzzlesConstraints =
            serde_json::from_value(value).map_err(|e| DecodeError::SchemaInvalid {
                reason: e.to_string(),
            })?;
        Ok(NativeConstraints::Fpuzzles(puzzle))
    }
}

/// Serializes and compresses an f-puzzles puzzle.
pub fn encode(puzzle: &FpuzzlesConstraints) -> Result<EncodeResult, EncodeError> {
    let json = serde_json::to_string(puzzle).map_err(|e| EncodeError::Json {
        message: e.to_string(),
    })?;
    let data_string = LzBase64.compress(&json)?;
    Ok(EncodeResult {
        url: format!("{FPUZZLES_LOAD_URL}{data_string}"),
        data_string,
    })
}
