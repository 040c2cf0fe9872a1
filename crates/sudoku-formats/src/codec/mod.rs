//! Per-format codecs.
//!
//! A codec recognizes its format in an input string and decodes the payload
//! into the format's native constraint shape. Encoding is a plain function
//! per format, since the native shape already says which format it is.

pub mod fpuzzles;
pub mod gridstring;
pub mod lisudoku;
pub mod penpa;

use regex::Regex;

use crate::error::DecodeError;
use crate::model::{MatchResult, NativeConstraints, PuzzleFormat};

pub use fpuzzles::FpuzzlesCodec;
pub use gridstring::GridStringCodec;
pub use lisudoku::LisudokuCodec;
pub use penpa::PenpaCodec;

/// Recognizes and decodes one format.
pub trait Codec: Send + Sync {
    fn format(&self) -> PuzzleFormat;

    /// URL shapes this codec recognizes, as regular expressions.
    fn url_patterns(&self) -> Vec<String>;

    /// Looks at a whitespace-free input.
    ///
    /// Returns [`MatchResult::NoMatch`] when the input doesn't have this
    /// format's shape. Once the shape matches, a broken payload is reported
    /// as a matched error rather than a no-match.
    fn detect(&self, input: &str) -> MatchResult;

    /// Decodes a bare data string.
    fn decode(&self, data: &str) -> Result<NativeConstraints, DecodeError>;
}

/// The standard codec chain, in detection order.
pub fn default_codecs() -> Vec<Box<dyn Codec>> {
    vec![
        Box::new(LisudokuCodec::new()),
        Box::new(GridStringCodec),
        Box::new(FpuzzlesCodec),
        Box::new(PenpaCodec),
    ]
}

/// Returns the payload capture of a URL pattern.
pub(crate) fn capture<'a>(pattern: &Regex, input: &'a str) -> Option<&'a str> {
    pattern
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Matches a static URL, then falls back to the bare data string.
///
/// A bare string only counts as a match when it decodes.
pub(crate) fn detect_inline(
    codec: &dyn Codec,
    static_urls: &[&Regex],
    input: &str,
) -> MatchResult {
    for pattern in static_urls {
        if let Some(data) = capture(pattern, input) {
            tracing::debug!(format = %codec.format(), "matched static url");
            return MatchResult::matched(data, codec.decode(data));
        }
    }
    match codec.decode(input) {
        Ok(native) => {
            tracing::debug!(format = %codec.format(), "matched data string");
            MatchResult::matched(input, Ok(native))
        }
        Err(_) => MatchResult::NoMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chain_order() {
        let formats: Vec<PuzzleFormat> = default_codecs().iter().map(|c| c.format()).collect();
        assert_eq!(formats, PuzzleFormat::ALL.to_vec());
    }

    #[test]
    fn test_url_patterns_compile() {
        for codec in default_codecs() {
            for pattern in codec.url_patterns() {
                assert!(Regex::new(&pattern).is_ok(), "{pattern}");
            }
        }
    }

    #[test]
    fn test_capture_takes_first_group() {
        let pattern = Regex::new(r"^https://x\.test/\?load=(.+)$").unwrap();
        assert_eq!(capture(&pattern, "https://x.test/?load=abc"), Some("abc"));
        assert_eq!(capture(&pattern, "https://x.test/?id=abc"), None);
    }
}
