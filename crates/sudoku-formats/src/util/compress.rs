//! Text compressors used by the inline formats.
//!
//! Both turn a string into URL-friendly base64 text and back. [`LzBase64`]
//! backs the canonical and f-puzzles payloads, [`DeflateBase64`] backs penpa.

use std::io::{Read, Write};

use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::{alphabet, Engine};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{DecodeError, EncodeError};

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Standard alphabet, accepting input with or without padding.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A string-to-text compressor pair.
pub trait Compressor {
    fn compress(&self, input: &str) -> Result<String, EncodeError>;

    fn decompress(&self, input: &str) -> Result<String, DecodeError>;
}

/// lz-string compression with its own base64 packing.
///
/// Works on UTF-16 code units, so output matches the JavaScript library.
#[derive(Debug, Clone, Copy, Default)]
pub struct LzBase64;

impl Compressor for LzBase64 {
    fn compress(&self, input: &str) -> Result<String, EncodeError> {
        Ok(lz_str::compress_to_base64(input))
    }

    fn decompress(&self, input: &str) -> Result<String, DecodeError> {
        let units = lz_str::decompress_from_base64(input).unwrap_or_default();
        match String::from_utf16(&units) {
            Ok(text) if !text.is_empty() => Ok(text),
            _ => Err(DecodeError::InlineDecode {
                context: "lz-string payload is empty or malformed".to_string(),
            }),
        }
    }
}

/// Raw deflate followed by standard base64.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeflateBase64;

impl Compressor for DeflateBase64 {
    fn compress(&self, input: &str) -> Result<String, EncodeError> {
        let failed = |e: std::io::Error| EncodeError::Compression {
            message: e.to_string(),
        };
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(input.as_bytes()).map_err(failed)?;
        let bytes = encoder.finish().map_err(failed)?;
        Ok(STANDARD.encode(bytes))
    }

    fn decompress(&self, input: &str) -> Result<String, DecodeError> {
        let bytes = STANDARD_LENIENT
            .decode(input)
            .map_err(|e| DecodeError::InlineDecode {
                context: format!("invalid base64: {e}"),
            })?;
        let mut text = String::new();
        DeflateDecoder::new(bytes.as_slice())
            .read_to_string(&mut text)
            .map_err(|e| DecodeError::InlineDecode {
                context: format!("inflate failed: {e}"),
            })?;
        Ok(text)
    }
}

/// Percent-encodes like JavaScript's `encodeURIComponent`.
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Reverses [`encode_uri_component`].
pub fn decode_uri_component(input: &str) -> Result<String, DecodeError> {
    percent_decode_str(input)
        .decode_utf8()
        .map(|text| text.into_owned())
        .map_err(|e| DecodeError::InlineDecode {
            context: format!("invalid percent-encoding: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_component() {
        assert_eq!(encode_uri_component("a+b/c="), "a%2Bb%2Fc%3D");
        assert_eq!(encode_uri_component("it's (ok)!"), "it's%20(ok)!");
        assert_eq!(decode_uri_component("a%2Bb%2Fc%3D").unwrap(), "a+b/c=");
        assert_eq!(decode_uri_component("plain+text").unwrap(), "plain+text");
        assert!(decode_uri_component("%FF").is_err());
    }

    #[test]
    fn test_lz_known_vector() {
        let json = r#"{"gridSize":9,"primaryDiagonal":true}"#;
        let compressed = "N4Ig5gTglgJgylAXgUxALgJwBoQAdoC2AhhAJ4AiURYA9gHZEA26ALhAK7IC+QA=";
        assert_eq!(LzBase64.compress(json).unwrap(), compressed);
        assert_eq!(LzBase64.decompress(compressed).unwrap(), json);
        assert_eq!(LzBase64.decompress("N4IgHiBcDMC+Q===").unwrap(), r#"{"x":3}"#);
    }

    #[test]
    fn test_lz_roundtrip_repetitive_and_wide_chars() {
        for input in [
            "a",
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "abcabcabcabcabcabc",
            "ünïcödé ✓ 数独 🧩",
        ] {
            let compressed = LzBase64.compress(input).unwrap();
            assert_eq!(compressed.len() % 4, 0);
            assert_eq!(LzBase64.decompress(&compressed).unwrap(), input);
        }
    }

    #[test]
    fn test_lz_rejects_empty_output() {
        for input in ["", "Q==="] {
            let err = LzBase64.decompress(input).unwrap_err();
            assert!(matches!(err, DecodeError::InlineDecode { .. }));
        }
        assert_ne!(LzBase64.decompress("1234").ok().as_deref(), Some("1234"));
    }

    #[test]
    fn test_deflate_roundtrip() {
        let text = "sudoku,9,9,38\n[0,0,0,0]\n{}";
        let packed = DeflateBase64.compress(text).unwrap();
        assert_eq!(DeflateBase64.decompress(&packed).unwrap(), text);

        let unpadded = packed.trim_end_matches('=');
        assert_eq!(DeflateBase64.decompress(unpadded).unwrap(), text);
    }

    #[test]
    fn test_deflate_rejects_garbage() {
        assert!(DeflateBase64.decompress("not base64!").is_err());
    }
}
