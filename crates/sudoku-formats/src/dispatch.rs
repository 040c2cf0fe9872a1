//! Entry points: decode any supported input, encode native constraints and
//! convert a puzzle into another format.
//!
//! Decoding walks a chain of [`Codec`]s in order and stops at the first one
//! that recognizes the input, even when its payload turns out to be broken.
//! Only when no codec recognizes the input does the decoder try to resolve
//! it as a link, following at most one redirect.

use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use url::Url;

use crate::codec::{self, default_codecs, Codec};
use crate::error::{DecodeError, EncodeError, TransformError};
use crate::model::{
    DecodeFailure, DecodeOutput, Decoded, EncodeResult, FormatInfo, MatchResult,
    NativeConstraints, PuzzleFormat, Transformed,
};
use crate::net::Fetcher;

lazy_static! {
    static ref DEFAULT_DECODER: Decoder = Decoder::default();
}

// =============================================================================
// Options
// =============================================================================

/// Options for decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Resolve unrecognized links through the fetcher and decode where they
    /// lead. Has no effect without a fetcher.
    pub follow_redirects: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            follow_redirects: true,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_follow_redirects(mut self, follow_redirects: bool) -> Self {
        self.follow_redirects = follow_redirects;
        self
    }
}

// =============================================================================
// Decoder
// =============================================================================

/// A chain of codecs plus the collaborators decoding may need.
pub struct Decoder {
    codecs: Vec<Box<dyn Codec>>,
    fetcher: Option<Arc<dyn Fetcher>>,
    options: DecodeOptions,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(default_codecs())
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formats: Vec<PuzzleFormat> = self.codecs.iter().map(|c| c.format()).collect();
        f.debug_struct("Decoder")
            .field("codecs", &formats)
            .field("fetcher", &self.fetcher.is_some())
            .field("options", &self.options)
            .finish()
    }
}

impl Decoder {
    /// Creates a decoder that tries `codecs` in order.
    pub fn new(codecs: Vec<Box<dyn Codec>>) -> Self {
        Self {
            codecs,
            fetcher: None,
            options: DecodeOptions::default(),
        }
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Every format in the chain with the URL shapes it recognizes.
    pub fn formats(&self) -> Vec<FormatInfo> {
        self.codecs
            .iter()
            .map(|codec| FormatInfo {
                format: codec.format(),
                url_patterns: codec.url_patterns(),
            })
            .collect()
    }

    /// Decodes `input`, following one redirect if nothing recognizes it.
    pub fn decode(&self, input: &str) -> DecodeOutput {
        self.decode_with(input, self.options.follow_redirects)
    }

    /// Decodes `input` without touching the network for redirects.
    pub fn decode_no_redirect(&self, input: &str) -> DecodeOutput {
        self.decode_with(input, false)
    }

    fn decode_with(&self, input: &str, follow_redirects: bool) -> DecodeOutput {
        let input: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if input.is_empty() {
            return Err(DecodeFailure::unmatched(DecodeError::EmptyInput));
        }

        for codec in &self.codecs {
            let format = codec.format();
            let MatchResult::Matched {
                data_string,
                result,
            } = codec.detect(&input)
            else {
                continue;
            };
            return match result {
                Ok(constraints) => Ok(Decoded {
                    format,
                    data_string,
                    constraints,
                }),
                Err(error) => {
                    tracing::debug!(%format, %error, "matched input failed to decode");
                    Err(DecodeFailure {
                        format: Some(format),
                        data_string: Some(data_string),
                        error,
                    })
                }
            };
        }

        if follow_redirects {
            if let Some(output) = self.follow_redirect(&input) {
                return output;
            }
        }
        Err(DecodeFailure::unmatched(DecodeError::FormatNotSupported))
    }

    /// Returns `None` when `input` isn't a link or doesn't redirect.
    fn follow_redirect(&self, input: &str) -> Option<DecodeOutput> {
        let fetcher = self.fetcher.as_ref()?;
        let url = Url::parse(input).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        tracing::debug!(%url, "resolving link");
        match fetcher.fetch(input) {
            Ok(response) if response.redirected => {
                tracing::debug!(target_url = %response.final_url, "following redirect");
                Some(self.decode_no_redirect(&response.final_url))
            }
            Ok(_) => None,
            Err(error) => {
                tracing::debug!(%error, "link could not be resolved");
                None
            }
        }
    }
}

// =============================================================================
// Free functions
// =============================================================================

/// Decodes `input` with the standard codec chain and no network access.
pub fn decode(input: &str) -> DecodeOutput {
    DEFAULT_DECODER.decode(input)
}

/// Encodes native constraints in their own format.
pub fn encode(native: &NativeConstraints) -> Result<EncodeResult, EncodeError> {
    match native {
        NativeConstraints::GridString(c) => codec::gridstring::encode(c),
        NativeConstraints::Lisudoku(c) => codec::lisudoku::encode(c),
        NativeConstraints::Fpuzzles(p) => codec::fpuzzles::encode(p),
        NativeConstraints::Penpa(p) => codec::penpa::encode(p),
    }
}

/// Converts a puzzle into format `to` through the canonical constraints.
///
/// Warnings from lifting and lowering are joined with `". "`.
pub fn transform(
    native: &NativeConstraints,
    to: PuzzleFormat,
) -> Result<Transformed, TransformError> {
    let lifted = crate::transform::to_canonical(native)?;
    let lowered = crate::transform::from_canonical(&lifted.constraints, to)?;
    let encoded = encode(&lowered.constraints)?;
    let warnings: Vec<String> = [lifted.warning, lowered.warning]
        .into_iter()
        .flatten()
        .filter(|warning| !warning.is_empty())
        .collect();
    Ok(Transformed {
        constraints: lowered.constraints,
        data_string: encoded.data_string,
        url: encoded.url,
        warning: (!warnings.is_empty()).then(|| warnings.join(". ")),
    })
}
