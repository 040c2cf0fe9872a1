//! Network collaborators.
//!
//! The decoder never talks to the network itself. Redirect resolution and
//! puzzle lookups go through these traits so callers can plug in a real HTTP
//! client (see the `http` feature) or a fake in tests.

#[cfg(feature = "http")]
pub mod http;

use crate::error::NetError;

/// Where a URL ended up after redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub final_url: String,
    pub redirected: bool,
}

impl FetchResponse {
    /// A response that landed somewhere other than `requested`.
    pub fn new(requested: &str, final_url: impl Into<String>) -> Self {
        let final_url = final_url.into();
        Self {
            redirected: final_url != requested,
            final_url,
        }
    }
}

/// Raw answer from the puzzle lookup service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResponse {
    pub status: u16,
    pub body: String,
}

impl LookupResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Resolves a URL, reporting whether it redirected.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<FetchResponse, NetError>;
}

/// Fetches a stored puzzle by id.
pub trait PuzzleLookup: Send + Sync {
    fn lookup(&self, id: &str) -> Result<LookupResponse, NetError>;
}
