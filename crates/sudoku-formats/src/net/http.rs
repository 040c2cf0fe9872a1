//! Blocking HTTP implementations of the network collaborators.

use url::Url;

use crate::error::NetError;
use crate::limits::LISUDOKU_API_BASE_URL;
use crate::net::{FetchResponse, Fetcher, LookupResponse, PuzzleLookup};

fn parse_url(url: &str) -> Result<Url, NetError> {
    Url::parse(url).map_err(|_| NetError::InvalidUrl {
        url: url.to_string(),
    })
}

fn transport(err: impl std::fmt::Display) -> NetError {
    NetError::Transport {
        message: err.to_string(),
    }
}

/// Follows redirects with a `ureq` agent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse, NetError> {
        let parsed = parse_url(url)?;
        tracing::debug!(url = %parsed, "resolving redirects");
        // An error status still tells us where the redirects led.
        let response = match self.agent.request_url("GET", &parsed).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(ureq::Error::Transport(err)) => return Err(transport(err)),
        };
        Ok(FetchResponse::new(parsed.as_str(), response.get_url()))
    }
}

/// Looks puzzles up in the lisudoku API.
#[derive(Debug, Clone)]
pub struct HttpLookup {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpLookup {
    pub fn new() -> Self {
        Self::with_base_url(LISUDOKU_API_BASE_URL)
    }

    /// Points the lookup at another API root, e.g. a local server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for HttpLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleLookup for HttpLookup {
    fn lookup(&self, id: &str) -> Result<LookupResponse, NetError> {
        let url = parse_url(&format!("{}/puzzles/{id}", self.base_url))?;
        tracing::debug!(%url, "looking up puzzle");
        let response = self
            .agent
            .request_url("GET", &url)
            .set("Accept", "application/json")
            .call();
        match response {
            Ok(resp) => {
                let status = resp.status();
                let body = resp.into_string().map_err(transport)?;
                Ok(LookupResponse { status, body })
            }
            Err(ureq::Error::Status(status, resp)) => Ok(LookupResponse {
                status,
                body: resp.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(err)) => Err(transport(err)),
        }
    }
}
