// src/fetch/http.rs
// =============================================================================
// This module downloads archive pages over HTTP(S).
//
// Key functionality:
// - One reqwest Client, reused for every request (connection pooling)
// - A per-request timeout
// - Optionally skip TLS certificate checks: gcc.gnu.org used to serve a
//   certificate for a different hostname, so old archives needed this
//
// The Fetch trait is the seam between the network and everything else.
// Tests implement it with canned pages so they never touch the network.
//
// Rust concepts:
// - Traits: A shared interface that several types can implement
// - async-trait: Lets trait methods be async
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::FetchError;

/// Something that can fetch a document by URL.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

// Settings for downloading pages, filled in from the command line
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Accept invalid TLS certificates
    pub insecure: bool,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            insecure: false,
            user_agent: format!("patch-finder/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Fetches pages with a real HTTP client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .danger_accept_invalid_certs(config.insecure)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    // Fetches a page and returns its text
    //
    // Anything other than a 2xx status is an error; we don't want to cache
    // a "404 Not Found" page as if it were the mail.
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!(%url, %status, "response received");

        if !status.is_success() {
            return Err(FetchError::status(url, status));
        }

        Ok(response.text().await?)
    }
}
