//! Upstream document sources
//!
//! This module contains everything between a source URL and the rows of its
//! data table:
//! - The `DocumentSource` abstraction every adapter fetches through
//! - The reqwest-backed `HttpFetcher` with retry, backoff and proxy support
//! - HTML table extraction

mod fetcher;
mod retry;
mod table;

pub use fetcher::{build_http_client, proxy_from_env, HttpFetcher};
pub use retry::RetryPolicy;
pub use table::{first_table_rows, TableRow, TableSection};

use std::future::Future;
use thiserror::Error;

/// Errors that end a fetch for good
///
/// Transient failures never surface here directly: they are retried and only
/// reported as `RetriesExhausted` once the policy gives up.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid header value for {name}")]
    InvalidHeader { name: &'static str },

    #[error("Invalid proxy URL '{proxy}': {source}")]
    Proxy {
        proxy: String,
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Connection failed for {url}: {source}")]
    Connection { url: String, source: reqwest::Error },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Gave up on {url} after {attempts} attempts (last failure: {last_failure})")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_failure: String,
    },
}

/// A strategy for retrieving the raw document behind a URL
///
/// Adapters only depend on this trait, so the retry/proxy policy lives in the
/// implementation's configuration rather than in each adapter.
pub trait DocumentSource {
    /// Fetches the document at `url`, returning its body as text
    fn fetch_document(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}
