//! HTTP fetcher implementation
//!
//! This module handles every outbound request, including:
//! - Building HTTP clients with browser-like headers
//! - Optional forward proxy taken from the environment
//! - Relaxed TLS verification for misconfigured government endpoints
//! - Retry with exponential backoff for transient failures
//! - Error classification

use crate::config::FetchConfig;
use crate::source::retry::RetryPolicy;
use crate::source::{DocumentSource, FetchError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::{Client, Proxy};
use std::time::Duration;

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

/// Outcome of a single request attempt
enum Attempt {
    /// Body received
    Body(String),
    /// Worth retrying; carries a short description of what went wrong
    Transient(String),
    /// Not worth retrying
    Fatal(FetchError),
}

/// Reads the forward proxy URL from the environment variable named in the config
///
/// Empty values are treated as unset.
pub fn proxy_from_env(config: &FetchConfig) -> Option<String> {
    std::env::var(&config.proxy_env)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - Outbound HTTP policy
/// * `proxy` - Optional forward proxy URL applied to every scheme
///
/// # Example
///
/// ```no_run
/// use indicadores::config::FetchConfig;
/// use indicadores::source::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default(), None).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig, proxy: Option<&str>) -> Result<Client, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&config.accept_language)
            .map_err(|_| FetchError::InvalidHeader { name: "Accept-Language" })?,
    );
    headers.insert(
        REFERER,
        HeaderValue::from_str(&config.referer)
            .map_err(|_| FetchError::InvalidHeader { name: "Referer" })?,
    );
    headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));

    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = proxy {
        let proxy_setting = Proxy::all(proxy).map_err(|source| FetchError::Proxy {
            proxy: proxy.to_string(),
            source,
        })?;
        builder = builder.proxy(proxy_setting);
    }

    builder.build().map_err(FetchError::Client)
}

/// reqwest-backed document source with retry and backoff
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    /// Creates a fetcher from config, reading the proxy from the environment
    pub fn from_config(config: &FetchConfig) -> Result<Self, FetchError> {
        let proxy = proxy_from_env(config);
        if proxy.is_some() {
            tracing::info!("Using forward proxy from ${}", config.proxy_env);
        }
        let client = build_http_client(config, proxy.as_deref())?;
        Ok(Self::new(client, RetryPolicy::from_config(config)))
    }

    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Sends one GET request and classifies the outcome
    async fn attempt(&self, url: &str) -> Attempt {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return classify_error(url, e),
        };

        let status = response.status();
        if RetryPolicy::is_transient_status(status) {
            return Attempt::Transient(format!("HTTP {}", status.as_u16()));
        }

        if !status.is_success() {
            return Attempt::Fatal(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => Attempt::Body(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => classify_error(url, e),
        }
    }
}

/// Maps a transport error to retry-or-fail
fn classify_error(url: &str, error: reqwest::Error) -> Attempt {
    if error.is_timeout() {
        Attempt::Transient("request timeout".to_string())
    } else if error.is_connect() {
        Attempt::Fatal(FetchError::Connection {
            url: url.to_string(),
            source: error,
        })
    } else {
        Attempt::Fatal(FetchError::Http {
            url: url.to_string(),
            source: error,
        })
    }
}

impl DocumentSource for HttpFetcher {
    async fn fetch_document(&self, url: &str) -> Result<String, FetchError> {
        let mut retries = 0;

        loop {
            tracing::debug!("GET {} (attempt {})", url, retries + 1);

            match self.attempt(url).await {
                Attempt::Body(body) => return Ok(body),
                Attempt::Fatal(error) => return Err(error),
                Attempt::Transient(reason) => {
                    if !self.policy.allows_retry(retries) {
                        return Err(FetchError::RetriesExhausted {
                            url: url.to_string(),
                            attempts: retries + 1,
                            last_failure: reason,
                        });
                    }

                    retries += 1;
                    let delay = self.policy.delay_for(retries);
                    tracing::warn!(
                        "Transient failure fetching {} ({}), retry {}/{} in {:?}",
                        url,
                        reason,
                        retries,
                        self.policy.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
