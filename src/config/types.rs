use serde::{Deserialize, Serialize};

/// Browser user agent sent to government sites that reject unknown clients
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Prefectura Naval Argentina river heights page
pub const DEFAULT_RIOS_URL: &str = "https://contenidosweb.prefecturanaval.gob.ar/alturas/";

/// BCRA main indicators page (UVA and UVI rows)
pub const DEFAULT_BCRA_URL: &str = "https://www.bcra.gob.ar/estadisticas-indicadores/";

/// Main configuration structure
///
/// Every section has defaults, so an empty file (or no file at all) is valid.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Outbound HTTP policy shared by every adapter
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FetchConfig {
    /// User-Agent header value
    pub user_agent: String,

    /// Accept-Language header value
    pub accept_language: String,

    /// Referer header value
    pub referer: String,

    /// Total request timeout (seconds)
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Retries after the first attempt for transient failures
    pub max_retries: u32,

    /// Delay before the first retry (milliseconds); doubles on each retry
    pub backoff_base_ms: u64,

    /// Skip TLS verification for misconfigured government endpoints
    pub accept_invalid_certs: bool,

    /// Name of the environment variable holding an optional forward proxy URL
    pub proxy_env: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "es-AR,es;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
            referer: "https://www.argentina.gob.ar/".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_retries: 3,
            backoff_base_ms: 2000,
            accept_invalid_certs: true,
            proxy_env: "RIO_PROXY".to_string(),
        }
    }
}

/// On-disk snapshot/history layout
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    /// Root directory holding one subdirectory per category
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

/// Upstream pages scraped by the adapters
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SourcesConfig {
    pub rios_url: String,
    pub bcra_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            rios_url: DEFAULT_RIOS_URL.to_string(),
            bcra_url: DEFAULT_BCRA_URL.to_string(),
        }
    }
}
