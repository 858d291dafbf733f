//! Indicadores: Argentine economic indicators and river heights
//!
//! This crate scrapes the BCRA indicators page (UVA, UVI) and the Prefectura
//! Naval river heights table, publishes them as JSON snapshot and history
//! files, and answers current/history/range queries over those files.

pub mod config;
pub mod history;
pub mod indices;
pub mod ingest;
pub mod model;
pub mod query;
pub mod rivers;
pub mod source;
pub mod store;
pub mod text;

use thiserror::Error;

/// Main error type for indicator ingestion and queries
#[derive(Debug, Error)]
pub enum IndicadoresError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] source::FetchError),

    #[error("No data table found at {url}")]
    TableNotFound { url: String },

    #[error("Data table at {url} has no usable rows")]
    EmptyTable { url: String },

    #[error("Indicator {indicator} not found in source table")]
    IndicatorNotFound { indicator: String },

    #[error("No latest.json for category '{category}'")]
    CategoryNotFound { category: String },

    #[error("Invalid snapshot name: {0:?}")]
    InvalidSnapshotName(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for indicator operations
pub type Result<T> = std::result::Result<T, IndicadoresError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use ingest::{IngestReport, Ingestor};
pub use model::{DailyObservation, IpcSnapshot, MonthlyObservation, ObservationValue};
pub use query::{DailySeries, Indicators, Lookup};
pub use rivers::{RiverGroup, RiversReport, StateTag};
pub use store::{Category, DataStore};
