//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use indicadores::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("indicadores.toml")).unwrap();
//! println!("Retries per fetch: {}", config.fetch.max_retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetchConfig, SourcesConfig, StorageConfig, DEFAULT_BCRA_URL, DEFAULT_RIOS_URL,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
