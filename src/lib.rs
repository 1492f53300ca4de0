//! Byggesak-Scraper: a polite scraper for municipal building-permit portals
//!
//! This crate retrieves building-permit case records published as HTML by
//! municipal case-management portals, normalizing them into typed records
//! while respecting per-target rate limits and identifying itself to origin
//! operators.

pub mod config;
pub mod models;
pub mod scrape;
pub mod validate;

use thiserror::Error;

/// Main error type for scrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Parsing(#[from] ParsingError),
}

/// Transport and HTTP-level failures
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Failed to fetch {url}: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Giving up on {url} after {attempts} attempts (last status: HTTP {status})")]
    RetriesExhausted {
        url: String,
        status: u16,
        attempts: u32,
    },
}

/// HTML extraction failures
#[derive(Debug, Error)]
pub enum ParsingError {
    #[error("Missing required fields: {}", .fields.join(", "))]
    MissingRequiredFields { fields: Vec<&'static str> },

    #[error("Unrecognizable document structure: {0}")]
    Structure(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read targets file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown target: {name}. Available: {available}")]
    UnknownTarget { name: String, available: String },

    #[error("Target '{0}' is not enabled; its portal URLs may not be configured yet")]
    TargetDisabled(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result type alias for scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{ClientConfig, Registry, TargetConfig};
pub use models::{CaseRecord, SearchSummary};
pub use scrape::{ScrapeReport, Scraper};
