//! Krisha-Scout: an adaptive crawl and extraction pipeline for krisha.kz
//!
//! This crate crawls apartment-sale listings for a `(city, district, pages)`
//! scope, recovers typed fields from loosely structured listing pages, and
//! checkpoints results incrementally while pacing its own request rate to
//! stay below the site's detection thresholds.

pub mod config;
pub mod crawler;
pub mod districts;
pub mod extract;
pub mod output;
pub mod record;
pub mod state;

use thiserror::Error;

/// Main error type for Krisha-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// A checkpoint flush failed repeatedly; everything durably written so
    /// far is preserved, but the run cannot safely continue.
    #[error("Checkpoint sink failure: {0}")]
    Sink(String),
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

    #[error("Unknown district: {0}")]
    UnknownDistrict(String),
}

/// Result type alias for Krisha-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use districts::{City, District};
pub use record::ListingRecord;
pub use state::CrawlState;
