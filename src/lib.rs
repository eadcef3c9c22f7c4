//! Shiori-Harvest: a paginated bookmark collection harvester
//!
//! This crate walks a remotely hosted, paginated bookmark collection page by
//! page, stitches the pages into one ordered result, and optionally checks
//! that every bookmarked URL is still reachable.

pub mod config;
pub mod harvest;
pub mod model;
pub mod output;
pub mod parse;
pub mod progress;
pub mod source;
pub mod verify;

#[cfg(test)]
pub(crate) mod testutil;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Shiori-Harvest operations
#[derive(Debug, Error)]
pub enum ShioriError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for page {page}: {source}")]
    Http { page: String, source: reqwest::Error },

    #[error("Page {page} returned HTTP {status}")]
    PageStatus { page: String, status: u16 },

    #[error("Failed to read page file {path}: {source}")]
    PageRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse page {page}: {message}")]
    Parse { page: String, message: String },

    #[error("Page chain revisits page {page}")]
    PageCycle { page: String },

    #[error("Page chain exceeded the limit of {limit} pages")]
    PageLimit { limit: usize },

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Check failed for {url}: {message}")]
    Check { url: String, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

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

/// Result type alias for Shiori-Harvest operations
pub type Result<T> = std::result::Result<T, ShioriError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{harvest, Harvester};
pub use model::{CombinedResult, Item, PageId, PageMeta, PageResponse, ValidityOutcome};
