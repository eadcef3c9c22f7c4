//! Output module for persisting and reporting harvest results
//!
//! This module handles:
//! - Writing the combined result as JSON and loading it back
//! - Computing and printing harvest statistics
//! - Generating markdown summaries of a harvest

mod json;
mod markdown;
pub mod stats;

pub use json::{load_result, write_result};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_statistics, HarvestStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output to {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
