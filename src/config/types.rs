use serde::Deserialize;
use std::path::PathBuf;

/// Endpoint used when the configuration does not name one
pub const DEFAULT_ENDPOINT: &str = "https://bookmarks.example.com/api/accounts/";

/// Main configuration structure for Shiori-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub account: AccountConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which collection to harvest
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    /// Account identifier used to address the collection
    pub id: String,

    /// Title for the combined result (defaults to the account id)
    #[serde(default)]
    pub title: Option<String>,
}

impl AccountConfig {
    /// Returns the configured title, falling back to the account id
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// Where pages come from and where they are archived
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base endpoint of the collection API
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Replay pages from this directory instead of the network
    #[serde(rename = "replay-dir", default)]
    pub replay_dir: Option<PathBuf>,

    /// Save every fetched page into this directory
    #[serde(rename = "archive-dir", default)]
    pub archive_dir: Option<PathBuf>,

    /// Raw page format
    #[serde(default)]
    pub format: PageFormat,

    /// Identifier of the first page in the chain
    #[serde(rename = "first-page", default = "default_first_page")]
    pub first_page: String,

    /// Network timeout for one page request (seconds)
    #[serde(rename = "timeout-secs", default = "default_source_timeout")]
    pub timeout_secs: u64,

    /// Hard upper bound on the number of pages walked
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<usize>,

    /// Upper bound for one background archive write (seconds)
    #[serde(rename = "archive-timeout-secs", default = "default_archive_timeout")]
    pub archive_timeout_secs: u64,
}

impl SourceConfig {
    /// Returns the endpoint to use for network fetches
    pub fn effective_endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            replay_dir: None,
            archive_dir: None,
            format: PageFormat::default(),
            first_page: default_first_page(),
            timeout_secs: default_source_timeout(),
            max_pages: None,
            archive_timeout_secs: default_archive_timeout(),
        }
    }
}

/// Raw page content format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    #[default]
    Json,
    Html,
}

impl PageFormat {
    /// File extension used for replayed and archived pages
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
        }
    }
}

/// Post-harvest item checks
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    /// Check that every bookmarked URL is reachable
    #[serde(rename = "check-urls", default)]
    pub check_urls: bool,

    /// Timeout for a single URL check (seconds)
    #[serde(rename = "timeout-secs", default = "default_check_timeout")]
    pub timeout_secs: u64,
}

impl VerificationConfig {
    /// Returns true if any check is enabled
    pub fn is_enabled(&self) -> bool {
        self.check_urls
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            check_urls: false,
            timeout_secs: default_check_timeout(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON result file
    #[serde(rename = "result-path")]
    pub result_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

/// Diagnostic logging
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log per-item verification progress at info level
    #[serde(default)]
    pub verbose: bool,
}

fn default_first_page() -> String {
    "1".to_string()
}

fn default_source_timeout() -> u64 {
    30
}

fn default_archive_timeout() -> u64 {
    30
}

fn default_check_timeout() -> u64 {
    10
}
