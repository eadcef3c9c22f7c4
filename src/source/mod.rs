//! Page sources and the page archive
//!
//! This module contains the I/O adapters around the page chain:
//! - `HttpPageSource`: fetches pages from the collection endpoint
//! - `ReplayPageSource`: replays pages previously saved to disk
//! - `DirectoryArchive`: saves raw pages for later replay

mod archive;
mod network;
mod replay;

pub use archive::DirectoryArchive;
pub use network::{build_http_client, HttpPageSource};
pub use replay::ReplayPageSource;

use crate::config::PageFormat;
use crate::model::PageId;
use crate::Result;
use async_trait::async_trait;
use url::form_urlencoded;

/// Supplies raw page content for a page identifier
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Loads the raw content of one page
    async fn load_page(&self, page: &PageId) -> Result<String>;
}

/// Persists raw page content
///
/// Archiving is best-effort: callers log failures and carry on.
#[async_trait]
pub trait PageArchive: Send + Sync {
    /// Saves the raw content of one page
    async fn save_page(&self, page: &PageId, content: &str) -> Result<()>;
}

/// Builds the file name a page is archived under and replayed from
///
/// The identifier is percent-encoded, so distinct identifiers always map to
/// distinct files and cursor-style identifiers cannot escape the directory.
///
/// # Example
///
/// ```
/// use shiori_harvest::config::PageFormat;
/// use shiori_harvest::source::page_file_name;
///
/// assert_eq!(page_file_name(&"3".into(), PageFormat::Json), "page-3.json");
/// assert_eq!(page_file_name(&"a/b".into(), PageFormat::Json), "page-a%2Fb.json");
/// ```
pub fn page_file_name(page: &PageId, format: PageFormat) -> String {
    let encoded: String = form_urlencoded::byte_serialize(page.as_str().as_bytes())
        .collect::<String>()
        // `*` is left alone by form encoding but is not a portable file name character
        .replace('*', "%2A");
    format!("page-{}.{}", encoded, format.extension())
}
