//! Page parsers
//!
//! A parser turns the raw content of one page into a `PageResponse`. Two
//! formats are supported:
//! - JSON pages (`JsonPageParser`), the collection API's native format
//! - HTML listing pages (`HtmlPageParser`), scraped with `scraper`

mod html;
mod json;

pub use html::HtmlPageParser;
pub use json::JsonPageParser;

use crate::config::PageFormat;
use crate::model::PageResponse;
use std::sync::Arc;

/// Converts raw page content into a structured page
pub trait PageParser: Send + Sync {
    /// Parses one page
    ///
    /// # Returns
    ///
    /// * `Ok(PageResponse)` - Successfully parsed page
    /// * `Err(String)` - Description of why the content is not a valid page
    fn parse(&self, raw: &str) -> Result<PageResponse, String>;
}

/// Returns the parser for a page format
pub fn parser_for(format: PageFormat) -> Arc<dyn PageParser> {
    match format {
        PageFormat::Json => Arc::new(JsonPageParser),
        PageFormat::Html => Arc::new(HtmlPageParser),
    }
}

/// Rejects metadata that violates the pagination contract
fn check_meta(response: &PageResponse) -> Result<(), String> {
    let meta = &response.page_meta;
    if meta.number < 1 {
        return Err(format!("page number must be >= 1, got {}", meta.number));
    }
    if meta.total < 1 {
        return Err(format!("page total must be >= 1, got {}", meta.total));
    }
    Ok(())
}
