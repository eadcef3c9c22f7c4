use crate::model::PageResponse;
use crate::parse::{check_meta, PageParser};

/// Parses pages served by the collection API
///
/// ```json
/// {
///   "pageMeta": { "number": 1, "total": 3, "totalElements": 5, "next": 2 },
///   "items": [ { "id": 17, "title": "Rust", "url": "https://rust-lang.org" } ]
/// }
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPageParser;

impl PageParser for JsonPageParser {
    fn parse(&self, raw: &str) -> Result<PageResponse, String> {
        let response: PageResponse = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        check_meta(&response)?;
        Ok(response)
    }
}
