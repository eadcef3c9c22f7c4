//! Page and item types produced by the page parsers

use crate::model::ValidityOutcome;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque identifier of one page in the page chain
///
/// Upstream sources hand out page identifiers either as numbers or as
/// strings, so both are accepted on the wire. The identifier is always
/// carried around in its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for PageId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for PageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        string_or_number(deserializer).map(PageId)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Text(s) => s,
        StringOrNumber::Unsigned(n) => n.to_string(),
        StringOrNumber::Signed(n) => n.to_string(),
    })
}

/// Pagination metadata attached to every page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// 1-based position of this page
    pub number: u32,

    /// Declared number of pages; only trusted for progress display
    pub total: u32,

    /// Declared number of items across all pages
    pub total_elements: u64,

    /// Identifier of the following page, absent on the last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<PageId>,
}

impl PageMeta {
    /// Returns true if this is the last page of the chain
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// One parsed page of the collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub page_meta: PageMeta,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// A single bookmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    pub title: String,

    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Outcome of each verification check, keyed by check name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity: Option<BTreeMap<String, ValidityOutcome>>,
}

impl Item {
    /// Creates an unverified item
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            description: None,
            tags: Vec::new(),
            validity: None,
        }
    }

    /// Records the outcome of one check
    pub fn record_validity(&mut self, check: &str, outcome: ValidityOutcome) {
        self.validity
            .get_or_insert_with(BTreeMap::new)
            .insert(check.to_string(), outcome);
    }

    /// Returns the recorded outcome of one check
    pub fn validity_of(&self, check: &str) -> Option<&ValidityOutcome> {
        self.validity.as_ref().and_then(|v| v.get(check))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_from_number_and_string() {
        let numeric: PageId = serde_json::from_str("7").unwrap();
        let text: PageId = serde_json::from_str("\"cursor-abc\"").unwrap();

        assert_eq!(numeric, PageId::from(7));
        assert_eq!(text.as_str(), "cursor-abc");
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "\"7\"");
    }

    #[test]
    fn test_page_meta_camel_case() {
        let meta: PageMeta =
            serde_json::from_str(r#"{"number":1,"total":3,"totalElements":5,"next":2}"#).unwrap();

        assert_eq!(meta.total_elements, 5);
        assert_eq!(meta.next, Some(PageId::from(2)));
        assert!(!meta.is_last());
    }

    #[test]
    fn test_missing_next_is_last_page() {
        let meta: PageMeta =
            serde_json::from_str(r#"{"number":3,"total":3,"totalElements":5}"#).unwrap();
        assert!(meta.is_last());
    }

    #[test]
    fn test_item_numeric_id() {
        let item: Item =
            serde_json::from_str(r#"{"id":42,"title":"Rust","url":"https://rust-lang.org"}"#)
                .unwrap();

        assert_eq!(item.id, "42");
        assert!(item.validity.is_none());
        assert!(item.tags.is_empty());
    }

    #[test]
    fn test_record_validity() {
        let mut item = Item::new("1", "Rust", "https://rust-lang.org");
        assert!(item.validity_of("url").is_none());

        item.record_validity("url", ValidityOutcome::Reachable);
        assert_eq!(item.validity_of("url"), Some(&ValidityOutcome::Reachable));
        assert_eq!(item.validity.as_ref().map(|v| v.len()), Some(1));
    }

    #[test]
    fn test_unverified_item_omits_validity() {
        let item = Item::new("1", "Rust", "https://rust-lang.org");
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("validity"));
    }
}
