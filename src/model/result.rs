use crate::model::{Item, PageMeta};
use serde::{Deserialize, Serialize};

/// The whole collection stitched together from every page
///
/// Items keep the order of the source collection: page order first, then the
/// order within each page. Traversal only appends and verification only
/// annotates, so that order survives to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedResult {
    pub title: String,
    pub pages: u32,
    pub total_elements: u64,
    pub items: Vec<Item>,
}

impl CombinedResult {
    /// Creates an empty result shell seeded from the first page's metadata
    pub fn from_first_page(title: impl Into<String>, meta: &PageMeta) -> Self {
        Self {
            title: title.into(),
            pages: meta.total,
            total_elements: meta.total_elements,
            items: Vec::new(),
        }
    }

    /// Appends one page's items, preserving their order
    pub fn append(&mut self, items: Vec<Item>) {
        self.items.extend(items);
    }

    /// Returns true if the number of collected items matches the declared total
    pub fn matches_declared_total(&self) -> bool {
        self.items.len() as u64 == self.total_elements
    }
}
