//! Data model for harvested collections
//!
//! # Components
//!
//! - `PageResponse` / `PageMeta`: one parsed page and its pagination metadata
//! - `Item`: a single bookmark, annotated with check outcomes after verification
//! - `CombinedResult`: every page's items stitched together in source order
//! - `ValidityOutcome`: the recorded result of one check on one item

mod outcome;
mod page;
mod result;

// Re-export main types
pub use outcome::ValidityOutcome;
pub use page::{Item, PageId, PageMeta, PageResponse};
pub use result::CombinedResult;
