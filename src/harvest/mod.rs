//! Harvest module
//!
//! This module contains the core harvesting logic:
//! - Walking the page chain one page at a time
//! - Archiving pages in the background
//! - Handing the collected items to verification

mod harvester;
mod traversal;

pub use harvester::Harvester;
pub use traversal::{PageChain, PendingArchives, DEFAULT_ARCHIVE_TIMEOUT};

use crate::config::Config;
use crate::model::CombinedResult;
use crate::Result;

/// Runs a complete harvest operation
///
/// This is the main entry point for harvesting a collection. It will:
/// 1. Compose the page source, parser, archive and verifier from `config`
/// 2. Walk the page chain
/// 3. Verify the collected items if configured
/// 4. Wait for outstanding archive writes, so the archive is complete once
///    this returns
///
/// Use `Harvester` directly to get the result without waiting for the archive.
///
/// # Example
///
/// ```no_run
/// use shiori_harvest::config::load_config;
/// use shiori_harvest::harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let result = harvest(&config).await?;
/// println!("{} bookmarks", result.items.len());
/// # Ok(())
/// # }
/// ```
pub async fn harvest(config: &Config) -> Result<CombinedResult> {
    let harvester = Harvester::from_config(config)?;
    let result = harvester.fetch().await;
    harvester.settle_archives().await;
    result
}
