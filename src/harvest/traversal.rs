//! Page chain traversal
//!
//! Pages are linked only through the `next` identifier each page carries, so
//! the chain is walked strictly one page at a time: page N+1 is requested
//! only after page N has been loaded and parsed.
//!
//! # Step
//!
//! 1. Tick progress
//! 2. Append the page's items to the result
//! 3. If `next` is present: load it, archive it in the background, parse it
//! 4. Otherwise stop
//!
//! Load and parse failures end the traversal. Archive failures are logged.
//! Archive writes run in the background and outlive the traversal; see
//! `PendingArchives`.

use crate::model::{CombinedResult, PageId, PageResponse};
use crate::parse::PageParser;
use crate::progress::ProgressSink;
use crate::source::{PageArchive, PageSource};
use crate::{Result, ShioriError};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Default upper bound for one background archive write
pub const DEFAULT_ARCHIVE_TIMEOUT: Duration = Duration::from_secs(30);

/// Archive writes that were started but may not have finished
///
/// Dropping the set detaches the writes instead of cancelling them, so they
/// keep running for as long as the runtime does. Call `settle` to wait for
/// them, for example before a short-lived process exits.
#[derive(Default)]
pub struct PendingArchives {
    tasks: JoinSet<()>,
}

impl PendingArchives {
    /// Number of writes not yet settled
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Waits for every write to finish
    ///
    /// Each write is bounded by the archive timeout, so this cannot hang.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("Archive task did not complete: {}", e);
            }
        }
    }
}

impl Drop for PendingArchives {
    fn drop(&mut self) {
        if !self.tasks.is_empty() {
            tracing::debug!("Detaching {} unsettled archive writes", self.tasks.len());
            self.tasks.detach_all();
        }
    }
}

/// Walks a page chain and accumulates its items
pub struct PageChain<'a> {
    source: &'a dyn PageSource,
    parser: &'a dyn PageParser,
    progress: &'a dyn ProgressSink,
    archive: Option<Arc<dyn PageArchive>>,
    archive_timeout: Duration,
    max_pages: Option<usize>,
    visited: HashSet<PageId>,
    pending: PendingArchives,
}

impl<'a> PageChain<'a> {
    pub fn new(
        source: &'a dyn PageSource,
        parser: &'a dyn PageParser,
        progress: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            source,
            parser,
            progress,
            archive: None,
            archive_timeout: DEFAULT_ARCHIVE_TIMEOUT,
            max_pages: None,
            visited: HashSet::new(),
            pending: PendingArchives::default(),
        }
    }

    /// Archives every loaded page in the background
    pub fn with_archive(mut self, archive: Arc<dyn PageArchive>, timeout: Duration) -> Self {
        self.archive = Some(archive);
        self.archive_timeout = timeout;
        self
    }

    /// Fails the traversal once more than `max_pages` pages were requested
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Loads, archives and parses one page
    ///
    /// # Returns
    ///
    /// * `Ok(PageResponse)` - The parsed page
    /// * `Err(ShioriError::PageCycle)` - The page was already loaded by this chain
    /// * `Err(ShioriError::PageLimit)` - The page limit would be exceeded
    /// * `Err(ShioriError)` - Loading or parsing failed
    pub async fn fetch_page(&mut self, page: &PageId) -> Result<PageResponse> {
        if !self.visited.insert(page.clone()) {
            return Err(ShioriError::PageCycle {
                page: page.to_string(),
            });
        }

        if let Some(limit) = self.max_pages {
            if self.visited.len() > limit {
                return Err(ShioriError::PageLimit { limit });
            }
        }

        tracing::debug!("Fetching page {}", page);
        let raw = self.source.load_page(page).await?;

        self.archive_in_background(page, &raw);

        self.parser.parse(&raw).map_err(|message| ShioriError::Parse {
            page: page.to_string(),
            message,
        })
    }

    /// Walks the chain starting from an already fetched page
    ///
    /// # Arguments
    ///
    /// * `initial` - The first page of the chain
    /// * `result` - Accumulator the items are appended to
    pub async fn collect(
        &mut self,
        initial: PageResponse,
        mut result: CombinedResult,
    ) -> Result<CombinedResult> {
        let mut response = initial;

        loop {
            self.progress.tick();

            let PageResponse { page_meta, items } = response;
            tracing::debug!(
                "Page {}/{}: {} items",
                page_meta.number,
                page_meta.total,
                items.len()
            );
            result.append(items);

            match page_meta.next {
                Some(next) => response = self.fetch_page(&next).await?,
                None => break,
            }
        }

        if !result.matches_declared_total() {
            tracing::warn!(
                "Collected {} items but the collection declares {}",
                result.items.len(),
                result.total_elements
            );
        }

        Ok(result)
    }

    /// Number of archive writes that have not been settled yet
    pub fn pending_archives(&self) -> usize {
        self.pending.len()
    }

    /// Waits for outstanding archive writes to finish
    pub async fn settle_archives(&mut self) {
        self.pending.settle().await;
    }

    /// Ends the traversal, handing over the archive writes still in flight
    pub fn into_pending(self) -> PendingArchives {
        self.pending
    }

    fn archive_in_background(&mut self, page: &PageId, raw: &str) {
        let Some(archive) = &self.archive else {
            return;
        };

        let archive = Arc::clone(archive);
        let page = page.clone();
        let content = raw.to_string();
        let timeout = self.archive_timeout;

        self.pending.tasks.spawn(async move {
            match tokio::time::timeout(timeout, archive.save_page(&page, &content)).await {
                Ok(Ok(())) => tracing::debug!("Archived page {}", page),
                Ok(Err(e)) => tracing::warn!("Failed to archive page {}: {}", page, e),
                Err(_) => tracing::warn!("Archiving page {} timed out after {:?}", page, timeout),
            }
        });
    }
}
