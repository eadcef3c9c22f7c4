//! Harvest orchestration
//!
//! The harvester is composed once from interchangeable capabilities (page
//! source, parser, optional archive, optional verifier, progress sink) and
//! then runs the whole operation:
//!
//! 1. Fetch the first page and seed the result from its metadata
//! 2. Walk the rest of the page chain
//! 3. Verify the collected items, if a verifier is configured
//! 4. Return the combined result
//!
//! Archive writes never hold up the result. Writes still running when `fetch`
//! returns are kept by the harvester until `settle_archives` is awaited, or
//! detached when the harvester is dropped.

use crate::config::Config;
use crate::config::validate;
use crate::harvest::traversal::{PageChain, PendingArchives, DEFAULT_ARCHIVE_TIMEOUT};
use crate::model::{CombinedResult, PageId};
use crate::parse::{parser_for, PageParser};
use crate::progress::{LogProgress, NullProgress, ProgressSink};
use crate::source::{DirectoryArchive, HttpPageSource, PageArchive, PageSource, ReplayPageSource};
use crate::verify::{panic_message, HttpReachabilityChecker, UrlCheck, VerificationPipeline};
use crate::Result;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Harvests one collection end to end
pub struct Harvester {
    source: Arc<dyn PageSource>,
    parser: Arc<dyn PageParser>,
    archive: Option<Arc<dyn PageArchive>>,
    verifier: Option<VerificationPipeline>,
    progress: Arc<dyn ProgressSink>,
    title: String,
    first_page: PageId,
    max_pages: Option<usize>,
    archive_timeout: Duration,
    pending: Mutex<Vec<PendingArchives>>,
}

impl Harvester {
    /// Creates a harvester with no archive, no verification and silent progress
    pub fn new(source: Arc<dyn PageSource>, parser: Arc<dyn PageParser>) -> Self {
        Self {
            source,
            parser,
            archive: None,
            verifier: None,
            progress: Arc::new(NullProgress),
            title: String::new(),
            first_page: PageId::from(1),
            max_pages: None,
            archive_timeout: DEFAULT_ARCHIVE_TIMEOUT,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Composes a harvester from configuration
    ///
    /// Validates the configuration, then picks the replay source when
    /// `replay-dir` is set and the HTTP source otherwise, adds the archive and
    /// URL check when configured, and reports progress through the log.
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(ShioriError::Config)` - The configuration is invalid
    /// * `Err(ShioriError)` - An HTTP client or the archive directory could not be set up
    pub fn from_config(config: &Config) -> Result<Self> {
        validate(config)?;
        let format = config.source.format;

        let source: Arc<dyn PageSource> = match &config.source.replay_dir {
            Some(dir) => {
                let replay = ReplayPageSource::new(dir, format);
                tracing::info!("Replaying pages from {}", replay.dir().display());
                Arc::new(replay)
            }
            None => {
                let endpoint = config.source.effective_endpoint();
                tracing::info!("Fetching pages for '{}' from {}", config.account.id, endpoint);
                Arc::new(HttpPageSource::new(
                    endpoint,
                    &config.account.id,
                    Duration::from_secs(config.source.timeout_secs),
                )?)
            }
        };

        let mut harvester = Self::new(source, parser_for(format))
            .with_title(config.account.display_title())
            .with_first_page(PageId::new(config.source.first_page.trim()))
            .with_max_pages(config.source.max_pages)
            .with_archive_timeout(Duration::from_secs(config.source.archive_timeout_secs))
            .with_progress(Arc::new(LogProgress::new()));

        if let Some(dir) = &config.source.archive_dir {
            let archive = DirectoryArchive::create(dir, format)?;
            tracing::info!("Archiving pages to {}", archive.dir().display());
            harvester = harvester.with_archive(Arc::new(archive));
        }

        if config.verification.check_urls {
            let request_timeout = Duration::from_secs(config.verification.timeout_secs);
            let checker = HttpReachabilityChecker::new(request_timeout)?;
            // A check may issue HEAD and then GET
            let check = UrlCheck::new(Arc::new(checker), request_timeout * 2);

            harvester = harvester.with_verifier(
                VerificationPipeline::new()
                    .with_check(Arc::new(check))
                    .verbose(config.logging.verbose),
            );
        }

        Ok(harvester)
    }

    pub fn with_archive(mut self, archive: Arc<dyn PageArchive>) -> Self {
        self.archive = Some(archive);
        self
    }

    pub fn with_archive_timeout(mut self, timeout: Duration) -> Self {
        self.archive_timeout = timeout;
        self
    }

    pub fn with_verifier(mut self, verifier: VerificationPipeline) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_first_page(mut self, page: PageId) -> Self {
        self.first_page = page;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Runs the harvest
    ///
    /// Returns as soon as the result is ready. Archive writes still running
    /// are kept until `settle_archives` is awaited.
    ///
    /// # Returns
    ///
    /// * `Ok(CombinedResult)` - Every page's items in source order, verified if configured
    /// * `Err(ShioriError)` - A page could not be loaded or parsed; nothing is returned
    pub async fn fetch(&self) -> Result<CombinedResult> {
        let mut chain = PageChain::new(
            self.source.as_ref(),
            self.parser.as_ref(),
            self.progress.as_ref(),
        )
        .with_max_pages(self.max_pages);
        if let Some(archive) = &self.archive {
            chain = chain.with_archive(Arc::clone(archive), self.archive_timeout);
        }

        self.progress.begin_step("Fetching pages");
        let collected = self.collect(&mut chain).await;
        self.keep_pending(chain.into_pending());

        let mut result = match collected {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Harvest aborted: {}", e);
                return Err(e);
            }
        };
        self.progress.finish();

        tracing::info!(
            "Collected {} items from '{}' ({} pages)",
            result.items.len(),
            result.title,
            result.pages
        );

        if let Some(verifier) = &self.verifier {
            self.progress.begin_step("Verifying bookmarks");

            let verification =
                AssertUnwindSafe(verifier.verify(&mut result.items, self.progress.as_ref()))
                    .catch_unwind()
                    .await;

            match verification {
                Ok(summary) => tracing::info!(
                    "Verified {} items: {} passed, {} failed, {} errors",
                    summary.items,
                    summary.passed,
                    summary.failed,
                    summary.errors
                ),
                Err(panic) => tracing::error!(
                    "Verification aborted, returning unverified items: {}",
                    panic_message(panic.as_ref())
                ),
            }

            self.progress.finish();
        }

        Ok(result)
    }

    /// Number of archive writes from earlier `fetch` calls not yet settled
    pub fn pending_archives(&self) -> usize {
        self.lock_pending().iter().map(PendingArchives::len).sum()
    }

    /// Waits for every archive write started by earlier `fetch` calls
    ///
    /// Each write is bounded by the archive timeout, so this cannot hang.
    pub async fn settle_archives(&self) {
        let batches = std::mem::take(&mut *self.lock_pending());
        for mut batch in batches {
            batch.settle().await;
        }
    }

    fn keep_pending(&self, pending: PendingArchives) {
        if !pending.is_empty() {
            self.lock_pending().push(pending);
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, Vec<PendingArchives>> {
        // A poisoned list is still a valid list
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn collect(&self, chain: &mut PageChain<'_>) -> Result<CombinedResult> {
        let first = chain.fetch_page(&self.first_page).await?;
        let result = CombinedResult::from_first_page(self.title.clone(), &first.page_meta);
        self.progress.set_total(u64::from(first.page_meta.total));
        chain.collect(first, result).await
    }
}
