//! Replays pages from a local directory

use crate::config::PageFormat;
use crate::model::PageId;
use crate::source::{page_file_name, PageSource};
use crate::{Result, ShioriError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Reads pages saved by a `DirectoryArchive`
#[derive(Debug, Clone)]
pub struct ReplayPageSource {
    dir: PathBuf,
    format: PageFormat,
}

impl ReplayPageSource {
    pub fn new(dir: impl Into<PathBuf>, format: PageFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    /// Returns the path a page is replayed from
    pub fn page_path(&self, page: &PageId) -> PathBuf {
        self.dir.join(page_file_name(page, self.format))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl PageSource for ReplayPageSource {
    async fn load_page(&self, page: &PageId) -> Result<String> {
        let path = self.page_path(page);
        tracing::debug!("Replaying page {} from {}", page, path.display());

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ShioriError::PageRead { path, source })
    }
}
