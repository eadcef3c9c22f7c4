//! Saves raw pages to a local directory

use crate::config::PageFormat;
use crate::model::PageId;
use crate::source::{page_file_name, PageArchive};
use crate::{Result, ShioriError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Writes every fetched page to `<dir>/page-<id>.<ext>`
///
/// The files are laid out so that a `ReplayPageSource` pointed at the same
/// directory can replay the harvest offline.
#[derive(Debug, Clone)]
pub struct DirectoryArchive {
    dir: PathBuf,
    format: PageFormat,
}

impl DirectoryArchive {
    /// Creates an archive, creating the directory if it does not exist
    pub fn create(dir: impl Into<PathBuf>, format: PageFormat) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            tracing::info!("Creating archive directory {}", dir.display());
            std::fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir, format })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl PageArchive for DirectoryArchive {
    async fn save_page(&self, page: &PageId, content: &str) -> Result<()> {
        let path = self.dir.join(page_file_name(page, self.format));
        tokio::fs::write(&path, content).await.map_err(|e| {
            ShioriError::Archive(format!(
                "failed to write page {} to {}: {}",
                page,
                path.display(),
                e
            ))
        })?;
        tracing::debug!("Archived page {} to {}", page, path.display());
        Ok(())
    }
}
