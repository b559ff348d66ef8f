//! Maps validated filenames to files under the downloads root.

use super::SafeFilename;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("File not found")]
    NotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A regular file found directly under the downloads root.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    pub filename: SafeFilename,
    pub path: PathBuf,
    pub len: u64,
}

#[derive(Debug, Clone)]
pub struct DownloadResolver {
    root: PathBuf,
}

impl DownloadResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn root_exists(&self) -> bool {
        fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    /// Looks up `filename` directly under the root.
    ///
    /// Directories and missing entries are both reported as
    /// [`ResolveError::NotFound`].
    pub async fn resolve(&self, filename: &SafeFilename) -> Result<ResolvedFile, ResolveError> {
        let path = self.root.join(filename.as_str());
        debug_assert!(path.starts_with(&self.root));

        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(ResolveError::NotFound),
            Err(err) => return Err(ResolveError::Io(err)),
        };
        if !metadata.is_file() {
            return Err(ResolveError::NotFound);
        }

        Ok(ResolvedFile {
            filename: filename.clone(),
            path,
            len: metadata.len(),
        })
    }
}
