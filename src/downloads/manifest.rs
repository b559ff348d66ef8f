//! The downloads manifest: a JSON array of [`DownloadEntry`] records.
//!
//! The manifest is written by the deployment step and only ever read here.
//! Nothing is cached, every [`ManifestStore::load`] reads the file again.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Manifest does not exist: {0}")]
    Missing(PathBuf),

    #[error("Failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest is not a valid JSON array of downloads: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DownloadEntry {
    pub filename: String,
    pub name: String,
    pub version: String,

    /// Descriptive fields (size, description, date, ...) passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<DownloadEntry>,
}

impl Manifest {
    pub fn new(entries: Vec<DownloadEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DownloadEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<DownloadEntry> {
        self.entries
    }
}

#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Manifest, ManifestError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(ManifestError::Missing(self.path.clone()))
            }
            Err(err) => return Err(ManifestError::Io(err)),
        };
        let manifest: Manifest = serde_json::from_str(&content)?;
        debug!(
            "Loaded manifest {} with {} entries",
            self.path.display(),
            manifest.len()
        );
        Ok(manifest)
    }
}
