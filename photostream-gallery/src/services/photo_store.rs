//! Persisted photo collection document
//!
//! The whole collection is one JSON array on disk, rewritten after every
//! mutation. Loading is self-healing: a missing document means an empty
//! gallery, and a corrupt document is discarded so the next save starts
//! clean instead of failing forever.

use photostream_common::PhotoRecord;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Photo store errors (save path only; load never fails)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Disk mirror of the photo collection
pub struct PhotoStore {
    path: PathBuf,
}

impl PhotoStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted collection
    ///
    /// Returns an empty collection when the document is missing, unreadable,
    /// or corrupt. A corrupt document is deleted so it cannot shadow future
    /// saves.
    pub async fn load(&self) -> Vec<PhotoRecord> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No photo document at {}; starting empty", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!(
                    "Failed to read photo document {}: {}; starting empty",
                    self.path.display(),
                    e
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<PhotoRecord>>(&text) {
            Ok(photos) => {
                debug!(count = photos.len(), "Loaded photo document");
                photos
            }
            Err(e) => {
                warn!(
                    "Corrupt photo document {}: {}; discarding it",
                    self.path.display(),
                    e
                );
                self.discard_corrupt_document().await;
                Vec::new()
            }
        }
    }

    /// Write the collection to disk
    ///
    /// Writes to a temporary file and renames it into place, so an
    /// interrupted save leaves the previous document intact.
    pub async fn save(&self, photos: &[PhotoRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(photos)?;
        let tmp_path = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, &json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        debug!(count = photos.len(), "Saved photo document");
        Ok(())
    }

    async fn discard_corrupt_document(&self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            warn!(
                "Failed to remove corrupt photo document {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
