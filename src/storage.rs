//! Transient per-request document storage.
//!
//! Uploaded bytes land in a dedicated `TempDir` under an opaque UUID key,
//! never under the caller-supplied filename. That closes two holes at
//! once: a crafted filename cannot traverse out of the storage root, and
//! two concurrent uploads of `form.pdf` cannot clobber each other. The
//! caller's filename is kept only as display metadata for the response.
//!
//! The `TempDir` is held by [`StoredDocument`] and removed when the value
//! drops, on every exit path. The derived first-page PNG is written next
//! to the PDF inside the same directory, so it is cleaned up with it.

use crate::error::ExtractError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;
use uuid::Uuid;

/// An uploaded document persisted for the duration of one request.
pub struct StoredDocument {
    display_name: String,
    path: PathBuf,
    /// Kept alive so the directory (PDF plus derived PNG) outlives the
    /// whole pipeline and is deleted when the request finishes.
    _dir: TempDir,
}

impl StoredDocument {
    /// Write uploaded bytes to a fresh temp directory under an opaque key.
    ///
    /// `display_name` is whatever the caller named the file; it is stored
    /// as metadata only and never used to build a path.
    pub async fn write(bytes: &[u8], display_name: &str) -> Result<Self, ExtractError> {
        let dir = TempDir::new().map_err(|e| ExtractError::Io {
            path: std::env::temp_dir(),
            source: e,
        })?;

        let path = dir.path().join(format!("{}.pdf", Uuid::new_v4()));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ExtractError::Io {
                path: path.clone(),
                source: e,
            })?;

        debug!(
            display_name,
            stored = %path.display(),
            bytes = bytes.len(),
            "Stored uploaded document"
        );

        Ok(Self {
            display_name: display_name.to_string(),
            path,
            _dir: dir,
        })
    }

    /// Path of the stored PDF.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The filename the caller supplied, for display only.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_stores_bytes_under_opaque_key() {
        let doc = StoredDocument::write(b"%PDF-1.4 test", "my form.pdf")
            .await
            .unwrap();

        assert_eq!(doc.display_name(), "my form.pdf");
        // The storage key is opaque, not the caller's name.
        let file_name = doc.path().file_name().unwrap().to_str().unwrap();
        assert!(!file_name.contains("my form"));
        assert!(file_name.ends_with(".pdf"));

        let stored = tokio::fs::read(doc.path()).await.unwrap();
        assert_eq!(stored, b"%PDF-1.4 test");
    }

    #[tokio::test]
    async fn traversal_filename_cannot_escape_storage() {
        let doc = StoredDocument::write(b"%PDF-1.4", "../../etc/passwd")
            .await
            .unwrap();
        // Display name is metadata only; the stored path stays inside the
        // temp directory.
        assert!(doc.path().starts_with(doc._dir.path()));
    }

    #[tokio::test]
    async fn drop_removes_storage() {
        let path;
        {
            let doc = StoredDocument::write(b"%PDF-1.4", "a.pdf").await.unwrap();
            path = doc.path().to_path_buf();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }
}
