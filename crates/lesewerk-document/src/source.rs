// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document source — the bytes of one input document plus its best-effort
// media type.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lesewerk_core::error::Result;
use tracing::{debug, instrument};

use crate::dispatch::sniff_media_type;

/// One input document.
///
/// Cheap to clone: the bytes are shared. The media type is sniffed from the
/// content on construction; a caller that knows better can override it with
/// [`with_media_type`](Self::with_media_type).
#[derive(Debug, Clone)]
pub struct Document {
    file_name: String,
    path: Option<PathBuf>,
    media_type: Option<String>,
    data: Arc<[u8]>,
}

impl Document {
    /// Read a document from disk and sniff its media type.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let media_type = sniff_media_type(&data);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!(bytes = data.len(), media_type = ?media_type, "document read");

        Ok(Self {
            file_name,
            path: Some(path.to_path_buf()),
            media_type,
            data: data.into(),
        })
    }

    /// Wrap bytes already in memory and sniff their media type.
    ///
    /// In-memory documents have no filesystem entry, so their metadata
    /// carries a size but no timestamps.
    pub fn from_bytes(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let data: Vec<u8> = data.into();
        let media_type = sniff_media_type(&data);
        Self {
            file_name: file_name.into(),
            path: None,
            media_type,
            data: data.into(),
        }
    }

    /// Replace the sniffed media type with a declared one.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Forget the media type entirely.
    pub fn without_media_type(mut self) -> Self {
        self.media_type = None;
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Location on disk, when the document was opened from a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_sniffs_content_not_extension() {
        let dir = tempfile::tempdir().unwrap();
        // A PDF wearing a .txt suffix.
        let path = dir.path().join("report.txt");
        std::fs::write(&path, b"%PDF-1.7\n%binary").unwrap();

        let doc = Document::open(&path).await.unwrap();
        assert_eq!(doc.file_name(), "report.txt");
        assert_eq!(doc.media_type(), Some("application/pdf"));
        assert_eq!(doc.path(), Some(path.as_path()));
    }

    #[tokio::test]
    async fn open_missing_file_fails() {
        assert!(Document::open("/nonexistent/lesewerk.txt").await.is_err());
    }

    #[test]
    fn declared_media_type_overrides_sniffing() {
        let doc = Document::from_bytes("notes", b"plain words".to_vec())
            .with_media_type("text/markdown");
        assert_eq!(doc.media_type(), Some("text/markdown"));
        assert!(doc.path().is_none());
        assert_eq!(doc.len(), 11);
    }
}
