// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Local filesystem stat capability.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lesewerk_core::error::EngineError;
use lesewerk_core::types::FileStats;
use tracing::debug;

use crate::traits::FileStat;

/// Stats files through `tokio::fs::metadata`.
///
/// `changed_at` is the inode status-change time on Unix and the creation time
/// elsewhere; when the platform reports neither it falls back to the
/// modification time.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileStat;

#[async_trait]
impl FileStat for LocalFileStat {
    async fn stat(&self, path: &Path) -> Result<FileStats, EngineError> {
        let metadata = tokio::fs::metadata(path).await?;
        let modified_at: DateTime<Utc> = metadata.modified()?.into();
        let changed_at = changed_time(&metadata).unwrap_or(modified_at);

        debug!(path = %path.display(), size = metadata.len(), "file stat");

        Ok(FileStats {
            size: metadata.len(),
            modified_at,
            changed_at,
        })
    }
}

#[cfg(unix)]
fn changed_time(metadata: &std::fs::Metadata) -> Option<DateTime<Utc>> {
    use std::os::unix::fs::MetadataExt;

    let nanos = u32::try_from(metadata.ctime_nsec()).ok()?;
    DateTime::from_timestamp(metadata.ctime(), nanos)
}

#[cfg(not(unix))]
fn changed_time(metadata: &std::fs::Metadata) -> Option<DateTime<Utc>> {
    metadata.created().ok().map(DateTime::<Utc>::from)
}
