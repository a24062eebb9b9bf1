// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability traits for the engines Lesewerk depends on but does not
// implement.
//
// All traits are async and object-safe (via `async-trait`) so the pipeline can
// hold them as `Box<dyn _>` / `Arc<dyn _>` and swap implementations per host.
// Implementations need not be safe for concurrent calls: the pipeline keeps at
// most one call in flight per recognizer and labeler handle.

use std::path::Path;

use async_trait::async_trait;
use lesewerk_core::error::EngineError;
use lesewerk_core::types::{ContentLabel, FileStats, RecognizedText};

/// Converts image pixels into hierarchical recognized text.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Engine identifier for logs (e.g. "mlkit", "tesseract").
    fn name(&self) -> &str;

    /// Load models or open sessions. Called once, before the first
    /// [`recognize`](Self::recognize).
    async fn init(&self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Recognize the text in an encoded image (JPEG, PNG, ...).
    async fn recognize(&self, image: &[u8]) -> Result<RecognizedText, EngineError>;

    /// Release engine resources. No further calls follow.
    async fn close(&self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Classifies the visual content of an image.
#[async_trait]
pub trait ImageLabeler: Send + Sync {
    /// Engine identifier for logs.
    fn name(&self) -> &str;

    /// Load models or open sessions. Called once, before the first
    /// [`label`](Self::label).
    async fn init(&self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Labels for an encoded image, in the engine's own order.
    async fn label(&self, image: &[u8]) -> Result<Vec<ContentLabel>, EngineError>;

    /// Release engine resources. No further calls follow.
    async fn close(&self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Opens PDF documents for page-by-page text retrieval.
#[async_trait]
pub trait PdfBackend: Send + Sync {
    /// Parse `data` and return a handle on its pages.
    async fn open(&self, data: &[u8]) -> Result<Box<dyn PdfPages>, EngineError>;
}

/// An opened PDF document.
#[async_trait]
pub trait PdfPages: Send + Sync {
    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Text of page `index`, 1-indexed (`1..=page_count()`).
    async fn page_text(&self, index: u32) -> Result<String, EngineError>;
}

/// Reads size and timestamps for a file on disk.
#[async_trait]
pub trait FileStat: Send + Sync {
    async fn stat(&self, path: &Path) -> Result<FileStats, EngineError>;
}
