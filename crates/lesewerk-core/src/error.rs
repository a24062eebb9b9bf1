// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Lesewerk.
//
// `EngineError` is what an external capability (recognizer, labeler, PDF
// reader, filesystem stat) reports. `LesewerkError` is what the pipeline
// surfaces to its caller; capability failures arrive wrapped in
// `ExtractionFailure` together with the stage that raised them.

use std::fmt;

use thiserror::Error;

/// Error reported by an external capability.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine initialisation failed: {0}")]
    Init(String),

    #[error("engine call failed: {0}")]
    Call(String),

    #[error("page {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: u32, count: u32 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("engine unavailable: {0}")]
    Unavailable(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The point in a document's processing at which a capability failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStage {
    /// Decoding the raw bytes of a text document.
    ReadText,
    /// The text-recognition call.
    Recognize,
    /// The image-labeling call.
    Label,
    /// Opening a PDF through the PDF capability.
    OpenPdf,
    /// Retrieving the text of one page (1-indexed).
    PdfPage(u32),
    /// The filesystem stat call.
    Stat,
}

impl fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadText => f.write_str("text decoding"),
            Self::Recognize => f.write_str("text recognition"),
            Self::Label => f.write_str("image labeling"),
            Self::OpenPdf => f.write_str("PDF open"),
            Self::PdfPage(index) => write!(f, "PDF page {index}"),
            Self::Stat => f.write_str("file stat"),
        }
    }
}

/// Top-level error type for all Lesewerk operations.
#[derive(Debug, Error)]
pub enum LesewerkError {
    // -- Dispatch --
    #[error("unsupported content kind (media type: {media_type})")]
    UnsupportedContentKind { media_type: String },

    // -- Extraction --
    #[error("extraction failed during {stage}: {source}")]
    ExtractionFailure {
        stage: ExtractionStage,
        #[source]
        source: EngineError,
    },

    // -- Engine lifecycle --
    #[error("extraction engines have been disposed")]
    EngineDisposed,

    #[error("extraction engine unavailable: {0}")]
    EngineUnavailable(#[source] EngineError),

    // -- Ambient --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("document task failed: {0}")]
    TaskFailed(String),
}

impl LesewerkError {
    /// Wrap a capability error raised at `stage`.
    pub fn extraction(stage: ExtractionStage, source: EngineError) -> Self {
        Self::ExtractionFailure { stage, source }
    }

    /// Build an `UnsupportedContentKind` from an optional media type.
    pub fn unsupported(media_type: Option<&str>) -> Self {
        Self::UnsupportedContentKind {
            media_type: media_type.unwrap_or("none").to_owned(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LesewerkError>;
