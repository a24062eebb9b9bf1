// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction strategies — one per content kind, behind a single trait.
//
// A strategy turns document bytes into raw text, labels, and the evidence
// the scorer and metadata normaliser need. It performs no scoring itself and
// never returns a partial extraction: any capability failure aborts it.

pub mod image;
pub mod pdf;
pub mod text;

use async_trait::async_trait;
use lesewerk_bridge::PdfBackend;
use lesewerk_core::config::PipelineConfig;
use lesewerk_core::error::Result;
use lesewerk_core::types::{ContentKind, ContentLabel, RecognizedText};

use crate::engines::EngineManager;
use crate::source::Document;

pub use self::text::TextStats;

/// Shared capabilities a strategy may draw on.
pub struct ExtractionContext<'a> {
    pub engines: &'a EngineManager,
    pub pdf: &'a dyn PdfBackend,
    pub config: &'a PipelineConfig,
}

/// What a strategy observed, beyond the text itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Evidence {
    /// OCR output, plus pixel dimensions when the image header was readable.
    Recognized {
        text: RecognizedText,
        dimensions: Option<(u32, u32)>,
    },
    /// Number of PDF pages read.
    Pages { count: u32 },
    /// Text read directly, with its derived statistics.
    Direct { stats: TextStats },
}

/// Unscored output of one strategy run.
#[derive(Debug, Clone, PartialEq)]
pub struct RawExtraction {
    /// Extracted text exactly as the strategy produced it.
    pub text: String,
    pub labels: Vec<ContentLabel>,
    pub evidence: Evidence,
}

/// Per-kind extraction behaviour.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// The content kind this strategy handles.
    fn kind(&self) -> ContentKind;

    /// Extract raw content from `document`.
    async fn extract(
        &self,
        document: &Document,
        ctx: &ExtractionContext<'_>,
    ) -> Result<RawExtraction>;
}
