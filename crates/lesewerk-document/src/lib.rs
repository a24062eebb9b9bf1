// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lesewerk-document — the extraction pipeline.
//
// Classifies a document by its sniffed media type, runs the matching
// extraction strategy (image OCR + labeling, PDF page text, or plain text),
// scores the result, normalises its metadata, and returns one immutable
// `AggregateResult`.

pub mod dispatch;
pub mod engines;
pub mod metadata;
pub mod pdf;
pub mod pipeline;
pub mod scoring;
pub mod source;
pub mod strategy;

// Re-export the primary structs so callers can use `lesewerk_document::DocumentPipeline` etc.
pub use dispatch::{classify, select_strategy, sniff_media_type};
pub use engines::EngineManager;
pub use pdf::reader::{LopdfBackend, PdfReader};
pub use pipeline::{DocumentPipeline, DocumentPipelineBuilder};
pub use source::Document;
pub use strategy::{ExtractionStrategy, RawExtraction};
