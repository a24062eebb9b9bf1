// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Confidence scoring — one aggregate value in [0.0, 1.0] per extraction.

use lesewerk_core::config::PipelineConfig;
use lesewerk_core::types::{RecognizedText, clamp_unit};

use crate::strategy::Evidence;

/// Confidence reported for directly read text.
pub const TEXT_CONFIDENCE: f64 = 1.0;

/// Aggregate confidence for an extraction, by kind:
///
/// - recognized images: arithmetic mean of every line confidence across all
///   blocks, 0.0 when nothing was recognized;
/// - PDFs: the configured fixed value, whatever the pages contain;
/// - text: [`TEXT_CONFIDENCE`].
///
/// The result is always clamped into [0.0, 1.0].
pub fn confidence(evidence: &Evidence, config: &PipelineConfig) -> f64 {
    let raw = match evidence {
        Evidence::Recognized { text, .. } => mean_line_confidence(text),
        Evidence::Pages { .. } => config.pdf_confidence,
        Evidence::Direct { .. } => TEXT_CONFIDENCE,
    };
    clamp_unit(raw)
}

/// Mean of all line confidences; 0.0 for zero lines.
pub fn mean_line_confidence(text: &RecognizedText) -> f64 {
    let (sum, count) = text
        .lines()
        .fold((0.0_f64, 0_usize), |(sum, count), line| {
            (sum + line.confidence, count + 1)
        });
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
