// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image strategy — OCR plus visual labeling through the engine manager.

use std::io::Cursor;

use async_trait::async_trait;
use image::ImageReader;
use lesewerk_core::error::Result;
use lesewerk_core::types::{clamp_unit, ContentKind, ContentLabel};
use tracing::{debug, instrument, warn};

use super::{Evidence, ExtractionContext, ExtractionStrategy, RawExtraction};
use crate::source::Document;

/// Recognizes text and labels content in raster images.
///
/// The recognizer and labeler are called concurrently (each handle still
/// serves one call at a time). If either fails the whole document fails;
/// no retry is attempted.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageStrategy;

#[async_trait]
impl ExtractionStrategy for ImageStrategy {
    fn kind(&self) -> ContentKind {
        ContentKind::Image
    }

    #[instrument(skip_all, fields(file = %document.file_name(), bytes = document.len()))]
    async fn extract(
        &self,
        document: &Document,
        ctx: &ExtractionContext<'_>,
    ) -> Result<RawExtraction> {
        let data = document.bytes();

        let (recognized, labels) =
            tokio::try_join!(ctx.engines.recognize(data), ctx.engines.label(data))?;

        let dimensions = image_dimensions(data);
        debug!(
            blocks = recognized.blocks.len(),
            lines = recognized.line_count(),
            labels = labels.len(),
            ?dimensions,
            "image recognised"
        );

        Ok(RawExtraction {
            text: recognized.text(),
            labels: labels.into_iter().map(normalise_label).collect(),
            evidence: Evidence::Recognized {
                text: recognized,
                dimensions,
            },
        })
    }
}

/// Pixel dimensions from the image header, without decoding the pixels.
fn image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Keep the labeler's label, clamping its confidence into [0.0, 1.0].
fn normalise_label(label: ContentLabel) -> ContentLabel {
    let confidence = clamp_unit(label.confidence);
    if confidence != label.confidence {
        warn!(
            label = %label.label,
            reported = label.confidence,
            "label confidence outside [0, 1]; clamped"
        );
    }
    ContentLabel {
        label: label.label,
        confidence,
    }
}
