// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LesewerkError, Result};

/// Confidence assigned to every PDF extraction unless configured otherwise.
pub const DEFAULT_PDF_CONFIDENCE: f64 = 0.95;

/// Tunable settings for a `DocumentPipeline`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Fixed confidence reported for PDF documents (default 0.95).
    ///
    /// Applied regardless of page content, so a scanned PDF with no text
    /// layer reports the same value as a born-digital one.
    pub pdf_confidence: f64,
    /// Substrings whose presence marks a text document as English.
    pub language_markers: Vec<String>,
    /// Upper bound on documents processed at once by `process_batch`.
    pub max_concurrent_documents: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pdf_confidence: DEFAULT_PDF_CONFIDENCE,
            language_markers: vec![" the ".into(), " and ".into(), " is ".into()],
            max_concurrent_documents: 4,
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.pdf_confidence) {
            return Err(LesewerkError::Config(format!(
                "pdf_confidence must be within [0.0, 1.0], got {}",
                self.pdf_confidence
            )));
        }
        if self.language_markers.iter().all(|marker| marker.is_empty()) {
            return Err(LesewerkError::Config(
                "language_markers must contain at least one non-empty marker".into(),
            ));
        }
        if self.max_concurrent_documents == 0 {
            return Err(LesewerkError::Config(
                "max_concurrent_documents must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
