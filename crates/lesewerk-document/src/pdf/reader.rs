// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open a PDF from memory and pull the text layer of one page at
// a time using the `lopdf` crate.

use std::collections::BTreeMap;

use async_trait::async_trait;
use lesewerk_bridge::{PdfBackend, PdfPages};
use lesewerk_core::error::EngineError;
use lopdf::{Document, ObjectId};
use tracing::{debug, instrument};

/// Default [`PdfBackend`]: parses documents with `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfBackend;

#[async_trait]
impl PdfBackend for LopdfBackend {
    async fn open(&self, data: &[u8]) -> Result<Box<dyn PdfPages>, EngineError> {
        Ok(Box::new(PdfReader::from_bytes(data)?))
    }
}

/// An opened PDF document.
///
/// Wraps `lopdf::Document` together with its page tree, keyed by 1-indexed
/// page number.
pub struct PdfReader {
    document: Document,
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, EngineError> {
        let document = Document::load_mem(data).map_err(|err| {
            EngineError::InvalidInput(format!("failed to load PDF from memory: {err}"))
        })?;

        if document.is_encrypted() {
            return Err(EngineError::InvalidInput(
                "PDF is encrypted and cannot be read without a password".into(),
            ));
        }

        let pages = document.get_pages();
        debug!(pages = pages.len(), "PDF loaded from bytes");

        Ok(Self { document, pages })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        u32::try_from(self.pages.len()).unwrap_or(u32::MAX)
    }

    // -- Extraction -----------------------------------------------------------

    /// Text layer of page `index` (1-indexed), as decoded by `lopdf`.
    pub fn text_of_page(&self, index: u32) -> Result<String, EngineError> {
        if !self.pages.contains_key(&index) {
            return Err(EngineError::PageOutOfRange {
                index,
                count: self.page_count(),
            });
        }

        let text = self.document.extract_text(&[index]).map_err(|err| {
            EngineError::Call(format!("failed to extract text from page {index}: {err}"))
        })?;

        debug!(page = index, chars = text.len(), "page text extracted");
        Ok(text)
    }
}

#[async_trait]
impl PdfPages for PdfReader {
    fn page_count(&self) -> u32 {
        PdfReader::page_count(self)
    }

    async fn page_text(&self, index: u32) -> Result<String, EngineError> {
        self.text_of_page(index)
    }
}
