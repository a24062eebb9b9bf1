// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF strategy — page text concatenated in ascending page order.

use async_trait::async_trait;
use lesewerk_core::error::{ExtractionStage, LesewerkError, Result};
use lesewerk_core::types::ContentKind;
use tracing::{debug, instrument};

use super::{Evidence, ExtractionContext, ExtractionStrategy, RawExtraction};
use crate::source::Document;

/// Reads the text layer of a PDF, page by page.
///
/// Pages are requested one at a time, 1 through N, each awaited before the
/// next; every page's text is appended followed by `\n`. Nothing is trimmed
/// or de-hyphenated. PDFs produce no content labels.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfStrategy;

#[async_trait]
impl ExtractionStrategy for PdfStrategy {
    fn kind(&self) -> ContentKind {
        ContentKind::Pdf
    }

    #[instrument(skip_all, fields(file = %document.file_name(), bytes = document.len()))]
    async fn extract(
        &self,
        document: &Document,
        ctx: &ExtractionContext<'_>,
    ) -> Result<RawExtraction> {
        let pages = ctx
            .pdf
            .open(document.bytes())
            .await
            .map_err(|err| LesewerkError::extraction(ExtractionStage::OpenPdf, err))?;

        let count = pages.page_count();
        let mut text = String::new();

        for index in 1..=count {
            let page = pages
                .page_text(index)
                .await
                .map_err(|err| LesewerkError::extraction(ExtractionStage::PdfPage(index), err))?;
            text.push_str(&page);
            text.push('\n');
        }

        debug!(pages = count, chars = text.len(), "PDF text assembled");

        Ok(RawExtraction {
            text,
            labels: Vec::new(),
            evidence: Evidence::Pages { count },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use lesewerk_bridge::{NoopLabeler, PdfBackend, PdfPages, StubRecognizer};
    use lesewerk_core::config::PipelineConfig;
    use lesewerk_core::error::EngineError;

    use super::*;
    use crate::engines::EngineManager;

    /// In-memory PDF whose pages are given as strings; records request order.
    struct ScriptedPdf {
        pages: Vec<String>,
        fail_at: Option<u32>,
        requested: Arc<Mutex<Vec<u32>>>,
    }

    #[async_trait]
    impl PdfPages for ScriptedPdf {
        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        async fn page_text(&self, index: u32) -> std::result::Result<String, EngineError> {
            self.requested.lock().unwrap().push(index);
            if self.fail_at == Some(index) {
                return Err(EngineError::Call("corrupt content stream".into()));
            }
            Ok(self.pages[index as usize - 1].clone())
        }
    }

    struct ScriptedBackend {
        pages: Vec<String>,
        fail_at: Option<u32>,
        requested: Arc<Mutex<Vec<u32>>>,
    }

    impl ScriptedBackend {
        fn new(pages: &[&str]) -> Self {
            Self {
                pages: pages.iter().map(|page| page.to_string()).collect(),
                fail_at: None,
                requested: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl PdfBackend for ScriptedBackend {
        async fn open(&self, _data: &[u8]) -> std::result::Result<Box<dyn PdfPages>, EngineError> {
            Ok(Box::new(ScriptedPdf {
                pages: self.pages.clone(),
                fail_at: self.fail_at,
                requested: Arc::clone(&self.requested),
            }))
        }
    }

    async fn run(backend: &ScriptedBackend) -> Result<RawExtraction> {
        let engines = EngineManager::new(Box::new(StubRecognizer), Box::new(NoopLabeler));
        let config = PipelineConfig::default();
        let ctx = ExtractionContext {
            engines: &engines,
            pdf: backend,
            config: &config,
        };
        let doc = Document::from_bytes("doc.pdf", b"%PDF-1.7".to_vec());
        PdfStrategy.extract(&doc, &ctx).await
    }

    #[tokio::test]
    async fn pages_joined_in_order_with_newlines() {
        let backend = ScriptedBackend::new(&["A", "B", "C"]);
        let raw = run(&backend).await.unwrap();

        assert_eq!(raw.text, "A\nB\nC\n");
        assert!(raw.labels.is_empty());
        assert_eq!(raw.evidence, Evidence::Pages { count: 3 });
        assert_eq!(*backend.requested.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn page_text_is_not_trimmed() {
        let backend = ScriptedBackend::new(&["  hyph-", "enated  "]);
        let raw = run(&backend).await.unwrap();
        assert_eq!(raw.text, "  hyph-\nenated  \n");
    }

    #[tokio::test]
    async fn zero_pages_yield_empty_text() {
        let backend = ScriptedBackend::new(&[]);
        let raw = run(&backend).await.unwrap();
        assert_eq!(raw.text, "");
        assert_eq!(raw.evidence, Evidence::Pages { count: 0 });
    }

    #[tokio::test]
    async fn failing_page_aborts_document() {
        let mut backend = ScriptedBackend::new(&["A", "B", "C"]);
        backend.fail_at = Some(2);

        let err = run(&backend).await.unwrap_err();
        assert!(matches!(
            err,
            LesewerkError::ExtractionFailure {
                stage: ExtractionStage::PdfPage(2),
                ..
            }
        ));
        // Page 3 is never requested once page 2 has failed.
        assert_eq!(*backend.requested.lock().unwrap(), vec![1, 2]);
    }
}
