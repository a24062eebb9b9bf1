// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document pipeline — dispatch, extraction, scoring, metadata, aggregation.
//
// One explicitly constructed `DocumentPipeline` owns the injected
// capabilities. Each document is processed as an independent unit of work;
// the only state shared between documents is the pair of engine handles held
// by the `EngineManager`.

use std::path::Path;
use std::sync::Arc;

use lesewerk_bridge::{
    FileStat, ImageLabeler, LocalFileStat, NoopLabeler, PdfBackend, StubRecognizer,
    TextRecognizer,
};
use lesewerk_core::config::PipelineConfig;
use lesewerk_core::error::{ExtractionStage, LesewerkError, Result};
use lesewerk_core::types::{AggregateResult, ContentKind, FileStats};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::dispatch::{classify, select_strategy};
use crate::engines::EngineManager;
use crate::metadata;
use crate::pdf::LopdfBackend;
use crate::scoring;
use crate::source::Document;
use crate::strategy::ExtractionContext;

/// Turns documents into [`AggregateResult`]s.
pub struct DocumentPipeline {
    engines: EngineManager,
    pdf: Box<dyn PdfBackend>,
    file_stat: Box<dyn FileStat>,
    config: PipelineConfig,
}

impl DocumentPipeline {
    pub fn builder() -> DocumentPipelineBuilder {
        DocumentPipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // -- Lifecycle ------------------------------------------------------------

    /// Initialise the recognizer and labeler now instead of on the first image.
    pub async fn init(&self) -> Result<()> {
        self.engines.ensure_ready().await
    }

    /// Release the engines. Idempotent; every later `process` call fails with
    /// `EngineDisposed`.
    pub async fn dispose(&self) {
        self.engines.dispose().await;
    }

    pub fn is_disposed(&self) -> bool {
        self.engines.is_disposed()
    }

    // -- Processing -----------------------------------------------------------

    /// Process one document into a single immutable result.
    ///
    /// Either every stage succeeds or the first failure is returned; no
    /// partial result is produced and nothing is retried.
    #[instrument(skip_all, fields(file = %document.file_name(), media_type = ?document.media_type()))]
    pub async fn process(&self, document: &Document) -> Result<AggregateResult> {
        if self.is_disposed() {
            return Err(LesewerkError::EngineDisposed);
        }

        let kind = classify(document);
        let strategy = select_strategy(kind, document.media_type())?;
        debug!(%kind, "strategy selected");

        let ctx = ExtractionContext {
            engines: &self.engines,
            pdf: self.pdf.as_ref(),
            config: &self.config,
        };
        let raw = strategy.extract(document, &ctx).await?;

        let stats = self.file_stats(kind, document).await?;
        let confidence = scoring::confidence(&raw.evidence, &self.config);
        let metadata = metadata::normalize(&raw.evidence, stats.as_ref(), document.len());

        let result = AggregateResult::new(
            document.file_name(),
            kind,
            raw.text,
            confidence,
            raw.labels,
            metadata,
        );

        info!(
            %kind,
            confidence = result.confidence(),
            chars = result.extracted_text().len(),
            labels = result.content_labels().len(),
            "document processed"
        );
        Ok(result)
    }

    /// Read `path` from disk and process it.
    pub async fn process_path(&self, path: impl AsRef<Path>) -> Result<AggregateResult> {
        let document = Document::open(path).await?;
        self.process(&document).await
    }

    /// Process many documents concurrently.
    ///
    /// At most `max_concurrent_documents` run at once. Returns one result per
    /// input, in input order; a failing document does not affect the others.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub async fn process_batch(
        self: &Arc<Self>,
        documents: Vec<Document>,
    ) -> Vec<Result<AggregateResult>> {
        let total = documents.len();
        let permits = Arc::new(Semaphore::new(self.config.max_concurrent_documents));
        let mut tasks = JoinSet::new();

        for (index, document) in documents.into_iter().enumerate() {
            let pipeline = Arc::clone(self);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(err) => return (index, Err(LesewerkError::TaskFailed(err.to_string()))),
                };
                (index, pipeline.process(&document).await)
            });
        }

        let mut slots: Vec<Option<Result<AggregateResult>>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(err) => warn!(%err, "document task did not complete"),
            }
        }

        let results: Vec<_> = slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(LesewerkError::TaskFailed(
                        "task panicked or was aborted".into(),
                    ))
                })
            })
            .collect();

        let failed = results.iter().filter(|result| result.is_err()).count();
        info!(total, failed, "batch processed");
        results
    }

    /// Filesystem stats for documents read from disk. Text documents carry
    /// only their derived statistics, so they are not stat'ed.
    async fn file_stats(
        &self,
        kind: ContentKind,
        document: &Document,
    ) -> Result<Option<FileStats>> {
        match (kind, document.path()) {
            (ContentKind::Image | ContentKind::Pdf, Some(path)) => self
                .file_stat
                .stat(path)
                .await
                .map(Some)
                .map_err(|err| LesewerkError::extraction(ExtractionStage::Stat, err)),
            _ => Ok(None),
        }
    }
}

/// Assembles a [`DocumentPipeline`].
///
/// Anything not supplied falls back to a stock implementation: the stub
/// recognizer (image documents then fail with `EngineUnavailable`), no
/// labeling, `lopdf` for PDFs, and the local filesystem for stats.
#[derive(Default)]
pub struct DocumentPipelineBuilder {
    recognizer: Option<Box<dyn TextRecognizer>>,
    labeler: Option<Box<dyn ImageLabeler>>,
    pdf_backend: Option<Box<dyn PdfBackend>>,
    file_stat: Option<Box<dyn FileStat>>,
    config: PipelineConfig,
}

impl DocumentPipelineBuilder {
    pub fn recognizer(mut self, recognizer: impl TextRecognizer + 'static) -> Self {
        self.recognizer = Some(Box::new(recognizer));
        self
    }

    pub fn labeler(mut self, labeler: impl ImageLabeler + 'static) -> Self {
        self.labeler = Some(Box::new(labeler));
        self
    }

    pub fn pdf_backend(mut self, backend: impl PdfBackend + 'static) -> Self {
        self.pdf_backend = Some(Box::new(backend));
        self
    }

    pub fn file_stat(mut self, file_stat: impl FileStat + 'static) -> Self {
        self.file_stat = Some(Box::new(file_stat));
        self
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the configuration and build the pipeline.
    pub fn build(self) -> Result<DocumentPipeline> {
        self.config.validate()?;

        let recognizer = self.recognizer.unwrap_or_else(|| Box::new(StubRecognizer));
        let labeler = self.labeler.unwrap_or_else(|| Box::new(NoopLabeler));
        debug!(
            recognizer = recognizer.name(),
            labeler = labeler.name(),
            "pipeline built"
        );

        Ok(DocumentPipeline {
            engines: EngineManager::new(recognizer, labeler),
            pdf: self.pdf_backend.unwrap_or_else(|| Box::new(LopdfBackend)),
            file_stat: self.file_stat.unwrap_or_else(|| Box::new(LocalFileStat)),
            config: self.config,
        })
    }
}
