// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stock engines for hosts that lack a real one.
//
// `StubRecognizer` / `StubLabeler` refuse to initialise, so an image document
// fails with `EngineUnavailable` instead of producing an empty result.
// `NoopLabeler` is the "labeling disabled" choice. `FixedRecognizer` /
// `FixedLabeler` answer every call with a preset response and keep call
// statistics; hosts that precompute recognition results use them, as do the
// pipeline tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lesewerk_core::error::EngineError;
use lesewerk_core::types::{ContentLabel, RecognizedText};

use crate::traits::{ImageLabeler, TextRecognizer};

// -- Stubs --------------------------------------------------------------------

/// Recognizer returned when no engine is configured.
pub struct StubRecognizer;

#[async_trait]
impl TextRecognizer for StubRecognizer {
    fn name(&self) -> &str {
        "stub"
    }

    async fn init(&self) -> Result<(), EngineError> {
        tracing::warn!("TextRecognizer::init called on stub recognizer");
        Err(EngineError::Unavailable("no text recognizer configured".into()))
    }

    async fn recognize(&self, _image: &[u8]) -> Result<RecognizedText, EngineError> {
        Err(EngineError::Unavailable("no text recognizer configured".into()))
    }
}

/// Labeler returned when no engine is configured.
pub struct StubLabeler;

#[async_trait]
impl ImageLabeler for StubLabeler {
    fn name(&self) -> &str {
        "stub"
    }

    async fn init(&self) -> Result<(), EngineError> {
        tracing::warn!("ImageLabeler::init called on stub labeler");
        Err(EngineError::Unavailable("no image labeler configured".into()))
    }

    async fn label(&self, _image: &[u8]) -> Result<Vec<ContentLabel>, EngineError> {
        Err(EngineError::Unavailable("no image labeler configured".into()))
    }
}

/// Labeler that never assigns a label.
#[derive(Debug, Default)]
pub struct NoopLabeler;

#[async_trait]
impl ImageLabeler for NoopLabeler {
    fn name(&self) -> &str {
        "noop"
    }

    async fn label(&self, _image: &[u8]) -> Result<Vec<ContentLabel>, EngineError> {
        Ok(Vec::new())
    }
}

// -- Fixed-response engines ---------------------------------------------------

/// Call statistics shared by the fixed-response engines.
#[derive(Debug, Default)]
struct CallStats {
    init: AtomicUsize,
    calls: AtomicUsize,
    close: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl CallStats {
    fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// What a fixed engine answers with.
#[derive(Debug, Clone)]
enum Outcome<T> {
    Respond(T),
    Fail(String),
}

impl<T: Clone> Outcome<T> {
    fn get(&self) -> Result<T, EngineError> {
        match self {
            Self::Respond(value) => Ok(value.clone()),
            Self::Fail(message) => Err(EngineError::Call(message.clone())),
        }
    }
}

/// Recognizer that returns the same [`RecognizedText`] for every image.
#[derive(Debug)]
pub struct FixedRecognizer {
    outcome: Outcome<RecognizedText>,
    init_error: Option<String>,
    delay: Duration,
    stats: CallStats,
}

impl FixedRecognizer {
    /// Answer every call with `text`.
    pub fn new(text: RecognizedText) -> Self {
        Self {
            outcome: Outcome::Respond(text),
            init_error: None,
            delay: Duration::ZERO,
            stats: CallStats::default(),
        }
    }

    /// Fail every recognition call with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail(message.into()),
            ..Self::new(RecognizedText::default())
        }
    }

    /// Fail initialisation with `message`.
    pub fn failing_init(mut self, message: impl Into<String>) -> Self {
        self.init_error = Some(message.into());
        self
    }

    /// Hold each call open for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn init_calls(&self) -> usize {
        self.stats.init.load(Ordering::SeqCst)
    }

    pub fn recognize_calls(&self) -> usize {
        self.stats.calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.stats.close.load(Ordering::SeqCst)
    }

    /// Largest number of `recognize` calls observed running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.stats.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecognizer for FixedRecognizer {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn init(&self) -> Result<(), EngineError> {
        self.stats.init.fetch_add(1, Ordering::SeqCst);
        match &self.init_error {
            Some(message) => Err(EngineError::Init(message.clone())),
            None => Ok(()),
        }
    }

    async fn recognize(&self, _image: &[u8]) -> Result<RecognizedText, EngineError> {
        self.stats.enter();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.stats.leave();
        self.outcome.get()
    }

    async fn close(&self) -> Result<(), EngineError> {
        self.stats.close.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Labeler that returns the same labels for every image.
#[derive(Debug)]
pub struct FixedLabeler {
    outcome: Outcome<Vec<ContentLabel>>,
    delay: Duration,
    stats: CallStats,
}

impl FixedLabeler {
    /// Answer every call with `labels`, in the given order.
    pub fn new(labels: Vec<ContentLabel>) -> Self {
        Self {
            outcome: Outcome::Respond(labels),
            delay: Duration::ZERO,
            stats: CallStats::default(),
        }
    }

    /// Fail every labeling call with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail(message.into()),
            ..Self::new(Vec::new())
        }
    }

    /// Hold each call open for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn init_calls(&self) -> usize {
        self.stats.init.load(Ordering::SeqCst)
    }

    pub fn label_calls(&self) -> usize {
        self.stats.calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.stats.close.load(Ordering::SeqCst)
    }

    /// Largest number of `label` calls observed running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.stats.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageLabeler for FixedLabeler {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn init(&self) -> Result<(), EngineError> {
        self.stats.init.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn label(&self, _image: &[u8]) -> Result<Vec<ContentLabel>, EngineError> {
        self.stats.enter();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.stats.leave();
        self.outcome.get()
    }

    async fn close(&self) -> Result<(), EngineError> {
        self.stats.close.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// -- Shared handles -----------------------------------------------------------

// Lets callers keep an `Arc` to a fixed engine (to read its statistics) while
// the pipeline owns a boxed handle to the same engine.

#[async_trait]
impl<T: TextRecognizer + ?Sized> TextRecognizer for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn init(&self) -> Result<(), EngineError> {
        (**self).init().await
    }

    async fn recognize(&self, image: &[u8]) -> Result<RecognizedText, EngineError> {
        (**self).recognize(image).await
    }

    async fn close(&self) -> Result<(), EngineError> {
        (**self).close().await
    }
}

#[async_trait]
impl<T: ImageLabeler + ?Sized> ImageLabeler for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn init(&self) -> Result<(), EngineError> {
        (**self).init().await
    }

    async fn label(&self, image: &[u8]) -> Result<Vec<ContentLabel>, EngineError> {
        (**self).label(image).await
    }

    async fn close(&self) -> Result<(), EngineError> {
        (**self).close().await
    }
}
