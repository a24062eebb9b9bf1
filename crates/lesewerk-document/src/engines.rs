// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine lifecycle — owns the recognizer and labeler handles, initialises each
// once, serialises calls per handle, and releases both on dispose.

use std::sync::atomic::{AtomicBool, Ordering};

use lesewerk_bridge::{ImageLabeler, TextRecognizer};
use lesewerk_core::error::{ExtractionStage, LesewerkError, Result};
use lesewerk_core::types::{ContentLabel, RecognizedText};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, instrument, warn};

/// Owner of the two externally supplied engines.
///
/// Each handle sits behind its own async mutex, so at most one call is in
/// flight per engine while the recognizer and labeler may still run side by
/// side. A failed initialisation leaves the engine uninitialised; the next
/// call tries again.
///
/// `*_initialised` is written while the handle's lock is held, so `dispose`
/// sees it as soon as it owns that lock, even before the `OnceCell` records
/// the value.
pub struct EngineManager {
    recognizer: Mutex<Option<Box<dyn TextRecognizer>>>,
    labeler: Mutex<Option<Box<dyn ImageLabeler>>>,
    recognizer_ready: OnceCell<()>,
    labeler_ready: OnceCell<()>,
    recognizer_initialised: AtomicBool,
    labeler_initialised: AtomicBool,
    disposed: AtomicBool,
}

impl EngineManager {
    pub fn new(recognizer: Box<dyn TextRecognizer>, labeler: Box<dyn ImageLabeler>) -> Self {
        Self {
            recognizer: Mutex::new(Some(recognizer)),
            labeler: Mutex::new(Some(labeler)),
            recognizer_ready: OnceCell::new(),
            labeler_ready: OnceCell::new(),
            recognizer_initialised: AtomicBool::new(false),
            labeler_initialised: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
        }
    }

    // -- Lifecycle ------------------------------------------------------------

    /// Initialise both engines if they are not already.
    #[instrument(skip(self))]
    pub async fn ensure_ready(&self) -> Result<()> {
        self.ensure_recognizer().await?;
        self.ensure_labeler().await
    }

    async fn ensure_recognizer(&self) -> Result<()> {
        self.check_live()?;
        self.recognizer_ready
            .get_or_try_init(|| async {
                let guard = self.recognizer.lock().await;
                let engine = guard.as_ref().ok_or(LesewerkError::EngineDisposed)?;
                engine.init().await.map_err(LesewerkError::EngineUnavailable)?;
                self.recognizer_initialised.store(true, Ordering::SeqCst);
                info!(engine = engine.name(), "text recognizer initialised");
                Ok::<_, LesewerkError>(())
            })
            .await
            .map(|_| ())
    }

    async fn ensure_labeler(&self) -> Result<()> {
        self.check_live()?;
        self.labeler_ready
            .get_or_try_init(|| async {
                let guard = self.labeler.lock().await;
                let engine = guard.as_ref().ok_or(LesewerkError::EngineDisposed)?;
                engine.init().await.map_err(LesewerkError::EngineUnavailable)?;
                self.labeler_initialised.store(true, Ordering::SeqCst);
                info!(engine = engine.name(), "image labeler initialised");
                Ok::<_, LesewerkError>(())
            })
            .await
            .map(|_| ())
    }

    /// Release both engines. Safe to call more than once.
    ///
    /// Waits for in-flight calls to finish. Engines that were initialised are
    /// closed; close errors are logged and otherwise ignored.
    #[instrument(skip(self))]
    pub async fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            debug!("engines already disposed");
            return;
        }

        if let Some(engine) = self.recognizer.lock().await.take()
            && self.recognizer_initialised.load(Ordering::SeqCst)
            && let Err(err) = engine.close().await
        {
            warn!(engine = engine.name(), %err, "text recognizer failed to close");
        }

        if let Some(engine) = self.labeler.lock().await.take()
            && self.labeler_initialised.load(Ordering::SeqCst)
            && let Err(err) = engine.close().await
        {
            warn!(engine = engine.name(), %err, "image labeler failed to close");
        }

        info!("engines disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn check_live(&self) -> Result<()> {
        if self.is_disposed() {
            Err(LesewerkError::EngineDisposed)
        } else {
            Ok(())
        }
    }

    // -- Calls ----------------------------------------------------------------

    /// Recognize text in `image`, initialising the recognizer if needed.
    pub async fn recognize(&self, image: &[u8]) -> Result<RecognizedText> {
        self.ensure_recognizer().await?;
        let guard = self.recognizer.lock().await;
        let engine = guard.as_ref().ok_or(LesewerkError::EngineDisposed)?;
        engine
            .recognize(image)
            .await
            .map_err(|err| LesewerkError::extraction(ExtractionStage::Recognize, err))
    }

    /// Label `image`, initialising the labeler if needed.
    pub async fn label(&self, image: &[u8]) -> Result<Vec<ContentLabel>> {
        self.ensure_labeler().await?;
        let guard = self.labeler.lock().await;
        let engine = guard.as_ref().ok_or(LesewerkError::EngineDisposed)?;
        engine
            .label(image)
            .await
            .map_err(|err| LesewerkError::extraction(ExtractionStage::Label, err))
    }
}
