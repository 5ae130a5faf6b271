//! EngineHandle: capture/analysis orchestration layer.
//!
//! Owns the Idle/Analyzing lifecycle around `AnalysisSession`: starting a
//! live session opens the capture stream and spawns the analysis worker;
//! stopping tears the stream down, lets the worker drain to a tick boundary,
//! and returns the single classification it produced. File analysis runs the
//! same pipeline synchronously.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::analysis;
use crate::analysis::classifier::{BandClassifier, Classification};
use crate::audio::buffer_pool::BufferPool;
use crate::audio::capture::{self, CaptureStream};
use crate::audio::wav;
use crate::bands::AcousticBand;
use crate::config::AppConfig;
use crate::engine::broadcast::BroadcastChannelManager;
use crate::error::EngineError;
use crate::history::{SessionHistory, SessionRecord};
use crate::session::TickReadout;
use crate::telemetry::{self, SourceKind};

/// A live session in flight: the capture stream, the worker draining it, and
/// the slot the worker parks its classification in.
struct LiveSession {
    stream: Option<CaptureStream>,
    running: Arc<AtomicBool>,
    worker: JoinHandle<()>,
    outcome_slot: Arc<Mutex<Option<Classification>>>,
}

/// EngineHandle orchestrates capture, analysis, and shared channels.
pub struct EngineHandle {
    config: AppConfig,
    broadcasts: BroadcastChannelManager,
    history: Arc<Mutex<SessionHistory>>,
    live: Mutex<Option<LiveSession>>,
}

impl EngineHandle {
    /// Create a new EngineHandle from the default config asset.
    pub fn new() -> Self {
        Self::with_config(AppConfig::load())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            broadcasts: BroadcastChannelManager::new(),
            history: Arc::new(Mutex::new(SessionHistory::default())),
            live: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The active band table, config-supplied or built-in.
    pub fn band_table(&self) -> Vec<AcousticBand> {
        self.config.band_table()
    }

    fn classifier(&self) -> BandClassifier {
        BandClassifier::new(self.config.band_table())
    }

    // ========================================================================
    // LIVE SESSION METHODS
    // ========================================================================

    /// Start a live capture session.
    pub fn start_live(&self) -> Result<(), EngineError> {
        let mut live = self.live.lock().expect("live session lock poisoned");
        if live.is_some() {
            return Err(EngineError::AlreadyRunning);
        }

        let readout_tx = self.broadcasts.init_readouts();
        let record_tx = self.broadcasts.init_records();

        let (capture_channels, analysis_channels) = BufferPool::new(
            self.config.audio.buffer_pool_size,
            self.config.audio.buffer_size,
        );

        let stream = capture::start_capture(capture_channels)?;
        let running = Arc::new(AtomicBool::new(true));
        let outcome_slot = Arc::new(Mutex::new(None));

        let worker = analysis::spawn_analysis_thread(
            analysis_channels,
            stream.sample_rate(),
            self.config.analysis.clone(),
            self.classifier(),
            readout_tx,
            record_tx,
            Arc::clone(&self.history),
            Arc::clone(&outcome_slot),
            Arc::clone(&running),
        );

        telemetry::hub().record_session_started(SourceKind::LiveInput);
        tracing::info!(
            "[Engine] Live session started at {} Hz",
            stream.sample_rate()
        );

        *live = Some(LiveSession {
            stream: Some(stream),
            running,
            worker,
            outcome_slot,
        });
        Ok(())
    }

    /// Stop the live session and return its classification.
    ///
    /// Capture is torn down first so the worker sees a fixed end of stream,
    /// then the stop signal is observed at the next tick boundary and the
    /// worker classifies the last reading before exiting.
    pub fn stop_live(&self) -> Result<Classification, EngineError> {
        let mut live_guard = self.live.lock().expect("live session lock poisoned");
        let mut live = live_guard.take().ok_or(EngineError::NotRunning)?;

        drop(live.stream.take());
        live.running.store(false, Ordering::SeqCst);

        if live.worker.join().is_err() {
            log::error!("[Engine] Analysis thread panicked during shutdown");
            return Err(EngineError::SessionAborted);
        }

        telemetry::hub().record_session_stopped();

        let classification = live
            .outcome_slot
            .lock()
            .map_err(|_| EngineError::SessionAborted)?
            .take()
            .ok_or(EngineError::SessionAborted)?;

        tracing::info!(
            "[Engine] Live session stopped: {} ({:.1}%)",
            classification.label,
            classification.confidence_percent
        );
        Ok(classification)
    }

    pub fn is_running(&self) -> bool {
        self.live.lock().expect("live session lock poisoned").is_some()
    }

    // ========================================================================
    // FILE SESSION METHODS
    // ========================================================================

    /// Decode a WAV file and run one complete session over it.
    ///
    /// The whole file is processed, with a terminal tick at end of stream;
    /// the classification lands in history exactly like a live session's.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<Classification, EngineError> {
        if self.is_running() {
            return Err(EngineError::AlreadyRunning);
        }

        let audio = wav::read_mono(&path)?;
        telemetry::hub().record_session_started(SourceKind::File);
        tracing::info!(
            "[Engine] Analyzing {:?} ({:.2}s at {} Hz)",
            path.as_ref(),
            audio.duration_seconds(),
            audio.sample_rate
        );

        let outcome = analysis::run_offline_session(
            &audio.samples,
            audio.sample_rate,
            &self.config.analysis,
            self.classifier(),
        );

        telemetry::hub().record_session_stopped();
        telemetry::hub().record_classification(&outcome.classification);

        match self.history.lock() {
            Ok(mut history) => history.push(outcome.record.clone()),
            Err(_) => log::error!("[Engine] History lock poisoned, record dropped"),
        }
        if let Some(tx) = self.broadcasts.record_sender() {
            let _ = tx.send(outcome.record);
        }

        Ok(outcome.classification)
    }

    // ========================================================================
    // SUBSCRIPTION AND HISTORY METHODS
    // ========================================================================

    /// Subscribe to live readouts (None before the first live session).
    pub fn subscribe_readouts(&self) -> Option<tokio::sync::broadcast::Receiver<TickReadout>> {
        self.broadcasts.subscribe_readouts()
    }

    /// Subscribe to end-of-session records.
    pub fn subscribe_records(&self) -> Option<tokio::sync::broadcast::Receiver<SessionRecord>> {
        self.broadcasts.subscribe_records()
    }

    /// Completed sessions, most recent first.
    pub fn history(&self) -> Vec<SessionRecord> {
        match self.history.lock() {
            Ok(history) => history.records(),
            Err(_) => Vec::new(),
        }
    }

    pub fn clear_history(&self) {
        if let Ok(mut history) = self.history.lock() {
            history.clear();
        }
    }
}

impl Default for EngineHandle {
    fn default() -> Self {
        Self::new()
    }
}
