// Analysis module - spectral sampling loop and identification pipeline
//
// This module orchestrates the analysis pipeline, processing sample buffers
// from the capture thread and generating live readouts plus one end-of-session
// identification.
//
// Architecture:
// - AnalysisWorker: main loop that consumes buffers from the capture ring
// - Per tick: window -> SpectralFrame -> AnalysisSession::tick -> readout
// - On stop: queue drained, terminal tick, AnalysisSession::finish ->
//   Classification broadcast + history append

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rtrb::PopError;
use tokio::sync::broadcast;

use crate::audio::buffer_pool::AnalysisChannels;
use crate::config::AnalysisConfig;
use crate::history::{SessionHistory, SessionRecord};
use crate::session::{AnalysisSession, SessionOutcome, TickReadout};
use crate::spectrum::{SpectralFrame, SpectrumAnalyzer};
use crate::telemetry;

pub mod classifier;
pub mod confidence;
pub mod gate;
pub mod loudness;
pub mod peak;

use classifier::{BandClassifier, Classification};
use gate::SilenceGate;

struct AnalysisWorker {
    // Channels & config
    channels: AnalysisChannels,
    readout_tx: broadcast::Sender<TickReadout>,
    record_tx: broadcast::Sender<SessionRecord>,
    history: Arc<Mutex<SessionHistory>>,
    outcome_slot: Arc<Mutex<Option<Classification>>>,
    running: Arc<AtomicBool>,
    transform_size: usize,

    // Pipeline components
    analyzer: SpectrumAnalyzer,
    session: AnalysisSession,

    // State
    window: Vec<f32>,
}

impl AnalysisWorker {
    #[allow(clippy::too_many_arguments)]
    fn new(
        channels: AnalysisChannels,
        sample_rate: u32,
        config: AnalysisConfig,
        classifier: BandClassifier,
        readout_tx: broadcast::Sender<TickReadout>,
        record_tx: broadcast::Sender<SessionRecord>,
        history: Arc<Mutex<SessionHistory>>,
        outcome_slot: Arc<Mutex<Option<Classification>>>,
        running: Arc<AtomicBool>,
    ) -> Self {
        let analyzer = SpectrumAnalyzer::new(sample_rate, &config);
        let gate = SilenceGate::new(config.silence_threshold_db);
        let session = AnalysisSession::begin(gate, classifier);
        let transform_size = config.transform_size;

        Self {
            channels,
            readout_tx,
            record_tx,
            history,
            outcome_slot,
            running,
            transform_size,
            analyzer,
            session,
            window: Vec::with_capacity(transform_size * 2),
        }
    }

    fn publish_tick(&mut self, frame: &SpectralFrame) {
        let readout = self.session.tick(frame);
        telemetry::hub().record_readout(&readout);
        let _ = self.readout_tx.send(readout);
    }

    fn run(mut self) {
        tracing::info!("[AnalysisThread] Starting analysis loop");

        loop {
            let buffer = match self.channels.data_consumer.pop() {
                Ok(buf) => buf,
                Err(PopError::Empty) => {
                    // Check the stop signal only when the queue is drained so
                    // no buffered audio is left partially processed
                    if !self.running.load(Ordering::SeqCst) {
                        tracing::info!("[AnalysisThread] Stop observed and queue empty, exiting");
                        break;
                    }
                    thread::sleep(Duration::from_millis(1));
                    continue;
                }
            };

            self.window.extend_from_slice(&buffer);

            // Return buffer to pool immediately
            if self.channels.pool_producer.push(buffer).is_err() {
                tracing::warn!("[AnalysisThread] Pool queue full, dropping buffer");
            }

            while self.window.len() >= self.transform_size {
                let frame = self.analyzer.analyze(&self.window[..self.transform_size]);
                self.window.drain(..self.transform_size);
                self.publish_tick(&frame);
            }
        }

        // Terminal tick over whatever partial window remains (zero-padded by
        // the analyzer), so short tails still reach the final snapshot
        if !self.window.is_empty() {
            let remainder: Vec<f32> = std::mem::take(&mut self.window);
            let frame = self.analyzer.analyze(&remainder);
            self.publish_tick(&frame);
        }

        self.finish();
    }

    fn finish(self) {
        let SessionOutcome {
            classification,
            record,
        } = self.session.finish();

        tracing::info!(
            "[AnalysisThread] Session classified as {} ({:.1}%)",
            classification.label,
            classification.confidence_percent
        );

        match self.history.lock() {
            Ok(mut history) => history.push(record.clone()),
            Err(_) => log::error!("[AnalysisThread] History lock poisoned, record dropped"),
        }

        telemetry::hub().record_classification(&classification);
        let _ = self.record_tx.send(record);

        match self.outcome_slot.lock() {
            Ok(mut slot) => *slot = Some(classification),
            Err(_) => log::error!("[AnalysisThread] Outcome slot poisoned"),
        }
    }
}

/// Spawn the analysis thread for a live session
#[allow(clippy::too_many_arguments)]
pub fn spawn_analysis_thread(
    channels: AnalysisChannels,
    sample_rate: u32,
    config: AnalysisConfig,
    classifier: BandClassifier,
    readout_tx: broadcast::Sender<TickReadout>,
    record_tx: broadcast::Sender<SessionRecord>,
    history: Arc<Mutex<SessionHistory>>,
    outcome_slot: Arc<Mutex<Option<Classification>>>,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let worker = AnalysisWorker::new(
            channels,
            sample_rate,
            config,
            classifier,
            readout_tx,
            record_tx,
            history,
            outcome_slot,
            running,
        );
        worker.run();
    })
}

/// Run a complete session over pre-decoded samples
///
/// Windows the samples at transform size, ticks once per window plus a
/// terminal partial-window tick, then finishes and classifies. Used for file
/// analysis, where there is no real-time constraint.
pub fn run_offline_session(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
    classifier: BandClassifier,
) -> SessionOutcome {
    let mut analyzer = SpectrumAnalyzer::new(sample_rate, config);
    let gate = SilenceGate::new(config.silence_threshold_db);
    let mut session = AnalysisSession::begin(gate, classifier);

    for chunk in samples.chunks(config.transform_size) {
        let frame = analyzer.analyze(chunk);
        let readout = session.tick(&frame);
        telemetry::hub().record_readout(&readout);
    }

    session.finish()
}
