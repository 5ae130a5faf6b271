// Session state machine - one identification per recording
//
// The orchestration layer has two states, Idle and Analyzing. Analyzing is
// reified as this object: constructing it starts the session clock, each tick
// updates the live snapshot, and finishing consumes the session and produces
// the single Classification for the whole recording. Classification runs once
// per session rather than per frame; per-tick output is visual telemetry only.
//
// The last peak/loudness snapshot is one field written by a single assignment
// per tick, so the end-of-session read never observes a partial update.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::analysis::classifier::{BandClassifier, Classification};
use crate::analysis::confidence;
use crate::analysis::gate::SilenceGate;
use crate::analysis::loudness::{self, Decibels, Loudness};
use crate::analysis::peak::{self, PeakReading};
use crate::history::SessionRecord;
use crate::spectrum::SpectralFrame;

/// Live figures republished on every analysis tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReadout {
    /// Dominant frequency of the current frame
    pub frequency_hz: u32,
    /// Dominant bin magnitude as a percentage of full scale
    pub magnitude_percent: f64,
    /// Frame loudness in dBFS
    pub decibels: Decibels,
    /// Seconds since the session started
    pub elapsed_seconds: f64,
    /// Raw byte bins for waveform/spectrogram rendering
    pub magnitudes: Vec<u8>,
}

/// Result of finishing a session: the identification plus its history row
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub classification: Classification,
    pub record: SessionRecord,
}

/// Most recent per-tick figures, written atomically-in-effect each tick
#[derive(Debug, Clone, Copy)]
struct LastReading {
    peak: PeakReading,
    loudness: Loudness,
}

/// One recording in progress
///
/// Existence of this value is the Analyzing state; `finish` consumes it back
/// to Idle.
pub struct AnalysisSession {
    gate: SilenceGate,
    classifier: BandClassifier,
    started_at: Instant,
    last_reading: Option<LastReading>,
}

impl AnalysisSession {
    /// Start a session: resets the clock, no readings yet
    pub fn begin(gate: SilenceGate, classifier: BandClassifier) -> Self {
        Self {
            gate,
            classifier,
            started_at: Instant::now(),
            last_reading: None,
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    /// Process one spectral frame
    ///
    /// Estimates loudness and the dominant frequency, replaces the
    /// last-reading snapshot, and returns the live readout for display
    /// collaborators. No classification happens here.
    pub fn tick(&mut self, frame: &SpectralFrame) -> TickReadout {
        let loudness = loudness::estimate(&frame.magnitudes);
        let peak = peak::extract(frame);

        self.last_reading = Some(LastReading { peak, loudness });

        TickReadout {
            frequency_hz: peak.frequency_hz,
            magnitude_percent: peak.magnitude_percent,
            decibels: loudness.decibels,
            elapsed_seconds: self.elapsed_seconds(),
            magnitudes: frame.magnitudes.clone(),
        }
    }

    /// End the session and classify the most recent reading
    ///
    /// Runs the silence gate, band lookup, and confidence scoring exactly
    /// once, over the last per-tick snapshot. A session that never ticked
    /// reads as unmeasured loudness and classifies through the silence path.
    pub fn finish(self) -> SessionOutcome {
        let (peak, loudness) = match self.last_reading {
            Some(reading) => (reading.peak, reading.loudness),
            None => (
                PeakReading {
                    frequency_hz: 0,
                    magnitude_percent: 0.0,
                },
                Loudness::unmeasured(),
            ),
        };

        let is_silent = self.gate.is_silent(loudness.decibels);
        let band = self.classifier.classify(peak.frequency_hz, is_silent);
        let confidence_percent = confidence::score(is_silent, loudness.decibels);

        let record = SessionRecord {
            timestamp_ms: now_timestamp_ms(),
            frequency_hz: peak.frequency_hz,
            decibels_label: format!("{} dB", loudness.decibels),
            category_label: band.label.clone(),
            confidence_percent,
        };

        SessionOutcome {
            classification: Classification::new(band, confidence_percent),
            record,
        }
    }
}

fn now_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
