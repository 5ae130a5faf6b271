//! Core telemetry event types describing diagnostics data exposed to the
//! CLI surface and broadcast subscribers.

use serde::{Deserialize, Serialize};

use crate::analysis::loudness::Decibels;

/// Where a session's audio came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    LiveInput,
    File,
}

/// Metric events covering live readouts, identifications, and errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MetricEvent {
    Readout {
        frequency_hz: u32,
        magnitude_percent: f64,
        decibels: Decibels,
        elapsed_seconds: f64,
    },
    Classification {
        category: String,
        label: String,
        confidence_percent: f64,
    },
    SessionStarted {
        source: SourceKind,
    },
    SessionStopped,
    Error {
        context: String,
    },
}
