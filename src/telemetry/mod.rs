//! Diagnostics telemetry collector and helpers.
//!
//! The collector multiplexes live readouts, end-of-session identifications,
//! and errors into a bounded history plus an async broadcast stream. Readouts
//! arrive at display rate, so they are debounced before being recorded.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use tokio::sync::broadcast;

use crate::analysis::classifier::Classification;
use crate::session::TickReadout;

pub mod events;

pub use events::{MetricEvent, SourceKind};

/// Minimum spacing between recorded readout events
const READOUT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Global telemetry hub shared across the crate.
static HUB: Lazy<TelemetryHub> = Lazy::new(TelemetryHub::default);

/// Access the global telemetry hub.
pub fn hub() -> &'static TelemetryHub {
    &HUB
}

/// Snapshot of collector state for CLI reporting.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TelemetrySnapshot {
    pub recent: Vec<MetricEvent>,
    pub total_events: u64,
    pub dropped_events: u64,
}

/// Broadcast-based collector retaining a bounded history of metrics.
pub struct TelemetryCollector {
    tx: broadcast::Sender<MetricEvent>,
    history: Mutex<VecDeque<MetricEvent>>,
    history_capacity: usize,
    total_events: AtomicU64,
    dropped_history: AtomicU64,
}

impl TelemetryCollector {
    pub fn new(buffer: usize, history_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer);
        Self {
            tx,
            history: Mutex::new(VecDeque::with_capacity(history_capacity)),
            history_capacity,
            total_events: AtomicU64::new(0),
            dropped_history: AtomicU64::new(0),
        }
    }

    pub fn publish(&self, event: MetricEvent) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        {
            let mut history = self.history.lock().expect("history poisoned");
            if history.len() == self.history_capacity {
                history.pop_front();
                self.dropped_history.fetch_add(1, Ordering::Relaxed);
            }
            history.push_back(event.clone());
        }

        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MetricEvent> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let history = self.history.lock().expect("history poisoned");
        TelemetrySnapshot {
            recent: history.iter().cloned().collect(),
            total_events: self.total_events.load(Ordering::Relaxed),
            dropped_events: self.dropped_history.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new(256, 64)
    }
}

/// Top-level hub wrapping the collector plus readout debouncing.
pub struct TelemetryHub {
    collector: TelemetryCollector,
    last_readout: Mutex<Option<Instant>>,
}

impl TelemetryHub {
    pub fn new(channel_capacity: usize, history_capacity: usize) -> Self {
        Self {
            collector: TelemetryCollector::new(channel_capacity, history_capacity),
            last_readout: Mutex::new(None),
        }
    }

    pub fn collector(&self) -> &TelemetryCollector {
        &self.collector
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.collector.snapshot()
    }

    /// Record a per-tick readout, debounced to avoid flooding the history
    /// with display-rate events.
    pub fn record_readout(&self, readout: &TickReadout) {
        let now = Instant::now();
        let should_emit = {
            let mut last = self.last_readout.lock().expect("readout debounce poisoned");
            let due = last
                .map(|ts| now.saturating_duration_since(ts) >= READOUT_DEBOUNCE)
                .unwrap_or(true);
            if due {
                *last = Some(now);
            }
            due
        };

        if should_emit {
            self.collector.publish(MetricEvent::Readout {
                frequency_hz: readout.frequency_hz,
                magnitude_percent: readout.magnitude_percent,
                decibels: readout.decibels,
                elapsed_seconds: readout.elapsed_seconds,
            });
        }
    }

    pub fn record_classification(&self, classification: &Classification) {
        self.collector.publish(MetricEvent::Classification {
            category: classification.category.clone(),
            label: classification.label.clone(),
            confidence_percent: classification.confidence_percent,
        });
    }

    pub fn record_session_started(&self, source: SourceKind) {
        self.collector.publish(MetricEvent::SessionStarted { source });
    }

    pub fn record_session_stopped(&self) {
        self.collector.publish(MetricEvent::SessionStopped);
    }

    pub fn record_error(&self, context: impl Into<String>) {
        self.collector.publish(MetricEvent::Error {
            context: context.into(),
        });
    }
}

impl Default for TelemetryHub {
    fn default() -> Self {
        Self::new(256, 64)
    }
}
