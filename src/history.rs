// Session history - bounded, most-recent-first log of completed sessions
//
// One record per completed recording, newest first. History lives only for
// the process lifetime; nothing is persisted.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of retained records
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// One completed session, as shown in the history table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Wall-clock completion time, milliseconds since the Unix epoch
    pub timestamp_ms: u64,
    /// Final peak frequency in Hz
    pub frequency_hz: u32,
    /// Display label for the final loudness, e.g. "-20.4 dB" or "-Inf dB"
    pub decibels_label: String,
    /// Identification label, e.g. "Human Speech / Voice"
    pub category_label: String,
    /// Heuristic confidence; may be negative for very quiet signals
    pub confidence_percent: f64,
}

/// Bounded most-recent-first record log
#[derive(Debug)]
pub struct SessionHistory {
    records: VecDeque<SessionRecord>,
    capacity: usize,
    dropped: u64,
}

impl SessionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Append a completed session at the front; evicts the oldest when full
    pub fn push(&mut self, record: SessionRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_back();
            self.dropped += 1;
        }
        self.records.push_front(record);
    }

    /// Records in display order, most recent first
    pub fn records(&self) -> Vec<SessionRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records evicted by the capacity bound
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
