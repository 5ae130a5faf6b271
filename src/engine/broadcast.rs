// BroadcastChannelManager: Centralized tokio broadcast channel management
// Single Responsibility: Broadcast channel lifecycle and subscription

use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use crate::history::SessionRecord;
use crate::session::TickReadout;

/// Manages all tokio broadcast channels
///
/// Centralizes channel creation, storage, and subscription handling for:
/// - Readouts: per-tick live figures plus raw spectrum, display rate
/// - Records: one end-of-session identification per completed session
pub struct BroadcastChannelManager {
    readouts: Arc<Mutex<Option<broadcast::Sender<TickReadout>>>>,
    records: Arc<Mutex<Option<broadcast::Sender<SessionRecord>>>>,
}

impl BroadcastChannelManager {
    /// Create a new manager with all channels uninitialized
    ///
    /// Channels must be explicitly initialized via init_* methods before use.
    pub fn new() -> Self {
        Self {
            readouts: Arc::new(Mutex::new(None)),
            records: Arc::new(Mutex::new(None)),
        }
    }

    /// Initialize the readout broadcast channel
    ///
    /// Buffer size 256 covers several seconds of display-rate traffic for a
    /// lagging subscriber before messages drop.
    pub fn init_readouts(&self) -> broadcast::Sender<TickReadout> {
        let (tx, _) = broadcast::channel(256);
        *self.readouts.lock().unwrap() = Some(tx.clone());
        tx
    }

    /// Subscribe to live readouts
    ///
    /// Returns None before the first session initializes the channel. Each
    /// subscriber gets an independent receiver.
    pub fn subscribe_readouts(&self) -> Option<broadcast::Receiver<TickReadout>> {
        self.readouts.lock().unwrap().as_ref().map(|tx| tx.subscribe())
    }

    /// Initialize the session record broadcast channel
    pub fn init_records(&self) -> broadcast::Sender<SessionRecord> {
        let (tx, _) = broadcast::channel(16);
        *self.records.lock().unwrap() = Some(tx.clone());
        tx
    }

    /// Subscribe to end-of-session records
    pub fn subscribe_records(&self) -> Option<broadcast::Receiver<SessionRecord>> {
        self.records.lock().unwrap().as_ref().map(|tx| tx.subscribe())
    }

    /// Current record sender, if a session has initialized one
    pub fn record_sender(&self) -> Option<broadcast::Sender<SessionRecord>> {
        self.records.lock().unwrap().clone()
    }
}

impl Default for BroadcastChannelManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::loudness::Decibels;

    #[test]
    fn test_readout_channel_lifecycle() {
        let manager = BroadcastChannelManager::new();
        assert!(manager.subscribe_readouts().is_none());

        let _tx = manager.init_readouts();
        assert!(manager.subscribe_readouts().is_some());
    }

    #[test]
    fn test_record_channel_lifecycle() {
        let manager = BroadcastChannelManager::new();
        assert!(manager.subscribe_records().is_none());
        assert!(manager.record_sender().is_none());

        let _tx = manager.init_records();
        assert!(manager.subscribe_records().is_some());
        assert!(manager.record_sender().is_some());
    }

    #[test]
    fn test_multiple_readout_subscribers() {
        let manager = BroadcastChannelManager::new();
        let tx = manager.init_readouts();

        let mut rx1 = manager.subscribe_readouts().unwrap();
        let mut rx2 = manager.subscribe_readouts().unwrap();

        let readout = TickReadout {
            frequency_hz: 440,
            magnitude_percent: 50.0,
            decibels: Decibels::Level(-20.0),
            elapsed_seconds: 0.5,
            magnitudes: vec![0; 8],
        };
        tx.send(readout.clone()).unwrap();

        assert_eq!(rx1.try_recv().unwrap().frequency_hz, readout.frequency_hz);
        assert_eq!(rx2.try_recv().unwrap().frequency_hz, readout.frequency_hz);
    }
}
