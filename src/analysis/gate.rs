// Silence gate - fixed-threshold loudness gating
//
// Very low signal energy makes the peak frequency meaningless quantization
// noise; gated frames classify as background noise instead of whatever
// low-frequency band the noise floor happens to land in.

use crate::analysis::loudness::Decibels;

/// Frames quieter than this classify as silence
pub const SILENCE_THRESHOLD_DB: f64 = -50.0;

/// Loudness gate deciding whether a frame is informative signal
#[derive(Debug, Clone, Copy)]
pub struct SilenceGate {
    threshold_db: f64,
}

impl SilenceGate {
    pub fn new(threshold_db: f64) -> Self {
        Self { threshold_db }
    }

    /// Silent iff the level is strictly below the threshold or unmeasurable
    ///
    /// Exactly the threshold still counts as signal.
    pub fn is_silent(&self, decibels: Decibels) -> bool {
        decibels.is_below(self.threshold_db)
    }
}

impl Default for SilenceGate {
    fn default() -> Self {
        Self::new(SILENCE_THRESHOLD_DB)
    }
}
