// BandClassifier - band-table lookup for sound identification
//
// Maps a peak frequency to a named acoustic category via a linear first-match
// scan over the ordered band table. Silence bypasses the table entirely, and
// two fixed fallback categories guarantee a result for any frequency, so
// classification is total: every (frequency, silence) pair maps to exactly
// one category.

use serde::{Deserialize, Serialize};

use crate::bands::{default_band_table, AcousticBand};

/// Frequencies above this with no table match read as electronic interference
const HIGH_FREQ_FALLBACK_HZ: u32 = 8000;

/// Category resolved for one frequency (no confidence attached yet)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandMatch {
    pub category: String,
    pub label: String,
    pub description: String,
}

impl BandMatch {
    fn silence() -> Self {
        Self {
            category: "Silence".to_string(),
            label: "Background Noise".to_string(),
            description: "Signal below analysis threshold.".to_string(),
        }
    }

    fn electronic_whine() -> Self {
        Self {
            category: "High Freq".to_string(),
            label: "Electronic Whine".to_string(),
            description: "Ultrasonic or electronic interference.".to_string(),
        }
    }

    fn unidentified() -> Self {
        Self {
            category: "Unknown".to_string(),
            label: "Unidentified Pattern".to_string(),
            description: "Frequency out of standard classification.".to_string(),
        }
    }

    fn from_band(band: &AcousticBand) -> Self {
        Self {
            category: band.category.clone(),
            label: band.label.clone(),
            description: band.description.clone(),
        }
    }
}

/// Final identification produced once per completed session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub label: String,
    pub description: String,
    pub confidence_percent: f64,
}

impl Classification {
    pub fn new(band: BandMatch, confidence_percent: f64) -> Self {
        Self {
            category: band.category,
            label: band.label,
            description: band.description,
            confidence_percent,
        }
    }
}

/// Classifier over an ordered band table
pub struct BandClassifier {
    bands: Vec<AcousticBand>,
}

impl BandClassifier {
    /// Create a classifier over `bands`, scanned in the given order
    pub fn new(bands: Vec<AcousticBand>) -> Self {
        Self { bands }
    }

    /// Classifier over the built-in table
    pub fn with_default_table() -> Self {
        Self::new(default_band_table())
    }

    pub fn bands(&self) -> &[AcousticBand] {
        &self.bands
    }

    /// Resolve a category for a peak frequency
    ///
    /// Silent frames short-circuit to the Silence category regardless of
    /// frequency. Otherwise the first band containing the frequency wins;
    /// unmatched frequencies fall back to Electronic Whine above 8000 Hz and
    /// Unidentified Pattern below.
    pub fn classify(&self, frequency_hz: u32, is_silent: bool) -> BandMatch {
        if is_silent {
            return BandMatch::silence();
        }

        if let Some(band) = self.bands.iter().find(|b| b.contains(frequency_hz)) {
            return BandMatch::from_band(band);
        }

        if frequency_hz > HIGH_FREQ_FALLBACK_HZ {
            BandMatch::electronic_whine()
        } else {
            BandMatch::unidentified()
        }
    }
}

impl Default for BandClassifier {
    fn default() -> Self {
        Self::with_default_table()
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
