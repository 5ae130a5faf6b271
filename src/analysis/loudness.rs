// Loudness estimation - RMS and dBFS over byte magnitude bins
//
// dBFS is relative to the 255 byte full scale. A frame with zero energy has
// no finite decibel value; that case is a tagged sentinel rather than a
// floating-point -inf so downstream threshold comparisons stay well-defined.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Full-scale reference for byte magnitude bins
const FULL_SCALE: f64 = 255.0;

/// Decibel level relative to full scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decibels {
    /// Finite measured level
    Level(f64),
    /// Zero signal energy; compares below every finite level
    NegativeInfinity,
}

impl Decibels {
    /// Whether this level is strictly below `threshold_db`
    ///
    /// The sentinel is below every threshold.
    pub fn is_below(&self, threshold_db: f64) -> bool {
        match self {
            Decibels::Level(db) => *db < threshold_db,
            Decibels::NegativeInfinity => true,
        }
    }

    /// Finite level, if any
    pub fn level(&self) -> Option<f64> {
        match self {
            Decibels::Level(db) => Some(*db),
            Decibels::NegativeInfinity => None,
        }
    }
}

impl fmt::Display for Decibels {
    /// One-decimal display matching the live readout ("-20.4" or "-Inf")
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decibels::Level(db) => write!(f, "{:.1}", db),
            Decibels::NegativeInfinity => write!(f, "-Inf"),
        }
    }
}

/// Loudness figures for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loudness {
    pub rms: f64,
    pub decibels: Decibels,
}

impl Loudness {
    /// Placeholder for a session that never saw a frame
    pub fn unmeasured() -> Self {
        Self {
            rms: 0.0,
            decibels: Decibels::NegativeInfinity,
        }
    }
}

/// Estimate loudness from one frame's magnitude bins
///
/// RMS over all bins; dB = 20 * log10(rms / 255) when rms > 0. `magnitudes`
/// must be non-empty (capture collaborator contract).
pub fn estimate(magnitudes: &[u8]) -> Loudness {
    let sum_squares: f64 = magnitudes.iter().map(|&m| (m as f64) * (m as f64)).sum();
    let rms = (sum_squares / magnitudes.len() as f64).sqrt();

    let decibels = if rms > 0.0 {
        Decibels::Level(20.0 * (rms / FULL_SCALE).log10())
    } else {
        Decibels::NegativeInfinity
    };

    Loudness { rms, decibels }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_scale_is_zero_db() {
        let loudness = estimate(&[255, 255, 255, 255]);
        assert_eq!(loudness.rms, 255.0);
        match loudness.decibels {
            Decibels::Level(db) => assert!(db.abs() < 1e-9, "expected 0 dB, got {}", db),
            Decibels::NegativeInfinity => panic!("expected finite level"),
        }
    }

    #[test]
    fn test_all_zero_yields_sentinel() {
        let loudness = estimate(&[0, 0, 0, 0]);
        assert_eq!(loudness.rms, 0.0);
        assert_eq!(loudness.decibels, Decibels::NegativeInfinity);
    }

    #[test]
    fn test_known_rms() {
        // [3, 4] -> rms = sqrt((9 + 16) / 2) = 3.5355...
        let loudness = estimate(&[3, 4]);
        assert!((loudness.rms - 12.5_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_sentinel_is_below_everything() {
        assert!(Decibels::NegativeInfinity.is_below(-50.0));
        assert!(Decibels::NegativeInfinity.is_below(-1e9));
    }

    #[test]
    fn test_is_below_is_strict() {
        assert!(!Decibels::Level(-50.0).is_below(-50.0));
        assert!(Decibels::Level(-50.1).is_below(-50.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Decibels::Level(-20.44).to_string(), "-20.4");
        assert_eq!(Decibels::NegativeInfinity.to_string(), "-Inf");
    }
}
