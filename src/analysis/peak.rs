// Peak extraction - dominant bin to frequency conversion

use serde::{Deserialize, Serialize};

use crate::spectrum::SpectralFrame;

/// Dominant-frequency reading for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakReading {
    /// Centre frequency of the loudest bin, rounded to the nearest Hz
    pub frequency_hz: u32,
    /// Loudest bin's magnitude as a percentage of full scale
    pub magnitude_percent: f64,
}

/// Find the loudest bin and convert it to a frequency
///
/// Ties resolve to the lowest bin index, so an all-zero frame reads as bin 0:
/// 0 Hz at 0 %.
pub fn extract(frame: &SpectralFrame) -> PeakReading {
    let (peak_bin, peak_magnitude) = frame
        .magnitudes
        .iter()
        .enumerate()
        .fold((0usize, 0u8), |(best_bin, best_mag), (bin, &mag)| {
            if mag > best_mag {
                (bin, mag)
            } else {
                (best_bin, best_mag)
            }
        });

    let frequency_hz = ((peak_bin as f64 * frame.sample_rate as f64)
        / frame.transform_size as f64)
        .round() as u32;
    let magnitude_percent = (peak_magnitude as f64 / 255.0) * 100.0;

    PeakReading {
        frequency_hz,
        magnitude_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(magnitudes: Vec<u8>, sample_rate: u32, transform_size: usize) -> SpectralFrame {
        SpectralFrame {
            magnitudes,
            sample_rate,
            transform_size,
        }
    }

    #[test]
    fn test_peak_bin_to_frequency() {
        // bin 2 at 44.1 kHz / 2048 -> round(2 * 44100 / 2048) = 43 Hz
        let reading = extract(&frame(vec![0, 0, 255, 0], 44100, 2048));
        assert_eq!(reading.frequency_hz, 43);
        assert_eq!(reading.magnitude_percent, 100.0);
    }

    #[test]
    fn test_ties_resolve_to_lowest_bin() {
        let reading = extract(&frame(vec![0, 128, 0, 128], 44100, 2048));
        assert_eq!(
            reading.frequency_hz,
            ((44100.0 / 2048.0) as f64).round() as u32
        );
    }

    #[test]
    fn test_all_zero_reads_as_bin_zero() {
        let reading = extract(&frame(vec![0; 16], 44100, 2048));
        assert_eq!(reading.frequency_hz, 0);
        assert_eq!(reading.magnitude_percent, 0.0);
    }

    #[test]
    fn test_magnitude_percent_scale() {
        let reading = extract(&frame(vec![51, 0], 48000, 2048));
        assert!((reading.magnitude_percent - 20.0).abs() < 1e-9);
    }
}
