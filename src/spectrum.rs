// Spectrum analyzer - time-domain windows to byte magnitude bins
//
// Converts a window of f32 samples into the byte-frequency form the analysis
// pipeline consumes: per-bin dBFS mapped linearly from [min_decibels,
// max_decibels] onto 0-255 with clamping, after exponential smoothing across
// consecutive frames. Hann windowing reduces spectral leakage.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use crate::config::AnalysisConfig;

/// One frame of spectral data, produced per analysis tick
///
/// `magnitudes` holds `transform_size / 2` byte bins; bin `i` is centred at
/// `i * sample_rate / transform_size` Hz. Frames are consumed immediately and
/// never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectralFrame {
    pub magnitudes: Vec<u8>,
    pub sample_rate: u32,
    pub transform_size: usize,
}

/// Stateful spectral transform with per-bin smoothing
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    /// Hann window (pre-computed)
    window: Vec<f32>,
    /// Smoothed linear magnitude per bin, carried between frames
    smoothed: Vec<f32>,
    transform_size: usize,
    sample_rate: u32,
    min_decibels: f32,
    max_decibels: f32,
    smoothing: f32,
}

impl SpectrumAnalyzer {
    pub fn new(sample_rate: u32, config: &AnalysisConfig) -> Self {
        let transform_size = config.transform_size;
        let window = (0..transform_size)
            .map(|i| {
                0.5 * (1.0
                    - ((2.0 * std::f32::consts::PI * i as f32) / (transform_size as f32 - 1.0))
                        .cos())
            })
            .collect();

        Self {
            fft: FftPlanner::new().plan_fft_forward(transform_size),
            window,
            smoothed: vec![0.0; transform_size / 2],
            transform_size,
            sample_rate,
            min_decibels: config.min_decibels,
            max_decibels: config.max_decibels,
            smoothing: config.smoothing_time_constant,
        }
    }

    pub fn transform_size(&self) -> usize {
        self.transform_size
    }

    /// Drop smoothing state carried from a previous session
    pub fn reset(&mut self) {
        self.smoothed.fill(0.0);
    }

    /// Transform one window of samples into a byte-magnitude frame
    ///
    /// Windows shorter than `transform_size` are zero-padded, so the terminal
    /// partial window of a file still produces a frame.
    pub fn analyze(&mut self, samples: &[f32]) -> SpectralFrame {
        let mut buffer: Vec<Complex<f32>> = Vec::with_capacity(self.transform_size);

        for (i, &sample) in samples.iter().enumerate() {
            if i < self.transform_size {
                buffer.push(Complex::new(sample * self.window[i], 0.0));
            }
        }
        while buffer.len() < self.transform_size {
            buffer.push(Complex::new(0.0, 0.0));
        }

        self.fft.process(&mut buffer);

        // Positive-frequency magnitudes, normalized so a full-scale sine
        // lands near 0.5 under the Hann window's coherent gain.
        let scale = 2.0 / self.transform_size as f32;
        let bins = self.transform_size / 2;
        let mut magnitudes = Vec::with_capacity(bins);

        for (i, c) in buffer[..bins].iter().enumerate() {
            let magnitude = c.norm() * scale;
            self.smoothed[i] =
                self.smoothing * self.smoothed[i] + (1.0 - self.smoothing) * magnitude;
            magnitudes.push(self.to_byte(self.smoothed[i]));
        }

        SpectralFrame {
            magnitudes,
            sample_rate: self.sample_rate,
            transform_size: self.transform_size,
        }
    }

    /// Map a linear magnitude onto the clamped 0-255 dBFS range
    fn to_byte(&self, magnitude: f32) -> u8 {
        let db = 20.0 * magnitude.log10();
        let scaled =
            255.0 * (db - self.min_decibels) / (self.max_decibels - self.min_decibels);
        scaled.clamp(0.0, 255.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AnalysisConfig {
        AnalysisConfig::default()
    }

    fn generate_sine_wave(sample_rate: u32, frequency: f32, duration_samples: usize) -> Vec<f32> {
        (0..duration_samples)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect()
    }

    #[test]
    fn test_frame_shape() {
        let config = test_config();
        let mut analyzer = SpectrumAnalyzer::new(48000, &config);
        let frame = analyzer.analyze(&generate_sine_wave(48000, 1000.0, 2048));

        assert_eq!(frame.magnitudes.len(), 1024);
        assert_eq!(frame.sample_rate, 48000);
        assert_eq!(frame.transform_size, 2048);
    }

    #[test]
    fn test_sine_peaks_at_expected_bin() {
        let config = test_config();
        let mut analyzer = SpectrumAnalyzer::new(48000, &config);

        // 1000 Hz at 48 kHz / 2048 lands between bins 42 and 43
        let signal = generate_sine_wave(48000, 1000.0, 2048);
        let frame = analyzer.analyze(&signal);

        let peak_bin = frame
            .magnitudes
            .iter()
            .enumerate()
            .max_by_key(|(_, &m)| m)
            .map(|(i, _)| i)
            .unwrap();
        assert!(
            (42..=43).contains(&peak_bin),
            "Expected peak near bin 42-43, got {}",
            peak_bin
        );
        assert_eq!(frame.magnitudes[peak_bin], 255);

        // Bins far from the tone should carry no energy
        assert_eq!(frame.magnitudes[500], 0);
    }

    #[test]
    fn test_noise_spreads_across_bins() {
        use rand::Rng;

        let config = test_config();
        let mut analyzer = SpectrumAnalyzer::new(48000, &config);
        let mut rng = rand::thread_rng();
        let noise: Vec<f32> = (0..2048).map(|_| rng.gen_range(-1.0..1.0)).collect();

        let frame = analyzer.analyze(&noise);
        let nonzero = frame.magnitudes.iter().filter(|&&m| m > 0).count();
        assert!(
            nonzero > 512,
            "white noise should light up most bins, got {}",
            nonzero
        );
    }

    #[test]
    fn test_silence_is_all_zero() {
        let config = test_config();
        let mut analyzer = SpectrumAnalyzer::new(48000, &config);
        let frame = analyzer.analyze(&vec![0.0; 2048]);
        assert!(frame.magnitudes.iter().all(|&m| m == 0));
    }

    #[test]
    fn test_short_window_is_zero_padded() {
        let config = test_config();
        let mut analyzer = SpectrumAnalyzer::new(48000, &config);
        let frame = analyzer.analyze(&generate_sine_wave(48000, 1000.0, 512));
        assert_eq!(frame.magnitudes.len(), 1024);
    }

    #[test]
    fn test_smoothing_decays_after_signal_ends() {
        let config = test_config();
        let mut analyzer = SpectrumAnalyzer::new(48000, &config);

        // Quiet tone so the byte mapping stays inside its linear range
        // instead of clamping at 255
        let signal: Vec<f32> = generate_sine_wave(48000, 1000.0, 2048)
            .into_iter()
            .map(|s| s * 0.01)
            .collect();
        for _ in 0..8 {
            analyzer.analyze(&signal);
        }
        let during = analyzer.analyze(&signal);
        let peak_bin = during
            .magnitudes
            .iter()
            .enumerate()
            .max_by_key(|(_, &m)| m)
            .map(|(i, _)| i)
            .unwrap();

        // One silent frame: the smoothed bin must fall but not vanish
        let after = analyzer.analyze(&vec![0.0; 2048]);
        assert!(after.magnitudes[peak_bin] < during.magnitudes[peak_bin]);
        assert!(after.magnitudes[peak_bin] > 0);

        // Reset drops the carried state entirely
        analyzer.reset();
        let fresh = analyzer.analyze(&vec![0.0; 2048]);
        assert_eq!(fresh.magnitudes[peak_bin], 0);
    }
}
