//! Configuration management for the analysis engine
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling parameter tuning without recompilation. The byte-bin conversion
//! range, silence threshold, and band table can all be adjusted via the
//! config file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::analysis::gate::SILENCE_THRESHOLD_DB;
use crate::bands::{self, AcousticBand};

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub audio: AudioConfig,
    pub analysis: AnalysisConfig,
    /// Replacement band table. Declared order is preserved and significant;
    /// absent means the built-in table.
    #[serde(default)]
    pub bands: Option<Vec<AcousticBand>>,
}

/// Spectral analysis parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Spectral transform length in samples (frequency bins = half of this)
    pub transform_size: usize,
    /// Lower edge of the dBFS range mapped onto byte magnitude 0
    pub min_decibels: f32,
    /// Upper edge of the dBFS range mapped onto byte magnitude 255
    pub max_decibels: f32,
    /// Exponential smoothing factor applied to bin magnitudes across frames
    pub smoothing_time_constant: f32,
    /// Frames quieter than this (dBFS over all bins) classify as silence
    pub silence_threshold_db: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            transform_size: 2048,
            // Byte-bin range matching common analyser-node defaults
            min_decibels: -100.0,
            max_decibels: -30.0,
            smoothing_time_constant: 0.8,
            silence_threshold_db: SILENCE_THRESHOLD_DB,
        }
    }
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Size of buffer pool for real-time audio transfer
    pub buffer_pool_size: usize,
    /// Size of each audio buffer in samples
    pub buffer_size: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            buffer_pool_size: 64,
            buffer_size: 2048,
        }
    }
}

impl Default for AppConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            analysis: AnalysisConfig::default(),
            bands: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration, or defaults if the file is missing or the
    /// JSON is invalid.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default asset path
    pub fn load() -> Self {
        Self::load_from_file("assets/soundlens_config.json")
    }

    /// Resolve the active band table
    ///
    /// Returns the config-supplied table when present and valid, otherwise
    /// the built-in table. An invalid replacement table (any entry with
    /// low > high) is rejected with a warning rather than half-applied.
    pub fn band_table(&self) -> Vec<AcousticBand> {
        match &self.bands {
            Some(table) => match bands::validate_table(table) {
                Ok(()) => table.clone(),
                Err(err) => {
                    log::warn!("[Config] Rejecting configured band table: {}", err);
                    bands::default_band_table()
                }
            },
            None => bands::default_band_table(),
        }
    }
}
