// Acoustic band table - ordered frequency ranges for sound identification
//
// The table is an ordered sequence, not a map. Ranges may overlap; lookup is
// a linear first-match scan, so earlier entries take priority. In the default
// table Mechanical Hum (60-400 Hz) overlaps Human Speech (85-3500 Hz) and is
// declared after it.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One named frequency range in the identification table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcousticBand {
    /// Coarse category shown as a badge (e.g. "Human", "Machinery")
    pub category: String,
    /// Human-readable identification label
    pub label: String,
    /// Inclusive [low, high] range in Hz; low <= high
    pub freq_range: [u32; 2],
    /// One-line description of the acoustic signature
    pub description: String,
}

impl AcousticBand {
    pub fn new(
        category: impl Into<String>,
        label: impl Into<String>,
        freq_range: [u32; 2],
        description: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            label: label.into(),
            freq_range,
            description: description.into(),
        }
    }

    /// Whether `frequency_hz` falls inside this band (inclusive both ends)
    pub fn contains(&self, frequency_hz: u32) -> bool {
        frequency_hz >= self.freq_range[0] && frequency_hz <= self.freq_range[1]
    }
}

/// Built-in identification table
///
/// Order is significant: the Mechanical Hum range overlaps Human Speech and
/// is deliberately listed after it.
pub fn default_band_table() -> Vec<AcousticBand> {
    vec![
        AcousticBand::new(
            "Human",
            "Human Speech / Voice",
            [85, 3500],
            "Vocal cords modulation with harmonics.",
        ),
        AcousticBand::new(
            "Nature",
            "Bird / High Chirp",
            [3501, 8000],
            "Rapid pitch modulation (Passerine).",
        ),
        AcousticBand::new(
            "Nature",
            "Thunder / Rumble",
            [20, 84],
            "Low frequency atmospheric turbulence.",
        ),
        AcousticBand::new(
            "Insect",
            "Cricket / Cicada",
            [8001, 16000],
            "High frequency stridulation.",
        ),
        AcousticBand::new(
            "Machinery",
            "Mechanical Hum",
            [60, 400],
            "AC current hum or motor rotation.",
        ),
    ]
}

/// Check the low <= high invariant for every entry
///
/// Overlap between entries is allowed (first match wins), so it is not
/// checked here.
pub fn validate_table(bands: &[AcousticBand]) -> Result<(), EngineError> {
    for band in bands {
        if band.freq_range[0] > band.freq_range[1] {
            return Err(EngineError::InvalidBandTable {
                reason: format!(
                    "band '{}' has low {} Hz above high {} Hz",
                    band.label, band.freq_range[0], band.freq_range[1]
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = default_band_table();
        assert_eq!(table.len(), 5);
        assert!(validate_table(&table).is_ok());
    }

    #[test]
    fn test_default_table_order() {
        // The overlap between speech and hum is resolved by declared order,
        // so the table must come out in source order.
        let table = default_band_table();
        assert_eq!(table[0].label, "Human Speech / Voice");
        assert_eq!(table[4].label, "Mechanical Hum");
    }

    #[test]
    fn test_contains_is_inclusive() {
        let band = AcousticBand::new("Test", "Range", [85, 3500], "");
        assert!(band.contains(85));
        assert!(band.contains(3500));
        assert!(!band.contains(84));
        assert!(!band.contains(3501));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let table = vec![AcousticBand::new("Test", "Inverted", [100, 50], "")];
        let err = validate_table(&table).unwrap_err();
        assert!(err.to_string().contains("Inverted"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let table = default_band_table();
        let json = serde_json::to_string(&table).unwrap();
        let parsed: Vec<AcousticBand> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, table);
    }
}
