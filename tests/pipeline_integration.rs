//! Integration tests for the analysis-and-classification pipeline
//!
//! These tests drive the full path from spectral frames through session
//! ticks to the final classification. Frames are built by hand so expected
//! values are exact; spectral transform correctness is covered by unit tests
//! in the spectrum module.

use soundlens::analysis::classifier::BandClassifier;
use soundlens::analysis::gate::SilenceGate;
use soundlens::bands::AcousticBand;
use soundlens::session::AnalysisSession;
use soundlens::spectrum::SpectralFrame;

fn frame(magnitudes: Vec<u8>) -> SpectralFrame {
    SpectralFrame {
        magnitudes,
        sample_rate: 44100,
        transform_size: 2048,
    }
}

/// Frame whose loudest bin is `bin` at full magnitude, everything else zero
fn peaked_frame(bin: usize) -> SpectralFrame {
    let mut magnitudes = vec![0u8; 1024];
    magnitudes[bin] = 255;
    frame(magnitudes)
}

fn default_session() -> AnalysisSession {
    AnalysisSession::begin(SilenceGate::default(), BandClassifier::with_default_table())
}

fn session_with(bands: Vec<AcousticBand>) -> AnalysisSession {
    AnalysisSession::begin(SilenceGate::default(), BandClassifier::new(bands))
}

#[test]
fn peak_extraction_matches_bin_math() {
    let mut session = default_session();
    let readout = session.tick(&frame(vec![0, 0, 255, 0]));

    // round(2 * 44100 / 2048) = 43
    assert_eq!(readout.frequency_hz, 43);
    assert_eq!(readout.magnitude_percent, 100.0);
}

#[test]
fn silence_wins_over_any_earlier_frequency() {
    let mut session = default_session();

    // A loud speech-range tick followed by a dead-silent final tick: the
    // session must classify the final reading, and silence bypasses the
    // band table entirely.
    session.tick(&peaked_frame(20));
    session.tick(&frame(vec![0u8; 1024]));

    let outcome = session.finish();
    assert_eq!(outcome.classification.category, "Silence");
    assert_eq!(outcome.classification.label, "Background Noise");
    assert_eq!(outcome.classification.confidence_percent, 100.0);
    assert_eq!(outcome.record.decibels_label, "-Inf dB");
}

#[test]
fn overlapping_bands_resolve_by_declared_order() {
    // bin 9 -> round(9 * 44100 / 2048) = 194 Hz, inside both ranges
    let mut session = session_with(vec![
        AcousticBand::new("Machinery", "Mechanical Hum", [60, 400], ""),
        AcousticBand::new("Human", "Human Speech", [85, 3500], ""),
    ]);
    session.tick(&peaked_frame(9));

    let outcome = session.finish();
    assert_eq!(outcome.classification.label, "Mechanical Hum");
}

#[test]
fn unmatched_high_frequency_falls_back_to_whine() {
    // bin 372 -> round(372 * 44100 / 2048) = 8010 Hz, above the 8000 cutoff
    let mut session = session_with(vec![]);
    session.tick(&peaked_frame(372));

    let outcome = session.finish();
    assert_eq!(outcome.classification.label, "Electronic Whine");
    assert_eq!(outcome.classification.category, "High Freq");
}

#[test]
fn unmatched_low_frequency_falls_back_to_unidentified() {
    // bin 2 -> 43 Hz, no table, below the whine cutoff
    let mut session = session_with(vec![]);
    session.tick(&peaked_frame(2));

    let outcome = session.finish();
    assert_eq!(outcome.classification.label, "Unidentified Pattern");
    assert_eq!(outcome.classification.category, "Unknown");
}

#[test]
fn louder_sessions_score_higher_confidence() {
    let mut confidences = Vec::new();
    for level in [8u8, 32, 64, 128, 255] {
        let mut magnitudes = vec![level; 1024];
        magnitudes[20] = 255;
        let mut session = default_session();
        session.tick(&frame(magnitudes));
        confidences.push(session.finish().classification.confidence_percent);
    }

    for pair in confidences.windows(2) {
        assert!(
            pair[0] <= pair[1],
            "confidence not monotone in loudness: {:?}",
            confidences
        );
    }
    assert!(confidences.iter().all(|&c| c <= 98.0));
}

#[test]
fn quiet_frame_gates_to_silence() {
    // One bin at 1 over 1024 bins: rms = 1/32 -> about -78 dBFS, well under
    // the -50 dB gate but still nonzero energy
    let mut magnitudes = vec![0u8; 1024];
    magnitudes[9] = 1;

    let mut session = default_session();
    let readout = session.tick(&frame(magnitudes));
    assert!(readout.decibels.level().unwrap() < -50.0);

    let outcome = session.finish();
    assert_eq!(outcome.classification.category, "Silence");
    assert_eq!(outcome.classification.confidence_percent, 100.0);
}

#[test]
fn end_to_end_hum_identification() {
    // Uniform floor of 26 with a full-scale peak at bin 9 (194 Hz):
    // rms = sqrt((26^2 * 1023 + 255^2) / 1024) = 27.1815...
    // dB  = 20 * log10(rms / 255) = -19.445...
    // confidence = min(98, (dB + 100) * 1.2) = 96.7 after rounding
    let mut magnitudes = vec![26u8; 1024];
    magnitudes[9] = 255;

    let mut session = session_with(vec![
        AcousticBand::new(
            "Machinery",
            "Mechanical Hum",
            [60, 400],
            "AC current hum or motor rotation.",
        ),
        AcousticBand::new(
            "Human",
            "Human Speech / Voice",
            [85, 3500],
            "Vocal cords modulation with harmonics.",
        ),
    ]);
    session.tick(&frame(magnitudes));

    let outcome = session.finish();
    assert_eq!(outcome.classification.category, "Machinery");
    assert_eq!(outcome.classification.label, "Mechanical Hum");
    assert_eq!(outcome.classification.confidence_percent, 96.7);

    assert_eq!(outcome.record.frequency_hz, 194);
    assert_eq!(outcome.record.category_label, "Mechanical Hum");
    assert_eq!(outcome.record.decibels_label, "-19.4 dB");
    assert_eq!(outcome.record.confidence_percent, 96.7);
}

#[test]
fn identical_frames_classify_identically() {
    let mut magnitudes = vec![40u8; 1024];
    magnitudes[100] = 255;
    let spectral = frame(magnitudes);

    let run = |spectral: &SpectralFrame| {
        let mut session = default_session();
        session.tick(spectral);
        session.finish().classification
    };

    assert_eq!(run(&spectral), run(&spectral));
}

#[test]
fn every_frame_produces_exactly_one_category() {
    // Sweep peak bins across the whole frame: classification is total and
    // never empty, whatever bin dominates.
    for bin in (0..1024).step_by(13) {
        let mut session = default_session();
        session.tick(&peaked_frame(bin));
        let outcome = session.finish();
        assert!(!outcome.classification.category.is_empty());
        assert!(!outcome.classification.label.is_empty());
    }
}
