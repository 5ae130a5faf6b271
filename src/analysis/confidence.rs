// Confidence scoring - loudness-derived identification confidence
//
// Louder signal means a clearer peak and a higher score. Silence is an exact
// match for "it is quiet" and scores 100.

use crate::analysis::loudness::Decibels;

/// Ceiling for non-silent confidence
const MAX_CONFIDENCE: f64 = 98.0;

/// Score an identification from the frame's silence state and level
///
/// Silent frames score 100.0. Otherwise min(98, (dB + 100) * 1.2), rounded
/// to one decimal. There is deliberately no lower clamp: levels below about
/// -83.3 dB produce negative scores, matching the original formula (see
/// DESIGN.md). Callers must tolerate values below zero.
pub fn score(is_silent: bool, decibels: Decibels) -> f64 {
    match (is_silent, decibels) {
        (true, _) | (_, Decibels::NegativeInfinity) => 100.0,
        (false, Decibels::Level(db)) => round_one_decimal(((db + 100.0) * 1.2).min(MAX_CONFIDENCE)),
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
