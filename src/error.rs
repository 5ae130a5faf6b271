// Error types for the soundlens engine
//
// Covers capture device setup, session lifecycle misuse, file decoding, and
// band-table configuration problems. Classification itself never fails: every
// core function is total over its documented input domain.

use std::fmt;

/// Engine-level errors
///
/// These errors cover the outer orchestration surface (capture, file
/// analysis, start/stop lifecycle). The analysis pipeline proper has no
/// error states.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A live session is already running
    AlreadyRunning,

    /// No live session is running
    NotRunning,

    /// No default audio input device available
    NoInputDevice,

    /// Failed to open or start the capture stream
    StreamOpenFailed { reason: String },

    /// Failed to read or decode an audio file
    DecodeFailed { reason: String },

    /// Analysis thread died without producing a classification
    SessionAborted,

    /// Band table entry violates the low <= high invariant
    InvalidBandTable { reason: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::AlreadyRunning => {
                write!(f, "live session already running, stop it first")
            }
            EngineError::NotRunning => {
                write!(f, "no live session running, start one first")
            }
            EngineError::NoInputDevice => {
                write!(f, "no default audio input device found")
            }
            EngineError::StreamOpenFailed { reason } => {
                write!(f, "failed to open capture stream: {}", reason)
            }
            EngineError::DecodeFailed { reason } => {
                write!(f, "failed to decode audio file: {}", reason)
            }
            EngineError::SessionAborted => {
                write!(f, "analysis thread terminated without a result")
            }
            EngineError::InvalidBandTable { reason } => {
                write!(f, "invalid band table: {}", reason)
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::DecodeFailed {
            reason: err.to_string(),
        }
    }
}

impl From<hound::Error> for EngineError {
    fn from(err: hound::Error) -> Self {
        EngineError::DecodeFailed {
            reason: err.to_string(),
        }
    }
}
