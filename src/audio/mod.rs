// Audio module - sample acquisition for the analysis pipeline
//
// Two sources feed the engine: a live cpal input stream pushing buffers
// through a lock-free pool, and WAV files decoded up front for offline
// sessions.

pub mod buffer_pool;
pub mod capture;
pub mod wav;

pub use buffer_pool::{AnalysisChannels, AudioBuffer, BufferPool, CaptureChannels};
pub use capture::CaptureStream;
