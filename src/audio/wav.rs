// WAV decoding for file-based analysis sessions
//
// Files are decoded up front into mono f32 samples; multi-channel input is
// averaged down. Offline sessions have no real-time constraint, so there is
// no streaming path.

use std::path::Path;

use crate::error::EngineError;

/// Decoded audio ready for an offline session
#[derive(Debug, Clone)]
pub struct WavAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl WavAudio {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Read a WAV file and mix it down to mono f32
pub fn read_mono<P: AsRef<Path>>(path: P) -> Result<WavAudio, EngineError> {
    let mut reader = hound::WavReader::open(&path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    if channels == 0 {
        return Err(EngineError::DecodeFailed {
            reason: "WAV file reports zero channels".to_string(),
        });
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    tracing::info!(
        "[Wav] Decoded {:?}: {} samples at {} Hz",
        path.as_ref(),
        samples.len(),
        spec.sample_rate
    );

    Ok(WavAudio {
        samples,
        sample_rate: spec.sample_rate,
    })
}
