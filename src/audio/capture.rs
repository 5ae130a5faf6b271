// Live capture - cpal input stream feeding the analysis ring
//
// The callback takes an empty buffer from the pool, copies the first channel
// of the interleaved input into it, and pushes it to the data queue. If the
// pool is exhausted the block is dropped; the callback never blocks and never
// allocates.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::buffer_pool::CaptureChannels;
use crate::error::EngineError;

/// A running input stream
///
/// Capture stops when this is dropped.
pub struct CaptureStream {
    _stream: cpal::Stream,
    sample_rate: u32,
}

impl CaptureStream {
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Open and start the default input device
pub fn start_capture(mut channels: CaptureChannels) -> Result<CaptureStream, EngineError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or(EngineError::NoInputDevice)?;

    if let Ok(name) = device.name() {
        tracing::info!("[Capture] Using audio input device: {}", name);
    }

    let config = device
        .default_input_config()
        .map_err(|e| EngineError::StreamOpenFailed {
            reason: format!("Failed to get default input config: {:?}", e),
        })?;

    let stream_config: cpal::StreamConfig = config.clone().into();
    let sample_rate = stream_config.sample_rate.0;
    let channels_count = stream_config.channels as usize;

    let err_fn = |err| tracing::error!("[Capture] Input stream error: {}", err);

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => device.build_input_stream(
            &stream_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if let Ok(mut buffer) = channels.pool_consumer.pop() {
                    buffer.clear();
                    if channels_count == 1 {
                        buffer.extend_from_slice(data);
                    } else {
                        // De-interleave: take first channel
                        for frame in data.chunks(channels_count) {
                            buffer.push(frame.first().copied().unwrap_or(0.0));
                        }
                    }
                    let _ = channels.data_producer.push(buffer);
                }
            },
            err_fn,
            None,
        ),
        other => {
            return Err(EngineError::StreamOpenFailed {
                reason: format!("Unsupported input sample format: {:?}", other),
            })
        }
    }
    .map_err(|e| EngineError::StreamOpenFailed {
        reason: format!("{:?}", e),
    })?;

    stream.play().map_err(|e| EngineError::StreamOpenFailed {
        reason: format!("Input start failed: {}", e),
    })?;

    Ok(CaptureStream {
        _stream: stream,
        sample_rate,
    })
}
