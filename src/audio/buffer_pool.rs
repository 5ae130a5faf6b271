// BufferPool - lock-free buffer pool with dual SPSC queues
//
// Object pool over two lock-free SPSC ring buffers, keeping the capture
// callback allocation-free:
//
// 1. Capture thread pops an empty buffer from the pool queue
// 2. Capture thread fills it with samples and pushes it to the data queue
// 3. Analysis thread pops it from the data queue and processes it
// 4. Analysis thread returns it to the pool queue

use rtrb::{Consumer, Producer};

/// Audio buffer type - pre-allocated vector of f32 samples
pub type AudioBuffer = Vec<f32>;

/// Capture-side ends of the pool: take empties, emit filled buffers
pub struct CaptureChannels {
    pub data_producer: Producer<AudioBuffer>,
    pub pool_consumer: Consumer<AudioBuffer>,
}

/// Analysis-side ends of the pool: take filled buffers, return empties
pub struct AnalysisChannels {
    pub data_consumer: Consumer<AudioBuffer>,
    pub pool_producer: Producer<AudioBuffer>,
}

/// Lock-free buffer pool using dual SPSC ring buffers
///
/// Pre-allocates a fixed number of sample buffers; all heap allocation
/// happens at construction, never in the capture callback.
pub struct BufferPool;

impl BufferPool {
    /// Create a pool and split it into its capture and analysis ends
    ///
    /// # Panics
    /// Panics if `buffer_count` or `buffer_size` is 0.
    pub fn new(buffer_count: usize, buffer_size: usize) -> (CaptureChannels, AnalysisChannels) {
        assert!(buffer_count > 0, "buffer_count must be greater than 0");
        assert!(buffer_size > 0, "buffer_size must be greater than 0");

        let (mut pool_producer, pool_consumer) = rtrb::RingBuffer::new(buffer_count);
        let (data_producer, data_consumer) = rtrb::RingBuffer::new(buffer_count);

        for _ in 0..buffer_count {
            let buffer = vec![0.0_f32; buffer_size];
            pool_producer
                .push(buffer)
                .expect("Failed to push buffer to pool queue during initialization");
        }

        (
            CaptureChannels {
                data_producer,
                pool_consumer,
            },
            AnalysisChannels {
                data_consumer,
                pool_producer,
            },
        )
    }
}
