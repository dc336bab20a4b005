//! Platform Audio Sink
//!
//! The push side of the audio bridge. The worker thread owns one sink per
//! session and writes exactly the samples the engine reported valid.
//!
//! `CpalSink` is the concrete backend: it adapts the worker's push model
//! to cpal's pull-model output callback through an SPSC ring buffer. The
//! ring gives the sink write bounded-blocking semantics (it waits for the
//! output callback to drain space), which is what paces the worker loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::StreamConfig as CpalStreamConfig;
use rtrb::{Consumer, Producer, RingBuffer};
use thiserror::Error;
use tracing::warn;

use crate::config::AudioConfig;

/// Errors from the platform audio sink
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to build audio sink: {0}")]
    BuildFailed(String),

    #[error("audio sink write failed: {0}")]
    WriteFailed(String),
}

/// Where the audio worker pushes interleaved `f32` samples.
///
/// A sink lives entirely on the worker thread; it is built there by a
/// [`SinkFactory`] at session start and dropped when the worker exits.
/// A write error is fatal for the session and is never retried.
pub trait AudioSink {
    /// Write exactly `samples.len()` interleaved samples. Bounded-blocking.
    fn write(&mut self, samples: &[f32]) -> Result<(), SinkError>;
}

/// Builds a fresh sink for each audio session.
///
/// The factory crosses into the worker thread; the sink it builds does
/// not need to.
pub trait SinkFactory: Send + Sync {
    fn build(&self, config: &AudioConfig) -> Result<Box<dyn AudioSink>, SinkError>;
}

impl<F> SinkFactory for F
where
    F: Fn(&AudioConfig) -> Result<Box<dyn AudioSink>, SinkError> + Send + Sync,
{
    fn build(&self, config: &AudioConfig) -> Result<Box<dyn AudioSink>, SinkError> {
        self(config)
    }
}

/// cpal-backed sink writing to the default output device.
pub struct CpalSink {
    /// Held to keep the output callback alive; never called directly
    #[allow(dead_code)]
    stream: cpal::Stream,

    producer: Producer<f32>,

    /// Raised from cpal's error callback
    failed: Arc<AtomicBool>,

    /// How long to wait for the output callback to drain ring space
    poll_interval: Duration,
}

impl CpalSink {
    /// Build a sink on the default output device.
    pub fn new(config: &AudioConfig) -> Result<Self, SinkError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| SinkError::BuildFailed("no output device".into()))?;

        let cpal_config = CpalStreamConfig {
            channels: config.channels,
            sample_rate: cpal::SampleRate(config.sample_rate),
            buffer_size: cpal::BufferSize::Fixed(config.frames_per_pull),
        };

        // 4x one pull's worth of ring capacity for safety margin
        let ring_size = config.samples_per_pull() * 4;
        let (producer, consumer) = RingBuffer::<f32>::new(ring_size);

        let failed = Arc::new(AtomicBool::new(false));
        let stream = Self::build_output_stream(&device, &cpal_config, consumer, Arc::clone(&failed))?;

        stream
            .play()
            .map_err(|e| SinkError::BuildFailed(e.to_string()))?;

        Ok(Self {
            stream,
            producer,
            failed,
            poll_interval: config.pull_duration() / 4,
        })
    }

    /// Factory building a [`CpalSink`] per session.
    pub fn factory() -> impl SinkFactory {
        |config: &AudioConfig| {
            CpalSink::new(config).map(|sink| Box::new(sink) as Box<dyn AudioSink>)
        }
    }

    fn build_output_stream(
        device: &cpal::Device,
        config: &CpalStreamConfig,
        mut consumer: Consumer<f32>,
        failed: Arc<AtomicBool>,
    ) -> Result<cpal::Stream, SinkError> {
        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    // Real-time audio callback - no allocations allowed here
                    let available = consumer.slots();
                    let to_read = data.len().min(available);

                    if to_read < data.len() {
                        // Underrun: the worker is behind, play silence for
                        // the missing tail rather than stale data
                        data.fill(0.0);
                    }

                    if let Ok(chunk) = consumer.read_chunk(to_read) {
                        let (first, second) = chunk.as_slices();
                        data[..first.len()].copy_from_slice(first);
                        if !second.is_empty() {
                            data[first.len()..first.len() + second.len()].copy_from_slice(second);
                        }
                        chunk.commit_all();
                    }
                },
                move |err| {
                    warn!("audio output stream error: {}", err);
                    failed.store(true, Ordering::Relaxed);
                },
                None,
            )
            .map_err(|e| SinkError::BuildFailed(e.to_string()))?;

        Ok(stream)
    }
}

impl AudioSink for CpalSink {
    fn write(&mut self, samples: &[f32]) -> Result<(), SinkError> {
        let mut offset = 0;
        while offset < samples.len() {
            if self.failed.load(Ordering::Relaxed) {
                return Err(SinkError::WriteFailed("output stream failed".into()));
            }

            let remaining = &samples[offset..];
            let n = remaining.len().min(self.producer.slots());
            if n == 0 {
                // Ring full; wait for the output callback to drain
                std::thread::sleep(self.poll_interval);
                continue;
            }

            if let Ok(mut chunk) = self.producer.write_chunk_uninit(n) {
                let mut idx = 0;
                let (first, second) = chunk.as_mut_slices();
                for slot in first.iter_mut() {
                    slot.write(remaining[idx]);
                    idx += 1;
                }
                for slot in second.iter_mut() {
                    slot.write(remaining[idx]);
                    idx += 1;
                }
                // Working with uninitialized slots requires the unsafe commit
                unsafe { chunk.commit_all() };
                offset += idx;
            }
        }
        Ok(())
    }
}
