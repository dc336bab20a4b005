//! Audio Stream Bridge
//!
//! Owns the one dedicated real-time audio thread in the process. The
//! worker repeatedly pulls a fixed-size interleaved buffer from the
//! native engine and pushes it to the platform sink.
//!
//! # Start/stop contract
//!
//! `start()` and `stop()` are idempotent and safe to call from an
//! unrelated control thread. `stop()` blocks until the worker has fully
//! exited: callers must never observe the bridge stopped while the worker
//! is still executing, because the engine may be torn down immediately
//! after `stop()` returns.
//!
//! The `running` flag is the only state shared with the worker. No lock
//! is held while calling into the engine; the worker observes a stop
//! request within one pull iteration, so shutdown latency is bounded by
//! the configured buffer duration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use kestrel_engine::AudioSource;

use crate::config::AudioConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::message::BridgeEvent;
use crate::sink::SinkFactory;

/// The process-wide audio session.
///
/// Exactly one instance exists per engine; tests construct isolated
/// instances with their own sources and sinks.
pub struct AudioStreamBridge {
    source: Arc<dyn AudioSource>,
    sink_factory: Arc<dyn SinkFactory>,
    config: AudioConfig,

    /// Sole cross-thread signal. Written by the control thread (stop
    /// request) and by the worker itself (sink failure); read by the
    /// worker every iteration.
    running: Arc<AtomicBool>,

    /// Control-plane only; never touched from the worker
    worker: Mutex<Option<JoinHandle<()>>>,

    events: Sender<BridgeEvent>,
}

impl AudioStreamBridge {
    pub fn new(
        source: Arc<dyn AudioSource>,
        sink_factory: Arc<dyn SinkFactory>,
        config: AudioConfig,
        events: Sender<BridgeEvent>,
    ) -> BridgeResult<Self> {
        config.validate().map_err(BridgeError::Config)?;
        Ok(Self {
            source,
            sink_factory,
            config,
            running: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
            events,
        })
    }

    /// Whether the worker is currently streaming.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    /// Spawn the audio worker. Idempotent: if already running, logs and
    /// returns without effect.
    pub fn start(&self) -> BridgeResult<()> {
        let mut worker = self.worker.lock();

        if self.running.load(Ordering::Acquire) {
            warn!("audio bridge already running");
            return Ok(());
        }

        // A worker that died of a sink failure cleared the flag itself
        // but could not reap its own handle; join the finished thread
        // before spawning a fresh one.
        if let Some(handle) = worker.take() {
            let _ = handle.join();
        }

        self.running.store(true, Ordering::Release);

        let source = Arc::clone(&self.source);
        let factory = Arc::clone(&self.sink_factory);
        let running = Arc::clone(&self.running);
        let events = self.events.clone();
        let config = self.config.clone();

        let handle = thread::Builder::new()
            .name("kestrel-audio".into())
            .spawn(move || worker_main(source, factory, config, running, events))
            .map_err(|e| {
                self.running.store(false, Ordering::Release);
                BridgeError::WorkerSpawn(e.to_string())
            })?;

        *worker = Some(handle);
        info!("audio bridge started");
        Ok(())
    }

    /// Signal the worker to exit and block until it has fully exited.
    /// Idempotent: if not running, returns without effect.
    pub fn stop(&self) {
        let mut worker = self.worker.lock();

        if !self.running.load(Ordering::Acquire) && worker.is_none() {
            debug!("audio bridge already stopped");
            return;
        }

        self.running.store(false, Ordering::Release);
        if let Some(handle) = worker.take() {
            if handle.join().is_err() {
                error!("audio worker panicked during shutdown");
            }
        }
        info!("audio bridge stopped");
    }
}

impl Drop for AudioStreamBridge {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Worker loop. Runs until stopped or the sink fails.
fn worker_main(
    source: Arc<dyn AudioSource>,
    factory: Arc<dyn SinkFactory>,
    config: AudioConfig,
    running: Arc<AtomicBool>,
    events: Sender<BridgeEvent>,
) {
    info!(
        sample_rate = config.sample_rate,
        channels = config.channels,
        frames = config.frames_per_pull,
        "audio worker started"
    );

    let mut sink = match factory.build(&config) {
        Ok(sink) => sink,
        Err(e) => {
            error!("failed to build audio sink: {}", e);
            let _ = events.try_send(BridgeEvent::sink_failed(&e));
            running.store(false, Ordering::Release);
            return;
        }
    };

    let _ = events.try_send(BridgeEvent::AudioStarted);

    let mut buffer = vec![0.0_f32; config.samples_per_pull()];
    let idle = config.pull_duration();

    while running.load(Ordering::Acquire) {
        // Single bounded synchronous call; the engine owns mixing and
        // resampling. No lock is held across this.
        let count = source.pull_samples(&mut buffer);

        if count == 0 {
            // Nothing valid this iteration; never write stale data.
            // Idle one pull period instead of spinning.
            thread::sleep(idle);
            continue;
        }

        let count = count.min(buffer.len());
        if let Err(e) = sink.write(&buffer[..count]) {
            // Persistent playback failure means an unrecoverable device
            // problem for this session: report, never retry.
            error!("audio sink rejected write: {}", e);
            let _ = events.try_send(BridgeEvent::sink_failed(&e));
            running.store(false, Ordering::Release);
            return;
        }
    }

    let _ = events.try_send(BridgeEvent::AudioStopped);
    info!("audio worker exited");
}
