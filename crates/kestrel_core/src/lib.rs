//! Kestrel Core - Platform Streaming Bridge
//!
//! Connects the native engine to the host platform's real-time
//! facilities: the audio output path and renderer bring-up.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   pull_samples    ┌──────────────────┐
//! │ NativeEngine │ ◄──────────────── │ AudioStreamBridge│
//! │  (mixing)    │                   │  (worker thread) │
//! └──────────────┘                   └────────┬─────────┘
//!                                             │ write
//!                                             ▼
//!                                    ┌──────────────────┐
//!                                    │    AudioSink     │
//!                                    │  (cpal backend)  │
//!                                    └──────────────────┘
//! ```
//!
//! The bridge owns the only dedicated audio thread. Control-plane calls
//! (`start`/`stop`) come from wherever the application lifecycle lives;
//! `stop()` blocks until the worker is gone so the engine can be torn
//! down right after. Worker status flows back over a crossbeam channel
//! as [`BridgeEvent`]s.

pub mod audio;
pub mod config;
pub mod error;
pub mod message;
pub mod renderer;
pub mod sink;

pub use audio::AudioStreamBridge;
pub use config::AudioConfig;
pub use error::{BridgeError, BridgeResult};
pub use message::BridgeEvent;
pub use renderer::initialize_renderer;
pub use sink::{AudioSink, CpalSink, SinkError, SinkFactory};
