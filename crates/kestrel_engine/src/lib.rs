//! Kestrel Engine Boundary
//!
//! This crate defines the contract between the platform bridge and the
//! native engine. The bridge normalizes heterogeneous OS-reported
//! capabilities (graphics configs, input devices, display geometry, audio
//! buffers) into the small set of precise calls declared here.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   UI / control thread                       │
//! │  selector ── init_renderer ──▶ NativeEngine                 │
//! │  input registry ── on_key* / on_joystick_delta ──▶          │
//! │  display negotiator ── on_display_params / insets ──▶       │
//! └─────────────────────────────────────────────────────────────┘
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Audio worker thread                       │
//! │  bridge ── pull_samples ──▶ AudioSource ──▶ platform sink   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! `AudioSource` is split from `NativeEngine` so the audio worker never
//! shares a `&mut` borrow with the control thread.

mod engine;
mod types;

pub use engine::{AudioSource, NativeEngine, RendererInitError};
pub use types::{
    AxisDelta, DeviceRole, DisplayMetrics, GraphicsConfigCandidate, RenderableType, SafeInsets,
    SurfaceFormat,
};
