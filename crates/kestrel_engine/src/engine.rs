//! Native Engine Traits
//!
//! The engine side of the bridge. The platform shell owns one engine
//! instance and drives every call here from the UI/control thread, except
//! `AudioSource::pull_samples` which is called from the dedicated audio
//! worker. The engine owns all mixing, resampling and rendering; the
//! bridge only negotiates and forwards.

use thiserror::Error;

use crate::types::{
    AxisDelta, DeviceRole, DisplayMetrics, GraphicsConfigCandidate, SafeInsets, SurfaceFormat,
};

/// Renderer refused the negotiated graphics configuration.
#[derive(Error, Debug)]
#[error("renderer initialization failed: {0}")]
pub struct RendererInitError(pub String);

/// Calls the bridge makes into the native engine.
///
/// All methods are invoked synchronously on the UI/control thread in
/// response to OS events; none may block for longer than the work they
/// describe.
pub trait NativeEngine {
    /// Hand the selected graphics configuration to the renderer.
    fn init_renderer(&mut self, config: &GraphicsConfigCandidate) -> Result<(), RendererInitError>;

    /// Ask the engine for its desired backbuffer size.
    ///
    /// `(0, 0)` means "use the native surface size as-is".
    fn compute_desired_backbuffer(&mut self) -> (u32, u32);

    /// Key press keyed by `(role, key_code)`. Returns whether the engine
    /// consumed the key; pass-through keys stay with the platform UI.
    fn on_key_down(&mut self, role: DeviceRole, key_code: u32, is_repeat: bool) -> bool;

    /// Key release counterpart of [`NativeEngine::on_key_down`].
    fn on_key_up(&mut self, role: DeviceRole, key_code: u32) -> bool;

    /// One batch of changed axes from a Pad-role device. Axes that did
    /// not change since the previous sample never appear here.
    fn on_joystick_delta(&mut self, role: DeviceRole, deltas: &[AxisDelta]);

    /// Display geometry pushed on every surface lifecycle transition.
    fn on_display_params(&mut self, metrics: &DisplayMetrics);

    /// Genuine backbuffer resize (rotation, multi-window, chrome change).
    fn on_backbuffer_resize(&mut self, width: u32, height: u32, format: SurfaceFormat);

    /// Safe-area inset update, independent of the resize path.
    fn on_safe_insets(&mut self, insets: SafeInsets);
}

/// Pull side of the audio bridge.
///
/// One bounded synchronous call per worker iteration. Implementations are
/// expected to manage their own interior synchronization; the bridge holds
/// no lock across this call.
pub trait AudioSource: Send + Sync {
    /// Fill `buffer` with interleaved samples and return how many were
    /// written. Zero means "nothing to play this iteration" and the
    /// bridge skips the sink write rather than emitting stale data.
    fn pull_samples(&self, buffer: &mut [f32]) -> usize;
}
