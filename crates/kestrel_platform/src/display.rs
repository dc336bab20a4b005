//! Display Geometry Negotiation
//!
//! Reconciles platform-reported display metrics, the engine's desired
//! backbuffer size, and safe-area insets across the surface lifecycle:
//!
//! ```text
//! NoSurface ──created──▶ Negotiating ──sized──▶ Sized ──destroyed──▶ NoSurface
//! ```
//!
//! Includes the workaround for the platform race where the orientation
//! query still reports the previous orientation at surface-creation time
//! on older API levels. Runs only on the UI/control thread.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use kestrel_engine::{DisplayMetrics, NativeEngine, SafeInsets, SurfaceFormat};

use crate::version::PlatformVersion;

/// Orientation the application requested for the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestedOrientation {
    Portrait,
    Landscape,
}

/// Surface lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfacePhase {
    NoSurface,
    /// Created; the negotiator may still be waiting for its own
    /// fixed-size request to echo back as a resize callback.
    Negotiating,
    Sized,
}

/// What the platform shell should do after a surface-created callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceDirective {
    /// Geometry disagrees with the requested orientation on an API level
    /// whose orientation query is unreliable; destroy and recreate the
    /// surface instead of proceeding with mismatched geometry.
    Recreate,
    /// Proceed. If the engine asked for a fixed backbuffer size, the
    /// shell should request the platform pin the surface to it.
    Proceed { fixed_size: Option<(u32, u32)> },
}

/// Current negotiated display state, readable by the engine boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub density_dpi: f32,
    pub refresh_rate_hz: f32,
    pub safe_insets: SafeInsets,
    /// `(0, 0)` means the engine renders at native surface size.
    pub desired_backbuffer: (u32, u32),
}

/// Bounded retry count for the orientation-mismatch workaround. A device
/// that never agrees proceeds with measured geometry on the attempt after
/// the last retry rather than looping forever.
const MAX_ORIENTATION_RETRIES: u32 = 3;

/// One per process; there is one physical surface. Constructed explicitly
/// so tests can run isolated instances.
#[derive(Debug)]
pub struct DisplayGeometryNegotiator {
    version: PlatformVersion,
    phase: SurfacePhase,
    state: DisplayState,
    /// Consecutive orientation mismatches observed at creation time.
    /// Reset only when measured and requested orientation agree.
    mismatch_retries: u32,
}

impl DisplayGeometryNegotiator {
    pub fn new(version: PlatformVersion) -> Self {
        Self {
            version,
            phase: SurfacePhase::NoSurface,
            state: DisplayState::default(),
            mismatch_retries: 0,
        }
    }

    pub fn phase(&self) -> SurfacePhase {
        self.phase
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Surface-created entry point.
    ///
    /// Applies the orientation-mismatch workaround, then pushes display
    /// parameters to the engine and asks it for a desired backbuffer
    /// size. The returned directive tells the shell whether to recreate
    /// the surface or proceed (optionally pinning a fixed size).
    pub fn on_surface_created<E: NativeEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        metrics: DisplayMetrics,
        requested: Option<RequestedOrientation>,
    ) -> SurfaceDirective {
        if let Some(requested) = requested {
            if !self.version.orientation_query_reliable() {
                let measured_landscape = metrics.is_landscape();
                let requested_landscape = requested == RequestedOrientation::Landscape;
                if measured_landscape != requested_landscape {
                    if self.mismatch_retries < MAX_ORIENTATION_RETRIES {
                        self.mismatch_retries += 1;
                        warn!(
                            retry = self.mismatch_retries,
                            width = metrics.pixel_width,
                            height = metrics.pixel_height,
                            ?requested,
                            "orientation mismatch at surface creation, forcing recreate"
                        );
                        return SurfaceDirective::Recreate;
                    }
                    // Retries exhausted; the device genuinely disagrees.
                    // Proceed with the surface as measured.
                    warn!(
                        retries = self.mismatch_retries,
                        "orientation still mismatched, proceeding with measured geometry"
                    );
                } else {
                    self.mismatch_retries = 0;
                }
            }
        }

        self.state.pixel_width = metrics.pixel_width;
        self.state.pixel_height = metrics.pixel_height;
        self.state.density_dpi = metrics.density_dpi;
        self.state.refresh_rate_hz = metrics.refresh_rate_hz;
        self.phase = SurfacePhase::Negotiating;

        engine.on_display_params(&metrics);
        let desired = engine.compute_desired_backbuffer();
        self.state.desired_backbuffer = desired;

        if desired == (0, 0) {
            info!(
                width = metrics.pixel_width,
                height = metrics.pixel_height,
                "surface created, engine renders at native size"
            );
            SurfaceDirective::Proceed { fixed_size: None }
        } else {
            info!(
                width = desired.0,
                height = desired.1,
                "surface created, requesting fixed backbuffer size"
            );
            SurfaceDirective::Proceed {
                fixed_size: Some(desired),
            }
        }
    }

    /// Resize callback from the platform.
    ///
    /// A callback that arrives while the surface is still in its
    /// creation sub-state after a non-zero fixed-size request is the echo
    /// of that request and is swallowed; only genuine external resizes
    /// (rotation, multi-window, chrome changes) reach the engine.
    /// Returns whether the resize was forwarded.
    pub fn on_surface_changed<E: NativeEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        width: u32,
        height: u32,
        format: SurfaceFormat,
    ) -> bool {
        match self.phase {
            SurfacePhase::NoSurface => {
                warn!(width, height, "resize callback without a surface, ignoring");
                false
            }
            SurfacePhase::Negotiating => {
                self.phase = SurfacePhase::Sized;
                self.state.pixel_width = width;
                self.state.pixel_height = height;
                if self.state.desired_backbuffer != (0, 0) {
                    debug!(width, height, "suppressing fixed-size resize echo");
                    false
                } else {
                    engine.on_backbuffer_resize(width, height, format);
                    true
                }
            }
            SurfacePhase::Sized => {
                self.state.pixel_width = width;
                self.state.pixel_height = height;
                info!(width, height, ?format, "external surface resize");
                engine.on_backbuffer_resize(width, height, format);
                true
            }
        }
    }

    /// Surface-destroyed entry point. The mismatch retry counter is
    /// intentionally preserved across destroy/create cycles; it resets
    /// only on orientation agreement.
    pub fn on_surface_destroyed(&mut self) {
        debug!("surface destroyed");
        self.phase = SurfacePhase::NoSurface;
        self.state.desired_backbuffer = (0, 0);
    }

    /// Safe-area inset callback; independent of the resize path.
    pub fn on_insets_changed<E: NativeEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        insets: SafeInsets,
    ) {
        debug!(record = %insets.to_record(), "safe insets changed");
        self.state.safe_insets = insets;
        engine.on_safe_insets(insets);
    }
}
