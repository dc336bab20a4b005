//! Kestrel Platform - Capability Negotiation
//!
//! This crate normalizes the inconsistent parts of the mobile OS surface
//! into the stable contracts the native engine expects:
//! - Graphics configuration selection (ordered-tier greedy search over
//!   hardware-reported candidates)
//! - Input device classification and minimal-delta motion dispatch
//! - Display geometry negotiation, including the orientation-mismatch
//!   workaround for older API levels
//!
//! Everything here executes on the UI/control thread; no locking is
//! required. The audio streaming side lives in `kestrel_core`.

mod display;
mod error;
mod input;
mod select;
mod version;

pub use display::{
    DisplayGeometryNegotiator, DisplayState, RequestedOrientation, SurfaceDirective, SurfacePhase,
};
pub use error::{PlatformError, PlatformResult};
pub use input::{
    DeviceCapability, DeviceDescriptor, InputDeviceRegistry, KeyboardKind, LogicalInputDevice,
    MotionEvent,
};
pub use select::{negotiate, select, CapabilityQuery};
pub use version::PlatformVersion;
