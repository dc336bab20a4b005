//! Boundary Value Types
//!
//! Value types that cross between the platform bridge and the native
//! engine. These are produced fresh from platform enumeration per
//! negotiation and never mutated afterwards.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Renderable-type mask reported per graphics config.
    ///
    /// Bit values follow the EGL renderable-type constants so candidates
    /// can be built directly from platform enumeration output.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RenderableType: u32 {
        const OPENGL_ES  = 0x0001;
        const OPENGL     = 0x0008;
        const OPENGL_ES2 = 0x0004;
        const OPENGL_ES3 = 0x0040;
    }
}

/// One hardware-reported graphics configuration.
///
/// Immutable once built; discarded after selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicsConfigCandidate {
    /// Red channel bits
    pub red: u32,

    /// Green channel bits
    pub green: u32,

    /// Blue channel bits
    pub blue: u32,

    /// Destination alpha bits (0 on most usable configs)
    pub alpha: u32,

    /// Depth buffer bits
    pub depth: u32,

    /// Stencil buffer bits
    pub stencil: u32,

    /// MSAA sample count (carried for diagnostics, never ranked on)
    pub samples: u32,

    /// Which client APIs can render to this config
    pub renderable: RenderableType,
}

impl GraphicsConfigCandidate {
    /// Shorthand constructor for an ES2-renderable config.
    pub fn es2(red: u32, green: u32, blue: u32, alpha: u32, depth: u32, stencil: u32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
            depth,
            stencil,
            samples: 0,
            renderable: RenderableType::OPENGL_ES2,
        }
    }
}

/// Logical role assigned to a physical input device at registration.
///
/// The role set is closed and classification is order-sensitive, so this
/// is a plain enum rather than any kind of handler registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceRole {
    Default,
    Keyboard,
    Mouse,
    Pad,
}

/// A single changed axis in a motion batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisDelta {
    /// Axis identifier, stable for the device's registered lifetime
    pub axis: u32,

    /// New sample value
    pub value: f32,
}

/// Screen-edge regions obscured by notches or cutouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeInsets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl SafeInsets {
    /// Encode as the colon-delimited `left:right:top:bottom` record the
    /// engine's inset channel consumes.
    pub fn to_record(&self) -> String {
        format!("{}:{}:{}:{}", self.left, self.right, self.top, self.bottom)
    }
}

/// Platform-reported display metrics pushed to the engine on every
/// surface lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    /// Raw surface width in pixels
    pub pixel_width: u32,

    /// Raw surface height in pixels
    pub pixel_height: u32,

    /// Reported display density
    pub density_dpi: f32,

    /// Reported refresh rate
    pub refresh_rate_hz: f32,
}

impl DisplayMetrics {
    /// Whether the measured geometry is landscape (width > height).
    /// Square surfaces count as landscape.
    pub fn is_landscape(&self) -> bool {
        self.pixel_width >= self.pixel_height
    }
}

/// Pixel format of the backbuffer handed to the engine on resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceFormat {
    Rgba8888,
    Rgbx8888,
    Rgb565,
    /// Raw platform format constant the bridge does not interpret
    Other(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insets_record_encoding() {
        let insets = SafeInsets {
            left: 0,
            right: 0,
            top: 84,
            bottom: 48,
        };
        assert_eq!(insets.to_record(), "0:0:84:48");
        assert_eq!(SafeInsets::default().to_record(), "0:0:0:0");
    }

    #[test]
    fn test_candidate_serialization() {
        let candidate = GraphicsConfigCandidate::es2(8, 8, 8, 0, 24, 8);
        let json = serde_json::to_string(&candidate).unwrap();
        let back: GraphicsConfigCandidate = serde_json::from_str(&json).unwrap();
        assert_eq!(candidate, back);
    }

    #[test]
    fn test_renderable_mask_bits() {
        // Must match the EGL renderable-type constants
        assert_eq!(RenderableType::OPENGL_ES2.bits(), 0x4);
        assert_eq!(RenderableType::OPENGL_ES3.bits(), 0x40);

        let both = RenderableType::OPENGL_ES2 | RenderableType::OPENGL_ES3;
        assert!(both.intersects(RenderableType::OPENGL_ES2));
    }

    #[test]
    fn test_landscape_detection() {
        let landscape = DisplayMetrics {
            pixel_width: 1920,
            pixel_height: 1080,
            density_dpi: 320.0,
            refresh_rate_hz: 60.0,
        };
        assert!(landscape.is_landscape());

        let portrait = DisplayMetrics {
            pixel_width: 1080,
            pixel_height: 1920,
            density_dpi: 320.0,
            refresh_rate_hz: 60.0,
        };
        assert!(!portrait.is_landscape());
    }
}
