//! Input Device Registry
//!
//! Maps heterogeneous physical input devices onto the fixed set of logical
//! roles the engine understands, and converts raw per-axis samples into
//! minimal delta batches. Role classification is a strict priority order,
//! first match wins; a device's role never changes after registration even
//! if the OS later reports its capability bits differently.

use std::collections::HashMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use kestrel_engine::{AxisDelta, DeviceRole, NativeEngine};

use crate::error::{PlatformError, PlatformResult};

bitflags! {
    /// Platform-reported capability classes for a physical input device.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DeviceCapability: u32 {
        const KEYBOARD  = 0x0001;
        const DPAD      = 0x0002;
        const GAMEPAD   = 0x0004;
        const JOYSTICK  = 0x0008;
        const MOUSE     = 0x0010;
        const TOUCH     = 0x0020;
        const STYLUS    = 0x0040;
        const TRACKBALL = 0x0080;
    }
}

impl DeviceCapability {
    /// Classes that produce pointer-style input.
    pub const POINTER: DeviceCapability = DeviceCapability::MOUSE
        .union(DeviceCapability::TOUCH)
        .union(DeviceCapability::STYLUS)
        .union(DeviceCapability::TRACKBALL);

    /// Gamepad-adjacent classes that still map to the Pad role.
    pub const PAD_ADJACENT: DeviceCapability =
        DeviceCapability::JOYSTICK.union(DeviceCapability::DPAD);
}

/// Keyboard hardware type reported alongside the capability class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyboardKind {
    /// No physical keyboard
    None,
    /// Buttons only (volume rockers, media keys)
    NonAlphabetic,
    /// Full alphabetic keyboard
    Alphabetic,
}

/// Raw device descriptor as delivered by the OS on device add.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// OS-assigned device id
    pub id: i32,

    /// Human-readable device name
    pub name: String,

    /// Reported capability classes
    pub capabilities: DeviceCapability,

    /// Keyboard hardware type
    pub keyboard: KeyboardKind,

    /// Motion axis ids in OS enumeration order. This order fixes axis
    /// identity for the device's registered lifetime.
    pub axes: Vec<u32>,
}

/// One registered device as the engine sees it.
///
/// `axis_ids` and `last_axis_values` stay aligned by index for the
/// device's lifetime; axis identity is never reassigned after
/// construction.
#[derive(Debug, Clone)]
pub struct LogicalInputDevice {
    role: DeviceRole,
    axis_ids: Vec<u32>,
    last_axis_values: Vec<f32>,
}

impl LogicalInputDevice {
    fn from_descriptor(descriptor: &DeviceDescriptor) -> Self {
        Self {
            role: classify(descriptor),
            last_axis_values: vec![0.0; descriptor.axes.len()],
            axis_ids: descriptor.axes.clone(),
        }
    }

    pub fn role(&self) -> DeviceRole {
        self.role
    }

    pub fn axis_count(&self) -> usize {
        self.axis_ids.len()
    }
}

/// One raw motion sample set from the OS.
#[derive(Debug, Clone)]
pub struct MotionEvent {
    /// Source class the event was delivered from
    pub source: DeviceCapability,
    values: HashMap<u32, f32>,
}

impl MotionEvent {
    pub fn new(source: DeviceCapability, samples: &[(u32, f32)]) -> Self {
        Self {
            source,
            values: samples.iter().copied().collect(),
        }
    }

    /// Sample for one axis; axes absent from the event read as centered.
    pub fn axis_value(&self, axis: u32) -> f32 {
        self.values.get(&axis).copied().unwrap_or(0.0)
    }
}

/// Assign the logical role for a descriptor. Strict priority order,
/// first match wins.
fn classify(descriptor: &DeviceDescriptor) -> DeviceRole {
    let caps = descriptor.capabilities;
    if caps.contains(DeviceCapability::GAMEPAD) {
        DeviceRole::Pad
    } else if caps.contains(DeviceCapability::KEYBOARD)
        && descriptor.keyboard == KeyboardKind::Alphabetic
    {
        DeviceRole::Keyboard
    } else if caps.intersects(DeviceCapability::PAD_ADJACENT) {
        DeviceRole::Pad
    } else if caps.intersects(DeviceCapability::POINTER) {
        DeviceRole::Mouse
    } else {
        DeviceRole::Default
    }
}

/// Registry of all currently-attached input devices.
///
/// Runs only on the UI/control thread; no locking required.
#[derive(Debug, Default)]
pub struct InputDeviceRegistry {
    devices: HashMap<i32, LogicalInputDevice>,
}

impl InputDeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device the OS just reported. Re-registering an id
    /// replaces the previous record (the OS reuses ids across unplug
    /// cycles).
    pub fn register_device(&mut self, descriptor: &DeviceDescriptor) -> DeviceRole {
        let device = LogicalInputDevice::from_descriptor(descriptor);
        let role = device.role;
        info!(
            id = descriptor.id,
            name = %descriptor.name,
            ?role,
            axes = device.axis_count(),
            "registered input device"
        );
        self.devices.insert(descriptor.id, device);
        role
    }

    /// Remove a device the OS reported as detached.
    pub fn unregister_device(&mut self, id: i32) -> bool {
        let removed = self.devices.remove(&id).is_some();
        if removed {
            info!(id, "unregistered input device");
        }
        removed
    }

    pub fn role_of(&self, id: i32) -> Option<DeviceRole> {
        self.devices.get(&id).map(|d| d.role)
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Forward a key press keyed by the device's role. Returns whether
    /// the engine consumed the key so the platform UI layer can decide to
    /// process it itself.
    pub fn dispatch_key<E: NativeEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        device_id: i32,
        key_code: u32,
        is_repeat: bool,
    ) -> PlatformResult<bool> {
        let device = self
            .devices
            .get(&device_id)
            .ok_or(PlatformError::UnknownDevice(device_id))?;
        Ok(engine.on_key_down(device.role, key_code, is_repeat))
    }

    /// Key release counterpart of [`InputDeviceRegistry::dispatch_key`].
    pub fn dispatch_key_up<E: NativeEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        device_id: i32,
        key_code: u32,
    ) -> PlatformResult<bool> {
        let device = self
            .devices
            .get(&device_id)
            .ok_or(PlatformError::UnknownDevice(device_id))?;
        Ok(engine.on_key_up(device.role, key_code))
    }

    /// Convert a raw motion sample into a minimal delta batch.
    ///
    /// Only axes whose value actually changed since the previous sample
    /// are forwarded; an all-idle sample forwards nothing. Motion from a
    /// non-joystick source class or a non-Pad device is a recovered
    /// no-op, not an error.
    pub fn dispatch_motion<E: NativeEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        device_id: i32,
        event: &MotionEvent,
    ) -> PlatformResult<()> {
        if !event.source.intersects(DeviceCapability::JOYSTICK) {
            debug!(device_id, source = event.source.bits(), "ignoring non-joystick motion");
            return Ok(());
        }

        let device = self
            .devices
            .get_mut(&device_id)
            .ok_or(PlatformError::UnknownDevice(device_id))?;
        if device.role != DeviceRole::Pad {
            debug!(device_id, role = ?device.role, "ignoring motion for non-pad device");
            return Ok(());
        }

        let mut deltas = Vec::new();
        for (i, &axis) in device.axis_ids.iter().enumerate() {
            let value = event.axis_value(axis);
            if value != device.last_axis_values[i] {
                device.last_axis_values[i] = value;
                deltas.push(AxisDelta { axis, value });
            }
        }

        if !deltas.is_empty() {
            engine.on_joystick_delta(device.role, &deltas);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_engine::{
        DisplayMetrics, GraphicsConfigCandidate, RendererInitError, SafeInsets, SurfaceFormat,
    };

    #[derive(Default)]
    struct RecordingEngine {
        keys: Vec<(DeviceRole, u32, bool)>,
        key_ups: Vec<(DeviceRole, u32)>,
        batches: Vec<(DeviceRole, Vec<AxisDelta>)>,
        consume_keys: bool,
    }

    impl NativeEngine for RecordingEngine {
        fn init_renderer(
            &mut self,
            _config: &GraphicsConfigCandidate,
        ) -> Result<(), RendererInitError> {
            Ok(())
        }

        fn compute_desired_backbuffer(&mut self) -> (u32, u32) {
            (0, 0)
        }

        fn on_key_down(&mut self, role: DeviceRole, key_code: u32, is_repeat: bool) -> bool {
            self.keys.push((role, key_code, is_repeat));
            self.consume_keys
        }

        fn on_key_up(&mut self, role: DeviceRole, key_code: u32) -> bool {
            self.key_ups.push((role, key_code));
            self.consume_keys
        }

        fn on_joystick_delta(&mut self, role: DeviceRole, deltas: &[AxisDelta]) {
            self.batches.push((role, deltas.to_vec()));
        }

        fn on_display_params(&mut self, _metrics: &DisplayMetrics) {}
        fn on_backbuffer_resize(&mut self, _w: u32, _h: u32, _format: SurfaceFormat) {}
        fn on_safe_insets(&mut self, _insets: SafeInsets) {}
    }

    fn pad_descriptor(id: i32) -> DeviceDescriptor {
        DeviceDescriptor {
            id,
            name: "Test Pad".to_string(),
            capabilities: DeviceCapability::GAMEPAD | DeviceCapability::JOYSTICK,
            keyboard: KeyboardKind::None,
            axes: vec![0, 1, 11, 14],
        }
    }

    #[test]
    fn test_classification_priority() {
        let mut d = pad_descriptor(1);

        // Gamepad wins over everything, including pointer classes.
        d.capabilities = DeviceCapability::GAMEPAD | DeviceCapability::MOUSE;
        assert_eq!(classify(&d), DeviceRole::Pad);

        // Alphabetic keyboard beats joystick-adjacent bits.
        d.capabilities = DeviceCapability::KEYBOARD | DeviceCapability::DPAD;
        d.keyboard = KeyboardKind::Alphabetic;
        assert_eq!(classify(&d), DeviceRole::Keyboard);

        // Non-alphabetic keyboard falls through to the dpad class.
        d.keyboard = KeyboardKind::NonAlphabetic;
        assert_eq!(classify(&d), DeviceRole::Pad);

        // Pointer classes map to Mouse.
        d.capabilities = DeviceCapability::TOUCH;
        assert_eq!(classify(&d), DeviceRole::Mouse);
        d.capabilities = DeviceCapability::STYLUS | DeviceCapability::MOUSE;
        assert_eq!(classify(&d), DeviceRole::Mouse);

        // Nothing recognizable.
        d.capabilities = DeviceCapability::empty();
        assert_eq!(classify(&d), DeviceRole::Default);
    }

    #[test]
    fn test_classification_stable_under_bit_overlap() {
        // Same bits, different construction order: always Pad, never Mouse.
        let mut d = pad_descriptor(1);
        d.capabilities = DeviceCapability::MOUSE | DeviceCapability::GAMEPAD;
        assert_eq!(classify(&d), DeviceRole::Pad);
        d.capabilities = DeviceCapability::GAMEPAD | DeviceCapability::MOUSE;
        assert_eq!(classify(&d), DeviceRole::Pad);
    }

    #[test]
    fn test_register_and_unregister() {
        let mut registry = InputDeviceRegistry::new();
        assert_eq!(registry.register_device(&pad_descriptor(7)), DeviceRole::Pad);
        assert_eq!(registry.role_of(7), Some(DeviceRole::Pad));
        assert_eq!(registry.device_count(), 1);

        assert!(registry.unregister_device(7));
        assert!(!registry.unregister_device(7));
        assert_eq!(registry.role_of(7), None);
    }

    #[test]
    fn test_key_dispatch_uses_role_and_reports_consumption() {
        let mut registry = InputDeviceRegistry::new();
        let mut engine = RecordingEngine {
            consume_keys: true,
            ..Default::default()
        };
        registry.register_device(&pad_descriptor(3));

        let handled = registry.dispatch_key(&mut engine, 3, 96, false).unwrap();
        assert!(handled);
        let handled = registry.dispatch_key_up(&mut engine, 3, 96).unwrap();
        assert!(handled);

        assert_eq!(engine.keys, vec![(DeviceRole::Pad, 96, false)]);
        assert_eq!(engine.key_ups, vec![(DeviceRole::Pad, 96)]);
    }

    #[test]
    fn test_key_dispatch_unknown_device() {
        let mut registry = InputDeviceRegistry::new();
        let mut engine = RecordingEngine::default();
        let err = registry.dispatch_key(&mut engine, 99, 4, false).unwrap_err();
        assert!(matches!(err, PlatformError::UnknownDevice(99)));
        assert!(engine.keys.is_empty());
    }

    #[test]
    fn test_motion_emits_only_changed_axes() {
        let mut registry = InputDeviceRegistry::new();
        let mut engine = RecordingEngine::default();
        registry.register_device(&pad_descriptor(1));

        let joystick = DeviceCapability::JOYSTICK;

        // First sample: axes 0 and 1 move, 11 and 14 stay centered.
        let event = MotionEvent::new(joystick, &[(0, 0.5), (1, -0.25)]);
        registry.dispatch_motion(&mut engine, 1, &event).unwrap();
        assert_eq!(engine.batches.len(), 1);
        assert_eq!(
            engine.batches[0].1,
            vec![
                AxisDelta { axis: 0, value: 0.5 },
                AxisDelta { axis: 1, value: -0.25 },
            ]
        );

        // Same sample again: nothing changed, nothing forwarded.
        registry.dispatch_motion(&mut engine, 1, &event).unwrap();
        assert_eq!(engine.batches.len(), 1);

        // Axis 0 recenters, axis 14 moves; axis 1 holds its value.
        let event = MotionEvent::new(joystick, &[(1, -0.25), (14, 1.0)]);
        registry.dispatch_motion(&mut engine, 1, &event).unwrap();
        assert_eq!(engine.batches.len(), 2);
        assert_eq!(
            engine.batches[1].1,
            vec![
                AxisDelta { axis: 0, value: 0.0 },
                AxisDelta { axis: 14, value: 1.0 },
            ]
        );
    }

    #[test]
    fn test_motion_from_non_joystick_source_is_noop() {
        let mut registry = InputDeviceRegistry::new();
        let mut engine = RecordingEngine::default();
        registry.register_device(&pad_descriptor(1));

        let event = MotionEvent::new(DeviceCapability::TOUCH, &[(0, 1.0)]);
        registry.dispatch_motion(&mut engine, 1, &event).unwrap();
        assert!(engine.batches.is_empty());
    }

    #[test]
    fn test_motion_for_non_pad_device_is_noop() {
        let mut registry = InputDeviceRegistry::new();
        let mut engine = RecordingEngine::default();
        registry.register_device(&DeviceDescriptor {
            id: 2,
            name: "Mouse".to_string(),
            capabilities: DeviceCapability::MOUSE,
            keyboard: KeyboardKind::None,
            axes: vec![0, 1],
        });

        let event = MotionEvent::new(DeviceCapability::JOYSTICK, &[(0, 1.0)]);
        registry.dispatch_motion(&mut engine, 2, &event).unwrap();
        assert!(engine.batches.is_empty());
    }

    #[test]
    fn test_axis_table_stays_aligned() {
        let mut registry = InputDeviceRegistry::new();
        let mut engine = RecordingEngine::default();
        registry.register_device(&pad_descriptor(1));

        // Drive every axis through several values; the delta for axis i
        // must always carry axis i's id.
        for step in 1..=3 {
            let v = step as f32 / 3.0;
            let event = MotionEvent::new(
                DeviceCapability::JOYSTICK,
                &[(0, v), (1, -v), (11, v / 2.0), (14, -v / 2.0)],
            );
            registry.dispatch_motion(&mut engine, 1, &event).unwrap();
        }
        for (_, batch) in &engine.batches {
            for delta in batch {
                assert!([0, 1, 11, 14].contains(&delta.axis));
            }
        }
    }

    #[test]
    fn test_descriptor_serialization() {
        let descriptor = pad_descriptor(5);
        let json = serde_json::to_string(&descriptor).unwrap();
        let back: DeviceDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, 5);
        assert_eq!(back.capabilities, descriptor.capabilities);
    }
}
