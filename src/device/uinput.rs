//! Virtual joystick device using evdev/uinput
//!
//! Creates a virtual joystick that appears as a standard game controller
//! to games and applications.

use super::{check_button, DeviceError, VirtualDevice};
use crate::mapping::{DeviceAxis, MAX_BUTTONS};
use evdev::{
    uinput::{VirtualDevice as UinputHandle, VirtualDeviceBuilder},
    AbsInfo, AbsoluteAxisType, AttributeSet, EventType, InputEvent, Key, UinputAbsSetup,
};
use nimbus_curve::to_device_units;
use std::collections::HashMap;
use tracing::info;

pub const DEFAULT_DEVICE_NAME: &str = "Nimbus Virtual Joystick";

/// uinput-backed sink exposing all eight device axes and 32 buttons
pub struct UinputDevice {
    device: UinputHandle,
    axis_range: i32,
    /// Current axis values (for change detection)
    axis_values: HashMap<DeviceAxis, i32>,
    buttons: HashMap<u8, bool>,
}

impl UinputDevice {
    /// Create the device
    ///
    /// # Arguments
    /// * `name` - Device name (shown in `evtest` and game controller settings)
    /// * `axis_range` - Axes span `-axis_range..=axis_range`
    pub fn new(name: &str, axis_range: i32) -> Result<Self, DeviceError> {
        let axis_range = axis_range.max(1);
        let mut builder = VirtualDeviceBuilder::new()
            .map_err(DeviceError::CreateDevice)?
            .name(name);

        let mut keys = AttributeSet::<Key>::new();
        for id in 1..=MAX_BUTTONS {
            keys.insert(button_code(id));
        }
        builder = builder.with_keys(&keys).map_err(DeviceError::CreateDevice)?;

        for &axis in DeviceAxis::ALL {
            let abs_setup = UinputAbsSetup::new(
                axis_code(axis),
                AbsInfo::new(0, -axis_range, axis_range, 0, 0, 1),
            );
            builder = builder
                .with_absolute_axis(&abs_setup)
                .map_err(DeviceError::CreateDevice)?;
        }

        let mut device = builder.build().map_err(DeviceError::CreateDevice)?;
        if let Some(path) = device
            .enumerate_dev_nodes_blocking()
            .ok()
            .and_then(|mut nodes| nodes.next())
            .and_then(Result::ok)
        {
            info!("Created virtual joystick {:?} at {}", name, path.display());
        }

        Ok(Self {
            device,
            axis_range,
            axis_values: DeviceAxis::ALL.iter().map(|&a| (a, 0)).collect(),
            buttons: HashMap::new(),
        })
    }

    /// Current axis value in device units
    pub fn get_axis(&self, axis: DeviceAxis) -> i32 {
        self.axis_values.get(&axis).copied().unwrap_or(0)
    }

    fn emit(&mut self, events: &[InputEvent]) -> Result<(), DeviceError> {
        if events.is_empty() {
            return Ok(());
        }
        self.device.emit(events).map_err(DeviceError::EmitEvent)
    }
}

impl VirtualDevice for UinputDevice {
    fn update_axis(&mut self, axis: DeviceAxis, value: f64) -> Result<(), DeviceError> {
        let units = to_device_units(value, self.axis_range);

        // Only emit if changed
        if self.axis_values.get(&axis) == Some(&units) {
            return Ok(());
        }
        self.axis_values.insert(axis, units);

        let event = InputEvent::new_now(EventType::ABSOLUTE, axis_code(axis).0, units);
        self.emit(&[event])
    }

    fn set_button(&mut self, id: u8, pressed: bool) -> Result<(), DeviceError> {
        check_button(id)?;
        if self.buttons.get(&id).copied().unwrap_or(false) == pressed {
            return Ok(());
        }
        self.buttons.insert(id, pressed);

        let event = InputEvent::new_now(EventType::KEY, button_code(id).code(), i32::from(pressed));
        self.emit(&[event])
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn center_all(&mut self) -> Result<(), DeviceError> {
        let mut events = Vec::new();
        for (&axis, value) in self.axis_values.iter_mut() {
            if *value != 0 {
                *value = 0;
                events.push(InputEvent::new_now(EventType::ABSOLUTE, axis_code(axis).0, 0));
            }
        }
        for (&id, pressed) in self.buttons.iter_mut() {
            if *pressed {
                *pressed = false;
                events.push(InputEvent::new_now(EventType::KEY, button_code(id).code(), 0));
            }
        }
        self.emit(&events)
    }
}

fn axis_code(axis: DeviceAxis) -> AbsoluteAxisType {
    match axis {
        DeviceAxis::X => AbsoluteAxisType::ABS_X,
        DeviceAxis::Y => AbsoluteAxisType::ABS_Y,
        DeviceAxis::Z => AbsoluteAxisType::ABS_Z,
        DeviceAxis::RX => AbsoluteAxisType::ABS_RX,
        DeviceAxis::RY => AbsoluteAxisType::ABS_RY,
        DeviceAxis::RZ => AbsoluteAxisType::ABS_RZ,
        DeviceAxis::Slider1 => AbsoluteAxisType::ABS_THROTTLE,
        DeviceAxis::Slider2 => AbsoluteAxisType::ABS_RUDDER,
    }
}

/// Buttons 1..=32 occupy BTN_TRIGGER_HAPPY1..=BTN_TRIGGER_HAPPY32
fn button_code(id: u8) -> Key {
    Key::new(Key::BTN_TRIGGER_HAPPY1.code() + u16::from(id.saturating_sub(1)))
}
