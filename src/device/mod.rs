//! Virtual joystick sinks
//!
//! Shaped axis values leave the crate through a [`VirtualDevice`]. Values
//! are normalized: `[-1, 1]` for bidirectional axes, `[0, 1]` for triggers.
//! Each sink converts to its own integer units.

mod failsafe;
mod log;
mod uinput;

pub use failsafe::{FailsafeConfig, FailsafeDevice};
pub use log::LogDevice;
pub use uinput::{UinputDevice, DEFAULT_DEVICE_NAME};

use crate::mapping::{DeviceAxis, MAX_BUTTONS};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from virtual device operations
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Failed to create virtual device: {0}")]
    CreateDevice(#[source] std::io::Error),
    #[error("Failed to emit event: {0}")]
    EmitEvent(#[source] std::io::Error),
    #[error("Unknown button: {0} (valid: 1-{max})", max = MAX_BUTTONS)]
    UnknownButton(u8),
    #[error("Device disconnected")]
    Disconnected,
}

/// Output side of the controller
pub trait VirtualDevice {
    /// Set a device axis to a normalized value
    fn update_axis(&mut self, axis: DeviceAxis, value: f64) -> Result<(), DeviceError>;

    /// Press or release button `id` (1-based)
    fn set_button(&mut self, id: u8, pressed: bool) -> Result<(), DeviceError>;

    fn is_connected(&self) -> bool;

    /// Return every axis to its centre and release all buttons
    fn center_all(&mut self) -> Result<(), DeviceError>;
}

impl<D: VirtualDevice + ?Sized> VirtualDevice for Box<D> {
    fn update_axis(&mut self, axis: DeviceAxis, value: f64) -> Result<(), DeviceError> {
        (**self).update_axis(axis, value)
    }

    fn set_button(&mut self, id: u8, pressed: bool) -> Result<(), DeviceError> {
        (**self).set_button(id, pressed)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn center_all(&mut self) -> Result<(), DeviceError> {
        (**self).center_all()
    }
}

/// Snapshot of the sink as seen through the failsafe wrapper
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceStatus {
    pub connected: bool,
    pub failsafe_active: bool,
    pub emergency_stop: bool,
    /// Last value forwarded per device axis
    pub axis_values: BTreeMap<String, f64>,
}

fn check_button(id: u8) -> Result<(), DeviceError> {
    if (1..=MAX_BUTTONS).contains(&id) {
        Ok(())
    } else {
        Err(DeviceError::UnknownButton(id))
    }
}
