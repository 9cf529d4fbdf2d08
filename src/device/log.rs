//! In-memory sink for dry runs and tests

use super::{check_button, DeviceError, VirtualDevice};
use crate::mapping::DeviceAxis;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Records the last value of every axis and button without touching the OS
#[derive(Debug, Clone)]
pub struct LogDevice {
    name: String,
    connected: bool,
    axes: BTreeMap<DeviceAxis, f64>,
    buttons: BTreeSet<u8>,
    /// Number of axis/button writes received
    events: usize,
}

impl LogDevice {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            connected: true,
            axes: BTreeMap::new(),
            buttons: BTreeSet::new(),
            events: 0,
        }
    }

    pub fn axis(&self, axis: DeviceAxis) -> f64 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    pub fn is_pressed(&self, id: u8) -> bool {
        self.buttons.contains(&id)
    }

    pub fn pressed_buttons(&self) -> Vec<u8> {
        self.buttons.iter().copied().collect()
    }

    pub fn events(&self) -> usize {
        self.events
    }

    /// Simulate the device going away
    pub fn disconnect(&mut self) {
        self.connected = false;
    }
}

impl VirtualDevice for LogDevice {
    fn update_axis(&mut self, axis: DeviceAxis, value: f64) -> Result<(), DeviceError> {
        if !self.connected {
            return Err(DeviceError::Disconnected);
        }
        debug!("[{}] {} = {:.4}", self.name, axis, value);
        self.axes.insert(axis, value);
        self.events += 1;
        Ok(())
    }

    fn set_button(&mut self, id: u8, pressed: bool) -> Result<(), DeviceError> {
        if !self.connected {
            return Err(DeviceError::Disconnected);
        }
        check_button(id)?;
        debug!("[{}] button {} {}", self.name, id, if pressed { "down" } else { "up" });
        if pressed {
            self.buttons.insert(id);
        } else {
            self.buttons.remove(&id);
        }
        self.events += 1;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn center_all(&mut self) -> Result<(), DeviceError> {
        if !self.connected {
            return Err(DeviceError::Disconnected);
        }
        debug!("[{}] centre all", self.name);
        for value in self.axes.values_mut() {
            *value = 0.0;
        }
        self.buttons.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_values() {
        let mut dev = LogDevice::new("test");
        dev.update_axis(DeviceAxis::RZ, -0.25).unwrap();
        dev.set_button(4, true).unwrap();
        assert_eq!(dev.axis(DeviceAxis::RZ), -0.25);
        assert!(dev.is_pressed(4));
        assert_eq!(dev.events(), 2);

        dev.center_all().unwrap();
        assert_eq!(dev.axis(DeviceAxis::RZ), 0.0);
        assert!(dev.pressed_buttons().is_empty());
    }

    #[test]
    fn test_rejects_bad_button_and_disconnect() {
        let mut dev = LogDevice::new("test");
        assert!(matches!(dev.set_button(0, true), Err(DeviceError::UnknownButton(0))));
        assert!(matches!(dev.set_button(33, true), Err(DeviceError::UnknownButton(33))));
        dev.disconnect();
        assert!(!dev.is_connected());
        assert!(matches!(
            dev.update_axis(DeviceAxis::X, 0.5),
            Err(DeviceError::Disconnected)
        ));
    }
}
