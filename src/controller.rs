//! Session object driving a virtual device from on-screen input
//!
//! Raw displacements go through the role's shaping curve, the optional
//! smoothing filter and the axis mapping before reaching the failsafe
//! wrapped sink. Curve parameters are resolved from the configuration once
//! per (re)configuration, not per sample.

use crate::config::ConfigStore;
use crate::device::{DeviceError, DeviceStatus, FailsafeConfig, FailsafeDevice, VirtualDevice};
use crate::mapping::{AxisMapping, ButtonBank, LogicalAxis};
use crate::profile::ProfileError;
use nimbus_curve::{ShapingParams, Smoother};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// One of the two on-screen sticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stick {
    Left,
    Right,
}

impl Stick {
    pub fn axes(&self) -> (LogicalAxis, LogicalAxis) {
        match self {
            Stick::Left => (LogicalAxis::LeftX, LogicalAxis::LeftY),
            Stick::Right => (LogicalAxis::RightX, LogicalAxis::RightY),
        }
    }
}

impl fmt::Display for Stick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stick::Left => "left",
            Stick::Right => "right",
        })
    }
}

impl FromStr for Stick {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Stick::Left),
            "right" => Ok(Stick::Right),
            _ => Err(format!("unknown stick: \"{s}\" (expected left or right)")),
        }
    }
}

/// Controller state for `status` output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerStatus {
    pub profile: String,
    pub device: DeviceStatus,
    pub active_buttons: Vec<u8>,
    pub smoothing: bool,
}

pub struct Controller<D: VirtualDevice> {
    config: ConfigStore,
    device: FailsafeDevice<D>,
    mapping: AxisMapping,
    params: BTreeMap<LogicalAxis, ShapingParams>,
    smoothers: BTreeMap<LogicalAxis, Smoother>,
    smoothing: bool,
    buttons: ButtonBank,
}

impl<D: VirtualDevice> Controller<D> {
    pub fn new(config: ConfigStore, device: D) -> Self {
        let failsafe = FailsafeConfig::from_store(&config);
        let mut controller = Self {
            config,
            device: FailsafeDevice::new(device, failsafe),
            mapping: AxisMapping::new(),
            params: BTreeMap::new(),
            smoothers: BTreeMap::new(),
            smoothing: false,
            buttons: ButtonBank::new(),
        };
        controller.reconfigure();
        controller
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Mutable access to the configuration. Call [`reconfigure`](Self::reconfigure)
    /// afterwards for changes to take effect.
    pub fn config_mut(&mut self) -> &mut ConfigStore {
        &mut self.config
    }

    pub fn device(&self) -> &FailsafeDevice<D> {
        &self.device
    }

    pub fn into_config(self) -> ConfigStore {
        self.config
    }

    /// Re-read mapping, curve parameters, button modes and safety settings
    ///
    /// Resets every smoother to rest and releases all buttons.
    pub fn reconfigure(&mut self) {
        self.mapping = self.config.axis_mapping();
        for (target, axes) in self.mapping.shared_targets() {
            let names: Vec<&str> = axes.iter().map(|a| a.as_str()).collect();
            info!("Device axis {} is shared by {}", target, names.join(", "));
        }

        self.params = LogicalAxis::ALL
            .iter()
            .map(|&axis| (axis, self.config.shaping_params(axis.role())))
            .collect();

        self.smoothing = self.config.get_bool("safety.enable_smoothing", true);
        let alpha = self.config.get_f64("safety.smoothing_factor", 0.1);
        self.smoothers = LogicalAxis::ALL
            .iter()
            .map(|&axis| (axis, Smoother::new(alpha)))
            .collect();

        self.buttons.configure(&self.config.buttons());
        self.device.set_config(FailsafeConfig::from_store(&self.config));
        debug!(
            "Controller configured for profile {} (smoothing {})",
            self.config.current_profile_id(),
            self.smoothing
        );
    }

    /// Shape, smooth and forward one logical axis
    ///
    /// Returns the value sent to the device, or `None` when the axis is
    /// unmapped or the failsafe dropped the update.
    pub fn axis_input(&mut self, axis: LogicalAxis, raw: f64) -> Result<Option<f64>, DeviceError> {
        let component = axis.component();
        let shaped = match self.params.get(&axis) {
            Some(params) => params.shape(raw, component),
            None => self.config.apply_sensitivity_curve(raw, axis.role(), component),
        };

        let value = match self.smoothers.get_mut(&axis) {
            Some(smoother) if self.smoothing => {
                smoother.set_target(shaped);
                smoother.step()
            }
            Some(smoother) => {
                smoother.reset(shaped);
                shaped
            }
            None => shaped,
        };
        self.forward(axis, value)
    }

    /// Both components of a stick in one call
    pub fn stick_input(&mut self, stick: Stick, x: f64, y: f64) -> Result<(Option<f64>, Option<f64>), DeviceError> {
        let (axis_x, axis_y) = stick.axes();
        Ok((self.axis_input(axis_x, x)?, self.axis_input(axis_y, y)?))
    }

    pub fn button_press(&mut self, id: u8) -> Result<(), DeviceError> {
        match self.buttons.press(id) {
            Some(state) => {
                self.device.set_button(id, state)?;
                Ok(())
            }
            None => Err(DeviceError::UnknownButton(id)),
        }
    }

    /// Release a momentary button; a no-op for toggle buttons
    pub fn button_release(&mut self, id: u8) -> Result<(), DeviceError> {
        if let Some(state) = self.buttons.release(id) {
            self.device.set_button(id, state)?;
        } else if self.buttons.is_toggle(id) {
            debug!("Ignoring release of toggle button {}", id);
        } else {
            return Err(DeviceError::UnknownButton(id));
        }
        Ok(())
    }

    /// Advance smoothing and run the failsafe watchdog
    pub fn tick(&mut self, now: Instant) -> Result<(), DeviceError> {
        if self.smoothing && !self.device.is_blocked() {
            let pending: Vec<(LogicalAxis, f64)> = self
                .smoothers
                .iter_mut()
                .filter(|(_, s)| !s.settled())
                .map(|(&axis, s)| (axis, s.step()))
                .collect();
            for (axis, value) in pending {
                if let Some(target) = self.mapping.target(axis) {
                    self.device.update_axis(target, value)?;
                }
            }
        }
        self.device.tick(now)
    }

    pub fn emergency_stop(&mut self) -> Result<(), DeviceError> {
        self.rest();
        self.device.emergency_stop()
    }

    pub fn resume(&mut self) {
        self.device.resume();
    }

    /// Centre all axes and release every button without latching
    pub fn center_all(&mut self) -> Result<(), DeviceError> {
        self.rest();
        self.device.center_all()
    }

    /// Switch profile and apply its mapping, curves and button modes
    ///
    /// All axes are centred so nothing carries over from the old mapping.
    /// The new profile stays in effect even if centring fails.
    pub fn switch_profile(&mut self, id: &str) -> Result<(), ControllerError> {
        self.config.switch_profile(id)?;
        self.reconfigure();
        self.device.center_all()?;
        Ok(())
    }

    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            profile: self.config.current_profile_id(),
            device: self.device.status(),
            active_buttons: self.buttons.active_buttons(),
            smoothing: self.smoothing,
        }
    }

    fn forward(&mut self, axis: LogicalAxis, value: f64) -> Result<Option<f64>, DeviceError> {
        let Some(target) = self.mapping.target(axis) else {
            return Ok(None);
        };
        if self.device.update_axis(target, value)? {
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    fn rest(&mut self) {
        for smoother in self.smoothers.values_mut() {
            smoother.reset(0.0);
        }
        self.buttons.configure(&self.config.buttons());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::LogDevice;
    use crate::mapping::DeviceAxis;

    fn controller(smoothing: bool) -> Controller<LogDevice> {
        let mut config = ConfigStore::new("/nonexistent/c.json", "/nonexistent/p");
        config.set("safety.enable_smoothing", smoothing);
        Controller::new(config, LogDevice::new("test"))
    }

    #[test]
    fn test_axis_input_shapes_and_routes() {
        let mut ctl = controller(false);
        // Legacy defaults: dead zone 0.1, linear
        let sent = ctl.axis_input(LogicalAxis::LeftX, 0.55).unwrap();
        assert!((sent.unwrap() - 0.5).abs() < 1e-12);
        assert!((ctl.device().inner().axis(DeviceAxis::X) - 0.5).abs() < 1e-12);

        assert_eq!(ctl.axis_input(LogicalAxis::LeftY, 0.05).unwrap(), Some(0.0));
    }

    #[test]
    fn test_unmapped_axis_not_forwarded() {
        let mut ctl = controller(false);
        ctl.config_mut().set_axis_mapping(LogicalAxis::Rudder, None);
        ctl.reconfigure();
        assert_eq!(ctl.axis_input(LogicalAxis::Rudder, 1.0).unwrap(), None);
        assert_eq!(ctl.device().inner().events(), 0);
    }

    #[test]
    fn test_switch_applies_profile_when_centring_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let (config, _) = ConfigStore::open(dir.path().join("c.json"), dir.path().join("p"));
        let mut ctl = Controller::new(config, LogDevice::new("test"));
        ctl.device.inner_mut().disconnect();

        assert!(ctl.switch_profile("flight_simulator").is_err());
        assert_eq!(ctl.status().profile, "flight_simulator");
        assert_eq!(ctl.mapping.target(LogicalAxis::RightX), None);
        assert_eq!(ctl.mapping.target(LogicalAxis::Rudder), Some(DeviceAxis::RZ));
    }

    #[test]
    fn test_smoothing_converges_on_ticks() {
        let mut ctl = controller(true);
        let first = ctl.axis_input(LogicalAxis::Throttle, 1.0).unwrap().unwrap();
        assert!((first - 0.1).abs() < 1e-12);
        for _ in 0..200 {
            ctl.tick(Instant::now()).unwrap();
        }
        assert_eq!(ctl.device().inner().axis(DeviceAxis::Z), 1.0);
    }

    #[test]
    fn test_trigger_is_unidirectional() {
        let mut ctl = controller(false);
        assert_eq!(ctl.axis_input(LogicalAxis::LeftTrigger, -0.7).unwrap(), Some(0.0));
        let full = ctl.axis_input(LogicalAxis::RightTrigger, 1.0).unwrap().unwrap();
        assert!((full - 1.0).abs() < 1e-12);
        assert_eq!(ctl.device().inner().axis(DeviceAxis::Slider2), full);
    }

    #[test]
    fn test_buttons() {
        let mut ctl = controller(false);
        ctl.config_mut().set_button_toggle(2, true);
        ctl.reconfigure();

        ctl.button_press(1).unwrap();
        assert!(ctl.device().inner().is_pressed(1));
        ctl.button_release(1).unwrap();
        assert!(!ctl.device().inner().is_pressed(1));

        ctl.button_press(2).unwrap();
        ctl.button_release(2).unwrap();
        assert!(ctl.device().inner().is_pressed(2));
        assert_eq!(ctl.status().active_buttons, vec![2]);
        ctl.button_press(2).unwrap();
        assert!(!ctl.device().inner().is_pressed(2));

        assert!(matches!(ctl.button_press(40), Err(DeviceError::UnknownButton(40))));
    }

    #[test]
    fn test_emergency_stop_and_resume() {
        let mut ctl = controller(false);
        ctl.axis_input(LogicalAxis::LeftX, 1.0).unwrap();
        ctl.emergency_stop().unwrap();
        assert_eq!(ctl.device().inner().axis(DeviceAxis::X), 0.0);
        assert!(ctl.status().device.emergency_stop);
        assert_eq!(ctl.axis_input(LogicalAxis::LeftX, 1.0).unwrap(), None);

        ctl.resume();
        assert!(ctl.axis_input(LogicalAxis::LeftX, 1.0).unwrap().is_some());
    }

    #[test]
    fn test_stick_parse() {
        assert_eq!("Left".parse::<Stick>(), Ok(Stick::Left));
        assert!("middle".parse::<Stick>().is_err());
        assert_eq!(Stick::Right.axes(), (LogicalAxis::RightX, LogicalAxis::RightY));
    }
}
