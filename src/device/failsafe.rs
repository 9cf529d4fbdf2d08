//! Watchdog and emergency stop around a sink
//!
//! If no command arrives for `timeout`, every axis is centred and further
//! updates are dropped until commands resume. An emergency stop does the
//! same but stays latched until [`FailsafeDevice::resume`].

use super::{DeviceError, DeviceStatus, VirtualDevice};
use crate::config::ConfigStore;
use crate::mapping::DeviceAxis;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FailsafeConfig {
    pub enabled: bool,
    pub timeout: Duration,
}

impl Default for FailsafeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: Duration::from_secs(5),
        }
    }
}

impl FailsafeConfig {
    /// Read `safety.enable_failsafe` / `safety.failsafe_timeout`
    pub fn from_store(store: &ConfigStore) -> Self {
        let default = Self::default();
        let secs = store.get_f64("safety.failsafe_timeout", default.timeout.as_secs_f64());
        let timeout = match Duration::try_from_secs_f64(secs) {
            Ok(timeout) if !timeout.is_zero() => timeout,
            _ => {
                warn!("Invalid safety.failsafe_timeout {}, using {:?}", secs, default.timeout);
                default.timeout
            }
        };
        Self {
            enabled: store.get_bool("safety.enable_failsafe", default.enabled),
            timeout,
        }
    }
}

pub struct FailsafeDevice<D> {
    inner: D,
    config: FailsafeConfig,
    last_command: Instant,
    failsafe_active: bool,
    emergency_stop: bool,
    axis_values: BTreeMap<DeviceAxis, f64>,
}

impl<D: VirtualDevice> FailsafeDevice<D> {
    pub fn new(inner: D, config: FailsafeConfig) -> Self {
        Self {
            inner,
            config,
            last_command: Instant::now(),
            failsafe_active: false,
            emergency_stop: false,
            axis_values: BTreeMap::new(),
        }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.inner
    }

    pub fn config(&self) -> FailsafeConfig {
        self.config
    }

    pub fn set_config(&mut self, config: FailsafeConfig) {
        self.config = config;
    }

    /// Updates are currently being dropped
    pub fn is_blocked(&self) -> bool {
        self.failsafe_active || self.emergency_stop
    }

    /// Forward an axis value. Returns `Ok(false)` when it was dropped.
    pub fn update_axis(&mut self, axis: DeviceAxis, value: f64) -> Result<bool, DeviceError> {
        if !self.inner.is_connected() {
            return Err(DeviceError::Disconnected);
        }
        self.last_command = Instant::now();
        if self.is_blocked() {
            return Ok(false);
        }
        self.inner.update_axis(axis, value)?;
        self.axis_values.insert(axis, value);
        Ok(true)
    }

    /// Forward a button state. Presses are dropped while blocked; releases
    /// always go through.
    pub fn set_button(&mut self, id: u8, pressed: bool) -> Result<bool, DeviceError> {
        if !self.inner.is_connected() {
            return Err(DeviceError::Disconnected);
        }
        self.last_command = Instant::now();
        if pressed && self.is_blocked() {
            return Ok(false);
        }
        self.inner.set_button(id, pressed)?;
        Ok(true)
    }

    /// Run the watchdog
    pub fn tick(&mut self, now: Instant) -> Result<(), DeviceError> {
        if !self.config.enabled || self.emergency_stop {
            return Ok(());
        }
        let silent = now.saturating_duration_since(self.last_command);
        if silent > self.config.timeout && !self.failsafe_active {
            warn!("Failsafe activated: no commands for {:.1}s", silent.as_secs_f64());
            self.failsafe_active = true;
            self.center()?;
        } else if silent <= self.config.timeout && self.failsafe_active {
            info!("Commands resumed, failsafe cleared");
            self.failsafe_active = false;
        }
        Ok(())
    }

    /// Centre everything now and block updates until [`resume`](Self::resume)
    pub fn emergency_stop(&mut self) -> Result<(), DeviceError> {
        warn!("Emergency stop");
        self.emergency_stop = true;
        self.center()
    }

    /// Clear the emergency stop and any active failsafe
    pub fn resume(&mut self) {
        if self.is_blocked() {
            info!("Resuming output");
        }
        self.emergency_stop = false;
        self.failsafe_active = false;
        self.last_command = Instant::now();
    }

    pub fn center_all(&mut self) -> Result<(), DeviceError> {
        self.center()
    }

    pub fn status(&self) -> DeviceStatus {
        DeviceStatus {
            connected: self.inner.is_connected(),
            failsafe_active: self.failsafe_active,
            emergency_stop: self.emergency_stop,
            axis_values: self
                .axis_values
                .iter()
                .map(|(axis, &value)| (axis.as_str().to_string(), value))
                .collect(),
        }
    }

    fn center(&mut self) -> Result<(), DeviceError> {
        for value in self.axis_values.values_mut() {
            *value = 0.0;
        }
        self.inner.center_all()
    }
}
