//! Nimbus virtual joystick controller
//!
//! Turns on-screen stick, slider and button input into a virtual game
//! controller: per-role response curves, profile management and a
//! failsafe-guarded uinput sink.

pub mod config;
pub mod controller;
pub mod device;
pub mod mapping;
pub mod profile;

pub use config::{ConfigError, ConfigStore, LoadStatus};
pub use controller::{Controller, ControllerError, ControllerStatus, Stick};
pub use device::{DeviceError, DeviceStatus, FailsafeDevice, LogDevice, UinputDevice, VirtualDevice};
pub use mapping::{AxisMapping, AxisRole, ButtonConfig, DeviceAxis, LogicalAxis};
pub use profile::{Profile, ProfileError, ProfileLifecycle, ProfileSummary};
