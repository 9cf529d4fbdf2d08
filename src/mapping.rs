//! Logical UI axes, physical device axes and button behaviour

use nimbus_curve::AxisComponent;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Highest button id the virtual device exposes
pub const MAX_BUTTONS: u8 = 32;

/// Axes produced by the on-screen controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogicalAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    Throttle,
    Rudder,
    LeftTrigger,
    RightTrigger,
}

impl LogicalAxis {
    pub const ALL: &'static [LogicalAxis] = &[
        LogicalAxis::LeftX,
        LogicalAxis::LeftY,
        LogicalAxis::RightX,
        LogicalAxis::RightY,
        LogicalAxis::Throttle,
        LogicalAxis::Rudder,
        LogicalAxis::LeftTrigger,
        LogicalAxis::RightTrigger,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalAxis::LeftX => "left_x",
            LogicalAxis::LeftY => "left_y",
            LogicalAxis::RightX => "right_x",
            LogicalAxis::RightY => "right_y",
            LogicalAxis::Throttle => "throttle",
            LogicalAxis::Rudder => "rudder",
            LogicalAxis::LeftTrigger => "left_trigger",
            LogicalAxis::RightTrigger => "right_trigger",
        }
    }

    /// Parameter role whose curve shapes this axis
    pub fn role(&self) -> AxisRole {
        match self {
            LogicalAxis::LeftX | LogicalAxis::LeftY => AxisRole::LeftStick,
            LogicalAxis::RightX | LogicalAxis::RightY => AxisRole::RightStick,
            LogicalAxis::Throttle => AxisRole::Throttle,
            LogicalAxis::Rudder => AxisRole::Rudder,
            LogicalAxis::LeftTrigger => AxisRole::LeftTrigger,
            LogicalAxis::RightTrigger => AxisRole::RightTrigger,
        }
    }

    pub fn component(&self) -> AxisComponent {
        match self {
            LogicalAxis::LeftY | LogicalAxis::RightY => AxisComponent::Y,
            _ => AxisComponent::X,
        }
    }

    /// Device axis used when a mapping does not mention this axis
    pub fn default_target(&self) -> Option<DeviceAxis> {
        Some(match self {
            LogicalAxis::LeftX => DeviceAxis::X,
            LogicalAxis::LeftY => DeviceAxis::Y,
            LogicalAxis::RightX => DeviceAxis::RX,
            LogicalAxis::RightY => DeviceAxis::RY,
            LogicalAxis::Throttle => DeviceAxis::Z,
            LogicalAxis::Rudder => DeviceAxis::RZ,
            LogicalAxis::LeftTrigger => DeviceAxis::Slider1,
            LogicalAxis::RightTrigger => DeviceAxis::Slider2,
        })
    }
}

impl fmt::Display for LogicalAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogicalAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicalAxis::ALL
            .iter()
            .copied()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown logical axis: \"{s}\""))
    }
}

/// Group of logical axes sharing one parameter set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisRole {
    LeftStick,
    RightStick,
    Rudder,
    Throttle,
    LeftTrigger,
    RightTrigger,
}

impl AxisRole {
    pub const ALL: &'static [AxisRole] = &[
        AxisRole::LeftStick,
        AxisRole::RightStick,
        AxisRole::Rudder,
        AxisRole::Throttle,
        AxisRole::LeftTrigger,
        AxisRole::RightTrigger,
    ];

    /// Key used under `axis_sensitivity.*` and `joysticks.*`
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisRole::LeftStick => "left",
            AxisRole::RightStick => "right",
            AxisRole::Rudder => "rudder",
            AxisRole::Throttle => "throttle",
            AxisRole::LeftTrigger => "left_trigger",
            AxisRole::RightTrigger => "right_trigger",
        }
    }

    /// Triggers only travel one way and produce output in [0, 1]
    pub fn is_unidirectional(&self) -> bool {
        matches!(self, AxisRole::LeftTrigger | AxisRole::RightTrigger)
    }
}

impl fmt::Display for AxisRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AxisRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AxisRole::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown axis role: \"{s}\""))
    }
}

/// Axes exposed by the virtual device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceAxis {
    X,
    Y,
    Z,
    RX,
    RY,
    RZ,
    Slider1,
    Slider2,
}

impl DeviceAxis {
    pub const ALL: &'static [DeviceAxis] = &[
        DeviceAxis::X,
        DeviceAxis::Y,
        DeviceAxis::Z,
        DeviceAxis::RX,
        DeviceAxis::RY,
        DeviceAxis::RZ,
        DeviceAxis::Slider1,
        DeviceAxis::Slider2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceAxis::X => "x",
            DeviceAxis::Y => "y",
            DeviceAxis::Z => "z",
            DeviceAxis::RX => "rx",
            DeviceAxis::RY => "ry",
            DeviceAxis::RZ => "rz",
            DeviceAxis::Slider1 => "slider1",
            DeviceAxis::Slider2 => "slider2",
        }
    }

    /// Parse a mapping target; `"none"` yields `Ok(None)`
    pub fn parse_target(s: &str) -> Result<Option<DeviceAxis>, String> {
        if s.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        s.parse().map(Some)
    }

    pub fn target_name(target: Option<DeviceAxis>) -> &'static str {
        target.map(|a| a.as_str()).unwrap_or("none")
    }
}

impl fmt::Display for DeviceAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceAxis::ALL
            .iter()
            .copied()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown device axis: \"{s}\""))
    }
}

/// Logical → physical axis routing
///
/// Stored as `{ "left_x": "x", "rudder": "none", ... }`. Axes absent from
/// the map fall back to their default target. Several logical axes may
/// share one device axis; nothing here enforces uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AxisMapping {
    targets: BTreeMap<LogicalAxis, Option<DeviceAxis>>,
}

impl AxisMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping with every logical axis on its default target
    pub fn defaults() -> Self {
        let targets = LogicalAxis::ALL
            .iter()
            .map(|&a| (a, a.default_target()))
            .collect();
        Self { targets }
    }

    /// Device axis a logical axis forwards to, `None` if disabled
    pub fn target(&self, axis: LogicalAxis) -> Option<DeviceAxis> {
        match self.targets.get(&axis) {
            Some(target) => *target,
            None => axis.default_target(),
        }
    }

    pub fn set(&mut self, axis: LogicalAxis, target: Option<DeviceAxis>) {
        self.targets.insert(axis, target);
    }

    /// Explicitly stored entries
    pub fn entries(&self) -> impl Iterator<Item = (LogicalAxis, Option<DeviceAxis>)> + '_ {
        self.targets.iter().map(|(&a, &t)| (a, t))
    }

    /// Logical axes forwarding to the same device axis as another one
    pub fn shared_targets(&self) -> Vec<(DeviceAxis, Vec<LogicalAxis>)> {
        let mut by_target: BTreeMap<DeviceAxis, Vec<LogicalAxis>> = BTreeMap::new();
        for &axis in LogicalAxis::ALL {
            if let Some(target) = self.target(axis) {
                by_target.entry(target).or_default().push(axis);
            }
        }
        by_target
            .into_iter()
            .filter(|(_, axes)| axes.len() > 1)
            .collect()
    }
}

impl Serialize for AxisMapping {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let named: BTreeMap<&str, &str> = self
            .targets
            .iter()
            .map(|(a, t)| (a.as_str(), DeviceAxis::target_name(*t)))
            .collect();
        named.serialize(s)
    }
}

impl<'de> Deserialize<'de> for AxisMapping {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let named = BTreeMap::<String, String>::deserialize(d)?;
        let mut mapping = AxisMapping::new();
        for (logical, target) in named {
            let axis: LogicalAxis = logical.parse().map_err(serde::de::Error::custom)?;
            let target = DeviceAxis::parse_target(&target).map_err(serde::de::Error::custom)?;
            mapping.set(axis, target);
        }
        Ok(mapping)
    }
}

/// Per-button settings stored under `buttons.button_{n}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ButtonConfig {
    /// false = momentary, true = flips on each press
    #[serde(default)]
    pub toggle_mode: bool,
    /// Cosmetic label
    #[serde(default)]
    pub label: String,
}

impl ButtonConfig {
    pub fn key(id: u8) -> String {
        format!("button_{id}")
    }

    /// Parse the id out of a `button_{n}` key
    pub fn id_from_key(key: &str) -> Option<u8> {
        let id: u8 = key.strip_prefix("button_")?.parse().ok()?;
        (1..=MAX_BUTTONS).contains(&id).then_some(id)
    }
}

/// Runtime press state of every button
#[derive(Debug, Clone, Default)]
pub struct ButtonBank {
    toggle: HashMap<u8, bool>,
    active: HashMap<u8, bool>,
}

impl ButtonBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install button modes; every button starts released
    pub fn configure(&mut self, buttons: &BTreeMap<u8, ButtonConfig>) {
        self.toggle = buttons.iter().map(|(&id, b)| (id, b.toggle_mode)).collect();
        self.active.clear();
    }

    pub fn is_toggle(&self, id: u8) -> bool {
        self.toggle.get(&id).copied().unwrap_or(false)
    }

    pub fn is_active(&self, id: u8) -> bool {
        self.active.get(&id).copied().unwrap_or(false)
    }

    /// Handle a press; returns the state to send to the device
    pub fn press(&mut self, id: u8) -> Option<bool> {
        if !(1..=MAX_BUTTONS).contains(&id) {
            return None;
        }
        let state = if self.is_toggle(id) {
            !self.is_active(id)
        } else {
            true
        };
        self.active.insert(id, state);
        Some(state)
    }

    /// Handle a release; toggle buttons ignore it
    pub fn release(&mut self, id: u8) -> Option<bool> {
        if !(1..=MAX_BUTTONS).contains(&id) || self.is_toggle(id) {
            return None;
        }
        self.active.insert(id, false);
        Some(false)
    }

    /// Ids currently held or latched on
    pub fn active_buttons(&self) -> Vec<u8> {
        let mut ids: Vec<u8> = self
            .active
            .iter()
            .filter(|(_, &on)| on)
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }
}
