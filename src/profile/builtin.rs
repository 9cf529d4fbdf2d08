// Builtin controller profiles
// Hardcoded templates seeded into the user store (no bundled JSON needed)

use super::types::Profile;
use crate::config::{UnifiedSettings, DEFAULT_PROFILE_ID};
use crate::mapping::{AxisMapping, ButtonConfig, DeviceAxis, LogicalAxis};
use nimbus_curve::AxisParameters;
use std::collections::BTreeMap;

/// Ids of every builtin profile
pub const BUILTIN_PROFILE_IDS: &[&str] = &[DEFAULT_PROFILE_ID, "flight_simulator", "racing"];

pub fn is_builtin(id: &str) -> bool {
    BUILTIN_PROFILE_IDS.contains(&id)
}

/// Fresh copy of a builtin profile
pub fn builtin_profile(id: &str) -> Option<Profile> {
    match id {
        DEFAULT_PROFILE_ID => Some(default_profile()),
        "flight_simulator" => Some(flight_simulator()),
        "racing" => Some(racing()),
        _ => None,
    }
}

fn buttons(entries: &[(u8, bool, &str)]) -> BTreeMap<u8, ButtonConfig> {
    entries
        .iter()
        .map(|&(id, toggle_mode, label)| {
            (
                id,
                ButtonConfig {
                    toggle_mode,
                    label: label.to_string(),
                },
            )
        })
        .collect()
}

fn numbered_buttons() -> BTreeMap<u8, ButtonConfig> {
    (1..=8u8)
        .map(|id| {
            (
                id,
                ButtonConfig {
                    toggle_mode: false,
                    label: id.to_string(),
                },
            )
        })
        .collect()
}

/// Two sticks, eight momentary buttons
fn default_profile() -> Profile {
    Profile {
        name: "Default".to_string(),
        description: "Dual stick layout with eight momentary buttons".to_string(),
        layout_type: "dual_stick".to_string(),
        axis_mapping: AxisMapping::defaults(),
        buttons: numbered_buttons(),
        joystick_settings: Some(UnifiedSettings::new(AxisParameters::new(50.0, 10.0, 5.0))),
        rudder_settings: Some(UnifiedSettings::new(AxisParameters::new(50.0, 10.0, 5.0))),
        axis_sensitivity: BTreeMap::new(),
    }
}

/// Stick, rudder and throttle; softer centre for fine control
fn flight_simulator() -> Profile {
    let mut axis_mapping = AxisMapping::defaults();
    axis_mapping.set(LogicalAxis::RightX, None);
    axis_mapping.set(LogicalAxis::RightY, None);

    Profile {
        name: "Flight Simulator".to_string(),
        description: "Stick, rudder pedals and throttle".to_string(),
        layout_type: "flight".to_string(),
        axis_mapping,
        buttons: buttons(&[
            (1, false, "Trigger"),
            (2, false, "Fire"),
            (3, true, "Gear"),
            (4, true, "Flaps"),
            (5, false, "Brake"),
            (6, false, "View"),
        ]),
        joystick_settings: Some(UnifiedSettings::new(AxisParameters::new(35.0, 8.0, 3.0))),
        rudder_settings: Some(UnifiedSettings::new(AxisParameters::new(40.0, 12.0, 0.0))),
        axis_sensitivity: BTreeMap::new(),
    }
}

/// Steering on X, pedals on the triggers
fn racing() -> Profile {
    let mut axis_mapping = AxisMapping::defaults();
    axis_mapping.set(LogicalAxis::LeftY, None);
    axis_mapping.set(LogicalAxis::RightX, None);
    axis_mapping.set(LogicalAxis::RightY, None);
    axis_mapping.set(LogicalAxis::Rudder, None);
    axis_mapping.set(LogicalAxis::LeftTrigger, Some(DeviceAxis::Z));
    axis_mapping.set(LogicalAxis::RightTrigger, Some(DeviceAxis::RZ));

    let mut axis_sensitivity = BTreeMap::new();
    axis_sensitivity.insert(
        "left".to_string(),
        UnifiedSettings::new(AxisParameters::new(60.0, 4.0, 0.0)),
    );
    for trigger in ["left_trigger", "right_trigger"] {
        axis_sensitivity.insert(
            trigger.to_string(),
            UnifiedSettings::new(AxisParameters::new(50.0, 6.0, 0.0)),
        );
    }

    Profile {
        name: "Racing".to_string(),
        description: "Steering wheel with brake and throttle pedals".to_string(),
        layout_type: "racing".to_string(),
        axis_mapping,
        buttons: buttons(&[
            (1, false, "Shift Up"),
            (2, false, "Shift Down"),
            (3, true, "Lights"),
            (4, false, "Handbrake"),
        ]),
        joystick_settings: None,
        rudder_settings: None,
        axis_sensitivity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_id_resolves() {
        for id in BUILTIN_PROFILE_IDS {
            let profile = builtin_profile(id).unwrap();
            assert!(!profile.name.is_empty());
            assert!(is_builtin(id));
        }
        assert!(builtin_profile("my_custom").is_none());
        assert!(!is_builtin("my_custom"));
    }

    #[test]
    fn test_builtins_survive_serialization() {
        for id in BUILTIN_PROFILE_IDS {
            let profile = builtin_profile(id).unwrap();
            let json = serde_json::to_string_pretty(&profile).unwrap();
            let back: Profile = serde_json::from_str(&json).unwrap();
            assert_eq!(back, profile);
        }
    }

    #[test]
    fn test_flight_simulator_layout() {
        let profile = builtin_profile("flight_simulator").unwrap();
        assert_eq!(profile.axis_mapping.target(LogicalAxis::RightX), None);
        assert_eq!(profile.axis_mapping.target(LogicalAxis::Rudder), Some(DeviceAxis::RZ));
        assert!(profile.buttons[&3].toggle_mode);
        assert!(!profile.buttons[&1].toggle_mode);
    }
}
