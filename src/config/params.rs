//! Resolution of per-role shaping parameters from the configuration tree
//!
//! Each role's schema is decided once here and handed to the curve engine
//! as a [`ShapingParams`]; nothing downstream branches on field presence.
//!
//! Lookup order for a role:
//! 1. `axis_sensitivity.{role}` (percent-based, per role)
//! 2. `joystick_settings` for sticks, `rudder_settings` for the rudder
//! 3. legacy `joysticks.left` / `joysticks.right` (the rudder shares the
//!    right stick), or pass-through for throttle and triggers

use super::tree::get_path;
use crate::mapping::AxisRole;
use nimbus_curve::{AxisParameters, Inversion, LegacyParameters, ShapingParams};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Percent-based settings as stored in a config section or profile
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UnifiedSettings {
    #[serde(flatten)]
    pub params: AxisParameters,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub invert_x: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub invert_y: bool,
}

impl UnifiedSettings {
    pub fn new(params: AxisParameters) -> Self {
        Self {
            params,
            invert_x: false,
            invert_y: false,
        }
    }

    pub fn inversion(&self) -> Inversion {
        Inversion {
            x: self.invert_x,
            y: self.invert_y,
        }
    }
}

const PERCENT_KEYS: &[&str] = &["sensitivity", "deadzone", "extremity_deadzone"];

/// Parse a percent-based section if it carries at least one percent key
fn unified_section(tree: &Value, section: &str) -> Option<UnifiedSettings> {
    let node = get_path(tree, section)?;
    let object = node.as_object()?;
    if !PERCENT_KEYS.iter().any(|k| object.contains_key(*k)) {
        return None;
    }
    match serde_json::from_value(node.clone()) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!("Ignoring malformed {}: {}", section, e);
            None
        }
    }
}

/// Shared percent-based section a role falls back to
fn shared_section(role: AxisRole) -> Option<&'static str> {
    match role {
        AxisRole::LeftStick | AxisRole::RightStick => Some("joystick_settings"),
        AxisRole::Rudder => Some("rudder_settings"),
        _ => None,
    }
}

/// Legacy stick section a role falls back to
fn legacy_section(role: AxisRole) -> Option<&'static str> {
    match role {
        AxisRole::LeftStick => Some("joysticks.left"),
        AxisRole::RightStick | AxisRole::Rudder => Some("joysticks.right"),
        _ => None,
    }
}

/// Percent-based settings in effect for a role, if any
pub fn unified_settings(tree: &Value, role: AxisRole) -> Option<UnifiedSettings> {
    unified_section(tree, &format!("axis_sensitivity.{}", role.as_str()))
        .or_else(|| shared_section(role).and_then(|s| unified_section(tree, s)))
}

/// Legacy parameters under `section`, defaults when absent or malformed
pub fn legacy_parameters(tree: &Value, section: &str) -> LegacyParameters {
    match get_path(tree, section) {
        Some(node) => serde_json::from_value(node.clone()).unwrap_or_else(|e| {
            warn!("Ignoring malformed {}: {}", section, e);
            LegacyParameters::default()
        }),
        None => LegacyParameters::default(),
    }
}

/// Resolve the shaping schema for a role
pub fn resolve(tree: &Value, role: AxisRole) -> ShapingParams {
    if let Some(settings) = unified_settings(tree, role) {
        return if role.is_unidirectional() {
            ShapingParams::Unidirectional(settings.params)
        } else {
            ShapingParams::Unified {
                params: settings.params,
                invert: settings.inversion(),
            }
        };
    }

    match legacy_section(role) {
        Some(section) => ShapingParams::Legacy(legacy_parameters(tree, section)),
        None if role.is_unidirectional() => {
            ShapingParams::Unidirectional(AxisParameters::linear())
        }
        None => ShapingParams::Unified {
            params: AxisParameters::linear(),
            invert: Inversion::default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::default_tree;
    use crate::config::tree::set_path;
    use nimbus_curve::CurveType;
    use serde_json::json;

    #[test]
    fn test_defaults_resolve_to_legacy_sticks() {
        let tree = default_tree();
        assert!(resolve(&tree, AxisRole::LeftStick).is_legacy());
        assert!(resolve(&tree, AxisRole::Rudder).is_legacy());
        assert_eq!(
            resolve(&tree, AxisRole::Throttle),
            ShapingParams::Unified {
                params: AxisParameters::linear(),
                invert: Inversion::default()
            }
        );
        assert_eq!(
            resolve(&tree, AxisRole::LeftTrigger),
            ShapingParams::Unidirectional(AxisParameters::linear())
        );
    }

    #[test]
    fn test_rudder_falls_back_to_right_stick() {
        let mut tree = default_tree();
        set_path(&mut tree, "joysticks.right.curve_type", json!("cubic"));
        match resolve(&tree, AxisRole::Rudder) {
            ShapingParams::Legacy(p) => assert_eq!(p.curve_type, CurveType::Cubic),
            other => panic!("expected legacy, got {other:?}"),
        }
    }

    #[test]
    fn test_shared_joystick_settings() {
        let mut tree = default_tree();
        set_path(
            &mut tree,
            "joystick_settings",
            json!({ "sensitivity": 30.0, "deadzone": 0.0, "extremity_deadzone": 0.0 }),
        );
        for role in [AxisRole::LeftStick, AxisRole::RightStick] {
            match resolve(&tree, role) {
                ShapingParams::Unified { params, .. } => assert_eq!(params.sensitivity, 30.0),
                other => panic!("expected unified, got {other:?}"),
            }
        }
        // Rudder has its own section
        assert!(resolve(&tree, AxisRole::Rudder).is_legacy());
    }

    #[test]
    fn test_per_role_section_wins() {
        let mut tree = default_tree();
        set_path(&mut tree, "joystick_settings.sensitivity", json!(30.0));
        set_path(&mut tree, "axis_sensitivity.left.sensitivity", json!(70.0));
        set_path(&mut tree, "axis_sensitivity.left.invert_y", json!(true));
        match resolve(&tree, AxisRole::LeftStick) {
            ShapingParams::Unified { params, invert } => {
                assert_eq!(params.sensitivity, 70.0);
                // Unspecified knobs take dialog defaults
                assert_eq!(params.deadzone, 10.0);
                assert!(invert.y);
                assert!(!invert.x);
            }
            other => panic!("expected unified, got {other:?}"),
        }
        match resolve(&tree, AxisRole::RightStick) {
            ShapingParams::Unified { params, .. } => assert_eq!(params.sensitivity, 30.0),
            other => panic!("expected unified, got {other:?}"),
        }
    }

    #[test]
    fn test_trigger_section_is_unidirectional() {
        let mut tree = default_tree();
        set_path(&mut tree, "axis_sensitivity.right_trigger.deadzone", json!(20.0));
        match resolve(&tree, AxisRole::RightTrigger) {
            ShapingParams::Unidirectional(p) => assert_eq!(p.deadzone, 20.0),
            other => panic!("expected unidirectional, got {other:?}"),
        }
    }

    #[test]
    fn test_section_without_percent_keys_is_ignored() {
        let mut tree = default_tree();
        set_path(&mut tree, "joystick_settings", json!({ "note": "empty" }));
        assert!(resolve(&tree, AxisRole::LeftStick).is_legacy());
    }

    #[test]
    fn test_malformed_unified_falls_through() {
        let mut tree = default_tree();
        set_path(&mut tree, "rudder_settings.sensitivity", json!("high"));
        assert!(resolve(&tree, AxisRole::Rudder).is_legacy());
    }

    #[test]
    fn test_unified_settings_serde_round_trip() {
        let settings = UnifiedSettings::new(AxisParameters::new(60.0, 5.0, 2.0));
        let value = serde_json::to_value(settings).unwrap();
        assert_eq!(
            value,
            json!({ "sensitivity": 60.0, "deadzone": 5.0, "extremity_deadzone": 2.0 })
        );
        let back: UnifiedSettings = serde_json::from_value(value).unwrap();
        assert_eq!(back, settings);
    }
}
