// Configuration validation
// Stops at the first violation and reports it as a readable reason

use super::defaults::REQUIRED_SECTIONS;
use super::tree::get_path;
use crate::mapping::AxisRole;
use serde_json::Value;
use std::ops::RangeInclusive;

/// Legacy stick dead zone, as a fraction of travel
pub const LEGACY_DEAD_ZONE: RangeInclusive<f64> = 0.0..=0.5;
/// Legacy sensitivity multiplier
pub const LEGACY_SENSITIVITY: RangeInclusive<f64> = 0.1..=5.0;
/// Any percent-based knob
pub const PERCENT: RangeInclusive<f64> = 0.0..=100.0;
pub const DEVICE_ID: RangeInclusive<f64> = 1.0..=16.0;
pub const SCALE_FACTOR: RangeInclusive<f64> = 0.5..=2.0;
/// Failsafe watchdog timeout, in seconds
pub const FAILSAFE_TIMEOUT: RangeInclusive<f64> = 0.1..=3600.0;

const PERCENT_FIELDS: &[&str] = &["sensitivity", "deadzone", "extremity_deadzone"];

/// Read a number, using `default` when the key is absent
fn number(tree: &Value, key: &str, default: f64) -> Result<f64, String> {
    match get_path(tree, key) {
        None => Ok(default),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| format!("Expected a number at {key}, found {value}")),
    }
}

fn check_range(
    tree: &Value,
    key: &str,
    default: f64,
    range: &RangeInclusive<f64>,
    what: &str,
) -> Result<(), String> {
    let value = number(tree, key, default)?;
    if range.contains(&value) {
        Ok(())
    } else {
        Err(format!("Invalid {what}: {value}"))
    }
}

fn check_percent_section(tree: &Value, section: &str) -> Result<(), String> {
    let Some(node) = get_path(tree, section) else {
        return Ok(());
    };
    if !node.is_object() {
        return Err(format!("Expected an object at {section}"));
    }
    for field in PERCENT_FIELDS {
        let key = format!("{section}.{field}");
        if get_path(tree, &key).is_some() {
            check_range(tree, &key, 0.0, &PERCENT, &format!("{field} in {section}"))?;
        }
    }
    Ok(())
}

/// Validate a full configuration tree
pub fn validate_tree(tree: &Value) -> Result<(), String> {
    for section in REQUIRED_SECTIONS {
        if tree.get(section).is_none() {
            return Err(format!("Missing required section: {section}"));
        }
    }

    for joystick in ["left", "right"] {
        if get_path(tree, &format!("joysticks.{joystick}")).is_none() {
            return Err(format!("Missing joystick configuration: {joystick}"));
        }
        check_range(
            tree,
            &format!("joysticks.{joystick}.dead_zone"),
            0.1,
            &LEGACY_DEAD_ZONE,
            &format!("dead zone for {joystick}"),
        )?;
        check_range(
            tree,
            &format!("joysticks.{joystick}.sensitivity"),
            1.0,
            &LEGACY_SENSITIVITY,
            &format!("sensitivity for {joystick}"),
        )?;
    }

    check_percent_section(tree, "joystick_settings")?;
    check_percent_section(tree, "rudder_settings")?;
    for role in AxisRole::ALL {
        check_percent_section(tree, &format!("axis_sensitivity.{}", role.as_str()))?;
    }

    let device_id = number(tree, "vjoy.device_id", 1.0)?;
    if !DEVICE_ID.contains(&device_id) || device_id.fract() != 0.0 {
        return Err(format!("Invalid VJoy device ID: {device_id}"));
    }

    check_range(tree, "ui.scale_factor", 1.0, &SCALE_FACTOR, "scale factor")?;
    check_range(
        tree,
        "safety.failsafe_timeout",
        5.0,
        &FAILSAFE_TIMEOUT,
        "failsafe timeout",
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::default_tree;
    use crate::config::tree::{remove_path, set_path};
    use serde_json::json;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate_tree(&default_tree()), Ok(()));
    }

    #[test]
    fn test_missing_section() {
        let mut tree = default_tree();
        remove_path(&mut tree, "safety");
        assert_eq!(
            validate_tree(&tree),
            Err("Missing required section: safety".to_string())
        );
    }

    #[test]
    fn test_missing_joystick() {
        let mut tree = default_tree();
        remove_path(&mut tree, "joysticks.right");
        assert_eq!(
            validate_tree(&tree),
            Err("Missing joystick configuration: right".to_string())
        );
    }

    #[test]
    fn test_legacy_ranges() {
        let mut tree = default_tree();
        set_path(&mut tree, "joysticks.left.dead_zone", json!(0.6));
        let reason = validate_tree(&tree).unwrap_err();
        assert!(reason.contains("dead zone for left"));

        let mut tree = default_tree();
        set_path(&mut tree, "joysticks.right.sensitivity", json!(0.05));
        let reason = validate_tree(&tree).unwrap_err();
        assert!(reason.contains("sensitivity for right"));

        let mut tree = default_tree();
        set_path(&mut tree, "joysticks.right.sensitivity", json!(5.0));
        assert!(validate_tree(&tree).is_ok());
    }

    #[test]
    fn test_percent_ranges() {
        let mut tree = default_tree();
        set_path(&mut tree, "joystick_settings.deadzone", json!(100.0));
        assert!(validate_tree(&tree).is_ok());
        set_path(&mut tree, "joystick_settings.deadzone", json!(101.0));
        assert!(validate_tree(&tree)
            .unwrap_err()
            .contains("deadzone in joystick_settings"));

        let mut tree = default_tree();
        set_path(&mut tree, "axis_sensitivity.rudder.sensitivity", json!(-1));
        assert!(validate_tree(&tree)
            .unwrap_err()
            .contains("sensitivity in axis_sensitivity.rudder"));
    }

    #[test]
    fn test_first_violation_only() {
        let mut tree = default_tree();
        set_path(&mut tree, "joysticks.left.dead_zone", json!(0.9));
        set_path(&mut tree, "vjoy.device_id", json!(40));
        let reason = validate_tree(&tree).unwrap_err();
        assert!(reason.contains("dead zone"));
        assert!(!reason.contains("device"));
    }

    #[test]
    fn test_device_id_and_scale() {
        let mut tree = default_tree();
        set_path(&mut tree, "vjoy.device_id", json!(17));
        assert_eq!(
            validate_tree(&tree),
            Err("Invalid VJoy device ID: 17".to_string())
        );

        let mut tree = default_tree();
        set_path(&mut tree, "ui.scale_factor", json!(3.0));
        assert_eq!(validate_tree(&tree), Err("Invalid scale factor: 3".to_string()));
    }

    #[test]
    fn test_failsafe_timeout_range() {
        let mut tree = default_tree();
        set_path(&mut tree, "safety.failsafe_timeout", json!(1e20));
        assert_eq!(
            validate_tree(&tree),
            Err("Invalid failsafe timeout: 100000000000000000000".to_string())
        );
        set_path(&mut tree, "safety.failsafe_timeout", json!(0.5));
        assert!(validate_tree(&tree).is_ok());
    }

    #[test]
    fn test_wrong_type_is_invalid() {
        let mut tree = default_tree();
        set_path(&mut tree, "joysticks.left.dead_zone", json!("small"));
        assert!(validate_tree(&tree)
            .unwrap_err()
            .contains("Expected a number at joysticks.left.dead_zone"));
    }
}
