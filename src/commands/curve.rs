//! Curve command handler.

use super::CommandResult;
use crate::cli::ComponentArg;
use anyhow::anyhow;
use nimbus_curve::ShapingParams;
use nimbus_joystick::{AxisRole, ConfigStore};

pub fn run(store: &ConfigStore, role: &str, component: ComponentArg, steps: usize) -> CommandResult {
    let role: AxisRole = role.parse().map_err(|e: String| anyhow!(e))?;
    let params = store.shaping_params(role);
    let steps = steps.max(1);

    println!("Response curve for {role} ({})", describe(&params));
    println!("{:>8}  {:>8}", "input", "output");
    for i in 0..=steps {
        let raw = i as f64 / steps as f64;
        let output = params.shape(raw, component.into());
        println!("{raw:>8.3}  {output:>8.4}");
    }
    Ok(())
}

fn describe(params: &ShapingParams) -> String {
    match params {
        ShapingParams::Unified { params, .. } => format!(
            "sensitivity {}%, deadzone {}%, extremity {}%",
            params.sensitivity, params.deadzone, params.extremity_deadzone
        ),
        ShapingParams::Unidirectional(params) => format!(
            "one-way, sensitivity {}%, deadzone {}%, extremity {}%",
            params.sensitivity, params.deadzone, params.extremity_deadzone
        ),
        ShapingParams::Legacy(legacy) => format!(
            "legacy {}, dead zone {}, sensitivity {}, max range {}",
            legacy.curve_type.as_str(),
            legacy.dead_zone,
            legacy.sensitivity,
            legacy.max_range
        ),
    }
}
