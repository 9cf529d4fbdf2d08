//! Percent-based response curve
//!
//! The dead zone is removed and the remaining travel rescaled back onto
//! [0, 1], so the dead zone never costs usable range. Sensitivity 50% is the
//! exact identity; lower values raise the exponent (up to 4.0 at 0%), higher
//! values lower it (down to 0.1). The extremity dead zone then scales the
//! output ceiling down.

use crate::params::AxisParameters;
use crate::EPSILON;

/// Largest fraction of input travel the dead zone can swallow
pub const MAX_DEADZONE_FRACTION: f64 = 0.25;

/// Lowest exponent reachable at high sensitivity
pub const MIN_POWER: f64 = 0.1;

/// Tolerance for treating sensitivity as exactly 50%
const MIDPOINT_TOLERANCE: f64 = 1e-9;

/// Effective dead zone as a fraction of input travel
pub fn deadzone_fraction(params: &AxisParameters) -> f64 {
    (params.deadzone / 100.0) * MAX_DEADZONE_FRACTION
}

/// Exponent applied to the normalized input for a sensitivity percentage
///
/// Returns exactly 1.0 at the midpoint.
pub fn response_power(sensitivity_pct: f64) -> f64 {
    let frac = sensitivity_pct / 100.0;
    if (frac - 0.5).abs() <= MIDPOINT_TOLERANCE {
        1.0
    } else if frac < 0.5 {
        1.0 + (0.5 - frac) * 6.0
    } else {
        (1.0 - (frac - 0.5) * 1.8).max(MIN_POWER)
    }
}

/// Rescale a magnitude past the dead zone back onto [0, 1]
pub fn normalize(magnitude: f64, deadzone_eff: f64) -> f64 {
    let available = (1.0 - deadzone_eff).max(EPSILON);
    ((magnitude - deadzone_eff) / available).clamp(0.0, 1.0)
}

fn sanitize_raw(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Shape a magnitude in [0, 1]; returns 0.0 exactly inside the dead zone
fn shape_magnitude(magnitude: f64, params: &AxisParameters) -> f64 {
    let deadzone_eff = deadzone_fraction(params);
    if magnitude < deadzone_eff {
        return 0.0;
    }

    let normalized = normalize(magnitude, deadzone_eff);
    let power = response_power(params.sensitivity);
    let mut output = if power == 1.0 {
        normalized
    } else {
        normalized.powf(power)
    };

    if params.extremity_deadzone > 0.0 {
        output *= 1.0 - params.extremity_deadzone / 100.0;
    }

    output.clamp(0.0, 1.0)
}

/// Apply the curve to a bidirectional displacement in [-1, 1]
pub fn apply(raw: f64, params: &AxisParameters) -> f64 {
    let params = params.sanitized();
    let raw = sanitize_raw(raw);
    let sign = if raw >= 0.0 { 1.0 } else { -1.0 };
    let output = shape_magnitude(raw.abs(), &params);
    if output == 0.0 {
        0.0
    } else {
        sign * output
    }
}

/// Apply the curve to a trigger-style displacement; output is in [0, 1]
pub fn apply_unidirectional(raw: f64, params: &AxisParameters) -> f64 {
    let params = params.sanitized();
    let raw = sanitize_raw(raw).max(0.0);
    shape_magnitude(raw, &params)
}
