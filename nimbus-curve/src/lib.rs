//! Nimbus input-shaping pipeline
//!
//! Converts a raw normalized stick/slider displacement into the value sent
//! to the virtual device. Two parameter schemas are supported:
//!
//! - the percent-based [`AxisParameters`] (sensitivity 0-100 with 50 = linear)
//! - the older [`LegacyParameters`] (fractional dead zone, curve type,
//!   sensitivity multiplier, inversion and max range)
//!
//! Callers resolve which schema applies once and hold a [`ShapingParams`].
//! A small exponential [`Smoother`] is provided for the timer-driven blend
//! between successive outputs.

pub mod legacy;
pub mod params;
pub mod smoothing;
pub mod unified;

pub use legacy::apply_legacy;
pub use params::{
    AxisComponent, AxisParameters, CurveType, Inversion, LegacyParameters, ShapingParams,
};
pub use smoothing::Smoother;
pub use unified::{apply, apply_unidirectional, deadzone_fraction, normalize, response_power};

/// Smallest denominator used when rescaling the post-deadzone range
pub const EPSILON: f64 = 1e-9;

/// Convert a normalized value in [-1, 1] to signed integer device units
///
/// `axis_range` is the magnitude of full deflection (e.g. 32767).
pub fn to_device_units(value: f64, axis_range: i32) -> i32 {
    let value = if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    };
    (value * axis_range as f64).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_units() {
        assert_eq!(to_device_units(0.0, 32767), 0);
        assert_eq!(to_device_units(1.0, 32767), 32767);
        assert_eq!(to_device_units(-1.0, 32767), -32767);
        assert_eq!(to_device_units(0.5, 1000), 500);
    }

    #[test]
    fn test_device_units_clamps() {
        assert_eq!(to_device_units(3.0, 100), 100);
        assert_eq!(to_device_units(-3.0, 100), -100);
        assert_eq!(to_device_units(f64::NAN, 100), 0);
    }
}
