//! Curve-type response from the older joystick schema
//!
//! Dead zone is a plain fraction with no cap, the curve is picked by
//! [`CurveType`], then the sensitivity multiplier, inversion and max range
//! are applied in that order.

use crate::params::{AxisComponent, CurveType, LegacyParameters};
use crate::EPSILON;
use std::f64::consts::E;

fn curve(normalized: f64, params: &LegacyParameters) -> f64 {
    match params.curve_type {
        CurveType::Linear => normalized,
        CurveType::Exponential => {
            let power = if params.curve_power.is_finite() && params.curve_power > 0.0 {
                params.curve_power
            } else {
                1.0
            };
            normalized.powf(power)
        }
        CurveType::Cubic => normalized.powi(3),
        CurveType::Logarithmic => (1.0 + normalized * (E - 1.0)).ln(),
    }
}

/// Apply the legacy curve to a displacement in [-1, 1]
pub fn apply_legacy(raw: f64, params: &LegacyParameters, component: AxisComponent) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    let raw = raw.clamp(-1.0, 1.0);
    let dead_zone = if params.dead_zone.is_finite() {
        params.dead_zone.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let magnitude = raw.abs();
    if magnitude < dead_zone || magnitude == 0.0 {
        return 0.0;
    }

    let mut sign = if raw >= 0.0 { 1.0 } else { -1.0 };
    let normalized = ((magnitude - dead_zone) / (1.0 - dead_zone).max(EPSILON)).clamp(0.0, 1.0);

    let multiplier = if params.sensitivity.is_finite() {
        params.sensitivity.max(0.0)
    } else {
        1.0
    };
    let mut output = curve(normalized, params) * multiplier;

    if params.inverted(component) {
        sign = -sign;
    }

    let ceiling = if params.max_range.is_finite() {
        params.max_range.clamp(0.0, 1.0)
    } else {
        1.0
    };
    output = output.min(ceiling);

    if output == 0.0 {
        0.0
    } else {
        sign * output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(curve_type: CurveType) -> LegacyParameters {
        LegacyParameters {
            dead_zone: 0.1,
            sensitivity: 1.0,
            curve_type,
            curve_power: 2.0,
            invert_x: false,
            invert_y: false,
            max_range: 1.0,
        }
    }

    #[test]
    fn test_linear_rescale() {
        let p = legacy(CurveType::Linear);
        assert_eq!(apply_legacy(0.05, &p, AxisComponent::X), 0.0);
        let out = apply_legacy(0.55, &p, AxisComponent::X);
        assert!((out - 0.5).abs() < 1e-12);
        assert!((apply_legacy(-0.55, &p, AxisComponent::X) + 0.5).abs() < 1e-12);
        assert!((apply_legacy(1.0, &p, AxisComponent::X) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_exponential_and_cubic() {
        let p = legacy(CurveType::Exponential);
        assert!((apply_legacy(0.55, &p, AxisComponent::X) - 0.25).abs() < 1e-12);

        let p = legacy(CurveType::Cubic);
        assert!((apply_legacy(0.55, &p, AxisComponent::X) - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_logarithmic() {
        let p = legacy(CurveType::Logarithmic);
        let out = apply_legacy(0.55, &p, AxisComponent::X);
        let expected = (1.0 + 0.5 * (E - 1.0)).ln();
        assert!((out - expected).abs() < 1e-12);
        // Endpoints stay anchored
        assert!((apply_legacy(1.0, &p, AxisComponent::X) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_multiplier_then_max_range() {
        let mut p = legacy(CurveType::Linear);
        p.sensitivity = 3.0;
        p.max_range = 0.8;
        // 0.5 * 3.0 = 1.5, clamped to 0.8
        assert!((apply_legacy(0.55, &p, AxisComponent::X) - 0.8).abs() < 1e-12);
        p.sensitivity = 0.5;
        assert!((apply_legacy(0.55, &p, AxisComponent::X) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_inversion_per_component() {
        let mut p = legacy(CurveType::Linear);
        p.invert_y = true;
        assert!(apply_legacy(0.55, &p, AxisComponent::X) > 0.0);
        assert!(apply_legacy(0.55, &p, AxisComponent::Y) < 0.0);
        assert!(apply_legacy(-0.55, &p, AxisComponent::Y) > 0.0);
    }

    #[test]
    fn test_degenerate_dead_zone_is_guarded() {
        let mut p = legacy(CurveType::Linear);
        p.dead_zone = 1.0;
        assert_eq!(apply_legacy(0.99, &p, AxisComponent::X), 0.0);
        let out = apply_legacy(1.0, &p, AxisComponent::X);
        assert!(out.is_finite());
        assert!((-1.0..=1.0).contains(&out));
    }

    #[test]
    fn test_symmetry() {
        for curve_type in [
            CurveType::Linear,
            CurveType::Exponential,
            CurveType::Cubic,
            CurveType::Logarithmic,
        ] {
            let p = legacy(curve_type);
            for i in 0..=20 {
                let raw = i as f64 / 20.0;
                let pos = apply_legacy(raw, &p, AxisComponent::X);
                let neg = apply_legacy(-raw, &p, AxisComponent::X);
                assert!((pos + neg).abs() < 1e-12);
            }
        }
    }
}
