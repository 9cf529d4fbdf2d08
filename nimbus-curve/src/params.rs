//! Parameter types for both curve schemas

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which component of a two-dimensional stick an input belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisComponent {
    X,
    Y,
}

impl AxisComponent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisComponent::X => "x",
            AxisComponent::Y => "y",
        }
    }
}

/// Percent-based shaping parameters
///
/// All three knobs are percentages in 0-100. Missing fields take the values
/// the settings dialogs start from (50 / 10 / 5).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisParameters {
    /// 50 = linear, lower flattens the response, higher steepens it
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    /// Scaled to at most 25% of input travel
    #[serde(default = "default_deadzone")]
    pub deadzone: f64,
    /// Output ceiling compression at full travel
    #[serde(default = "default_extremity")]
    pub extremity_deadzone: f64,
}

fn default_sensitivity() -> f64 {
    50.0
}
fn default_deadzone() -> f64 {
    10.0
}
fn default_extremity() -> f64 {
    5.0
}

impl Default for AxisParameters {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            deadzone: default_deadzone(),
            extremity_deadzone: default_extremity(),
        }
    }
}

impl AxisParameters {
    pub fn new(sensitivity: f64, deadzone: f64, extremity_deadzone: f64) -> Self {
        Self {
            sensitivity,
            deadzone,
            extremity_deadzone,
        }
    }

    /// Pass-through parameters: no dead zone, linear, full output
    pub fn linear() -> Self {
        Self::new(50.0, 0.0, 0.0)
    }

    /// Copy with every percentage forced into 0-100 (non-finite values
    /// fall back to the field default)
    pub fn sanitized(&self) -> Self {
        fn pct(value: f64, fallback: f64) -> f64 {
            if value.is_finite() {
                value.clamp(0.0, 100.0)
            } else {
                fallback
            }
        }
        Self {
            sensitivity: pct(self.sensitivity, default_sensitivity()),
            deadzone: pct(self.deadzone, 0.0),
            extremity_deadzone: pct(self.extremity_deadzone, 0.0),
        }
    }
}

/// Curve selector of the legacy schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveType {
    #[default]
    Linear,
    /// `normalized ^ curve_power` (also stored as "quadratic")
    Exponential,
    /// Exponential with the power fixed at 3
    Cubic,
    /// `ln(1 + x(e - 1))`
    Logarithmic,
}

impl CurveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveType::Linear => "linear",
            CurveType::Exponential => "exponential",
            CurveType::Cubic => "cubic",
            CurveType::Logarithmic => "logarithmic",
        }
    }

    /// Parse a stored curve name. Unknown names behave as linear.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "exponential" | "quadratic" => CurveType::Exponential,
            "cubic" => CurveType::Cubic,
            "logarithmic" => CurveType::Logarithmic,
            _ => CurveType::Linear,
        }
    }
}

impl Serialize for CurveType {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CurveType {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let name = String::deserialize(d)?;
        Ok(CurveType::from_name(&name))
    }
}

/// Fractional/multiplier parameters of the older joystick schema
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacyParameters {
    /// Plain fraction of input travel (valid 0.0-0.5)
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f64,
    /// Output multiplier (valid 0.1-5.0)
    #[serde(default = "default_multiplier")]
    pub sensitivity: f64,
    #[serde(default)]
    pub curve_type: CurveType,
    #[serde(default = "default_curve_power")]
    pub curve_power: f64,
    #[serde(default)]
    pub invert_x: bool,
    #[serde(default)]
    pub invert_y: bool,
    #[serde(default = "default_max_range")]
    pub max_range: f64,
}

fn default_dead_zone() -> f64 {
    0.1
}
fn default_multiplier() -> f64 {
    1.0
}
fn default_curve_power() -> f64 {
    2.0
}
fn default_max_range() -> f64 {
    1.0
}

impl Default for LegacyParameters {
    fn default() -> Self {
        Self {
            dead_zone: default_dead_zone(),
            sensitivity: default_multiplier(),
            curve_type: CurveType::Linear,
            curve_power: default_curve_power(),
            invert_x: false,
            invert_y: false,
            max_range: default_max_range(),
        }
    }
}

impl LegacyParameters {
    pub fn inverted(&self, component: AxisComponent) -> bool {
        match component {
            AxisComponent::X => self.invert_x,
            AxisComponent::Y => self.invert_y,
        }
    }
}

/// Per-component sign flips for the percent-based schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Inversion {
    pub x: bool,
    pub y: bool,
}

impl Inversion {
    pub fn apply(&self, value: f64, component: AxisComponent) -> f64 {
        let flip = match component {
            AxisComponent::X => self.x,
            AxisComponent::Y => self.y,
        };
        if flip {
            -value
        } else {
            value
        }
    }
}

/// Shaping parameters with the schema already resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapingParams {
    /// Bidirectional percent-based curve
    Unified {
        params: AxisParameters,
        invert: Inversion,
    },
    /// Trigger-style axis: magnitude path only, output in [0, 1]
    Unidirectional(AxisParameters),
    /// Older curve-type schema
    Legacy(LegacyParameters),
}

impl ShapingParams {
    /// Run the raw displacement through whichever curve this schema selects
    pub fn shape(&self, raw: f64, component: AxisComponent) -> f64 {
        match self {
            ShapingParams::Unified { params, invert } => {
                invert.apply(crate::unified::apply(raw, params), component)
            }
            ShapingParams::Unidirectional(params) => {
                crate::unified::apply_unidirectional(raw, params)
            }
            ShapingParams::Legacy(params) => crate::legacy::apply_legacy(raw, params, component),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, ShapingParams::Legacy(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_parameters_defaults_from_empty_object() {
        let params: AxisParameters = serde_json::from_str("{}").unwrap();
        assert_eq!(params, AxisParameters::default());
        assert_eq!(params.sensitivity, 50.0);
        assert_eq!(params.deadzone, 10.0);
        assert_eq!(params.extremity_deadzone, 5.0);
    }

    #[test]
    fn test_sanitized_clamps_percentages() {
        let params = AxisParameters::new(150.0, -5.0, f64::NAN).sanitized();
        assert_eq!(params.sensitivity, 100.0);
        assert_eq!(params.deadzone, 0.0);
        assert_eq!(params.extremity_deadzone, 0.0);
    }

    #[test]
    fn test_curve_type_names() {
        assert_eq!(CurveType::from_name("exponential"), CurveType::Exponential);
        assert_eq!(CurveType::from_name("Quadratic"), CurveType::Exponential);
        assert_eq!(CurveType::from_name("cubic"), CurveType::Cubic);
        assert_eq!(CurveType::from_name("logarithmic"), CurveType::Logarithmic);
        assert_eq!(CurveType::from_name("s-curve"), CurveType::Linear);
    }

    #[test]
    fn test_legacy_parameters_parse() {
        let json = r#"{
            "dead_zone": 0.2,
            "sensitivity": 1.5,
            "curve_type": "quadratic",
            "invert_y": true
        }"#;
        let params: LegacyParameters = serde_json::from_str(json).unwrap();
        assert!((params.dead_zone - 0.2).abs() < 1e-12);
        assert_eq!(params.curve_type, CurveType::Exponential);
        assert_eq!(params.curve_power, 2.0);
        assert!(!params.invert_x);
        assert!(params.invert_y);
        assert_eq!(params.max_range, 1.0);

        let resaved = serde_json::to_string(&params).unwrap();
        assert!(resaved.contains("\"curve_type\":\"exponential\""));
    }

    #[test]
    fn test_inversion() {
        let inv = Inversion { x: true, y: false };
        assert_eq!(inv.apply(0.5, AxisComponent::X), -0.5);
        assert_eq!(inv.apply(0.5, AxisComponent::Y), 0.5);
    }
}
