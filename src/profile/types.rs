// Profile document types
// One JSON document per profile in the user profile directory

use crate::config::UnifiedSettings;
use crate::mapping::{AxisMapping, ButtonConfig};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Profile as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_layout_type")]
    pub layout_type: String,
    #[serde(default)]
    pub axis_mapping: AxisMapping,
    #[serde(
        default,
        serialize_with = "serialize_buttons",
        deserialize_with = "deserialize_buttons"
    )]
    pub buttons: BTreeMap<u8, ButtonConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joystick_settings: Option<UnifiedSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rudder_settings: Option<UnifiedSettings>,
    /// Per-role percent settings, keyed by role name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub axis_sensitivity: BTreeMap<String, UnifiedSettings>,
}

pub fn default_layout_type() -> String {
    "custom".to_string()
}

impl Profile {
    /// Empty profile with default mapping and no settings
    pub fn named(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            layout_type: default_layout_type(),
            axis_mapping: AxisMapping::defaults(),
            buttons: BTreeMap::new(),
            joystick_settings: None,
            rudder_settings: None,
            axis_sensitivity: BTreeMap::new(),
        }
    }
}

/// Serialize buttons as `{ "button_1": {...}, ... }`
fn serialize_buttons<S: Serializer>(
    buttons: &BTreeMap<u8, ButtonConfig>,
    s: S,
) -> Result<S::Ok, S::Error> {
    let keyed: BTreeMap<String, &ButtonConfig> = buttons
        .iter()
        .map(|(&id, config)| (ButtonConfig::key(id), config))
        .collect();
    keyed.serialize(s)
}

fn deserialize_buttons<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<BTreeMap<u8, ButtonConfig>, D::Error> {
    let keyed = BTreeMap::<String, ButtonConfig>::deserialize(d)?;
    keyed
        .into_iter()
        .map(|(key, config)| {
            ButtonConfig::id_from_key(&key)
                .map(|id| (id, config))
                .ok_or_else(|| <D::Error as serde::de::Error>::custom(format!("invalid button key: \"{key}\"")))
        })
        .collect()
}

/// Listing entry for a stored profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub layout_type: String,
    pub builtin: bool,
}
