// Compiled-in configuration defaults
// The persisted override file is deep-merged on top of this tree

use serde_json::{json, Value};

/// Profile id every install starts on and falls back to
pub const DEFAULT_PROFILE_ID: &str = "default";

/// Top-level sections `validate()` insists on
pub const REQUIRED_SECTIONS: &[&str] = &["joysticks", "ui", "vjoy", "safety"];

/// Base window geometry the UI scale factor multiplies
pub const BASE_WINDOW_WIDTH: u64 = 614;
pub const BASE_WINDOW_HEIGHT: u64 = 311;
pub const BASE_JOYSTICK_SIZE: u64 = 280;
pub const BASE_FONT_SIZE: u64 = 16;

fn legacy_stick() -> Value {
    json!({
        "dead_zone": 0.1,
        "sensitivity": 1.0,
        "curve_type": "linear",
        "curve_power": 2.0,
        "invert_x": false,
        "invert_y": false,
        "max_range": 1.0
    })
}

fn default_buttons() -> Value {
    let mut buttons = serde_json::Map::new();
    for id in 1..=8u8 {
        buttons.insert(
            format!("button_{id}"),
            json!({ "toggle_mode": false, "label": id.to_string() }),
        );
    }
    Value::Object(buttons)
}

/// Full default tree
///
/// Percent-based sections (`joystick_settings`, `rudder_settings`,
/// `axis_sensitivity`) are absent, so sticks run on the legacy
/// `joysticks.*` parameters until a profile or the user provides them.
pub fn default_tree() -> Value {
    json!({
        "joysticks": {
            "left": legacy_stick(),
            "right": legacy_stick()
        },
        "ui": {
            "window_width": BASE_WINDOW_WIDTH,
            "window_height": BASE_WINDOW_HEIGHT,
            "joystick_size": BASE_JOYSTICK_SIZE,
            "background_color": [20, 20, 20],
            "joystick_bg_color": [80, 20, 20],
            "joystick_fg_color": [255, 50, 50],
            "button_color": [60, 15, 15],
            "button_hover_color": [100, 25, 25],
            "text_color": [255, 255, 255],
            "font_size": 14,
            "scale_factor": 1.0
        },
        "vjoy": {
            "device_id": 1,
            "update_rate": 60,
            "axis_range": 32767
        },
        "axis_mapping": {
            "left_x": "x",
            "left_y": "y",
            "right_x": "rx",
            "right_y": "ry",
            "throttle": "z",
            "rudder": "rz",
            "left_trigger": "slider1",
            "right_trigger": "slider2"
        },
        "safety": {
            "enable_failsafe": true,
            "failsafe_timeout": 5.0,
            "max_update_rate": 100,
            "enable_smoothing": true,
            "smoothing_factor": 0.1
        },
        "buttons": default_buttons(),
        "current_profile": DEFAULT_PROFILE_ID
    })
}
