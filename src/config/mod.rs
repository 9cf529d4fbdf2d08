//! Live configuration store
//!
//! `ConfigStore` exclusively owns the nested configuration tree. Everything
//! else goes through its dotted-path `get`/`set` contract or the typed views
//! built on top of it. Profile lifecycle operations live in `profiles.rs`.

pub mod defaults;
pub mod params;
mod profiles;
pub mod tree;
pub mod validate;

use crate::mapping::{AxisMapping, AxisRole, ButtonConfig, DeviceAxis, LogicalAxis, MAX_BUTTONS};
use crate::profile::{ProfileLifecycle, ProfileStore};
use nimbus_curve::{AxisComponent, ShapingParams};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use defaults::{default_tree, DEFAULT_PROFILE_ID};
pub use params::UnifiedSettings;

/// Configuration persistence and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
}

/// Outcome of merging the persisted file onto the defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// File read and merged
    Loaded,
    /// No file yet; defaults in use
    Missing,
    /// File unreadable or corrupt; defaults in use
    Fallback(String),
}

/// Owner of the live configuration tree and the profile store
pub struct ConfigStore {
    config_path: PathBuf,
    tree: Value,
    profiles: ProfileStore,
    lifecycle: ProfileLifecycle,
}

impl ConfigStore {
    /// Store holding only the compiled-in defaults. Touches no files.
    pub fn new(config_path: impl Into<PathBuf>, profiles_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            tree: default_tree(),
            profiles: ProfileStore::new(profiles_dir),
            lifecycle: ProfileLifecycle::Uninitialized,
        }
    }

    /// Load the persisted config, seed built-in profiles and make sure the
    /// current profile exists
    ///
    /// Without a usable config file the live tree holds only defaults, so
    /// the current profile is applied onto it.
    pub fn open(config_path: impl Into<PathBuf>, profiles_dir: impl Into<PathBuf>) -> (Self, LoadStatus) {
        let mut store = Self::new(config_path, profiles_dir);
        let status = store.load();
        if let Err(e) = store.seed_profiles() {
            warn!("Could not seed built-in profiles: {}", e);
        }
        store.activate_current(status != LoadStatus::Loaded);
        (store, status)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::base_dir().join("controller_config.json")
    }

    /// Get the default user profile directory
    pub fn default_profiles_dir() -> PathBuf {
        Self::base_dir().join("profiles")
    }

    fn base_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nimbus")
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn lifecycle(&self) -> ProfileLifecycle {
        self.lifecycle
    }

    /// Whole live tree (read-only)
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Merge the persisted override file onto the compiled-in defaults
    ///
    /// Never fails: a missing file means defaults, a corrupt or unreadable
    /// one means defaults plus a warning in the returned status.
    pub fn load(&mut self) -> LoadStatus {
        let path = self.config_path.clone();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                self.tree = default_tree();
                return LoadStatus::Missing;
            }
            Err(source) => return self.fall_back(ConfigError::Io { path, source }),
        };

        let overlay: Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(source) => return self.fall_back(ConfigError::Parse { path, source }),
        };
        if !overlay.is_object() {
            return self.fall_back(ConfigError::Invalid(format!(
                "{} does not contain a JSON object",
                path.display()
            )));
        }

        let mut tree = default_tree();
        tree::deep_merge(&mut tree, overlay);
        self.tree = tree;
        info!("Loaded config from {}", path.display());
        LoadStatus::Loaded
    }

    fn fall_back(&mut self, error: ConfigError) -> LoadStatus {
        warn!("Could not load config file: {}. Using default configuration.", error);
        self.tree = default_tree();
        LoadStatus::Fallback(error.to_string())
    }

    /// Write the full live tree to the config file
    pub fn save(&self) -> Result<(), ConfigError> {
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: self.config_path.clone(),
            source,
        };
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.tree)?;
        std::fs::write(&self.config_path, content).map_err(io_err)?;
        debug!("Saved config to {}", self.config_path.display());
        Ok(())
    }

    /// Check required sections and value ranges, reporting the first problem
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate::validate_tree(&self.tree).map_err(ConfigError::Invalid)
    }

    // ------------------------------------------------------------------
    // Dotted-path access
    // ------------------------------------------------------------------

    /// Value at a dotted key, `None` when absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        tree::get_path(&self.tree, key)
    }

    /// Value at a dotted key, or `default`
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).cloned().unwrap_or(default)
    }

    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(Value::as_f64).unwrap_or(default)
    }

    pub fn get_u64(&self, key: &str, default: u64) -> u64 {
        self.get(key).and_then(Value::as_u64).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// Set a dotted key, creating intermediate objects as needed
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        tree::set_path(&mut self.tree, key, value.into());
    }

    /// Remove a dotted key
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        tree::remove_path(&mut self.tree, key)
    }

    // ------------------------------------------------------------------
    // Typed views
    // ------------------------------------------------------------------

    /// Logical → device axis routing currently in effect
    pub fn axis_mapping(&self) -> AxisMapping {
        let mut mapping = AxisMapping::new();
        for &axis in LogicalAxis::ALL {
            let key = format!("axis_mapping.{}", axis.as_str());
            let target = match self.get(&key).and_then(Value::as_str) {
                Some(name) => DeviceAxis::parse_target(name).unwrap_or_else(|e| {
                    warn!("{}: {}, using default", key, e);
                    axis.default_target()
                }),
                None => axis.default_target(),
            };
            mapping.set(axis, target);
        }
        mapping
    }

    pub fn set_axis_mapping(&mut self, axis: LogicalAxis, target: Option<DeviceAxis>) {
        self.set(
            &format!("axis_mapping.{}", axis.as_str()),
            DeviceAxis::target_name(target),
        );
    }

    /// All configured buttons, keyed by id
    pub fn buttons(&self) -> BTreeMap<u8, ButtonConfig> {
        let mut buttons = BTreeMap::new();
        let Some(section) = self.get("buttons").and_then(Value::as_object) else {
            return buttons;
        };
        for (key, value) in section {
            let Some(id) = ButtonConfig::id_from_key(key) else {
                debug!("Skipping unknown button key {}", key);
                continue;
            };
            match serde_json::from_value::<ButtonConfig>(value.clone()) {
                Ok(config) => {
                    buttons.insert(id, config);
                }
                Err(e) => warn!("Ignoring malformed buttons.{}: {}", key, e),
            }
        }
        buttons
    }

    pub fn button_config(&self, id: u8) -> ButtonConfig {
        self.buttons().remove(&id).unwrap_or_default()
    }

    pub fn set_button_toggle(&mut self, id: u8, toggle_mode: bool) -> bool {
        if !(1..=MAX_BUTTONS).contains(&id) {
            return false;
        }
        self.set(&format!("buttons.{}.toggle_mode", ButtonConfig::key(id)), toggle_mode);
        true
    }

    pub fn set_button_label(&mut self, id: u8, label: &str) -> bool {
        if !(1..=MAX_BUTTONS).contains(&id) {
            return false;
        }
        self.set(&format!("buttons.{}.label", ButtonConfig::key(id)), label);
        true
    }

    /// Shaping schema for a role, resolved once from the tree
    pub fn shaping_params(&self, role: AxisRole) -> ShapingParams {
        params::resolve(&self.tree, role)
    }

    /// Shape a raw displacement with the parameters configured for `role`
    ///
    /// Uses the percent-based curve when that role has percent settings,
    /// the legacy curve otherwise.
    pub fn apply_sensitivity_curve(&self, raw: f64, role: AxisRole, component: AxisComponent) -> f64 {
        self.shaping_params(role).shape(raw, component)
    }

    // ------------------------------------------------------------------
    // UI scale
    // ------------------------------------------------------------------

    pub fn scale_factor(&self) -> f64 {
        self.get_f64("ui.scale_factor", 1.0)
    }

    pub fn scaled(&self, base: f64) -> f64 {
        base * self.scale_factor()
    }

    /// Set the UI scale (clamped to 0.5-2.0) and the sizes derived from it
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        let scale = if scale_factor.is_finite() {
            scale_factor.clamp(*validate::SCALE_FACTOR.start(), *validate::SCALE_FACTOR.end())
        } else {
            1.0
        };
        let sized = |base: u64| (base as f64 * scale) as u64;
        self.set("ui.scale_factor", scale);
        self.set("ui.window_width", sized(defaults::BASE_WINDOW_WIDTH));
        self.set("ui.window_height", sized(defaults::BASE_WINDOW_HEIGHT));
        self.set("ui.joystick_size", sized(defaults::BASE_JOYSTICK_SIZE));
        self.set("ui.font_size", sized(defaults::BASE_FONT_SIZE));
    }
}
