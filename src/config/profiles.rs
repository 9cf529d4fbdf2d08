// Profile lifecycle on top of the live configuration
// Switching applies a profile onto the tree; saving copies the tree back

use super::params::UnifiedSettings;
use super::{ConfigStore, DEFAULT_PROFILE_ID};
use crate::mapping::{AxisMapping, ButtonConfig, DeviceAxis, LogicalAxis};
use crate::profile::types::default_layout_type;
use crate::profile::{
    builtin_profile, is_builtin, Profile, ProfileError, ProfileLifecycle, ProfileSummary,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Sections a profile owns inside the live tree
const PROFILE_SECTIONS: &[&str] = &[
    "axis_mapping",
    "buttons",
    "joystick_settings",
    "rudder_settings",
    "axis_sensitivity",
];

impl ConfigStore {
    /// Copy missing builtins into the user store
    pub fn seed_profiles(&mut self) -> Result<usize, ProfileError> {
        let written = self.profiles.seed_builtins()?;
        if self.lifecycle == ProfileLifecycle::Uninitialized {
            self.lifecycle = ProfileLifecycle::Seeded;
        }
        Ok(written)
    }

    /// Make sure the current profile id names a readable profile, falling
    /// back to the default profile otherwise
    ///
    /// With `apply` set the current profile is also written onto the tree.
    pub(super) fn activate_current(&mut self, apply: bool) {
        let current = self.current_profile_id();
        match self.profiles.read(&current) {
            Ok(_) if !apply => {
                self.lifecycle = ProfileLifecycle::Active;
                return;
            }
            Ok(_) => match self.switch_profile(&current) {
                Ok(()) => return,
                Err(e) => warn!("Could not apply profile {}: {}", current, e),
            },
            Err(_) => {}
        }
        warn!("Current profile {} unavailable, switching to {}", current, DEFAULT_PROFILE_ID);
        if let Err(e) = self.switch_profile(DEFAULT_PROFILE_ID) {
            warn!("Default profile unusable ({}), restoring it", e);
            if let Err(e) = self
                .reset_profile(DEFAULT_PROFILE_ID)
                .and_then(|_| self.switch_profile(DEFAULT_PROFILE_ID))
            {
                warn!("Could not activate {}: {}", DEFAULT_PROFILE_ID, e);
            }
        }
    }

    pub fn list_profiles(&self) -> Vec<ProfileSummary> {
        self.profiles.list()
    }

    pub fn current_profile_id(&self) -> String {
        self.get_str("current_profile", DEFAULT_PROFILE_ID).to_string()
    }

    pub fn is_builtin(&self, id: &str) -> bool {
        is_builtin(id)
    }

    /// Read a stored profile; `None` when missing or unreadable
    pub fn load_profile(&self, id: &str) -> Option<Profile> {
        match self.profiles.read(id) {
            Ok(profile) => Some(profile),
            Err(ProfileError::NotFound(_)) => {
                debug!("Profile {} not found", id);
                None
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    /// Make `id` current and apply its data onto the live configuration
    ///
    /// All or nothing: if the profile cannot be read, neither the current
    /// id nor the tree changes.
    pub fn switch_profile(&mut self, id: &str) -> Result<(), ProfileError> {
        let profile = self.profiles.read(id)?;
        let tree = profile_applied(&self.tree, id, &profile)?;
        self.tree = tree;
        self.lifecycle = ProfileLifecycle::Active;
        info!("Switched to profile {} ({})", id, profile.name);
        Ok(())
    }

    /// Copy the live profile sections back into the current profile's file
    pub fn save_current_profile(&self) -> Result<(), ProfileError> {
        let id = self.current_profile_id();
        let (name, description, layout_type) = match self.profiles.read(&id) {
            Ok(existing) => (existing.name, existing.description, existing.layout_type),
            Err(ProfileError::NotFound(_)) => (id.clone(), String::new(), default_layout_type()),
            Err(e) => return Err(e),
        };
        let profile = self.snapshot(&name, &description, &layout_type)?;
        self.profiles.write(&id, &profile)?;
        info!("Saved live configuration into profile {}", id);
        Ok(())
    }

    /// Restore a builtin profile from its compiled-in template
    ///
    /// Re-applies it to the live tree when it is the current profile.
    pub fn reset_profile(&mut self, id: &str) -> Result<(), ProfileError> {
        let profile = builtin_profile(id).ok_or_else(|| ProfileError::NotBuiltin(id.to_string()))?;
        self.profiles.write(id, &profile)?;
        info!("Reset builtin profile {}", id);
        if self.current_profile_id() == id {
            self.switch_profile(id)?;
        }
        Ok(())
    }

    /// Copy `source_id` under a new name; returns the new id
    pub fn duplicate_profile(&self, source_id: &str, new_name: &str) -> Result<String, ProfileError> {
        let source = self.profiles.read(source_id)?;
        let new_id = self.profiles.unique_id(new_name);
        let profile = Profile {
            name: display_name(new_name, &new_id),
            ..source
        };
        self.profiles.write(&new_id, &profile)?;
        info!("Duplicated profile {} as {}", source_id, new_id);
        Ok(new_id)
    }

    /// Store the live configuration as a new profile and make it current
    pub fn create_profile_as(&mut self, name: &str, description: &str) -> Result<String, ProfileError> {
        let layout_type = self
            .profiles
            .read(&self.current_profile_id())
            .map(|p| p.layout_type)
            .unwrap_or_else(|_| default_layout_type());
        let new_id = self.profiles.unique_id(name);
        let profile = self.snapshot(&display_name(name, &new_id), description, &layout_type)?;
        self.profiles.write(&new_id, &profile)?;
        self.set("current_profile", new_id.as_str());
        self.lifecycle = ProfileLifecycle::Active;
        info!("Created profile {}", new_id);
        Ok(new_id)
    }

    /// Delete a user profile
    ///
    /// Builtins are refused. Deleting the current profile switches to the
    /// default profile first (restoring it from its template if needed);
    /// if that fails nothing is deleted.
    pub fn delete_profile(&mut self, id: &str) -> Result<(), ProfileError> {
        if is_builtin(id) {
            return Err(ProfileError::BuiltinProtected(id.to_string()));
        }
        if !self.profiles.exists(id) {
            self.profiles.path_for(id)?;
            return Err(ProfileError::NotFound(id.to_string()));
        }

        if self.current_profile_id() == id {
            if let Err(e) = self.switch_profile(DEFAULT_PROFILE_ID) {
                warn!("Default profile unusable ({}), restoring it", e);
                self.reset_profile(DEFAULT_PROFILE_ID)?;
                self.switch_profile(DEFAULT_PROFILE_ID)?;
            }
        }

        self.profiles.remove(id)?;
        info!("Deleted profile {}", id);
        Ok(())
    }

    /// Build a profile document from the live tree
    fn snapshot(&self, name: &str, description: &str, layout_type: &str) -> Result<Profile, ProfileError> {
        let mut axis_mapping = AxisMapping::new();
        let live_mapping = self.axis_mapping();
        for &axis in LogicalAxis::ALL {
            axis_mapping.set(axis, live_mapping.target(axis));
        }

        let joystick_settings = self.section::<UnifiedSettings>("joystick_settings")?;
        let rudder_settings = self.section::<UnifiedSettings>("rudder_settings")?;
        let axis_sensitivity = self
            .section::<BTreeMap<String, UnifiedSettings>>("axis_sensitivity")?
            .unwrap_or_default();

        Ok(Profile {
            name: name.to_string(),
            description: description.to_string(),
            layout_type: layout_type.to_string(),
            axis_mapping,
            buttons: self.buttons(),
            joystick_settings,
            rudder_settings,
            axis_sensitivity,
        })
    }

    fn section<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ProfileError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| ProfileError::Snapshot(format!("{key}: {e}"))),
        }
    }
}

/// Trimmed display name, or the id when the name is blank
fn display_name(name: &str, id: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        id.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Copy of `tree` with the profile's sections replacing the live ones
fn profile_applied(tree: &Value, id: &str, profile: &Profile) -> Result<Value, ProfileError> {
    let mut tree = tree.clone();
    let Some(root) = tree.as_object_mut() else {
        return Err(ProfileError::Snapshot("configuration root is not an object".into()));
    };
    for section in PROFILE_SECTIONS {
        root.remove(*section);
    }

    let mut mapping = Map::new();
    for &axis in LogicalAxis::ALL {
        let target = profile.axis_mapping.target(axis);
        mapping.insert(
            axis.as_str().to_string(),
            Value::from(DeviceAxis::target_name(target)),
        );
    }
    root.insert("axis_mapping".into(), Value::Object(mapping));

    let buttons = profile
        .buttons
        .iter()
        .map(|(&id, config)| {
            serde_json::to_value(config).map(|v| (ButtonConfig::key(id), v))
        })
        .collect::<Result<Map<String, Value>, _>>()?;
    root.insert("buttons".into(), Value::Object(buttons));

    if let Some(settings) = &profile.joystick_settings {
        root.insert("joystick_settings".into(), serde_json::to_value(settings)?);
    }
    if let Some(settings) = &profile.rudder_settings {
        root.insert("rudder_settings".into(), serde_json::to_value(settings)?);
    }
    if !profile.axis_sensitivity.is_empty() {
        root.insert(
            "axis_sensitivity".into(),
            serde_json::to_value(&profile.axis_sensitivity)?,
        );
    }
    root.insert("current_profile".into(), Value::from(id));
    Ok(tree)
}
