//! Profile store and lifecycle through the public ConfigStore API

use nimbus_joystick::config::DEFAULT_PROFILE_ID;
use nimbus_joystick::{AxisRole, ConfigStore, DeviceAxis, LogicalAxis, ProfileError, ProfileLifecycle};
use tempfile::TempDir;

fn open(dir: &TempDir) -> ConfigStore {
    ConfigStore::open(
        dir.path().join("controller_config.json"),
        dir.path().join("profiles"),
    )
    .0
}

#[test]
fn test_fresh_install_seeds_builtins() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let profiles = store.list_profiles();
    assert_eq!(profiles.len(), 3);
    assert!(profiles.iter().all(|p| p.builtin));
    assert_eq!(store.lifecycle(), ProfileLifecycle::Active);
}

#[test]
fn test_seeding_keeps_user_edits() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = open(&dir);
        store.switch_profile("racing").unwrap();
        store.set("axis_sensitivity.left.sensitivity", 80.0);
        store.save_current_profile().unwrap();
        store.save().unwrap();
    }
    let store = open(&dir);
    assert_eq!(store.current_profile_id(), "racing");
    let racing = store.load_profile("racing").unwrap();
    assert_eq!(racing.axis_sensitivity["left"].params.sensitivity, 80.0);
}

#[test]
fn test_delete_builtin_is_refused() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    let result = store.delete_profile("flight_simulator");
    assert!(matches!(result, Err(ProfileError::BuiltinProtected(_))));
    assert!(store
        .list_profiles()
        .iter()
        .any(|p| p.id == "flight_simulator"));
}

#[test]
fn test_duplicate_twice_gets_distinct_ids() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let first = store.duplicate_profile("flight_simulator", "My Custom").unwrap();
    let second = store.duplicate_profile("flight_simulator", "My Custom").unwrap();
    assert_eq!(first, "my_custom");
    assert_eq!(second, "my_custom_1");

    let copy = store.load_profile(&second).unwrap();
    let source = store.load_profile("flight_simulator").unwrap();
    assert_eq!(copy.name, "My Custom");
    assert_eq!(copy.buttons, source.buttons);
    assert_eq!(copy.axis_mapping, source.axis_mapping);
    assert!(!store.is_builtin(&second));
}

#[test]
fn test_duplicate_cannot_shadow_builtin() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let id = store.duplicate_profile("racing", "Racing").unwrap();
    assert_eq!(id, "racing_1");
}

#[test]
fn test_switch_to_corrupt_profile_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    store.switch_profile("flight_simulator").unwrap();
    std::fs::write(dir.path().join("profiles").join("broken.json"), "{ \"name\": ").unwrap();

    let before = store.tree().clone();
    let result = store.switch_profile("broken");
    assert!(matches!(result, Err(ProfileError::Corrupt { .. })));
    assert_eq!(store.current_profile_id(), "flight_simulator");
    assert_eq!(store.tree(), &before);

    // Listing skips the unreadable document
    assert!(store.list_profiles().iter().all(|p| p.id != "broken"));
}

#[test]
fn test_switch_reroutes_axes_and_curves() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    store.switch_profile("racing").unwrap();

    let mapping = store.axis_mapping();
    assert_eq!(mapping.target(LogicalAxis::LeftTrigger), Some(DeviceAxis::Z));
    assert_eq!(mapping.target(LogicalAxis::Rudder), None);
    assert!(!store.shaping_params(AxisRole::LeftTrigger).is_legacy());
    assert!(store.validate().is_ok());
}

#[test]
fn test_create_then_delete_current() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    store.switch_profile("flight_simulator").unwrap();
    store.set("rudder_settings.deadzone", 3.0);

    let id = store.create_profile_as("Helicopter", "collective on throttle").unwrap();
    assert_eq!(store.current_profile_id(), id);
    let created = store.load_profile(&id).unwrap();
    assert_eq!(created.layout_type, "flight");
    assert_eq!(created.rudder_settings.unwrap().params.deadzone, 3.0);

    store.delete_profile(&id).unwrap();
    assert_eq!(store.current_profile_id(), DEFAULT_PROFILE_ID);
    assert!(store.list_profiles().iter().all(|p| p.id != id));
}

#[test]
fn test_invalid_ids_never_touch_disk() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    for id in ["../escape", "Upper", "", "a/b"] {
        assert!(matches!(store.switch_profile(id), Err(ProfileError::InvalidId(_))));
        assert!(store.load_profile(id).is_none());
    }
}

#[test]
fn test_reset_rejects_user_profile() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    let id = store.duplicate_profile("default", "Copy").unwrap();
    assert!(matches!(store.reset_profile(&id), Err(ProfileError::NotBuiltin(_))));
    assert!(matches!(store.reset_profile("missing"), Err(ProfileError::NotBuiltin(_))));
}
