//! Command handlers for the CLI application.
//!
//! - `profile`: profile list/show/switch/save/reset/duplicate/create/delete
//! - `config`: dotted-key get/set, validate, paths
//! - `curve`: response table for an axis role
//! - `run`: stdin-driven virtual joystick session

pub mod config;
pub mod curve;
pub mod profile;
pub mod run;

use crate::cli::Cli;
use nimbus_joystick::{ConfigStore, LoadStatus};
use tracing::{debug, warn};

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Open the config store from the CLI path overrides
pub fn open_store(cli: &Cli) -> ConfigStore {
    let config_path = cli.config.clone().unwrap_or_else(ConfigStore::default_config_path);
    let profiles_dir = cli
        .profiles_dir
        .clone()
        .unwrap_or_else(ConfigStore::default_profiles_dir);
    debug!("Config {:?}, profiles {:?}", config_path, profiles_dir);

    let (store, status) = ConfigStore::open(config_path, profiles_dir);
    if let LoadStatus::Fallback(reason) = &status {
        warn!("Using default configuration: {}", reason);
    }
    store
}
