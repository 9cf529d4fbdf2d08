// CLI definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use nimbus_curve::AxisComponent;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nimbus-joystick")]
#[command(author, version, about = "Virtual joystick controller with response curves and profiles")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/nimbus/controller_config.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Profile directory (default: ~/.config/nimbus/profiles)
    #[arg(long, global = true, value_name = "DIR")]
    pub profiles_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage controller profiles
    #[command(subcommand, visible_alias = "p")]
    Profile(ProfileCommands),

    /// Read and edit the live configuration
    #[command(subcommand, visible_alias = "cfg")]
    Config(ConfigCommands),

    /// Print the response curve of an axis role
    Curve {
        /// Role (left, right, rudder, throttle, left_trigger, right_trigger)
        role: String,

        /// Stick component (legacy inversion is per component)
        #[arg(long, value_enum, default_value = "x")]
        component: ComponentArg,

        /// Number of samples between 0 and 1
        #[arg(long, default_value = "10")]
        steps: usize,
    },

    /// Drive a virtual joystick from commands on stdin
    Run {
        /// Log device writes instead of creating a uinput device
        #[arg(long)]
        dry_run: bool,

        /// Name of the virtual device
        #[arg(long, default_value = nimbus_joystick::device::DEFAULT_DEVICE_NAME)]
        device_name: String,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List stored profiles
    #[command(visible_alias = "ls")]
    List,

    /// Show a profile document
    Show {
        /// Profile id
        id: String,
    },

    /// Make a profile current and save the config
    Switch {
        /// Profile id
        id: String,
    },

    /// Store the live configuration into the current profile
    Save,

    /// Restore a built-in profile from its template
    Reset {
        /// Built-in profile id
        id: String,
    },

    /// Copy a profile under a new name
    #[command(visible_alias = "dup")]
    Duplicate {
        /// Source profile id
        source: String,
        /// Display name of the copy
        name: String,
    },

    /// Save the live configuration as a new current profile
    Create {
        /// Display name
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Delete a user profile
    #[command(visible_alias = "rm")]
    Delete {
        /// Profile id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print a value by dotted key (whole tree when omitted)
    Get {
        key: Option<String>,
    },

    /// Set a dotted key to a JSON value (bare words are stored as strings)
    Set {
        key: String,
        value: String,
    },

    /// Check the configuration and report the first problem
    Validate,

    /// Print the config and profile paths
    Path,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ComponentArg {
    X,
    Y,
}

impl From<ComponentArg> for AxisComponent {
    fn from(c: ComponentArg) -> Self {
        match c {
            ComponentArg::X => AxisComponent::X,
            ComponentArg::Y => AxisComponent::Y,
        }
    }
}
