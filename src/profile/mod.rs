// Controller profiles
// Named bundles of axis mapping, button modes and curve parameters

pub mod builtin;
pub mod store;
pub mod types;

pub use builtin::{builtin_profile, is_builtin, BUILTIN_PROFILE_IDS};
pub use store::{is_valid_id, slugify, ProfileStore};
pub use types::{Profile, ProfileSummary};

use thiserror::Error;

/// Where the profile system is in its startup sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileLifecycle {
    /// Nothing written to the user store yet
    Uninitialized,
    /// Built-ins copied into the user store
    Seeded,
    /// A profile is current
    Active,
}

/// Profile operation errors
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile not found: {0}")]
    NotFound(String),
    #[error("Profile {id} is unreadable: {reason}")]
    Corrupt { id: String, reason: String },
    #[error("Built-in profile {0} cannot be deleted")]
    BuiltinProtected(String),
    #[error("Profile {0} is not a built-in profile")]
    NotBuiltin(String),
    #[error("Invalid profile id: {0:?}")]
    InvalidId(String),
    #[error("Live configuration cannot be stored as a profile: {0}")]
    Snapshot(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}
