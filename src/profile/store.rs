// Profile store
// User-writable directory of `<id>.json` documents, seeded from the builtins

use super::builtin::{builtin_profile, is_builtin, BUILTIN_PROFILE_IDS};
use super::types::{Profile, ProfileSummary};
use super::ProfileError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Turn a display name into a profile id: lowercase ASCII alphanumerics
/// joined by single underscores
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    if slug.is_empty() {
        "profile".to_string()
    } else {
        slug
    }
}

/// Ids are restricted to `[a-z0-9_]+` so they are always safe file stems
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

/// Directory-backed profile storage
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for an id
    pub fn path_for(&self, id: &str) -> Result<PathBuf, ProfileError> {
        if !is_valid_id(id) {
            return Err(ProfileError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Copy every builtin missing from the store. Existing files are left
    /// alone. Returns how many were written.
    pub fn seed_builtins(&self) -> Result<usize, ProfileError> {
        std::fs::create_dir_all(&self.dir)?;
        let mut written = 0;
        for id in BUILTIN_PROFILE_IDS {
            if self.exists(id) {
                continue;
            }
            if let Some(profile) = builtin_profile(id) {
                self.write(id, &profile)?;
                written += 1;
            }
        }
        if written > 0 {
            info!("Seeded {} builtin profiles into {}", written, self.dir.display());
        }
        Ok(written)
    }

    /// Read and parse a profile document
    pub fn read(&self, id: &str) -> Result<Profile, ProfileError> {
        let path = self.path_for(id)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProfileError::NotFound(id.to_string()));
            }
            Err(e) => {
                return Err(ProfileError::Corrupt {
                    id: id.to_string(),
                    reason: e.to_string(),
                })
            }
        };
        serde_json::from_str(&content).map_err(|e| ProfileError::Corrupt {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }

    /// Write a profile document, creating the directory if needed
    pub fn write(&self, id: &str, profile: &Profile) -> Result<(), ProfileError> {
        let path = self.path_for(id)?;
        std::fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(profile)?;
        std::fs::write(&path, content)?;
        debug!("Wrote profile {} to {}", id, path.display());
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<(), ProfileError> {
        let path = self.path_for(id)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ProfileError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Ids of every `<id>.json` file in the store, sorted
    pub fn ids(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot read profile dir {}: {}", self.dir.display(), e);
                return Vec::new();
            }
        };

        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|e| e == "json").unwrap_or(false))
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
            .filter(|id| is_valid_id(id))
            .collect();
        ids.sort();
        ids
    }

    /// Summaries of every readable profile. Unparsable files are skipped.
    pub fn list(&self) -> Vec<ProfileSummary> {
        self.ids()
            .into_iter()
            .filter_map(|id| match self.read(&id) {
                Ok(profile) => Some(ProfileSummary {
                    builtin: is_builtin(&id),
                    id,
                    name: profile.name,
                    description: profile.description,
                    layout_type: profile.layout_type,
                }),
                Err(e) => {
                    warn!("Skipping profile {}: {}", id, e);
                    None
                }
            })
            .collect()
    }

    /// Id derived from `name` that no stored or builtin profile uses yet
    ///
    /// Collisions get `_1`, `_2`, ... appended.
    pub fn unique_id(&self, name: &str) -> String {
        let base = slugify(name);
        let taken = |id: &str| is_builtin(id) || self.exists(id);
        if !taken(&base) {
            return base;
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{base}_{n}");
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}
