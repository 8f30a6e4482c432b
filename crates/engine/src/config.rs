//! Database configuration via `hearth.toml`
//!
//! On first open, a default `hearth.toml` is created in the data directory.
//! To change settings, edit the file and reopen.

use serde::{Deserialize, Serialize};
use std::path::Path;

use hearth_core::{Error, Result};
use hearth_storage::{MismatchPolicy, StoreOptions, DEFAULT_STORAGE_KEY, SCHEMA_VERSION};

/// Config file name placed in the database data directory.
pub const CONFIG_FILE_NAME: &str = "hearth.toml";

/// Database configuration loaded from `hearth.toml`.
///
/// # Example
///
/// ```toml
/// storage_key = "hearth-db"
/// schema_version = "hearth-v3"
/// on_version_mismatch = "reseed"
/// auto_attach_session = false
/// seed = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HearthConfig {
    /// Key (file stem) of the persisted snapshot.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Expected snapshot version tag.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Version mismatch handling: `"reseed"` or `"refuse"`.
    #[serde(default = "default_mismatch")]
    pub on_version_mismatch: String,
    /// Attach the first seeded principal as the active session when none exists.
    #[serde(default)]
    pub auto_attach_session: bool,
    /// Populate fixture data when starting fresh.
    #[serde(default = "default_seed")]
    pub seed: bool,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

fn default_mismatch() -> String {
    "reseed".to_string()
}

fn default_seed() -> bool {
    true
}

impl Default for HearthConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            schema_version: default_schema_version(),
            on_version_mismatch: default_mismatch(),
            auto_attach_session: false,
            seed: default_seed(),
        }
    }
}

impl HearthConfig {
    /// Parse the mismatch string into a [`MismatchPolicy`].
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `"reseed"` or `"refuse"`.
    pub fn mismatch_policy(&self) -> Result<MismatchPolicy> {
        match self.on_version_mismatch.as_str() {
            "reseed" => Ok(MismatchPolicy::Reseed),
            "refuse" => Ok(MismatchPolicy::Refuse),
            other => Err(Error::config(format!(
                "Invalid on_version_mismatch '{}' in hearth.toml. Expected \"reseed\" or \"refuse\".",
                other
            ))),
        }
    }

    /// Store options described by this config.
    pub fn store_options(&self) -> Result<StoreOptions> {
        if self.storage_key.trim().is_empty() {
            return Err(Error::config("storage_key must not be empty"));
        }
        Ok(StoreOptions {
            storage_key: self.storage_key.clone(),
            schema_version: self.schema_version.clone(),
            mismatch_policy: self.mismatch_policy()?,
            seed: self.seed,
            auto_attach_session: self.auto_attach_session,
        })
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Hearth database configuration
#
# Snapshot file stem inside the data directory
storage_key = "hearth-db"

# Version tag expected in the stored snapshot
schema_version = "hearth-v3"

# What to do when the stored snapshot has another version tag:
#   "reseed" = log what is discarded, then start from fresh seed data
#   "refuse" = fail to open until the snapshot is migrated
on_version_mismatch = "reseed"

# Treat the first seeded user as signed in when no session exists.
# Development convenience only.
auto_attach_session = false

# Populate demo forum/journal data on a fresh database
seed = true
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: HearthConfig = toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        // Validate eagerly
        config.store_options()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
