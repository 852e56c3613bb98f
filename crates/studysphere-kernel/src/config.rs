//! Resources configuration.
//!
//! Loaded from `~/.config/studysphere/resources.ron`. Every field has a
//! default, so a partial file only overrides what it names:
//!
//! ```ron
//! (
//!     bucket: "resources",
//!     zones: (admin: "admin", teachers: "teachers"),
//!     upload: (max_bytes: 10485760),
//!     signed_url_ttl_secs: 3600,
//! )
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::upload::UploadPolicy;
use crate::zones::ZoneTable;

/// Default signed URL lifetime: one hour.
pub const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    /// Bucket holding course resources.
    pub bucket: String,
    pub zones: ZoneTable,
    pub upload: UploadPolicy,
    /// Lifetime of download and preview links.
    pub signed_url_ttl_secs: u64,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            bucket: "resources".into(),
            zones: ZoneTable::default(),
            upload: UploadPolicy::default(),
            signed_url_ttl_secs: DEFAULT_SIGNED_URL_TTL_SECS,
        }
    }
}

impl ResourcesConfig {
    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_secs)
    }

    /// Parse from RON text.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Read and parse a RON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }
}

/// Error type for config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Get the config file path (~/.config/studysphere/resources.ron).
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("studysphere").join("resources.ron"))
}

/// Load config from `path`, or the user's config file when `None`.
///
/// If the file doesn't exist or has errors, returns defaults and logs why.
pub fn load_config(path: Option<&Path>) -> ResourcesConfig {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_file_path() {
            Some(p) => p,
            None => {
                tracing::info!("No config directory available, using default resources config");
                return ResourcesConfig::default();
            }
        },
    };

    if !path.exists() {
        tracing::info!("Config file not found at {:?}, using defaults", path);
        return ResourcesConfig::default();
    }

    match ResourcesConfig::load_from_file(&path) {
        Ok(config) => {
            tracing::info!("Loaded resources config from {:?}", path);
            config
        }
        Err(e) => {
            tracing::warn!("Failed to load resources config from {:?}: {}", path, e);
            tracing::warn!("Falling back to default resources config");
            ResourcesConfig::default()
        }
    }
}
