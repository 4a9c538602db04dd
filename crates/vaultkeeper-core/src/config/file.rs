//! Optional settings file (`<config dir>/vaultkeeper/config.toml`)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};
use crate::reconcile::structure::FolderRule;

const CONFIG_DIR: &str = "vaultkeeper";
const CONFIG_FILE: &str = "config.toml";
pub(crate) const CONFIG_DIR_ENV_VAR: &str = "VAULTKEEPER_CONFIG_DIR";

/// Settings file contents; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_notes_folder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_folder: Option<String>,

    /// Timeout for oracle requests, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub structure: StructureSection,
}

/// `[structure]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructureSection {
    /// Ordered `[[structure.folders]]` rules; replaces the built-in rules when present
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub folders: Vec<FolderRule>,
}

impl ConfigFile {
    /// Location of the settings file, honoring `VAULTKEEPER_CONFIG_DIR`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if let Ok(env_dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            PathBuf::from(env_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| VaultError::InvalidConfig {
                    reason: "unable to determine config directory".to_string(),
                })?
                .join(CONFIG_DIR)
        };

        Ok(config_dir.join(CONFIG_FILE))
    }

    /// Load the settings file; a missing file is an empty configuration
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| VaultError::InvalidConfig {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| VaultError::InvalidConfig {
            reason: format!("failed to parse {}: {}", path.display(), e),
        })
    }
}
