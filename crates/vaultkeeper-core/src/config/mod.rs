//! Runtime configuration for vaultkeeper
//!
//! Precedence, lowest first: built-in defaults, the settings file,
//! `.env` in the working directory, the process environment.

mod file;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, VaultError};
use crate::reconcile::structure::FolderRules;
use crate::store::VaultLayout;
pub use file::{ConfigFile, StructureSection};

pub const VAULT_PATH_VAR: &str = "OBSIDIAN_VAULT_PATH";
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const MODEL_VAR: &str = "VAULTKEEPER_MODEL";
pub const MAX_ROUNDS_VAR: &str = "VAULTKEEPER_MAX_ROUNDS";
pub const LATITUDE_VAR: &str = "VAULTKEEPER_LATITUDE";
pub const LONGITUDE_VAR: &str = "VAULTKEEPER_LONGITUDE";

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_ROUNDS: u32 = 4;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Vault root directory (must exist)
    pub vault_path: PathBuf,
    /// Oracle credentials; only required by commands that call the oracle
    pub api_key: Option<String>,
    /// Oracle model name
    pub model: String,
    /// Maximum user turns per guided conversation
    pub max_rounds: u32,
    /// Forecast location for day planning
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Well-known vault folders
    pub layout: VaultLayout,
    /// Ordered keyword rules for the structure classifier
    pub folder_rules: FolderRules,
    /// Oracle request timeout
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load from `.env`, the process environment, and the settings file
    pub fn load() -> Result<Self> {
        if let Some(e) = dotenv_problem(dotenvy::dotenv()) {
            tracing::warn!(error = %e, "ignoring unreadable .env file");
        }
        let file = ConfigFile::load(&ConfigFile::default_path()?)?;
        Self::resolve(|key| std::env::var(key).ok(), file)
    }

    /// Merge an environment lookup over a settings file
    pub fn resolve(env: impl Fn(&str) -> Option<String>, file: ConfigFile) -> Result<Self> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let vault_path = env(VAULT_PATH_VAR)
            .map(PathBuf::from)
            .or(file.vault_path)
            .ok_or_else(|| VaultError::MissingSetting {
                key: VAULT_PATH_VAR.to_string(),
            })?;
        if !vault_path.is_dir() {
            return Err(VaultError::VaultNotFound { path: vault_path });
        }

        let max_rounds = match env(MAX_ROUNDS_VAR) {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| VaultError::InvalidConfig {
                reason: format!("{} must be a positive integer, got {:?}", MAX_ROUNDS_VAR, raw),
            })?,
            None => file.max_rounds.unwrap_or(DEFAULT_MAX_ROUNDS),
        };
        if max_rounds == 0 {
            return Err(VaultError::InvalidConfig {
                reason: "max_rounds must be at least 1".to_string(),
            });
        }

        let latitude = match parse_coordinate(env(LATITUDE_VAR), LATITUDE_VAR)? {
            Some(value) => Some(value),
            None => file.latitude,
        };
        let latitude = check_coordinate(latitude, "latitude", 90.0)?;
        let longitude = match parse_coordinate(env(LONGITUDE_VAR), LONGITUDE_VAR)? {
            Some(value) => Some(value),
            None => file.longitude,
        };
        let longitude = check_coordinate(longitude, "longitude", 180.0)?;

        let defaults = VaultLayout::default();
        let layout = VaultLayout {
            daily_notes_folder: file
                .daily_notes_folder
                .unwrap_or(defaults.daily_notes_folder),
            journal_folder: file.journal_folder.unwrap_or(defaults.journal_folder),
        };

        let folder_rules = if file.structure.folders.is_empty() {
            FolderRules::default()
        } else {
            FolderRules::new(file.structure.folders)
        };

        Ok(Config {
            vault_path,
            api_key: env(API_KEY_VAR),
            model: env(MODEL_VAR)
                .or(file.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_rounds,
            latitude,
            longitude,
            layout,
            folder_rules,
            request_timeout_secs: file
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }

    /// The API key, or a configuration error naming the missing variable
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| VaultError::MissingSetting {
                key: API_KEY_VAR.to_string(),
            })
    }

    /// Forecast coordinates when both are configured
    pub fn location(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// API key with everything but the last four characters hidden
    pub fn masked_api_key(&self) -> String {
        match self.api_key.as_deref() {
            None => "(not set)".to_string(),
            Some(key) => {
                let chars: Vec<char> = key.chars().collect();
                let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
                format!("********...{}", tail)
            }
        }
    }
}

fn parse_coordinate(raw: Option<String>, var: &str) -> Result<Option<f64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value: f64 = raw.trim().parse().map_err(|_| VaultError::InvalidConfig {
        reason: format!("{} must be a number, got {:?}", var, raw),
    })?;
    Ok(Some(value))
}

/// A `.env` load error worth reporting; a missing file is not one
fn dotenv_problem(
    loaded: std::result::Result<PathBuf, dotenvy::Error>,
) -> Option<dotenvy::Error> {
    loaded.err().filter(|e| !e.not_found())
}

/// Range check applied to coordinates from either source
fn check_coordinate(value: Option<f64>, name: &str, bound: f64) -> Result<Option<f64>> {
    match value {
        Some(v) if !(-bound..=bound).contains(&v) => Err(VaultError::InvalidConfig {
            reason: format!("{} out of range: {}", name, v),
        }),
        _ => Ok(value),
    }
}

/// Insert or replace `KEY=value` in a `.env` file, keeping other lines
pub fn set_env_value(env_path: &Path, key: &str, value: &str) -> Result<()> {
    if key.is_empty() || key.contains('=') || key.chars().any(char::is_whitespace) {
        return Err(VaultError::invalid_value("config key", key));
    }

    let mut lines: Vec<String> = Vec::new();
    let mut found = false;
    let prefix = format!("{}=", key);

    if env_path.exists() {
        let existing = fs::read_to_string(env_path)
            .map_err(|e| VaultError::io_operation("read", env_path.display(), e))?;
        for line in existing.lines() {
            if line.starts_with(&prefix) {
                lines.push(format!("{}{}", prefix, value));
                found = true;
            } else {
                lines.push(line.to_string());
            }
        }
    }

    if !found {
        lines.push(format!("{}{}", prefix, value));
    }

    fs::write(env_path, lines.join("\n") + "\n")
        .map_err(|e| VaultError::io_operation("write", env_path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_resolve_defaults() {
        let dir = tempdir().unwrap();
        let vault = dir.path().to_string_lossy().to_string();
        let config =
            Config::resolve(env_of(&[(VAULT_PATH_VAR, &vault)]), ConfigFile::default()).unwrap();

        assert_eq!(config.vault_path, dir.path());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_rounds, DEFAULT_MAX_ROUNDS);
        assert!(config.api_key.is_none());
        assert!(config.location().is_none());
        assert_eq!(config.layout, VaultLayout::default());
        assert!(matches!(
            config.require_api_key(),
            Err(VaultError::MissingSetting { .. })
        ));
    }

    #[test]
    fn test_missing_vault_path() {
        let err = Config::resolve(env_of(&[]), ConfigFile::default()).unwrap_err();
        assert!(matches!(err, VaultError::MissingSetting { ref key } if key == VAULT_PATH_VAR));
    }

    #[test]
    fn test_vault_path_must_exist() {
        let err = Config::resolve(
            env_of(&[(VAULT_PATH_VAR, "/definitely/not/a/vault")]),
            ConfigFile::default(),
        )
        .unwrap_err();
        assert!(matches!(err, VaultError::VaultNotFound { .. }));
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempdir().unwrap();
        let vault = dir.path().to_string_lossy().to_string();
        let file = ConfigFile {
            model: Some("from-file".to_string()),
            max_rounds: Some(8),
            latitude: Some(1.0),
            longitude: Some(2.0),
            journal_folder: Some("Reflections".to_string()),
            ..Default::default()
        };
        let config = Config::resolve(
            env_of(&[
                (VAULT_PATH_VAR, &vault),
                (MODEL_VAR, "from-env"),
                (LATITUDE_VAR, "41.5"),
                (API_KEY_VAR, "sk-test-abcd1234"),
            ]),
            file,
        )
        .unwrap();

        assert_eq!(config.model, "from-env");
        assert_eq!(config.max_rounds, 8);
        assert_eq!(config.location(), Some((41.5, 2.0)));
        assert_eq!(config.layout.journal_folder, "Reflections");
        assert_eq!(config.require_api_key().unwrap(), "sk-test-abcd1234");
        assert_eq!(config.masked_api_key(), "********...1234");
    }

    #[test]
    fn test_invalid_max_rounds() {
        let dir = tempdir().unwrap();
        let vault = dir.path().to_string_lossy().to_string();
        for bad in ["zero", "0", "-1"] {
            let err = Config::resolve(
                env_of(&[(VAULT_PATH_VAR, &vault), (MAX_ROUNDS_VAR, bad)]),
                ConfigFile::default(),
            )
            .unwrap_err();
            assert!(matches!(err, VaultError::InvalidConfig { .. }), "{}", bad);
        }
    }

    #[test]
    fn test_coordinates_are_range_checked_from_both_sources() {
        let dir = tempdir().unwrap();
        let vault = dir.path().to_string_lossy().to_string();

        let file = ConfigFile {
            latitude: Some(123.0),
            longitude: Some(2.0),
            ..Default::default()
        };
        let err = Config::resolve(env_of(&[(VAULT_PATH_VAR, &vault)]), file).unwrap_err();
        assert!(matches!(err, VaultError::InvalidConfig { ref reason } if reason.contains("latitude")));

        let file = ConfigFile {
            longitude: Some(-200.0),
            ..Default::default()
        };
        let err = Config::resolve(
            env_of(&[(VAULT_PATH_VAR, &vault), (LATITUDE_VAR, "10")]),
            file,
        )
        .unwrap_err();
        assert!(matches!(err, VaultError::InvalidConfig { ref reason } if reason.contains("longitude")));

        let err = Config::resolve(
            env_of(&[(VAULT_PATH_VAR, &vault), (LONGITUDE_VAR, "181")]),
            ConfigFile::default(),
        )
        .unwrap_err();
        assert!(matches!(err, VaultError::InvalidConfig { .. }));

        // An in-range environment value replaces an out-of-range file value
        let file = ConfigFile {
            latitude: Some(95.0),
            ..Default::default()
        };
        let config = Config::resolve(
            env_of(&[(VAULT_PATH_VAR, &vault), (LATITUDE_VAR, "45")]),
            file,
        )
        .unwrap();
        assert_eq!(config.latitude, Some(45.0));
    }

    #[test]
    fn test_dotenv_problem_ignores_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "NOT VALID LINE\n").unwrap();

        let malformed = dotenvy::from_path(&path).map(|()| path.clone());
        assert!(dotenv_problem(malformed).is_some());

        let missing = dotenvy::from_path(dir.path().join("missing.env")).map(|()| path.clone());
        assert!(dotenv_problem(missing).is_none());
        assert!(dotenv_problem(Ok(path)).is_none());
    }

    #[test]
    fn test_set_env_value_upserts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "# comment\nOBSIDIAN_VAULT_PATH=/old\nOTHER=1\n").unwrap();

        set_env_value(&path, "OBSIDIAN_VAULT_PATH", "/new").unwrap();
        set_env_value(&path, "VAULTKEEPER_MODEL", "m").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# comment\nOBSIDIAN_VAULT_PATH=/new\nOTHER=1\nVAULTKEEPER_MODEL=m\n"
        );
        assert!(set_env_value(&path, "BAD KEY", "x").is_err());
    }
}
