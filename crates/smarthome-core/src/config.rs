//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! which backend to talk to, how long to wait for it, and where the session
//! tokens are kept.
//!
//! Configuration is stored at `~/.config/smarthome/config.json`.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::DEFAULT_TIMEOUT_SECS;
use crate::auth::{FileStorage, KeyringStorage, TokenStore};

/// Application name used for config directory paths
pub const APP_NAME: &str = "smarthome";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding `base_url`
pub const BASE_URL_ENV: &str = "SMARTHOME_BASE_URL";

/// Environment variable overriding `token_storage`
pub const TOKEN_STORAGE_ENV: &str = "SMARTHOME_TOKEN_STORAGE";

/// Backend used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Where the session tokens live between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorageKind {
    /// `session.json` next to the config file
    #[default]
    File,
    /// OS keychain
    Keyring,
    /// Not persisted
    Memory,
}

impl FromStr for TokenStorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(TokenStorageKind::File),
            "keyring" => Ok(TokenStorageKind::Keyring),
            "memory" => Ok(TokenStorageKind::Memory),
            other => Err(anyhow!(
                "Unknown token storage '{}' (expected file, keyring or memory)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub token_storage: TokenStorageKind,
    pub last_username: Option<String>,
    /// Also write logs to this file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_storage: TokenStorageKind::default(),
            last_username: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Record the last signed-in username without persisting any
    /// environment or command-line overrides.
    pub fn remember_username(username: &str) -> Result<()> {
        let path = Self::config_path()?;
        let mut stored = Self::load_from(&path)?;
        stored.last_username = Some(username.to_string());
        stored.save_to(&path)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = var(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            debug!(base_url = %url, "Backend URL overridden from environment");
            self.base_url = url;
        }
        if let Some(kind) = var(TOKEN_STORAGE_ENV).filter(|v| !v.trim().is_empty()) {
            self.token_storage = kind
                .trim()
                .parse::<TokenStorageKind>()
                .with_context(|| format!("Invalid {}", TOKEN_STORAGE_ENV))?;
            debug!(token_storage = ?self.token_storage, "Token storage overridden from environment");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Open the token store this config selects.
    pub fn token_store(&self) -> Result<TokenStore> {
        Ok(match self.token_storage {
            TokenStorageKind::File => TokenStore::new(FileStorage::new(Self::config_dir()?)),
            TokenStorageKind::Keyring => TokenStore::new(KeyringStorage::new()),
            TokenStorageKind::Memory => TokenStore::in_memory(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.token_storage, TokenStorageKind::File);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            base_url: "http://hub.local:8080".to_string(),
            token_storage: TokenStorageKind::Keyring,
            last_username: Some("alice".to_string()),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.base_url, "http://hub.local:8080");
        assert_eq!(loaded.token_storage, TokenStorageKind::Keyring);
        assert_eq!(loaded.last_username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"token_storage": "memory"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.token_storage, TokenStorageKind::Memory);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(|name| match name {
                BASE_URL_ENV => Some("http://hub.local:9000".to_string()),
                TOKEN_STORAGE_ENV => Some("Memory".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.base_url, "http://hub.local:9000");
        assert_eq!(config.token_storage, TokenStorageKind::Memory);

        let mut config = Config::default();
        config.apply_env(|_| Some(" ".to_string())).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.token_storage, TokenStorageKind::File);

        let err = Config::default()
            .apply_env(|name| (name == TOKEN_STORAGE_ENV).then(|| "vault".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(TOKEN_STORAGE_ENV));
    }

    #[test]
    fn test_token_storage_kind_parse() {
        assert_eq!("Keyring".parse::<TokenStorageKind>().unwrap(), TokenStorageKind::Keyring);
        assert!("vault".parse::<TokenStorageKind>().is_err());
    }

    #[test]
    fn test_memory_token_store_from_config() {
        let config = Config {
            token_storage: TokenStorageKind::Memory,
            ..Config::default()
        };
        let store = config.token_store().unwrap();
        assert!(!store.is_authenticated());
    }
}
