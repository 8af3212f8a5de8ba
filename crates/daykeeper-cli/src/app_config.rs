//! TOML-based application configuration for the CLI adapter.
//!
//! Stores the local identity presented to the core service and the
//! optional webhook journal entries are delivered to. Stored at
//! `~/.config/daykeeper/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use daykeeper_core::store::data_dir;

fn default_user_id() -> u64 {
    1
}

fn default_user_name() -> String {
    whoami()
}

fn whoami() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "you".to_string())
}

/// CLI adapter configuration.
///
/// Serialized to/from TOML at `~/.config/daykeeper/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Identity used for all stored documents. Single-user by default.
    #[serde(default = "default_user_id")]
    pub user_id: u64,
    /// Display name used in generated journal entries.
    #[serde(default = "default_user_name")]
    pub user_name: String,
    /// Webhook journal entries are posted to. When unset, entries are
    /// printed to the console instead.
    #[serde(default)]
    pub journal_webhook_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            user_name: default_user_name(),
            journal_webhook_url: None,
        }
    }
}

impl AppConfig {
    /// Load the config, writing a default file on first run.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("config.toml");
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }
}
