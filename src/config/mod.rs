//! Configuration stored in `~/.config/page-settings/config.toml`

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SettingsError};

const CONFIG_DIR: &str = "page-settings";
const MAIN_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// Persistence API endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            token: None,
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
    app_config: AppConfig,
}

impl ConfigManager {
    /// Load from the platform config directory
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self::with_path(config_dir.join(MAIN_CONFIG_FILE)))
    }

    /// Load from an explicit file (CLI `--config`, tests)
    pub fn with_path(config_path: PathBuf) -> Self {
        let app_config = Self::load_toml_file(&config_path).unwrap_or_default();
        Self {
            config_path,
            app_config,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn app_config(&self) -> &AppConfig {
        &self.app_config
    }

    pub fn app_config_mut(&mut self) -> &mut AppConfig {
        &mut self.app_config
    }

    pub fn reload(&mut self) {
        self.app_config = Self::load_toml_file(&self.config_path).unwrap_or_default();
    }

    fn get_config_dir() -> Result<PathBuf> {
        BaseDirs::new()
            .map(|dirs| dirs.config_dir().join(CONFIG_DIR))
            .ok_or_else(|| {
                SettingsError::Config("Could not determine config directory".to_string())
            })
    }

    fn load_toml_file<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> Option<T> {
        if !path.exists() {
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write the current config, creating the directory if needed
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    SettingsError::Config(format!("Failed to create config dir: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(&self.app_config)
            .map_err(|e| SettingsError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&self.config_path, content)
            .map_err(|e| SettingsError::Config(format!("Failed to write config: {}", e)))?;

        tracing::info!("Saved config to {}", self.config_path.display());
        Ok(())
    }

    /// Write a default config unless one already exists. Returns whether a file was written.
    pub fn write_default(&self) -> Result<bool> {
        if self.config_path.exists() {
            return Ok(false);
        }
        Self {
            config_path: self.config_path.clone(),
            app_config: AppConfig::default(),
        }
        .save()?;
        Ok(true)
    }
}
