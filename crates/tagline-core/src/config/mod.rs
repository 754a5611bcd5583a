//! Configuration management for tagline.
//!
//! Configuration is loaded from a platform config directory with sensible
//! defaults. The `[caption]` section doubles as the form's memory: it holds
//! the prior value of every caption option, and per-run CLI flags override it.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for tagline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External tagger installation settings
    pub tagger: TaggerConfig,

    /// Persisted caption option defaults
    pub caption: CaptionDefaults,

    /// Execution settings
    pub execution: ExecutionConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.tagline.tagline/config.toml
    /// - Linux: ~/.config/tagline/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\tagline\config\config.toml
    ///
    /// Falls back to ~/.tagline/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "tagline", "tagline")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".tagline").join("config.toml")
            })
    }

    /// Get the resolved tagger checkout root (with ~ expansion).
    pub fn script_dir(&self) -> PathBuf {
        let path_str = self.tagger.script_dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Get the path of the tagger script inside the checkout.
    pub fn script_path(&self) -> PathBuf {
        self.script_dir()
            .join("sd-scripts")
            .join("finetune")
            .join("tag_images_by_wd14_tagger.py")
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Validation(e.to_string()))
    }
}
