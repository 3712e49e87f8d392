//! Updater Configuration Module
//! Handles loading updater.config.json from the server root

use crate::engine::updater::hasher::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "updater.config.json";

const DEFAULT_UPDATE_URL: &str = "http://catboy5.bplaced.net/updater/update.php";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config format: {0}")]
    ParseError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdaterConfig {
    #[serde(default = "default_update_url")]
    pub update_url: String,
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,
    /// Holds the dependency manager and launcher archives
    #[serde(default = "default_bootstrap_dir")]
    pub bootstrap_dir: PathBuf,
    /// Holds the native plugin module
    #[serde(default = "default_plugins_dir")]
    pub plugins_dir: PathBuf,
    /// Created after a run that replaced at least one file
    #[serde(default = "default_marker_file")]
    pub marker_file: PathBuf,
}

fn default_update_url() -> String {
    DEFAULT_UPDATE_URL.to_string()
}

fn default_bootstrap_dir() -> PathBuf {
    Path::new("shoebill").join("bootstrap")
}

fn default_plugins_dir() -> PathBuf {
    PathBuf::from("plugins")
}

fn default_marker_file() -> PathBuf {
    Path::new("shoebill").join("ONLINE_MODE_ONCE")
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            update_url: default_update_url(),
            hash_algorithm: HashAlgorithm::default(),
            bootstrap_dir: default_bootstrap_dir(),
            plugins_dir: default_plugins_dir(),
            marker_file: default_marker_file(),
        }
    }
}

impl UpdaterConfig {
    /// Load the config from the server root, falling back to defaults when absent
    pub fn load(server_root: &Path) -> Result<Self, ConfigError> {
        let config_path = server_root.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&config_path).map_err(|source| {
            ConfigError::ReadError {
                path: config_path.clone(),
                source,
            }
        })?;
        let config: UpdaterConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}
