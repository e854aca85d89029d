//! Settings structures for the Metasearch-RS service

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Key under which the engine configuration blob is stored
pub const CONFIG_KEY: &str = "metasearch-engines";

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub ui: UiSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (METASEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("METASEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("METASEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("METASEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("METASEARCH_STORE_PATH") {
            self.storage.path = Some(PathBuf::from(val));
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Name shown on the settings page
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "MetaSearch".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8899,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Where the engine configuration blob lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Storage file; defaults to `<config dir>/metasearch-rs/storage.json`
    pub path: Option<PathBuf>,
    /// Key of the configuration blob inside the store
    pub key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: None,
            key: CONFIG_KEY.to_string(),
        }
    }
}

impl StorageSettings {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .map(|dir| dir.join("metasearch-rs").join("storage.json"))
                .unwrap_or_else(|| PathBuf::from("metasearch-storage.json"))
        })
    }
}

/// Bar presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Brand colors darker than this get an inverted icon in dark mode
    pub dark_icon_threshold: f64,
    /// Minimum milliseconds between scroll or wheel handler runs
    pub throttle_ms: u64,
    /// Bottom offset in pixels while hidden by scrolling
    pub hidden_offset_px: i32,
    /// Bottom offset in pixels after the close button was pressed
    pub dismissed_offset_px: i32,
    /// Horizontal pixels scrolled per unit of vertical wheel delta
    pub wheel_multiplier: f64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            dark_icon_threshold: 0.2,
            throttle_ms: crate::DEFAULT_THROTTLE_MS,
            hidden_offset_px: -48,
            dismissed_offset_px: -40,
            wheel_multiplier: 4.0,
        }
    }
}
