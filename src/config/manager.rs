//! Loading and saving the engine configuration blob
//!
//! The blob is `{"engines": [...]}` stored as JSON under a single key. Anything that
//! keeps it from being used (absent, unreadable, malformed, invalid) falls back to the
//! built-in engine list. Failed writes are reported to the caller.

use super::defaults::default_engines;
use super::settings::CONFIG_KEY;
use super::store::KeyValueStore;
use crate::engines::{validate_engines, EngineDescriptor};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// The persisted engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigData {
    pub engines: Vec<EngineDescriptor>,
}

impl Default for ConfigData {
    fn default() -> Self {
        Self {
            engines: default_engines(),
        }
    }
}

impl ConfigData {
    /// Parse and validate a configuration blob
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: ConfigData = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_engines(&self.engines)
    }
}

/// Message posted back by the settings page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SettingsMessage {
    SaveConfiguration { engines: Vec<EngineDescriptor> },
    ResetConfiguration,
}

/// Reads and writes [`ConfigData`] through a [`KeyValueStore`]
#[derive(Clone)]
pub struct ConfigManager {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl ConfigManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, CONFIG_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Stored configuration, or the built-in defaults when none is usable
    pub fn load_configuration(&self) -> ConfigData {
        match self.store.get(&self.key) {
            Ok(Some(raw)) => match ConfigData::from_json(&raw) {
                Ok(config) => return config,
                Err(e) => warn!("Failed to load configuration, using defaults: {}", e),
            },
            Ok(None) => {}
            Err(e) => warn!("Failed to read configuration, using defaults: {}", e),
        }
        ConfigData::default()
    }

    /// Validate and persist a configuration
    pub fn save_configuration(&self, config: &ConfigData) -> Result<(), ConfigError> {
        config.validate()?;
        self.write(config)?;
        info!("Saved configuration with {} engines", config.engines.len());
        Ok(())
    }

    /// Overwrite the stored configuration with the built-in defaults
    pub fn reset_configuration(&self) -> Result<(), ConfigError> {
        self.write(&ConfigData::default())?;
        info!("Reset configuration to defaults");
        Ok(())
    }

    /// Whether anything is stored under the configuration key
    pub fn has_custom_configuration(&self) -> bool {
        match self.store.get(&self.key) {
            Ok(saved) => saved.is_some(),
            Err(e) => {
                warn!("Failed to check for custom configuration: {}", e);
                false
            }
        }
    }

    /// Apply a message from the settings page
    pub fn apply(&self, message: SettingsMessage) -> Result<ConfigData, ConfigError> {
        match message {
            SettingsMessage::SaveConfiguration { engines } => {
                let config = ConfigData { engines };
                self.save_configuration(&config)?;
                Ok(config)
            }
            SettingsMessage::ResetConfiguration => {
                self.reset_configuration()?;
                Ok(ConfigData::default())
            }
        }
    }

    fn write(&self, config: &ConfigData) -> Result<(), ConfigError> {
        let raw = serde_json::to_string(config)?;
        self.store.set(&self.key, &raw).map_err(|e| {
            error!("Failed to save configuration: {}", e);
            ConfigError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::{FileStore, MemoryStore};
    use crate::error::StoreError;
    use crate::util::HexColor;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    fn manager() -> (Arc<MemoryStore>, ConfigManager) {
        let store = Arc::new(MemoryStore::new());
        let manager = ConfigManager::new(store.clone());
        (store, manager)
    }

    fn custom() -> ConfigData {
        ConfigData {
            engines: vec![EngineDescriptor::new(
                "Kagi",
                "https://kagi.com/search?q=%s",
                HexColor::rgb(0xFF, 0xB3, 0x19),
            )],
        }
    }

    #[test]
    fn test_empty_store_uses_defaults() {
        let (_, manager) = manager();
        assert_eq!(manager.load_configuration(), ConfigData::default());
        assert!(!manager.has_custom_configuration());
    }

    #[test]
    fn test_malformed_blob_uses_defaults() {
        let (store, manager) = manager();
        store.set(CONFIG_KEY, "not json").unwrap();
        assert_eq!(manager.load_configuration(), ConfigData::default());
        assert!(manager.has_custom_configuration());
    }

    #[test]
    fn test_wrong_shape_uses_defaults() {
        let (store, manager) = manager();
        store.set(CONFIG_KEY, r#"{"engines": {"title": "x"}}"#).unwrap();
        assert_eq!(manager.load_configuration(), ConfigData::default());
    }

    #[test]
    fn test_invalid_engine_uses_defaults() {
        let (store, manager) = manager();
        store
            .set(
                CONFIG_KEY,
                r##"{"engines": [{"title": "No placeholder", "url": "https://x.test/", "color": "#000000"}]}"##,
            )
            .unwrap();
        assert_eq!(manager.load_configuration(), ConfigData::default());
    }

    #[test]
    fn test_save_then_load() {
        let (_, manager) = manager();
        manager.save_configuration(&custom()).unwrap();
        assert_eq!(manager.load_configuration(), custom());
    }

    #[test]
    fn test_save_rejects_invalid_configuration() {
        let (store, manager) = manager();
        let mut config = custom();
        config.engines[0].url = "https://kagi.com/".to_string();
        assert!(matches!(
            manager.save_configuration(&config),
            Err(ConfigError::Invalid { .. })
        ));
        assert_eq!(store.get(CONFIG_KEY).unwrap(), None);
    }

    #[test]
    fn test_reset_recovers_corrupt_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{ truncated").unwrap();
        let manager = ConfigManager::new(Arc::new(FileStore::new(&path)));

        assert_eq!(manager.load_configuration(), ConfigData::default());
        manager.reset_configuration().unwrap();
        assert!(manager.has_custom_configuration());

        manager.save_configuration(&custom()).unwrap();
        assert_eq!(manager.load_configuration(), custom());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let manager = ConfigManager::new(Arc::new(ReadOnlyStore));
        assert!(matches!(
            manager.save_configuration(&custom()),
            Err(ConfigError::Store(_))
        ));
        assert!(manager.reset_configuration().is_err());
    }

    #[test]
    fn test_settings_messages() {
        let (_, manager) = manager();

        let save: SettingsMessage = serde_json::from_str(
            r##"{"type": "saveConfiguration", "engines": [{"title": "Kagi", "url": "https://kagi.com/search?q=%s", "color": "#FFB319"}]}"##,
        )
        .unwrap();
        assert_eq!(manager.apply(save).unwrap(), custom());
        assert_eq!(manager.load_configuration(), custom());

        let reset: SettingsMessage = serde_json::from_str(r#"{"type": "resetConfiguration"}"#).unwrap();
        assert_eq!(reset, SettingsMessage::ResetConfiguration);
        manager.apply(reset).unwrap();
        assert_eq!(manager.load_configuration(), ConfigData::default());
    }
}
