//! Application state shared across handlers

use crate::config::{ConfigManager, FileStore, KeyValueStore, Settings};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Engine configuration store
    pub config: ConfigManager,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create application state backed by the configured file store
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let store = Arc::new(FileStore::new(settings.storage.resolved_path()));
        Self::with_store(settings, store)
    }

    /// Create application state over any store
    pub fn with_store(settings: Settings, store: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let config = ConfigManager::with_key(store, settings.storage.key.clone());
        let templates = Arc::new(super::Templates::new()?);

        Ok(Self {
            settings: Arc::new(settings),
            config,
            templates,
        })
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
