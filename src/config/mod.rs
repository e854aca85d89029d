//! Configuration module for Metasearch-RS
//!
//! Service settings come from YAML files and environment variables; the engine list
//! is a JSON blob kept in a key-value store.

mod defaults;
mod manager;
mod settings;
mod store;

pub use defaults::default_engines;
pub use manager::{ConfigData, ConfigManager, SettingsMessage};
pub use settings::*;
pub use store::{FileStore, KeyValueStore, MemoryStore};
