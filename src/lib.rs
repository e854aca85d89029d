//! Metasearch-RS: a cross-engine navigation bar for search result pages
//!
//! Given the URL of a results page, detects which configured engine produced it,
//! extracts the user's query and builds links that rerun the same query on every
//! other configured engine.

pub mod bar;
pub mod config;
pub mod engines;
pub mod error;
pub mod userscript;
pub mod util;
pub mod web;

pub use bar::{resolve, BarLink, Device, Resolution};
pub use config::{ConfigData, ConfigManager, Settings};
pub use engines::{EngineDescriptor, EngineRegistry, QueryParams};
pub use error::{ConfigError, StoreError};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Token in URL templates replaced by the encoded query
pub const PLACEHOLDER: &str = "%s";

/// Default minimum interval between throttled handler invocations in milliseconds
pub const DEFAULT_THROTTLE_MS: u64 = 100;
