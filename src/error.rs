//! Error types for configuration loading and persistence.
//!
//! Matching and extraction never fail: a page that no engine claims, or a query
//! that comes out blank, is reported as `None` rather than as an error.

use std::path::PathBuf;

/// Failures of the key-value store that holds the engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a JSON object of strings.
    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory store's lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Errors raised while loading, validating or saving engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The blob is not valid JSON or does not have the `{engines: [...]}` shape.
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The blob parsed but an engine descriptor is unusable.
    #[error("invalid engine \"{engine}\": {reason}")]
    Invalid { engine: String, reason: String },

    /// Writing to the store failed.
    #[error("failed to persist configuration: {0}")]
    Store(#[from] StoreError),
}

impl ConfigError {
    pub(crate) fn invalid(engine: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            engine: engine.into(),
            reason: reason.into(),
        }
    }
}
