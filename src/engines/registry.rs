//! Ordered registry of configured engines

use super::descriptor::EngineDescriptor;
use super::matcher::match_engine;
use super::rules::QueryParams;
use crate::error::ConfigError;
use std::collections::HashMap;
use tracing::warn;
use url::Url;

/// Engines in registration order, as seen by one client
#[derive(Debug, Clone, Default)]
pub struct EngineRegistry {
    engines: Vec<EngineDescriptor>,
}

impl EngineRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry, merging mobile overrides when the client is a touch device
    pub fn from_engines(engines: &[EngineDescriptor], touch: bool) -> Self {
        let engines = engines
            .iter()
            .map(|engine| {
                if touch {
                    engine.for_touch()
                } else {
                    engine.clone()
                }
            })
            .collect();
        Self { engines }
    }

    /// Register an engine after all existing ones
    pub fn register(&mut self, engine: EngineDescriptor) {
        self.engines.push(engine);
    }

    pub fn get(&self, index: usize) -> Option<&EngineDescriptor> {
        self.engines.get(index)
    }

    pub fn engines(&self) -> &[EngineDescriptor] {
        &self.engines
    }

    /// First enabled engine whose shortcut is `key`
    pub fn get_by_shortcut(&self, key: char) -> Option<&EngineDescriptor> {
        let key = key.to_lowercase().next()?;
        self.enabled().find(|engine| engine.shortcut() == Some(key))
    }

    pub fn enabled(&self) -> impl Iterator<Item = &EngineDescriptor> {
        self.engines.iter().filter(|engine| !engine.disabled)
    }

    pub fn names(&self) -> Vec<&str> {
        self.engines.iter().map(|engine| engine.title.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Index of the engine that produced `url`
    pub fn match_url(&self, url: &Url) -> Option<usize> {
        let params = QueryParams::from_url(url);
        match_engine(url, &params, &self.engines)
    }

    /// Indices of enabled engines other than `active`, highest weight first.
    ///
    /// The sort is stable, so equal weights keep registration order.
    pub fn display_order(&self, active: Option<usize>) -> Vec<usize> {
        let mut order: Vec<usize> = self
            .engines
            .iter()
            .enumerate()
            .filter(|(index, engine)| !engine.disabled && Some(*index) != active)
            .map(|(index, _)| index)
            .collect();
        order.sort_by(|a, b| self.engines[*b].weight.total_cmp(&self.engines[*a].weight));
        order
    }

    /// Validate every engine; engines bound to the same host are reported but allowed
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_engines(&self.engines)
    }
}

/// Validate a list of engine descriptors in registration order
pub fn validate_engines(engines: &[EngineDescriptor]) -> Result<(), ConfigError> {
    let mut hosts: HashMap<String, &str> = HashMap::new();
    for engine in engines {
        engine.validate()?;

        if engine.disabled || engine.matches.is_some() {
            continue;
        }
        if let Some(host) = engine.template_host() {
            if let Some(previous) = hosts.insert(host.clone(), engine.title.as_str()) {
                warn!(
                    "Engines {} and {} both match host {}; {} takes precedence",
                    previous, engine.title, host, engine.title
                );
            }
        }
    }
    Ok(())
}
