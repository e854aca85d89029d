//! Deciding which engine produced a page

use super::descriptor::EngineDescriptor;
use super::rules::{MatchRule, QueryParams};
use tracing::{debug, warn};
use url::Url;

/// Index of the engine that produced `url`, if any.
///
/// Engines are scanned from the end of the list, so an entry registered later wins
/// over an earlier one that also matches. Disabled engines are skipped. A predicate
/// that fails is logged and counts as a non-match.
pub fn match_engine(url: &Url, params: &QueryParams, engines: &[EngineDescriptor]) -> Option<usize> {
    let found = engines
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, engine)| !engine.disabled)
        .find(|(_, engine)| rule_matches(engine, url, params))
        .map(|(index, _)| index);

    match found {
        Some(index) => debug!("Matched engine {} at index {}", engines[index].title, index),
        None => debug!("No engine matches {}", url),
    }
    found
}

fn rule_matches(engine: &EngineDescriptor, url: &Url, params: &QueryParams) -> bool {
    match &engine.matches {
        Some(MatchRule::Contains(needle)) => url.as_str().contains(needle.as_str()),
        Some(MatchRule::Regex(pattern)) => pattern.is_match(url.as_str()),
        Some(MatchRule::Predicate(predicate)) => match predicate.call(url, params) {
            Ok(matched) => matched,
            Err(e) => {
                warn!(
                    "Predicate {} of engine {} failed: {}",
                    predicate.name(),
                    engine.title,
                    e
                );
                false
            }
        },
        None => match (engine.template_host(), url.host_str()) {
            (Some(expected), Some(actual)) => expected == actual,
            _ => false,
        },
    }
}
