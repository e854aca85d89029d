//! Pulling the user's search text out of a result page URL

use super::descriptor::EngineDescriptor;
use super::rules::{QueryParams, QueryRule};
use tracing::{debug, warn};
use url::Url;

/// Parameters tried, in order, when an engine declares no query rule
const FALLBACK_PARAMS: [&str; 2] = ["q", "query"];

const SITE_TOKEN: &str = "site:";

/// The query the user typed on `engine`'s page, or `None` when there is no usable query.
///
/// Blank results count as no query. When the engine has a site filter and the raw
/// value carries a `site:` token, the query is only returned if the token names the
/// filtered site.
pub fn extract(engine: &EngineDescriptor, url: &Url, params: &QueryParams) -> Option<String> {
    let raw = raw_query(engine, url, params)?;

    let query = match engine.site.as_deref() {
        Some(site) if raw.contains(SITE_TOKEN) => scoped_to_site(&raw, site)?,
        _ => raw,
    };

    if query.trim().is_empty() {
        None
    } else {
        Some(query)
    }
}

fn raw_query(engine: &EngineDescriptor, url: &Url, params: &QueryParams) -> Option<String> {
    match &engine.query {
        Some(QueryRule::Param(name)) => params.get(name).map(str::to_string),
        Some(QueryRule::Params(names)) => names
            .iter()
            .find_map(|name| params.non_empty(name))
            .map(str::to_string),
        Some(QueryRule::Regex(pattern)) => pattern.extract(url.as_str()).map(str::to_string),
        Some(QueryRule::Extractor(extractor)) => match extractor.call(url, params) {
            Ok(query) => query,
            Err(e) => {
                warn!(
                    "Extractor {} of engine {} failed: {}",
                    extractor.name(),
                    engine.title,
                    e
                );
                None
            }
        },
        None => FALLBACK_PARAMS
            .iter()
            .find_map(|name| params.non_empty(name))
            .map(str::to_string),
    }
}

/// Search term of a `term site:name` query when `name` is the wanted site.
///
/// Only the first `site:` segment names the site; later ones are ignored.
fn scoped_to_site(raw: &str, site: &str) -> Option<String> {
    let mut parts = raw.split(SITE_TOKEN);
    let term = parts.next()?;
    let site_name = parts.next()?.trim();
    if site_name == site {
        Some(term.trim().to_string())
    } else {
        debug!("Query is scoped to {} rather than {}", site_name, site);
        None
    }
}
