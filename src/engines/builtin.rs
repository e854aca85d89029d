//! Built-in custom rules that configuration can reference by name

use super::rules::{Extractor, Formatter, Predicate, QueryParams};
use crate::PLACEHOLDER;
use anyhow::anyhow;
use url::Url;

pub const GOOGLE_WEB: Predicate = Predicate::new("google_web", google_web);
pub const GOOGLE_IMAGES: Predicate = Predicate::new("google_images", google_images);
pub const YOUTUBE_RESULTS: Predicate = Predicate::new("youtube_results", youtube_results);
pub const DUCKDUCKGO_WEB: Predicate = Predicate::new("duckduckgo_web", duckduckgo_web);

pub const WIKIPEDIA_TITLE: Extractor = Extractor::new("wikipedia_title", wikipedia_title);
pub const LAST_PATH_SEGMENT: Extractor = Extractor::new("last_path_segment", last_path_segment);

pub const PLUS_SEPARATED: Formatter = Formatter::new("plus_separated", plus_separated);
pub const LOWERCASE_QUERY: Formatter = Formatter::new("lowercase_query", lowercase_query);

const PREDICATES: &[Predicate] = &[GOOGLE_WEB, GOOGLE_IMAGES, YOUTUBE_RESULTS, DUCKDUCKGO_WEB];

const EXTRACTORS: &[Extractor] = &[WIKIPEDIA_TITLE, LAST_PATH_SEGMENT];

const FORMATTERS: &[Formatter] = &[PLUS_SEPARATED, LOWERCASE_QUERY];

pub fn predicate(name: &str) -> Option<Predicate> {
    PREDICATES.iter().copied().find(|p| p.name() == name)
}

pub fn extractor(name: &str) -> Option<Extractor> {
    EXTRACTORS.iter().copied().find(|e| e.name() == name)
}

pub fn formatter(name: &str) -> Option<Formatter> {
    FORMATTERS.iter().copied().find(|f| f.name() == name)
}

/// Names of every built-in, grouped by kind
pub fn available() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        ("predicate", PREDICATES.iter().map(|p| p.name()).collect()),
        ("extractor", EXTRACTORS.iter().map(|e| e.name()).collect()),
        ("formatter", FORMATTERS.iter().map(|f| f.name()).collect()),
    ]
}

fn host(url: &Url) -> anyhow::Result<&str> {
    url.host_str()
        .ok_or_else(|| anyhow!("url {} has no host", url))
}

fn is_google_host(host: &str) -> bool {
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.starts_with("google.")
}

fn is_google_images(params: &QueryParams) -> bool {
    params.get("tbm") == Some("isch") || params.get("udm") == Some("2")
}

/// Google web results, excluding verticals such as images or news
fn google_web(url: &Url, params: &QueryParams) -> anyhow::Result<bool> {
    Ok(is_google_host(host(url)?)
        && url.path() == "/search"
        && params.non_empty("tbm").is_none()
        && !is_google_images(params))
}

fn google_images(url: &Url, params: &QueryParams) -> anyhow::Result<bool> {
    Ok(is_google_host(host(url)?) && url.path() == "/search" && is_google_images(params))
}

fn youtube_results(url: &Url, _params: &QueryParams) -> anyhow::Result<bool> {
    let host = host(url)?;
    Ok((host == "youtube.com" || host.ends_with(".youtube.com")) && url.path() == "/results")
}

/// DuckDuckGo text results; `ia=images` and friends belong to other tabs
fn duckduckgo_web(url: &Url, params: &QueryParams) -> anyhow::Result<bool> {
    let host = host(url)?;
    if host != "duckduckgo.com" && !host.ends_with(".duckduckgo.com") {
        return Ok(false);
    }
    Ok(params.non_empty("q").is_some()
        && matches!(params.get("ia"), None | Some("") | Some("web")))
}

/// Article title from `/wiki/<Title>`, or the `search` parameter on search pages
fn wikipedia_title(url: &Url, params: &QueryParams) -> anyhow::Result<Option<String>> {
    if let Some(search) = params.non_empty("search") {
        return Ok(Some(search.to_string()));
    }
    let Some(title) = url.path().strip_prefix("/wiki/") else {
        return Ok(None);
    };
    if title.starts_with("Special:") {
        return Ok(None);
    }
    let decoded = urlencoding::decode(title)?;
    Ok(Some(decoded.replace('_', " ")))
}

fn last_path_segment(url: &Url, _params: &QueryParams) -> anyhow::Result<Option<String>> {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()));
    match segment {
        Some(segment) => Ok(Some(urlencoding::decode(segment)?.into_owned())),
        None => Ok(None),
    }
}

/// Joins words with `+` for engines that reject `%20` in paths
fn plus_separated(template: &str, encoded_query: &str) -> String {
    template.replace(PLACEHOLDER, &encoded_query.replace("%20", "+"))
}

fn lowercase_query(template: &str, encoded_query: &str) -> String {
    template.replace(PLACEHOLDER, &encoded_query.to_lowercase())
}
