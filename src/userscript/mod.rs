//! Userscript packaging
//!
//! Builds the `==UserScript==` metadata block whose `@match` lines cover every
//! enabled engine, so the manager injects the bar on exactly those results pages.

use crate::engines::EngineDescriptor;
use crate::PLACEHOLDER;
use anyhow::Result;
use tera::{Context, Tera};
use url::Url;

const HEADER_TEMPLATE: &str = include_str!("../templates/userscript_header.txt");

/// URL patterns for the `@match` lines, de-duplicated in first-seen order
pub fn match_patterns(engines: &[EngineDescriptor]) -> Vec<String> {
    let mut patterns: Vec<String> = Vec::new();

    let variants = engines.iter().flat_map(|engine| {
        let mobile = engine.mobile.as_ref().map(|_| engine.for_touch());
        std::iter::once(engine.clone()).chain(mobile)
    });

    for engine in variants.filter(|engine| !engine.disabled) {
        let Some((domain, path)) = domain_and_path(&engine.url) else {
            continue;
        };
        for pattern in [
            format!("*://{}{}*", domain, path),
            format!("*://*.{}{}*", domain, path),
        ] {
            if !patterns.contains(&pattern) {
                patterns.push(pattern);
            }
        }
    }

    patterns
}

/// Registrable domain (last two host labels) and the path before the placeholder
fn domain_and_path(template: &str) -> Option<(String, String)> {
    let url = Url::parse(template).ok()?;
    let host = url.host_str()?;

    let labels: Vec<&str> = host.split('.').collect();
    let domain = labels[labels.len().saturating_sub(2)..].join(".");

    let path = url.path().split(PLACEHOLDER).next().unwrap_or_default();
    Some((domain, path.to_string()))
}

/// Render the metadata block, every line commented out
pub fn header(engines: &[EngineDescriptor]) -> Result<String> {
    let matches = match_patterns(engines)
        .iter()
        .map(|pattern| format!("@match        {}", pattern))
        .collect::<Vec<_>>()
        .join("\n");

    let mut ctx = Context::new();
    ctx.insert("version", crate::VERSION);
    ctx.insert("matches", &matches);
    let rendered = Tera::one_off(HEADER_TEMPLATE, &ctx, false)?;

    Ok(rendered
        .trim()
        .lines()
        .map(|line| format!("// {}", line.trim()))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Prepend the metadata block to a compiled script body
pub fn bundle(engines: &[EngineDescriptor], script: &str) -> Result<String> {
    Ok(format!("{}\n\n{}", header(engines)?, script))
}
