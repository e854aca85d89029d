//! The navigation bar: which links to show for a results page
//!
//! Resolution runs the whole pipeline once per page: match the page to an engine,
//! extract the query, and format a link for every other enabled engine. The
//! submodules hold the state machines behind the bar's event handlers.

mod keyboard;
mod scroll;

pub use keyboard::{Key, KeyEvent, NavAction, Navigator};
pub use scroll::{ScrollState, Visibility, WheelScroller};

use crate::config::UiSettings;
use crate::engines::{encode_query, extract, format_link, match_engine, EngineDescriptor, EngineRegistry, QueryParams};
use serde::Serialize;
use tracing::debug;
use url::Url;

/// What the bar needs to know about the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Device {
    /// Coarse pointer; mobile overrides apply and keyboard handlers are skipped
    pub touch: bool,
    /// Prefers a dark color scheme
    pub dark_mode: bool,
}

impl Device {
    /// Best guess from a User-Agent header
    pub fn from_user_agent(user_agent: &str) -> Self {
        let touch = ["Mobi", "Android", "iPhone", "iPad"]
            .iter()
            .any(|marker| user_agent.contains(marker));
        Self {
            touch,
            dark_mode: false,
        }
    }
}

/// One rendered engine link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarLink {
    /// Position in the bar, used for keyboard navigation
    pub index: usize,
    /// Position of the engine in the registry
    pub engine: usize,
    pub title: String,
    pub href: String,
    /// Accessible label
    pub label: String,
    pub shortcut: Option<char>,
    /// Icon color after dark-mode adjustment
    pub color: String,
    pub svg: Option<String>,
}

/// The bar for one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// Registry index of the engine that produced the page
    pub active: usize,
    /// Title of that engine
    pub engine: String,
    /// The query as the user typed it
    pub query: String,
    pub links: Vec<BarLink>,
}

impl Resolution {
    /// Keyboard navigator over this bar's links
    pub fn navigator(&self) -> Navigator {
        Navigator::new(self.links.iter().map(|link| link.shortcut).collect())
    }
}

/// Build the bar for `url`, or `None` when no engine claims the page or the query is blank
pub fn resolve(
    engines: &[EngineDescriptor],
    url: &Url,
    device: Device,
    ui: &UiSettings,
) -> Option<Resolution> {
    let registry = EngineRegistry::from_engines(engines, device.touch);
    let params = QueryParams::from_url(url);

    let active = match_engine(url, &params, registry.engines())?;
    let engine = registry.get(active)?;
    let Some(query) = extract(engine, url, &params) else {
        debug!("Engine {} matched but no query was found", engine.title);
        return None;
    };

    let encoded = encode_query(&query);
    let links = registry
        .display_order(Some(active))
        .into_iter()
        .enumerate()
        .filter_map(|(index, engine_index)| {
            let target = registry.get(engine_index)?;
            Some(BarLink {
                index,
                engine: engine_index,
                title: target.title.clone(),
                href: format_link(target, &encoded),
                label: format!("Search {} for {}", target.title, query),
                shortcut: target.shortcut(),
                color: target.color.icon_color(device.dark_mode, ui.dark_icon_threshold),
                svg: target.svg.clone(),
            })
        })
        .collect();

    Some(Resolution {
        active,
        engine: engine.title.clone(),
        query,
        links,
    })
}
