//! Engine descriptor: everything the bar knows about one search engine

use super::rules::{FormatRule, MatchRule, QueryRule};
use crate::error::ConfigError;
use crate::util::HexColor;
use crate::PLACEHOLDER;
use serde::{Deserialize, Serialize};
use url::Url;

fn default_weight() -> f64 {
    1.0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One configured search engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineDescriptor {
    /// Display name
    pub title: String,
    /// Search URL with `%s` where the encoded query goes
    pub url: String,
    /// How to recognise this engine's result pages; defaults to the host of `url`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<MatchRule>,
    /// How to pull the query out of a result page; defaults to `q`, then `query`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryRule>,
    /// Overrides how the destination URL is built from `url`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatRule>,
    /// Brand color for the icon
    pub color: HexColor,
    /// Only accept queries scoped with `site:<site>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    /// Identifier whose first letter is the keyboard shortcut
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// SVG icon markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
    /// Display order, highest first
    #[serde(default = "default_weight", alias = "priority")]
    pub weight: f64,
    /// Fields replaced on touch devices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<MobileOverrides>,
}

/// Partial descriptor merged over the base on touch devices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<MatchRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl MobileOverrides {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }
}

impl EngineDescriptor {
    pub fn new(title: impl Into<String>, url: impl Into<String>, color: HexColor) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            matches: None,
            query: None,
            format: None,
            color,
            site: None,
            slug: None,
            svg: None,
            disabled: false,
            weight: default_weight(),
            mobile: None,
        }
    }

    pub fn with_matches(mut self, rule: MatchRule) -> Self {
        self.matches = Some(rule);
        self
    }

    pub fn with_query(mut self, rule: QueryRule) -> Self {
        self.query = Some(rule);
        self
    }

    pub fn with_format(mut self, rule: FormatRule) -> Self {
        self.format = Some(rule);
        self
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_svg(mut self, svg: impl Into<String>) -> Self {
        self.svg = Some(svg.into());
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_mobile(mut self, overrides: MobileOverrides) -> Self {
        self.mobile = Some(overrides);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Lowercase first character of the slug, or of the title without one
    pub fn shortcut(&self) -> Option<char> {
        let source = self
            .slug
            .as_deref()
            .filter(|slug| !slug.is_empty())
            .unwrap_or(&self.title);
        source.chars().next().and_then(|c| c.to_lowercase().next())
    }

    /// Host of the URL template, used when no match rule is configured
    pub fn template_host(&self) -> Option<String> {
        Url::parse(&self.url.replace(PLACEHOLDER, "q"))
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
    }

    /// Descriptor as seen by a touch device: mobile overrides shallow-merged over the base
    pub fn for_touch(&self) -> Self {
        let mut merged = self.clone();
        let Some(overrides) = merged.mobile.take() else {
            return merged;
        };

        if let Some(title) = overrides.title {
            merged.title = title;
        }
        if let Some(url) = overrides.url {
            merged.url = url;
        }
        if let Some(rule) = overrides.matches {
            merged.matches = Some(rule);
        }
        if let Some(rule) = overrides.query {
            merged.query = Some(rule);
        }
        if let Some(rule) = overrides.format {
            merged.format = Some(rule);
        }
        if let Some(color) = overrides.color {
            merged.color = color;
        }
        if let Some(site) = overrides.site {
            merged.site = Some(site);
        }
        if let Some(slug) = overrides.slug {
            merged.slug = Some(slug);
        }
        if let Some(svg) = overrides.svg {
            merged.svg = Some(svg);
        }
        if let Some(disabled) = overrides.disabled {
            merged.disabled = disabled;
        }
        if let Some(weight) = overrides.weight {
            merged.weight = weight;
        }
        merged
    }

    /// Check that the descriptor can be matched and formatted
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::invalid(&self.url, "title must not be empty"));
        }
        let name = self.title.as_str();

        if Url::parse(&self.url.replace(PLACEHOLDER, "q")).is_err() {
            return Err(ConfigError::invalid(name, "url is not an absolute URL"));
        }

        match &self.format {
            Some(FormatRule::Formatter(_)) => {}
            Some(FormatRule::Template(template)) => {
                if !template.contains(PLACEHOLDER) {
                    return Err(ConfigError::invalid(
                        name,
                        format!("format template has no {} placeholder", PLACEHOLDER),
                    ));
                }
            }
            None => {
                if !self.url.contains(PLACEHOLDER) {
                    return Err(ConfigError::invalid(
                        name,
                        format!("url template has no {} placeholder", PLACEHOLDER),
                    ));
                }
            }
        }

        if matches!(&self.site, Some(site) if site.trim().is_empty()) {
            return Err(ConfigError::invalid(name, "site filter must not be empty"));
        }

        if !self.weight.is_finite() {
            return Err(ConfigError::invalid(name, "weight must be a finite number"));
        }

        if self.mobile.is_some() {
            self.for_touch().validate()?;
        }

        Ok(())
    }
}
