//! Rule types for deciding whether a page belongs to an engine and what the user searched for
//!
//! Every rule is a closed enum. Custom functions are plain `fn` pointers carrying a
//! stable name, so a configuration blob can refer to them and be written back out
//! unchanged.

use super::builtin;
use regex::Regex;
use serde::de::{self, Error as _, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use url::Url;

/// Decoded query-string parameters of a page URL, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Snapshot the query string of `url`
    pub fn from_url(url: &Url) -> Self {
        Self {
            pairs: url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// First value for `name`, like `URLSearchParams.get`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First value for `name`, ignoring empty values
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(key, _)| key == name)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Compiled regular expression that serializes as its source text
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }

    /// First capture group when the pattern declares one, otherwise the whole match
    pub fn extract<'h>(&self, haystack: &'h str) -> Option<&'h str> {
        let caps = self.0.captures(haystack)?;
        let group = if self.0.captures_len() > 1 { 1 } else { 0 };
        caps.get(group).map(|m| m.as_str())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(D::Error::custom)
    }
}

/// Signature of a custom match predicate
pub type PredicateFn = fn(&Url, &QueryParams) -> anyhow::Result<bool>;

/// Signature of a custom query extractor
pub type ExtractorFn = fn(&Url, &QueryParams) -> anyhow::Result<Option<String>>;

/// Signature of a custom link formatter: `(url template, encoded query) -> destination`
pub type FormatterFn = fn(&str, &str) -> String;

macro_rules! named_fn {
    ($(#[$meta:meta])* $name:ident, $fn_ty:ty, $lookup:path, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        pub struct $name {
            name: &'static str,
            func: $fn_ty,
        }

        impl $name {
            pub const fn new(name: &'static str, func: $fn_ty) -> Self {
                Self { name, func }
            }

            pub fn name(&self) -> &'static str {
                self.name
            }

            /// Resolve a built-in by name
            pub fn builtin(name: &str) -> Option<Self> {
                $lookup(name)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.name).finish()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.name == other.name
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let name = String::deserialize(deserializer)?;
                $lookup(&name)
                    .ok_or_else(|| D::Error::custom(format!("unknown {} \"{}\"", $kind, name)))
            }
        }
    };
}

named_fn!(
    /// Named custom match predicate
    Predicate,
    PredicateFn,
    builtin::predicate,
    "predicate"
);

named_fn!(
    /// Named custom query extractor
    Extractor,
    ExtractorFn,
    builtin::extractor,
    "extractor"
);

named_fn!(
    /// Named custom link formatter
    Formatter,
    FormatterFn,
    builtin::formatter,
    "formatter"
);

impl Predicate {
    pub fn call(&self, url: &Url, params: &QueryParams) -> anyhow::Result<bool> {
        (self.func)(url, params)
    }
}

impl Extractor {
    pub fn call(&self, url: &Url, params: &QueryParams) -> anyhow::Result<Option<String>> {
        (self.func)(url, params)
    }
}

impl Formatter {
    pub fn call(&self, template: &str, encoded_query: &str) -> String {
        (self.func)(template, encoded_query)
    }
}

/// Decides whether a page URL belongs to an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRule {
    /// Full URL contains the substring
    Contains(String),
    /// Pattern matches somewhere in the full URL
    Regex(Pattern),
    /// Custom predicate over the URL and its parameters
    Predicate(Predicate),
}

/// Pulls the user's search text out of a page URL
///
/// JSON forms: `"q"`, `["k", "field-keywords"]`, `{"regex": "..."}`, `{"extractor": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "QueryRuleRepr")]
pub enum QueryRule {
    /// Value of a single parameter
    Param(String),
    /// First non-empty value among several parameters
    Params(Vec<String>),
    /// Pattern applied to the full URL
    Regex(Pattern),
    /// Custom extractor over the URL and its parameters
    Extractor(Extractor),
}

const QUERY_RULE_KEYS: &[&str] = &["regex", "extractor"];

#[derive(Serialize)]
#[serde(untagged)]
enum QueryRuleRepr {
    Param(String),
    Params(Vec<String>),
    Tagged(TaggedQueryRule),
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum TaggedQueryRule {
    Regex(Pattern),
    Extractor(Extractor),
}

impl From<QueryRule> for QueryRuleRepr {
    fn from(rule: QueryRule) -> Self {
        match rule {
            QueryRule::Param(name) => Self::Param(name),
            QueryRule::Params(names) => Self::Params(names),
            QueryRule::Regex(pattern) => Self::Tagged(TaggedQueryRule::Regex(pattern)),
            QueryRule::Extractor(f) => Self::Tagged(TaggedQueryRule::Extractor(f)),
        }
    }
}

impl<'de> Deserialize<'de> for QueryRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QueryRuleVisitor)
    }
}

struct QueryRuleVisitor;

impl<'de> Visitor<'de> for QueryRuleVisitor {
    type Value = QueryRule;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a parameter name, a list of parameter names, or a regex/extractor object")
    }

    fn visit_str<E: de::Error>(self, name: &str) -> Result<Self::Value, E> {
        Ok(QueryRule::Param(name.to_string()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut names = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(name) = seq.next_element::<String>()? {
            names.push(name);
        }
        Ok(QueryRule::Params(names))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let key = single_key(&mut map, &self)?;
        let rule = match key.as_str() {
            "regex" => QueryRule::Regex(map.next_value()?),
            "extractor" => QueryRule::Extractor(map.next_value()?),
            other => return Err(A::Error::unknown_field(other, QUERY_RULE_KEYS)),
        };
        no_more_keys(&mut map, &key)?;
        Ok(rule)
    }
}

/// Builds the destination URL for an engine
///
/// JSON forms: `"https://...%s"` or `{"formatter": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "FormatRuleRepr")]
pub enum FormatRule {
    /// Template with `%s` placeholders, used instead of the engine's `url`
    Template(String),
    /// Custom formatter
    Formatter(Formatter),
}

const FORMAT_RULE_KEYS: &[&str] = &["formatter"];

#[derive(Serialize)]
#[serde(untagged)]
enum FormatRuleRepr {
    Template(String),
    Tagged(TaggedFormatRule),
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum TaggedFormatRule {
    Formatter(Formatter),
}

impl From<FormatRule> for FormatRuleRepr {
    fn from(rule: FormatRule) -> Self {
        match rule {
            FormatRule::Template(template) => Self::Template(template),
            FormatRule::Formatter(f) => Self::Tagged(TaggedFormatRule::Formatter(f)),
        }
    }
}

impl<'de> Deserialize<'de> for FormatRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FormatRuleVisitor)
    }
}

struct FormatRuleVisitor;

impl<'de> Visitor<'de> for FormatRuleVisitor {
    type Value = FormatRule;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a URL template or a formatter object")
    }

    fn visit_str<E: de::Error>(self, template: &str) -> Result<Self::Value, E> {
        Ok(FormatRule::Template(template.to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let key = single_key(&mut map, &self)?;
        let rule = match key.as_str() {
            "formatter" => FormatRule::Formatter(map.next_value()?),
            other => return Err(A::Error::unknown_field(other, FORMAT_RULE_KEYS)),
        };
        no_more_keys(&mut map, &key)?;
        Ok(rule)
    }
}

fn single_key<'de, A: MapAccess<'de>>(
    map: &mut A,
    expected: &dyn de::Expected,
) -> Result<String, A::Error> {
    map.next_key::<String>()?
        .ok_or_else(|| A::Error::invalid_length(0, expected))
}

fn no_more_keys<'de, A: MapAccess<'de>>(map: &mut A, key: &str) -> Result<(), A::Error> {
    match map.next_key::<String>()? {
        Some(extra) => Err(A::Error::custom(format!(
            "unexpected key \"{}\" next to \"{}\"",
            extra, key
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_first_value_wins() {
        let url = Url::parse("https://example.com/?q=first&q=second&empty=").unwrap();
        let params = QueryParams::from_url(&url);
        assert_eq!(params.get("q"), Some("first"));
        assert_eq!(params.get("empty"), Some(""));
        assert_eq!(params.non_empty("empty"), None);
        assert!(!params.contains("missing"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_query_params_decodes_plus_and_percent() {
        let url = Url::parse("https://example.com/?q=rust+lang%21").unwrap();
        let params = QueryParams::from_url(&url);
        assert_eq!(params.get("q"), Some("rust lang!"));
    }

    #[test]
    fn test_pattern_prefers_first_group() {
        let grouped = Pattern::new(r"/wiki/([^?#]+)").unwrap();
        assert_eq!(
            grouped.extract("https://en.wikipedia.org/wiki/Rust"),
            Some("Rust")
        );

        let plain = Pattern::new(r"\d+").unwrap();
        assert_eq!(plain.extract("page 42 of 50"), Some("42"));
    }

    #[test]
    fn test_match_rule_json_forms() {
        let rule: MatchRule = serde_json::from_str(r#"{"contains": "google.com"}"#).unwrap();
        assert_eq!(rule, MatchRule::Contains("google.com".to_string()));

        let rule: MatchRule = serde_json::from_str(r#"{"regex": "bing\\.com/search"}"#).unwrap();
        assert!(matches!(rule, MatchRule::Regex(ref p) if p.as_str() == r"bing\.com/search"));

        let rule: MatchRule = serde_json::from_str(r#"{"predicate": "youtube_results"}"#).unwrap();
        assert!(matches!(rule, MatchRule::Predicate(ref p) if p.name() == "youtube_results"));
    }

    #[test]
    fn test_unknown_builtin_is_rejected() {
        let err = serde_json::from_str::<MatchRule>(r#"{"predicate": "nope"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown predicate \"nope\""));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        assert!(serde_json::from_str::<MatchRule>(r#"{"regex": "("}"#).is_err());
    }

    #[test]
    fn test_query_rule_json_forms() {
        let rule: QueryRule = serde_json::from_str(r#""search_query""#).unwrap();
        assert_eq!(rule, QueryRule::Param("search_query".to_string()));

        let rule: QueryRule = serde_json::from_str(r#"["k", "field-keywords"]"#).unwrap();
        assert_eq!(
            rule,
            QueryRule::Params(vec!["k".to_string(), "field-keywords".to_string()])
        );

        let rule: QueryRule = serde_json::from_str(r#"{"extractor": "wikipedia_title"}"#).unwrap();
        assert!(matches!(rule, QueryRule::Extractor(ref e) if e.name() == "wikipedia_title"));

        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(json, r#"{"extractor":"wikipedia_title"}"#);
    }

    #[test]
    fn test_format_rule_json_forms() {
        let rule: FormatRule = serde_json::from_str(r#""https://x.test/?q=%s""#).unwrap();
        assert_eq!(rule, FormatRule::Template("https://x.test/?q=%s".to_string()));

        let rule: FormatRule = serde_json::from_str(r#"{"formatter": "plus_separated"}"#).unwrap();
        assert!(matches!(rule, FormatRule::Formatter(ref f) if f.name() == "plus_separated"));
    }

    #[test]
    fn test_query_rule_errors_name_the_cause() {
        let err = serde_json::from_str::<QueryRule>(r#"{"regex": "("}"#).unwrap_err();
        assert!(err.to_string().contains("regex parse error"), "{}", err);

        let err = serde_json::from_str::<QueryRule>(r#"{"extractor": "nope"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown extractor \"nope\""), "{}", err);

        let err = serde_json::from_str::<QueryRule>(r#"{"param": "q"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field `param`"), "{}", err);

        let err =
            serde_json::from_str::<QueryRule>(r#"{"regex": "q=(.*)", "extractor": "wikipedia_title"}"#)
                .unwrap_err();
        assert!(err.to_string().contains("unexpected key \"extractor\""), "{}", err);

        assert!(serde_json::from_str::<QueryRule>("42").is_err());
    }

    #[test]
    fn test_format_rule_errors_name_the_cause() {
        let err = serde_json::from_str::<FormatRule>(r#"{"formatter": "nope"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown formatter \"nope\""), "{}", err);

        let err = serde_json::from_str::<FormatRule>(r#"{"template": "x"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field `template`"), "{}", err);
    }
}
