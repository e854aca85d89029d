//! Built-in engine list used when no valid custom configuration is stored

use crate::engines::builtin;
use crate::engines::{
    EngineDescriptor, FormatRule, MatchRule, MobileOverrides, Pattern, QueryRule,
};
use crate::util::HexColor;

fn pattern(source: &str) -> Pattern {
    Pattern::new(source).expect("built-in pattern compiles")
}

/// Default engine configurations, in registration order
pub fn default_engines() -> Vec<EngineDescriptor> {
    vec![
        EngineDescriptor::new(
            "Google",
            "https://www.google.com/search?q=%s",
            HexColor::rgb(0x42, 0x85, 0xF4),
        )
        .with_matches(MatchRule::Predicate(builtin::GOOGLE_WEB))
        .with_weight(10.0),
        EngineDescriptor::new(
            "Google Images",
            "https://www.google.com/search?udm=2&q=%s",
            HexColor::rgb(0x34, 0xA8, 0x53),
        )
        .with_matches(MatchRule::Predicate(builtin::GOOGLE_IMAGES))
        .with_slug("images")
        .with_weight(2.0),
        EngineDescriptor::new(
            "Bing",
            "https://www.bing.com/search?q=%s",
            HexColor::rgb(0x00, 0x83, 0x73),
        )
        .with_weight(8.0),
        EngineDescriptor::new(
            "DuckDuckGo",
            "https://duckduckgo.com/?q=%s",
            HexColor::rgb(0xDE, 0x58, 0x33),
        )
        .with_matches(MatchRule::Predicate(builtin::DUCKDUCKGO_WEB))
        .with_weight(9.0),
        EngineDescriptor::new(
            "Brave",
            "https://search.brave.com/search?q=%s",
            HexColor::rgb(0xFB, 0x54, 0x2B),
        )
        .with_weight(7.0),
        EngineDescriptor::new(
            "Wikipedia",
            "https://en.wikipedia.org/wiki/Special:Search?search=%s",
            HexColor::rgb(0x00, 0x00, 0x00),
        )
        .with_matches(MatchRule::Contains("wikipedia.org/wiki/".to_string()))
        .with_query(QueryRule::Extractor(builtin::WIKIPEDIA_TITLE))
        .with_weight(5.0),
        EngineDescriptor::new(
            "YouTube",
            "https://www.youtube.com/results?search_query=%s",
            HexColor::rgb(0xFF, 0x00, 0x00),
        )
        .with_matches(MatchRule::Predicate(builtin::YOUTUBE_RESULTS))
        .with_query(QueryRule::Param("search_query".to_string()))
        .with_mobile(MobileOverrides::url(
            "https://m.youtube.com/results?search_query=%s",
        ))
        .with_weight(6.0),
        EngineDescriptor::new(
            "GitHub",
            "https://github.com/search?q=%s&type=repositories",
            HexColor::rgb(0x18, 0x17, 0x17),
        )
        .with_matches(MatchRule::Contains("github.com/search".to_string()))
        .with_weight(4.0),
        EngineDescriptor::new(
            "Stack Overflow",
            "https://stackoverflow.com/search?q=%s",
            HexColor::rgb(0xF5, 0x80, 0x25),
        )
        .with_slug("overflow")
        .with_weight(3.0),
        EngineDescriptor::new(
            "crates.io",
            "https://crates.io/search?q=%s",
            HexColor::rgb(0x26, 0x4F, 0x1F),
        )
        .with_format(FormatRule::Formatter(builtin::PLUS_SEPARATED))
        .with_weight(3.0),
        EngineDescriptor::new(
            "Amazon",
            "https://www.amazon.com/s?k=%s",
            HexColor::rgb(0xFF, 0x99, 0x00),
        )
        .with_matches(MatchRule::Regex(pattern(r"amazon\.[a-z.]+/s\b")))
        .with_query(QueryRule::Params(vec![
            "k".to_string(),
            "field-keywords".to_string(),
        ]))
        .disabled(),
        EngineDescriptor::new(
            "Reddit",
            "https://www.google.com/search?q=%s+site%3Areddit.com",
            HexColor::rgb(0xFF, 0x45, 0x00),
        )
        .with_matches(MatchRule::Regex(pattern(
            r"google\.[a-z.]+/search\?(?:[^#]*&)?q=[^&#]*site(?::|%3A)reddit\.com",
        )))
        .with_site("reddit.com")
        .with_weight(2.0),
    ]
}
