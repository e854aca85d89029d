//! Building destination URLs

use super::descriptor::EngineDescriptor;
use super::rules::FormatRule;
use crate::PLACEHOLDER;

/// Percent-encode a query once; everything except unreserved characters (`A-Z a-z 0-9 - _ . ~`) is escaped
pub fn encode_query(query: &str) -> String {
    urlencoding::encode(query).into_owned()
}

/// Destination URL on `engine` for an already encoded query
pub fn format_link(engine: &EngineDescriptor, encoded_query: &str) -> String {
    match &engine.format {
        Some(FormatRule::Formatter(formatter)) => formatter.call(&engine.url, encoded_query),
        Some(FormatRule::Template(template)) => template.replace(PLACEHOLDER, encoded_query),
        None => engine.url.replace(PLACEHOLDER, encoded_query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::extractor::extract;
    use crate::engines::rules::{Formatter, QueryParams};
    use crate::util::HexColor;
    use url::Url;

    fn bing() -> EngineDescriptor {
        EngineDescriptor::new(
            "Bing",
            "https://www.bing.com/search?q=%s",
            HexColor::rgb(0x00, 0x83, 0x73),
        )
    }

    #[test]
    fn test_template_substitution() {
        assert_eq!(format_link(&bing(), "cats"), "https://www.bing.com/search?q=cats");
    }

    #[test]
    fn test_every_placeholder_is_replaced() {
        let mut engine = bing();
        engine.url = "https://x.test/%s?again=%s".to_string();
        assert_eq!(format_link(&engine, "a%20b"), "https://x.test/a%20b?again=a%20b");
    }

    #[test]
    fn test_format_template_overrides_url() {
        let engine = bing().with_format(FormatRule::Template(
            "https://www.bing.com/images/search?q=%s".to_string(),
        ));
        assert_eq!(
            format_link(&engine, "cats"),
            "https://www.bing.com/images/search?q=cats"
        );
    }

    #[test]
    fn test_custom_formatter() {
        let engine = bing().with_format(FormatRule::Formatter(
            Formatter::builtin("plus_separated").unwrap(),
        ));
        assert_eq!(
            format_link(&engine, &encode_query("big cats")),
            "https://www.bing.com/search?q=big+cats"
        );
    }

    #[test]
    fn test_encode_query() {
        assert_eq!(encode_query("a b&c/d"), "a%20b%26c%2Fd");
        assert_eq!(encode_query("café"), "caf%C3%A9");
        assert_eq!(encode_query("Az09-_.~"), "Az09-_.~");
        assert_eq!(encode_query("!'()*"), "%21%27%28%29%2A");
    }

    #[test]
    fn test_round_trip_through_the_same_engine() {
        let engine = bing();
        for query in ["cats", "rust & go", "100% sure?", "naïve #1 site"] {
            let href = format_link(&engine, &encode_query(query));
            let url = Url::parse(&href).unwrap();
            let params = QueryParams::from_url(&url);
            assert_eq!(extract(&engine, &url, &params).as_deref(), Some(query));
        }
    }
}
