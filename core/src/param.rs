//! Parameter codec: typed values in, percent-encoded query pairs and path
//! segments out.
//!
//! # Design
//! Values are encoded at pair-emission time, so everything downstream
//! (the query string, the expanded path) deals only in wire-ready text.
//! Absent optional values contribute zero pairs rather than an empty
//! `name=` entry. Collection values use the exploded "multi" style: one
//! `name=value` pair per element, source order preserved, no deduplication.

use std::fmt::Display;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except RFC 3986 unreserved characters gets encoded.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode one query or path component.
pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Emit zero or one encoded query pairs for a singular parameter.
///
/// `None` means the parameter is omitted entirely.
pub fn query_pairs(name: &str, value: Option<&dyn Display>) -> Vec<(String, String)> {
    match value {
        Some(v) => vec![(name.to_string(), encode(&v.to_string()))],
        None => Vec::new(),
    }
}

/// Emit one encoded query pair per element of a collection parameter.
pub fn query_pairs_multi<I, T>(name: &str, values: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    values
        .into_iter()
        .map(|v| (name.to_string(), encode(&v.to_string())))
        .collect()
}

/// Substitute `{name}` in a path template with the encoded value.
///
/// Each placeholder appears exactly once in a template, so a plain single
/// replacement is sufficient.
pub fn expand_path(template: &str, name: &str, value: &dyn Display) -> String {
    let token = format!("{{{name}}}");
    template.replacen(&token, &encode(&value.to_string()), 1)
}

/// Join already-encoded pairs into a query string, declaration order kept.
pub fn query_string(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_passes_unreserved_through() {
        assert_eq!(encode("abc-123_x.y~z"), "abc-123_x.y~z");
    }

    #[test]
    fn encode_escapes_reserved() {
        assert_eq!(encode("a b&c=d/e"), "a%20b%26c%3Dd%2Fe");
    }

    #[test]
    fn absent_optional_emits_nothing() {
        assert!(query_pairs("userId", None).is_empty());
    }

    #[test]
    fn present_optional_emits_one_pair() {
        let pairs = query_pairs("userId", Some(&"abc 123"));
        assert_eq!(pairs, vec![("userId".to_string(), "abc%20123".to_string())]);
    }

    #[test]
    fn multi_emits_one_pair_per_element_in_order() {
        let pairs = query_pairs_multi("mediaTypes", ["Video", "Audio", "Video"]);
        assert_eq!(
            pairs,
            vec![
                ("mediaTypes".to_string(), "Video".to_string()),
                ("mediaTypes".to_string(), "Audio".to_string()),
                ("mediaTypes".to_string(), "Video".to_string()),
            ]
        );
    }

    #[test]
    fn multi_with_empty_collection_emits_nothing() {
        let pairs = query_pairs_multi("ids", Vec::<String>::new());
        assert!(pairs.is_empty());
    }

    #[test]
    fn expand_path_encodes_value() {
        let path = expand_path("/Items/{itemId}/Download", "itemId", &"a/b c");
        assert_eq!(path, "/Items/a%2Fb%20c/Download");
    }

    #[test]
    fn query_string_joins_with_ampersand() {
        let pairs = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
            ("b".to_string(), "3".to_string()),
        ];
        assert_eq!(query_string(&pairs), "a=1&b=2&b=3");
    }
}
