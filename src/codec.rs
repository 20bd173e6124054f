//! Field codec for the stored fragment.
//!
//! A multilingual value is a concatenation of tag segments,
//! `{:<lang>}<content>{:}`, with no separator. A value without any tag is
//! legacy plain data and reads the same in every language.
//!
//! Segment matching is nesting-aware: inside a segment, an opening tag
//! starts a nested level that its own `{:}` closes. There is no escaping,
//! so a literal `{:en}` or `{:}` in content is always read as a tag.

use crate::i18n::LanguageCode;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// The marker that makes a string a candidate for language resolution.
pub const TAG_OPEN: &str = "{:";

/// The marker that closes a segment.
pub const TAG_CLOSE: &str = "{:}";

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| Regex::new(r"\{:([A-Za-z0-9_-]{1,10})?\}").unwrap())
}

/// One tag segment found in a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment<'a> {
    lang: &'a str,
    content: &'a str,
}

/// Walk the top-level segments of `stored`, in order of appearance.
///
/// Text outside segments is skipped. A segment with no closing tag runs to
/// the end of the input.
fn segments(stored: &str) -> Vec<Segment<'_>> {
    let mut found = Vec::new();
    let mut open: Option<(&str, usize)> = None;
    let mut depth = 0usize;

    for cap in tag_regex().captures_iter(stored) {
        let Some(token) = cap.get(0) else { continue };
        match (cap.get(1), open) {
            (Some(lang), None) => {
                open = Some((lang.as_str(), token.end()));
                depth = 1;
            }
            (Some(_), Some(_)) => depth += 1,
            (None, Some((lang, start))) => {
                depth -= 1;
                if depth == 0 {
                    found.push(Segment {
                        lang,
                        content: &stored[start..token.start()],
                    });
                    open = None;
                }
            }
            // Stray close tag outside any segment.
            (None, None) => {}
        }
    }

    if let Some((lang, start)) = open {
        found.push(Segment {
            lang,
            content: &stored[start..],
        });
    }

    found
}

/// Whether `text` contains at least one opening language tag.
///
/// A stray `{:}` alone does not make a value tagged.
pub fn has_tags(text: &str) -> bool {
    text.contains(TAG_OPEN)
        && tag_regex()
            .captures_iter(text)
            .any(|cap| cap.get(1).is_some())
}

/// Encode per-language values into a single stored string.
///
/// Languages are written in ascending code order; empty values are omitted.
///
/// # Example
/// ```
/// use std::collections::BTreeMap;
/// use custom_head_code::{codec, i18n::LanguageCode};
///
/// let mut values = BTreeMap::new();
/// values.insert(LanguageCode::new("en").unwrap(), "Hello".to_string());
/// values.insert(LanguageCode::new("de").unwrap(), "Hallo".to_string());
/// assert_eq!(codec::encode(&values), "{:de}Hallo{:}{:en}Hello{:}");
/// ```
pub fn encode(values: &BTreeMap<LanguageCode, String>) -> String {
    let mut out = String::new();
    for (lang, content) in values {
        if content.is_empty() {
            continue;
        }
        out.push_str(TAG_OPEN);
        out.push_str(lang.as_str());
        out.push('}');
        out.push_str(content);
        out.push_str(TAG_CLOSE);
    }
    out
}

/// Encode a value when no multilingual layer is active.
pub fn encode_plain(value: &str) -> String {
    value.to_string()
}

/// Read the content stored for `lang`.
///
/// Returns the first segment tagged `lang`, or an empty string if the value
/// is tagged but has no such segment. An untagged value is returned whole.
pub fn decode_for_language(stored: &str, lang: &LanguageCode) -> String {
    if !has_tags(stored) {
        return stored.to_string();
    }

    segments(stored)
        .into_iter()
        .find(|segment| segment.lang == lang.as_str())
        .map(|segment| segment.content.to_string())
        .unwrap_or_default()
}

/// Split a stored value into its per-language contents.
///
/// The first segment for each language wins. An untagged, non-empty value
/// is returned under `fallback`.
pub fn decode_all(stored: &str, fallback: &LanguageCode) -> BTreeMap<LanguageCode, String> {
    let mut values = BTreeMap::new();

    if !has_tags(stored) {
        if !stored.is_empty() {
            values.insert(fallback.clone(), stored.to_string());
        }
        return values;
    }

    for segment in segments(stored) {
        // Segment codes come from the tag regex, which matches the code grammar.
        if let Ok(lang) = LanguageCode::new(segment.lang) {
            values
                .entry(lang)
                .or_insert_with(|| segment.content.to_string());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lang(code: &str) -> LanguageCode {
        LanguageCode::new(code).unwrap()
    }

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<LanguageCode, String> {
        pairs
            .iter()
            .map(|(code, content)| (lang(code), content.to_string()))
            .collect()
    }

    // ==================== Encode Tests ====================

    #[test]
    fn test_encode_ascending_code_order() {
        let encoded = encode(&values(&[("en", "A"), ("de", "B"), ("fr", "C")]));
        assert_eq!(encoded, "{:de}B{:}{:en}A{:}{:fr}C{:}");
    }

    #[test]
    fn test_encode_omits_empty_values() {
        let encoded = encode(&values(&[("en", "A"), ("de", "")]));
        assert_eq!(encoded, "{:en}A{:}");
    }

    #[test]
    fn test_encode_empty_map() {
        assert_eq!(encode(&BTreeMap::new()), "");
        assert_eq!(encode(&values(&[("en", ""), ("de", "")])), "");
    }

    #[test]
    fn test_encode_plain_is_identity() {
        let script = "<script>console.log('{:x');</script>";
        assert_eq!(encode_plain(script), script);
    }

    // ==================== Decode Tests ====================

    #[test]
    fn test_decode_selects_language() {
        let stored = "{:en}A{:}{:de}B{:}";
        assert_eq!(decode_for_language(stored, &lang("en")), "A");
        assert_eq!(decode_for_language(stored, &lang("de")), "B");
    }

    #[test]
    fn test_decode_absent_language_is_empty() {
        let stored = "{:en}A{:}{:de}B{:}";
        assert_eq!(decode_for_language(stored, &lang("fr")), "");
    }

    #[test]
    fn test_decode_legacy_plain_value() {
        let stored = "plain text, no tags";
        assert_eq!(decode_for_language(stored, &lang("de")), stored);
    }

    #[test]
    fn test_decode_literal_open_marker_is_not_a_tag() {
        let stored = "var x = {:a b};";
        assert_eq!(decode_for_language(stored, &lang("en")), stored);
    }

    #[test]
    fn test_decode_first_segment_wins() {
        let stored = "{:en}first{:}{:en}second{:}";
        assert_eq!(decode_for_language(stored, &lang("en")), "first");
    }

    #[test]
    fn test_decode_unterminated_segment_runs_to_end() {
        let stored = "{:en}A{:}{:de}unterminated";
        assert_eq!(decode_for_language(stored, &lang("de")), "unterminated");
        assert_eq!(decode_for_language(stored, &lang("en")), "A");
    }

    #[test]
    fn test_decode_ignores_text_outside_segments() {
        let stored = "intro {:en}A{:} outro";
        assert_eq!(decode_for_language(stored, &lang("en")), "A");
    }

    #[test]
    fn test_decode_stray_close_tag() {
        let stored = "{:}{:de}B{:}";
        assert_eq!(decode_for_language(stored, &lang("de")), "B");
    }

    #[test]
    fn test_decode_stray_close_tag_only_is_legacy() {
        let stored = "a {:} b";
        assert_eq!(decode_for_language(stored, &lang("en")), stored);
        assert_eq!(decode_for_language(stored, &lang("de")), stored);
        assert_eq!(decode_all(stored, &lang("de")), values(&[("de", stored)]));
    }

    #[test]
    fn test_decode_nested_segments() {
        let stored = r#"{:en}<x>{"n":"{:en}Hi{:}{:de}Hallo{:}"}</x>{:}{:de}<y/>{:}"#;
        assert_eq!(
            decode_for_language(stored, &lang("en")),
            r#"<x>{"n":"{:en}Hi{:}{:de}Hallo{:}"}</x>"#
        );
        assert_eq!(decode_for_language(stored, &lang("de")), "<y/>");
    }

    #[test]
    fn test_decode_empty_input() {
        assert_eq!(decode_for_language("", &lang("en")), "");
    }

    // ==================== decode_all Tests ====================

    #[test]
    fn test_decode_all_splits_segments() {
        let decoded = decode_all("{:en}A{:}{:de}B{:}", &lang("en"));
        assert_eq!(decoded, values(&[("en", "A"), ("de", "B")]));
    }

    #[test]
    fn test_decode_all_legacy_goes_to_fallback() {
        let decoded = decode_all("<meta name=x>", &lang("de"));
        assert_eq!(decoded, values(&[("de", "<meta name=x>")]));
    }

    #[test]
    fn test_decode_all_empty() {
        assert!(decode_all("", &lang("en")).is_empty());
    }

    // ==================== has_tags Tests ====================

    #[test]
    fn test_has_tags() {
        assert!(has_tags("{:en}x{:}"));
        assert!(!has_tags("x{:}"));
        assert!(!has_tags("{: not a tag"));
        assert!(!has_tags("plain"));
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_round_trip(
            entries in proptest::collection::btree_map(
                "[a-z]{2}",
                "[^{}]{1,40}",
                0..5,
            )
        ) {
            let map: BTreeMap<LanguageCode, String> = entries
                .into_iter()
                .map(|(code, content)| (lang(&code), content))
                .collect();
            let encoded = encode(&map);
            for (code, content) in &map {
                prop_assert_eq!(&decode_for_language(&encoded, code), content);
            }
        }

        #[test]
        fn prop_decode_never_panics(stored in ".{0,80}", code in "[a-z]{2}") {
            let _ = decode_for_language(&stored, &lang(&code));
            let _ = decode_all(&stored, &lang(&code));
        }
    }
}
