//! Structured-data rewriter.
//!
//! Finds `<script type="application/ld+json">` blocks in an emitted
//! fragment and resolves every tagged string leaf in their JSON to one
//! language. Blocks that do not parse are left alone.

use crate::codec;
use crate::i18n::LanguageCode;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

static LD_JSON_REGEX: OnceLock<Regex> = OnceLock::new();

fn ld_json_regex() -> &'static Regex {
    LD_JSON_REGEX.get_or_init(|| {
        Regex::new(
            r#"(?is)(<script\b[^>]*?\btype\s*=\s*["']?application/ld\+json["']?[^>]*>)(.*?)(</script\s*>)"#,
        )
        .unwrap()
    })
}

/// Rewrite the tagged strings of every JSON-LD block in `output` to `lang`.
///
/// Returns `output` byte-for-byte when nothing needed rewriting, so the
/// call is idempotent.
///
/// # Example
/// ```
/// use custom_head_code::{i18n::LanguageCode, rewriter};
///
/// let html = r#"<script type="application/ld+json">{"name":"{:en}Hello{:}{:de}Hallo{:}"}</script>"#;
/// let de = LanguageCode::new("de").unwrap();
/// assert_eq!(
///     rewriter::rewrite(html, &de),
///     r#"<script type="application/ld+json">{"name":"Hallo"}</script>"#
/// );
/// ```
pub fn rewrite(output: &str, lang: &LanguageCode) -> String {
    let regex = ld_json_regex();
    if !regex.is_match(output) {
        return output.to_string();
    }

    let mut rewritten = String::with_capacity(output.len());
    let mut last = 0;
    let mut changed = false;

    for cap in regex.captures_iter(output) {
        let (Some(open), Some(inner), Some(close)) = (cap.get(1), cap.get(2), cap.get(3)) else {
            continue;
        };

        let Some(replacement) = rewrite_block(inner.as_str(), lang) else {
            continue;
        };

        rewritten.push_str(&output[last..open.end()]);
        rewritten.push_str(&replacement);
        last = close.start();
        changed = true;
    }

    if !changed {
        return output.to_string();
    }

    rewritten.push_str(&output[last..]);
    rewritten
}

/// Rewrite one block's inner text, or `None` when it should stay as is.
fn rewrite_block(inner: &str, lang: &LanguageCode) -> Option<String> {
    if !inner.contains(codec::TAG_OPEN) {
        return None;
    }

    let mut tree: Value = match serde_json::from_str(inner) {
        Ok(tree) => tree,
        Err(e) => {
            debug!("Skipping structured-data block that does not parse: {}", e);
            return None;
        }
    };

    if !rewrite_value(&mut tree, lang) {
        return None;
    }

    let serialized = if inner.trim().contains('\n') {
        serde_json::to_string_pretty(&tree).ok()?
    } else {
        serde_json::to_string(&tree).ok()?
    };

    // Keep the whitespace that surrounded the JSON inside the script tag.
    let leading = &inner[..inner.len() - inner.trim_start().len()];
    let trailing = &inner[inner.trim_end().len()..];
    Some(format!("{leading}{serialized}{trailing}"))
}

/// Depth-first rewrite of string leaves. Returns whether anything changed.
fn rewrite_value(value: &mut Value, lang: &LanguageCode) -> bool {
    match value {
        Value::String(leaf) => {
            if !codec::has_tags(leaf) {
                return false;
            }
            let resolved = resolve_leaf(leaf, lang);
            if resolved == *leaf {
                return false;
            }
            *leaf = resolved;
            true
        }
        Value::Array(items) => items
            .iter_mut()
            .fold(false, |changed, item| rewrite_value(item, lang) | changed),
        Value::Object(map) => map
            .values_mut()
            .fold(false, |changed, item| rewrite_value(item, lang) | changed),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Decode a leaf until no tags remain.
///
/// Each pass strips at least one tag, so this terminates.
fn resolve_leaf(leaf: &str, lang: &LanguageCode) -> String {
    let mut current = leaf.to_string();
    while codec::has_tags(&current) {
        let next = codec::decode_for_language(&current, lang);
        if next == current {
            break;
        }
        current = next;
    }
    current
}
