//! Language resolver: pick the fragment for the language being rendered.

use crate::codec;
use crate::i18n::{LanguageCode, MultilingualLayer};

/// Select the content of `stored` for `current`.
///
/// With the multilingual layer inactive the stored value is used as is.
pub fn resolve(stored: &str, current: &LanguageCode, multilingual_active: bool) -> String {
    if !multilingual_active {
        return stored.to_string();
    }
    codec::decode_for_language(stored, current)
}

/// Resolve against a layer's own state, using its `filter` primitive.
pub fn resolve_with(layer: &dyn MultilingualLayer, stored: &str) -> String {
    if !layer.is_active() {
        return stored.to_string();
    }
    layer.filter(stored, &layer.current_language())
}
