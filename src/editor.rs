//! What the editor surface shows for an item: the fields and their values.
//!
//! Rendering (markup, tab switching, styles) belongs to the host; this only
//! decides which fields exist and how they are prefilled.

use crate::codec;
use crate::i18n::{LanguageCode, LanguageConfig, MultilingualLayer};
use serde::Serialize;

/// Form field name of the fragment input. Per-language inputs use
/// `custom_js_head_field[<lang>]`.
pub const FIELD_NAME: &str = "custom_js_head_field";

const LABEL: &str =
    "Insert custom JavaScript that will be added to the <head> section of this page:";

/// One language tab in the multilingual editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorTab {
    pub language: LanguageCode,
    pub label: String,
    pub field_name: String,
    pub value: String,
    pub active: bool,
}

/// Editor contents for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EditorView {
    Plain {
        label: String,
        description: String,
        field_name: String,
        value: String,
    },
    Multilingual {
        label: String,
        description: String,
        tabs: Vec<EditorTab>,
    },
}

impl EditorView {
    /// Build the view for a stored value.
    ///
    /// In multilingual mode every enabled language gets a tab prefilled with
    /// its segment; an untagged legacy value lands in the default language
    /// tab. `active` selects the open tab when it is enabled, otherwise the
    /// first tab is open.
    pub fn build(
        stored: &str,
        layer: &dyn MultilingualLayer,
        priority: i32,
        active: Option<&LanguageCode>,
    ) -> Self {
        let label = LABEL.to_string();
        let description = format!(
            "Example: Schema.org markup, custom tracking code, etc. \
             This will be added to the <head> section with priority {}.",
            priority
        );

        if !layer.is_active() {
            return EditorView::Plain {
                label,
                description,
                field_name: FIELD_NAME.to_string(),
                value: stored.to_string(),
            };
        }

        let enabled = layer.enabled_languages();
        let mut values = codec::decode_all(stored, &layer.default_language());
        let active = active
            .filter(|code| enabled.contains(code))
            .or_else(|| enabled.first())
            .cloned();

        let tabs = enabled
            .iter()
            .map(|code| EditorTab {
                language: code.clone(),
                label: LanguageConfig::for_code(code.clone()).native_name,
                field_name: format!("{}[{}]", FIELD_NAME, code),
                value: values.remove(code).unwrap_or_default(),
                active: active.as_ref() == Some(code),
            })
            .collect();

        EditorView::Multilingual {
            label,
            description,
            tabs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{LanguageRegistry, Monolingual, StaticLayer};

    fn lang(code: &str) -> LanguageCode {
        LanguageCode::new(code).unwrap()
    }

    fn layer(default: Option<&str>) -> StaticLayer {
        let registry =
            LanguageRegistry::new(vec![lang("en"), lang("de")], default.map(lang)).unwrap();
        StaticLayer::new(registry)
    }

    fn tabs(view: EditorView) -> Vec<EditorTab> {
        match view {
            EditorView::Multilingual { tabs, .. } => tabs,
            other => panic!("Expected multilingual view, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_view_shows_raw_value() {
        let view = EditorView::build("{:en}A{:}", &Monolingual::default(), 11, None);
        match view {
            EditorView::Plain {
                field_name,
                value,
                description,
                ..
            } => {
                assert_eq!(field_name, "custom_js_head_field");
                assert_eq!(value, "{:en}A{:}");
                assert!(description.contains("priority 11"));
            }
            other => panic!("Expected plain view, got {:?}", other),
        }
    }

    #[test]
    fn test_tabs_follow_enabled_order_and_prefill() {
        let tabs = tabs(EditorView::build("{:de}B{:}{:en}A{:}", &layer(None), 11, None));
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs[0].language.as_str(), "en");
        assert_eq!(tabs[0].value, "A");
        assert_eq!(tabs[0].field_name, "custom_js_head_field[en]");
        assert_eq!(tabs[1].language.as_str(), "de");
        assert_eq!(tabs[1].value, "B");
        assert_eq!(tabs[1].label, "Deutsch");
    }

    #[test]
    fn test_first_tab_active_by_default() {
        let tabs = tabs(EditorView::build("", &layer(None), 11, None));
        assert!(tabs[0].active);
        assert!(!tabs[1].active);
    }

    #[test]
    fn test_requested_tab_active() {
        let de = lang("de");
        let tabs = tabs(EditorView::build("", &layer(None), 11, Some(&de)));
        assert!(!tabs[0].active);
        assert!(tabs[1].active);
    }

    #[test]
    fn test_disabled_requested_tab_falls_back_to_first() {
        let fr = lang("fr");
        let tabs = tabs(EditorView::build("", &layer(None), 11, Some(&fr)));
        assert!(tabs[0].active);
    }

    #[test]
    fn test_legacy_value_goes_to_default_tab() {
        let tabs = tabs(EditorView::build("<script>x()</script>", &layer(Some("de")), 11, None));
        assert_eq!(tabs[0].value, "");
        assert_eq!(tabs[1].value, "<script>x()</script>");
    }

    #[test]
    fn test_serializes_with_mode_tag() {
        let view = EditorView::build("", &Monolingual::default(), 11, None);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["mode"], "plain");
    }
}
