//! The multilingual layer contract and its two stock implementations.

use crate::codec;
use crate::i18n::{LanguageCode, LanguageRegistry};

/// What the host's multilingual plugin exposes to the pipeline.
///
/// `filter` defaults to the field codec's decoder, which is what every
/// known layer does.
pub trait MultilingualLayer {
    fn is_active(&self) -> bool;

    /// Enabled languages, in display order. Empty when inactive.
    fn enabled_languages(&self) -> Vec<LanguageCode>;

    fn default_language(&self) -> LanguageCode;

    /// The language of the page being rendered or edited.
    fn current_language(&self) -> LanguageCode;

    fn filter(&self, text: &str, lang: &LanguageCode) -> String {
        codec::decode_for_language(text, lang)
    }
}

/// An active layer backed by a fixed registry, for one request language.
#[derive(Debug, Clone)]
pub struct StaticLayer {
    registry: LanguageRegistry,
    current: LanguageCode,
}

impl StaticLayer {
    /// Create a layer whose current language is the registry default.
    pub fn new(registry: LanguageRegistry) -> Self {
        let current = registry.default_language().clone();
        Self { registry, current }
    }

    /// Switch the current language.
    ///
    /// A code that is not enabled leaves the current language unchanged and
    /// returns `false`.
    pub fn set_current(&mut self, code: &str) -> bool {
        match self.registry.get_by_code(code) {
            Some(config) => {
                self.current = config.code.clone();
                true
            }
            None => false,
        }
    }

    /// Copy of this layer with a different current language.
    pub fn with_current(&self, code: &str) -> Option<Self> {
        let mut layer = self.clone();
        layer.set_current(code).then_some(layer)
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }
}

impl MultilingualLayer for StaticLayer {
    fn is_active(&self) -> bool {
        true
    }

    fn enabled_languages(&self) -> Vec<LanguageCode> {
        self.registry.codes()
    }

    fn default_language(&self) -> LanguageCode {
        self.registry.default_language().clone()
    }

    fn current_language(&self) -> LanguageCode {
        self.current.clone()
    }
}

/// The layer used when no multilingual plugin is installed.
///
/// It reports a single nominal language so callers never need to special
/// case the language accessors.
#[derive(Debug, Clone)]
pub struct Monolingual {
    language: LanguageCode,
}

impl Monolingual {
    pub fn new(language: LanguageCode) -> Self {
        Self { language }
    }
}

impl Default for Monolingual {
    fn default() -> Self {
        Self {
            language: LanguageCode::new("en").expect("\"en\" is a valid language code"),
        }
    }
}

impl MultilingualLayer for Monolingual {
    fn is_active(&self) -> bool {
        false
    }

    fn enabled_languages(&self) -> Vec<LanguageCode> {
        Vec::new()
    }

    fn default_language(&self) -> LanguageCode {
        self.language.clone()
    }

    fn current_language(&self) -> LanguageCode {
        self.language.clone()
    }
}
