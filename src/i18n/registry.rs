//! Language registry: the enabled languages and the default one.
//!
//! This is what the multilingual layer reports when it is active. A registry
//! is built from configuration and owned by the layer that wraps it.

use crate::error::{Error, Result};
use crate::i18n::LanguageCode;

/// Metadata for one enabled language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Language code used in tags (e.g., "en", "de")
    pub code: LanguageCode,

    /// English name of the language (e.g., "German")
    pub name: String,

    /// Native name of the language (e.g., "Deutsch")
    pub native_name: String,
}

impl LanguageConfig {
    /// Build the config for a code, filling names from the built-in table.
    ///
    /// Codes missing from the table get their upper-cased code as both names.
    pub fn for_code(code: LanguageCode) -> Self {
        let (name, native_name) = match known_names(code.as_str()) {
            Some((name, native)) => (name.to_string(), native.to_string()),
            None => {
                let upper = code.as_str().to_uppercase();
                (upper.clone(), upper)
            }
        };
        Self {
            code,
            name,
            native_name,
        }
    }
}

/// Ordered set of enabled languages with a designated default.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
    default: LanguageCode,
}

impl LanguageRegistry {
    /// Create a registry from enabled codes, in display order.
    ///
    /// Duplicate codes are collapsed (first occurrence wins). The default is
    /// `default` when given, otherwise the first enabled code.
    ///
    /// # Returns
    /// * `Err(Error::NoLanguages)` if `codes` is empty
    /// * `Err(Error::UnknownLanguage)` if `default` is not among `codes`
    pub fn new(codes: Vec<LanguageCode>, default: Option<LanguageCode>) -> Result<Self> {
        let mut languages: Vec<LanguageConfig> = Vec::with_capacity(codes.len());
        for code in codes {
            if !languages.iter().any(|lang| lang.code == code) {
                languages.push(LanguageConfig::for_code(code));
            }
        }

        let first = languages.first().ok_or(Error::NoLanguages)?.code.clone();
        let default = match default {
            Some(code) if languages.iter().any(|lang| lang.code == code) => code,
            Some(code) => return Err(Error::UnknownLanguage(code.to_string())),
            None => first,
        };

        Ok(Self { languages, default })
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code.as_str() == code)
    }

    /// All enabled languages, in display order.
    pub fn list_enabled(&self) -> &[LanguageConfig] {
        &self.languages
    }

    /// Enabled language codes, in display order.
    pub fn codes(&self) -> Vec<LanguageCode> {
        self.languages.iter().map(|lang| lang.code.clone()).collect()
    }

    /// The default language.
    pub fn default_language(&self) -> &LanguageCode {
        &self.default
    }

    /// Check if a language code is enabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }
}

/// English and native names for common language codes.
fn known_names(code: &str) -> Option<(&'static str, &'static str)> {
    let names = match code {
        "en" => ("English", "English"),
        "de" => ("German", "Deutsch"),
        "es" => ("Spanish", "Español"),
        "fr" => ("French", "Français"),
        "it" => ("Italian", "Italiano"),
        "nl" => ("Dutch", "Nederlands"),
        "pl" => ("Polish", "Polski"),
        "pt" => ("Portuguese", "Português"),
        "ru" => ("Russian", "Русский"),
        "uk" => ("Ukrainian", "Українська"),
        "sv" => ("Swedish", "Svenska"),
        "ja" => ("Japanese", "日本語"),
        "zh" => ("Chinese", "中文"),
        _ => return None,
    };
    Some(names)
}
