use crate::i18n::{LanguageCode, LanguageRegistry};
use crate::injector::DEFAULT_PRIORITY;
use crate::store::DEFAULT_META_KEY;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub api_key: Option<String>,

    // Storage
    pub store_path: Option<String>,
    pub meta_key: String,

    // Injection
    pub head_priority: i32,

    // Multilingual layer (empty = inactive)
    pub languages: Vec<LanguageCode>,
    pub default_language: Option<LanguageCode>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let languages = std::env::var("LANGUAGES")
            .map(|v| parse_language_list(&v))
            .unwrap_or_else(|_| Ok(Vec::new()))
            .context("LANGUAGES contains an invalid language code")?;

        let default_language = match std::env::var("DEFAULT_LANGUAGE") {
            Ok(v) if !v.trim().is_empty() => Some(
                LanguageCode::new(v.trim()).context("DEFAULT_LANGUAGE is not a valid language code")?,
            ),
            _ => None,
        };

        let config = Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            api_key: std::env::var("API_KEY").ok().filter(|v| !v.is_empty()),

            store_path: std::env::var("STORE_PATH").ok().filter(|v| !v.is_empty()),
            meta_key: std::env::var("META_KEY").unwrap_or_else(|_| DEFAULT_META_KEY.to_string()),

            head_priority: std::env::var("HEAD_PRIORITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PRIORITY),

            languages,
            default_language,
        };

        // Fail at startup on a DEFAULT_LANGUAGE outside LANGUAGES.
        config.language_registry()?;
        Ok(config)
    }

    /// Registry for the multilingual layer, or `None` when it is inactive.
    pub fn language_registry(&self) -> Result<Option<LanguageRegistry>> {
        if self.languages.is_empty() {
            return Ok(None);
        }
        let registry = LanguageRegistry::new(self.languages.clone(), self.default_language.clone())
            .context("DEFAULT_LANGUAGE must be one of LANGUAGES")?;
        Ok(Some(registry))
    }
}

/// Parse a comma-separated list such as "en, de,fr".
fn parse_language_list(value: &str) -> crate::error::Result<Vec<LanguageCode>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(LanguageCode::new)
        .collect()
}
