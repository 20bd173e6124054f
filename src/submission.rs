//! Editor submissions: a single field or one field per language.

use crate::codec;
use crate::error::Result;
use crate::i18n::LanguageCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The value posted by the editor surface.
///
/// The shape is decided once, from the incoming data: a string is a plain
/// submission, an object keyed by language code is a per-language one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Submission {
    Plain(String),
    PerLanguage(BTreeMap<String, String>),
}

impl Submission {
    /// Encode into the stored representation.
    ///
    /// # Returns
    /// * `Err(Error::InvalidLanguageCode)` if a per-language key is not a
    ///   valid code; nothing is encoded in that case
    pub fn encode(&self) -> Result<String> {
        match self {
            Submission::Plain(value) => Ok(codec::encode_plain(value)),
            Submission::PerLanguage(fields) => {
                let values = fields
                    .iter()
                    .map(|(code, content)| {
                        LanguageCode::new(code.as_str()).map(|lang| (lang, content.clone()))
                    })
                    .collect::<Result<BTreeMap<LanguageCode, String>>>()?;
                Ok(codec::encode(&values))
            }
        }
    }
}

impl From<String> for Submission {
    fn from(value: String) -> Self {
        Submission::Plain(value)
    }
}

impl From<&str> for Submission {
    fn from(value: &str) -> Self {
        Submission::Plain(value.to_string())
    }
}
