//! Language code type: a validated short language identifier.
//!
//! The set of valid codes belongs to the multilingual layer; this type only
//! guarantees that a code can be written inside a `{:<code>}` tag without
//! breaking the tag grammar.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest accepted language code (covers forms like "zh-hans" or "pt_br").
pub const MAX_CODE_LEN: usize = 10;

/// A short language identifier such as "en" or "de".
///
/// Ordering is plain string ordering, which gives the ascending code order
/// the codec uses when encoding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Create a language code from a string.
    ///
    /// # Returns
    /// * `Ok(LanguageCode)` if the code is 1 to 10 characters of `[A-Za-z0-9_-]`
    /// * `Err(Error::InvalidLanguageCode)` otherwise
    ///
    /// # Example
    /// ```
    /// use custom_head_code::i18n::LanguageCode;
    ///
    /// let de = LanguageCode::new("de").unwrap();
    /// assert_eq!(de.as_str(), "de");
    /// assert!(LanguageCode::new("d}e").is_err());
    /// ```
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        if is_valid_code(&code) {
            Ok(Self(code))
        } else {
            Err(Error::InvalidLanguageCode(code))
        }
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether `code` can appear inside a language tag.
pub(crate) fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LEN
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for LanguageCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}
