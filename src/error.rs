use thiserror::Error;

/// Errors surfaced by the save path and the storage backends.
///
/// The render path never returns these: failures there degrade to
/// emitting nothing.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid language code: '{0}'")]
    InvalidLanguageCode(String),

    #[error("language '{0}' is not enabled")]
    UnknownLanguage(String),

    #[error("at least one language must be enabled")]
    NoLanguages,

    #[error("store operation '{operation}' failed for item {item_id}: {message}")]
    Store {
        operation: &'static str,
        item_id: u64,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
