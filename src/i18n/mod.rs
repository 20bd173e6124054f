//! Language handling for multilingual fragments.
//!
//! # Architecture
//!
//! - `language`: `LanguageCode`, a validated code that is safe inside a tag
//! - `registry`: the enabled languages and the default one
//! - `layer`: the `MultilingualLayer` contract the pipeline talks to
//!
//! # Example
//!
//! ```rust
//! use custom_head_code::i18n::{LanguageCode, LanguageRegistry, MultilingualLayer, StaticLayer};
//!
//! let codes = vec![LanguageCode::new("en")?, LanguageCode::new("de")?];
//! let registry = LanguageRegistry::new(codes, None)?;
//! let layer = StaticLayer::new(registry).with_current("de").unwrap();
//! assert_eq!(layer.current_language().as_str(), "de");
//! # Ok::<(), custom_head_code::Error>(())
//! ```

mod language;
mod layer;
mod registry;

pub use language::{LanguageCode, MAX_CODE_LEN};
pub use layer::{Monolingual, MultilingualLayer, StaticLayer};
pub use registry::{LanguageConfig, LanguageRegistry};
