//! Per-item custom head markup.
//!
//! An editor attaches a markup/script fragment to a content item; at render
//! time the fragment is resolved to the page language and emitted into the
//! page head. With a multilingual layer active, the stored value holds one
//! `{:<lang>}...{:}` segment per language, and tagged strings inside JSON-LD
//! blocks are resolved as well.
//!
//! Data flow: editor submission → [`codec`] encode → [`store`] ... [`store`]
//! load → [`resolver`] → [`rewriter`] → [`injector`] emit.

pub mod codec;
pub mod config;
pub mod editor;
pub mod error;
pub mod i18n;
pub mod injector;
pub mod resolver;
pub mod rewriter;
pub mod server;
pub mod store;
pub mod submission;

pub use error::{Error, Result};
pub use injector::{HeadInjector, PageContext, SaveOutcome, SaveRequest, DEFAULT_PRIORITY};
pub use submission::Submission;
