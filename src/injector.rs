//! The head-injection pipeline: load, resolve, rewrite, emit.

use crate::editor::EditorView;
use crate::error::Result;
use crate::i18n::{LanguageCode, MultilingualLayer};
use crate::resolver;
use crate::rewriter;
use crate::store::{FragmentStore, ItemId};
use crate::submission::Submission;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Priority of the head hook; higher runs later.
pub const DEFAULT_PRIORITY: i32 = 11;

/// The page being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageContext {
    /// The content item shown, if any.
    pub item_id: Option<ItemId>,
    /// Whether this is a single-item view rather than a listing.
    pub singular: bool,
}

impl PageContext {
    pub fn singular(item_id: ItemId) -> Self {
        Self {
            item_id: Some(item_id),
            singular: true,
        }
    }

    pub fn listing() -> Self {
        Self {
            item_id: None,
            singular: false,
        }
    }
}

/// A save coming from the editor surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub autosave: bool,
    /// `None` when the form did not carry the field at all.
    pub submission: Option<Submission>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved,
    SkippedAutosave,
    SkippedMissingField,
}

/// Entry point for the host: one instance wired at startup.
pub struct HeadInjector<S> {
    store: S,
    priority: i32,
}

impl<S: FragmentStore> HeadInjector<S> {
    pub fn new(store: S) -> Self {
        Self::with_priority(store, DEFAULT_PRIORITY)
    }

    pub fn with_priority(store: S, priority: i32) -> Self {
        Self { store, priority }
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Produce the markup to place in the page head, if any.
    ///
    /// Never fails: a storage error is logged and nothing is emitted. The
    /// result is not escaped.
    pub fn render_head(&self, page: &PageContext, layer: &dyn MultilingualLayer) -> Option<String> {
        if !page.singular {
            return None;
        }
        let item_id = page.item_id?;

        let stored = match self.store.load(item_id) {
            Ok(Some(stored)) => stored,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to load head fragment for item {}: {}", item_id, e);
                return None;
            }
        };

        let mut output = resolver::resolve_with(layer, &stored);
        if layer.is_active() {
            output = rewriter::rewrite(&output, &layer.current_language());
        }

        if output.is_empty() {
            debug!(
                "No head fragment for item {} in '{}'",
                item_id,
                layer.current_language()
            );
            return None;
        }
        Some(output)
    }

    /// Store an editor submission, overwriting the previous value.
    pub fn save(&self, item_id: ItemId, request: SaveRequest) -> Result<SaveOutcome> {
        if request.autosave {
            debug!("Skipping autosave for item {}", item_id);
            return Ok(SaveOutcome::SkippedAutosave);
        }

        let Some(submission) = request.submission else {
            debug!("No head fragment field submitted for item {}", item_id);
            return Ok(SaveOutcome::SkippedMissingField);
        };

        let encoded = submission.encode()?;
        self.store.save(item_id, &encoded)?;
        info!("Saved head fragment for item {} ({} bytes)", item_id, encoded.len());
        Ok(SaveOutcome::Saved)
    }

    /// Editor contents for an item. A missing value shows empty fields.
    pub fn editor_view(
        &self,
        item_id: ItemId,
        layer: &dyn MultilingualLayer,
        active: Option<&LanguageCode>,
    ) -> Result<EditorView> {
        let stored = self.store.load(item_id)?.unwrap_or_default();
        Ok(EditorView::build(&stored, layer, self.priority, active))
    }
}
