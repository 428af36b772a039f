//! The document — exclusively-owned editing primitive.
//!
//! `Document` pairs [`Content`] with a caret and exposes the narrow contract
//! the composer builds on: apply a delta, replace everything, read back
//! content and caret. Nothing else mutates the content; callers that want
//! undo semantics apply [`Delta::invert`] themselves.
//!
//! The caret is always kept within `0..=len()` — every mutation re-clamps.

use crate::caret::{Leaf, leaf_at};
use crate::content::Content;
use crate::delta::{Delta, DeltaError};

/// The rich document: normalized content plus a caret.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    content: Content,
    caret: usize,
}

impl Document {
    /// An empty document with the caret at the start.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            content: Content::new(),
            caret: 0,
        }
    }

    /// A document seeded from a plain string as one text run, caret at the
    /// end (the position typing continues from).
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let content = Content::from_text(text);
        let caret = content.len();
        Self { content, caret }
    }

    // -- Read-back ----------------------------------------------------------

    /// Current content.
    #[must_use]
    pub const fn content(&self) -> &Content {
        &self.content
    }

    /// Flattened content length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// True when the document holds no runs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Global caret offset.
    #[must_use]
    pub const fn caret(&self) -> usize {
        self.caret
    }

    /// The text run at the caret, freshly computed. See [`leaf_at`].
    #[must_use]
    pub fn leaf(&self) -> Leaf {
        leaf_at(&self.content, self.caret)
    }

    // -- Mutation -----------------------------------------------------------

    /// Apply a delta. On success the content is swapped for the edited
    /// content and the caret is carried through the edit
    /// ([`Delta::transform_caret`]); on error nothing changes.
    ///
    /// # Errors
    ///
    /// [`DeltaError::PastEnd`] when the delta addresses positions past the
    /// end of the content.
    pub fn apply(&mut self, delta: &Delta) -> Result<(), DeltaError> {
        let next = delta.apply(&self.content)?;
        self.caret = delta.transform_caret(self.caret).min(next.len());
        self.content = next;
        Ok(())
    }

    /// Replace the entire content with a single plain-text run. Lossy: any
    /// rich structure is discarded. The caret moves to `caret` (clamped), or
    /// to the document start when `None`.
    pub fn replace_with_text(&mut self, text: &str, caret: Option<usize>) {
        self.content = Content::from_text(text);
        self.caret = caret.unwrap_or(0).min(self.content.len());
    }

    /// Restore a previously captured content/caret pair exactly.
    pub fn restore(&mut self, content: Content, caret: usize) {
        self.caret = caret.min(content.len());
        self.content = content;
    }

    /// Move the caret (clamped to the content length).
    pub fn set_caret(&mut self, caret: usize) {
        self.caret = caret.min(self.len());
    }

    /// Move the caret past the last run.
    pub fn caret_to_end(&mut self) {
        self.caret = self.len();
    }
}
