//! Caret translation — global document offsets ⇄ (run, local offset).
//!
//! The composer works in flattened char offsets; the trigger detector and
//! the caller's suggestion UI want the text *around* the caret: the text run
//! containing it plus the caret's local offset within that run. This module
//! is the bridge. All lookups are pure queries against the content — nothing
//! here caches, so re-querying after a replacement always sees fresh state.

use crate::content::Content;
use crate::run::Run;

/// The text run containing the caret, as seen from the caret.
///
/// `start` is the run's global offset, `text` its full text, and `offset`
/// the caret's local char offset within it (`start + offset` == the global
/// caret). A caret that does not sit in or at the edge of a text run (empty
/// content, on an embed, out of range) yields the empty leaf — never an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Leaf {
    pub start: usize,
    pub text: String,
    pub offset: usize,
}

impl Leaf {
    /// The leaf text up to the caret, as a char count and string prefix.
    #[must_use]
    pub fn text_before_caret(&self) -> &str {
        let byte_end = self
            .text
            .char_indices()
            .nth(self.offset)
            .map_or(self.text.len(), |(i, _)| i);
        &self.text[..byte_end]
    }
}

/// Find the text run containing the global offset `caret`.
///
/// A caret at the boundary between a text run and anything else belongs to
/// the text run (both edges are inclusive), so a caret at the very end of a
/// span still sees that span — the position typing extends. The first
/// matching text run in document order wins.
#[must_use]
pub fn leaf_at(content: &Content, caret: usize) -> Leaf {
    let mut pos = 0;
    for run in content.runs() {
        let len = run.len();
        if let Run::Text(rope) = run {
            if caret >= pos && caret <= pos + len {
                return Leaf {
                    start: pos,
                    text: rope.to_string(),
                    offset: caret - pos,
                };
            }
        }
        pos += len;
    }
    Leaf::default()
}
