//! Outbound events — what the composer tells its caller.
//!
//! The composer is purely reactive and single-threaded (no `Send` bounds on
//! handlers): every callback fires synchronously inside the edit that caused
//! it, and nothing here is an error channel — callers only ever observe
//! successfully derived values.

/// Payload of the accepted-edit callback.
///
/// `leaf_text`/`leaf_offset` are the text run at the caret and the caret's
/// local offset within it — the context a suggestion UI needs to look at the
/// text immediately behind the caret. Both are empty/zero when the caret is
/// not in a text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The current derived markdown value.
    pub markdown: String,
    /// Text of the run containing the caret.
    pub leaf_text: String,
    /// Caret offset within `leaf_text`, in chars.
    pub leaf_offset: usize,
}

/// Handler for accepted local edits and commands.
pub type ChangeHandler = Box<dyn FnMut(&ChangeEvent)>;

/// Handler for composition-update passthrough: `(composition data, leaf
/// text at caret)`. Read-only context — composition updates never mutate the
/// document.
pub type CompositionHandler = Box<dyn FnMut(&str, &str)>;
