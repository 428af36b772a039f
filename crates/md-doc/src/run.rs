//! Content runs — the atoms of the rich document.
//!
//! A document is an ordered sequence of [`Run`]s. Each run is either a span
//! of plain text or a single embedded inline object (an emoji rendered from
//! an image). The concatenation of all runs is "the document content."
//!
//! # Coordinate system
//!
//! All document offsets count positions in the *flattened* content: a text
//! run contributes one position per Unicode scalar value (char), an embedded
//! object contributes exactly **one** position regardless of how it renders.
//! Byte offsets never appear in the public API.

use std::fmt;

use ropey::Rope;

// ---------------------------------------------------------------------------
// EmbedObject
// ---------------------------------------------------------------------------

/// An embedded inline object — an emoji identified by name.
///
/// `name` keys the emoji map (and the `:name:` markdown shortcode). `source`
/// is the presentation reference (typically an image URL) resolved from the
/// map when the object was inserted. The document stores the resolved source
/// so serialization and rendering never need the map again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedObject {
    pub name: String,
    pub source: String,
}

impl EmbedObject {
    /// Create an embed object from a name and presentation source.
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// The markdown shortcode this object serializes to (`:name:`).
    #[must_use]
    pub fn shortcode(&self) -> String {
        format!(":{}:", self.name)
    }
}

impl fmt::Display for EmbedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}:", self.name)
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// One run of document content: a plain-text span or an embedded object.
///
/// Text is stored in a [`ropey::Rope`]: char-indexed splicing is what delta
/// application does all day, and rope clones are O(1), which keeps the
/// pre-edit snapshots needed for inversion cheap.
#[derive(Debug, Clone, PartialEq)]
pub enum Run {
    /// A contiguous span of plain text.
    Text(Rope),
    /// A single embedded inline object.
    Embed(EmbedObject),
}

impl Run {
    /// Create a text run from a string slice.
    #[must_use]
    pub fn text(s: &str) -> Self {
        Self::Text(Rope::from_str(s))
    }

    /// Create an embed run.
    #[must_use]
    pub fn embed(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self::Embed(EmbedObject::new(name, source))
    }

    /// Length of this run in flattened positions: char count for text,
    /// exactly 1 for an embed.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(rope) => rope.len_chars(),
            Self::Embed(_) => 1,
        }
    }

    /// True for a text run containing no characters. An embed is never
    /// empty — it always occupies one position.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(rope) => rope.len_chars() == 0,
            Self::Embed(_) => false,
        }
    }

    /// The text of this run, or `None` for an embed.
    #[must_use]
    pub const fn as_text(&self) -> Option<&Rope> {
        match self {
            Self::Text(rope) => Some(rope),
            Self::Embed(_) => None,
        }
    }

    /// True if this run is a text run.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}
