//! # md-emoji — Emoji lookup tables for md-compose
//!
//! Two independently configured, read-only tables:
//!
//! - the **name table**: `smile` → presentation reference (image URL),
//!   queried by the colon trigger (`:smile:`) and by explicit
//!   insert-emoji commands
//! - the **literal-alias table**: `:)` → `smile`, queried by the
//!   space-terminated literal trigger
//!
//! Neither table is assumed to be a subset of the other: an alias may point
//! at a name that was never registered, in which case lookups resolve to
//! `None` and the trigger is simply a no-op. The composer holds the map
//! behind an `Arc` and never mutates it — all mutation happens at
//! configuration time.
//!
//! Definitions derive serde so hosts can load maps straight from JSON/TOML
//! configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Emoji
// ---------------------------------------------------------------------------

/// One emoji definition: its shortcode name and presentation reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoji {
    /// The shortcode name, without colons (`smile`, `thumbsup`, `+1`).
    pub name: String,
    /// Presentation reference — typically an image URL.
    pub source: String,
}

impl Emoji {
    /// Create an emoji definition.
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// EmojiMap
// ---------------------------------------------------------------------------

/// The emoji map: name table plus literal-alias table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmojiMap {
    by_name: HashMap<String, Emoji>,
    literal_aliases: HashMap<String, String>,
}

impl EmojiMap {
    /// An empty map — every lookup misses, every trigger is a no-op.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an emoji under its name. A later registration with the same
    /// name replaces the earlier one.
    pub fn insert(&mut self, emoji: Emoji) {
        self.by_name.insert(emoji.name.clone(), emoji);
    }

    /// Register a literal alias (`":)"` → `"smile"`). The target name does
    /// not need to exist yet — resolution happens at lookup time.
    pub fn alias(&mut self, literal: impl Into<String>, name: impl Into<String>) {
        self.literal_aliases.insert(literal.into(), name.into());
    }

    /// Look up an emoji by shortcode name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Emoji> {
        self.by_name.get(name)
    }

    /// Resolve a literal token through the alias table to its emoji.
    /// A dangling alias (target name unregistered) resolves to `None`.
    #[must_use]
    pub fn resolve_literal(&self, literal: &str) -> Option<&Emoji> {
        self.by_name.get(self.literal_aliases.get(literal)?)
    }

    /// Number of registered emoji names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// True when no names are registered (aliases may still exist, but they
    /// can only dangle).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl FromIterator<Emoji> for EmojiMap {
    fn from_iter<I: IntoIterator<Item = Emoji>>(iter: I) -> Self {
        let mut map = Self::new();
        for emoji in iter {
            map.insert(emoji);
        }
        map
    }
}
