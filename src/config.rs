//! Composer configuration.
//!
//! Everything the host decides up front: the length bound, the emoji map,
//! pass-through presentation knobs, and the loop-break flag. The composer
//! never mutates its configuration after construction.

use std::sync::Arc;

use md_emoji::EmojiMap;

/// Configuration for a [`crate::Composer`].
#[derive(Debug, Clone, Default)]
pub struct ComposerConfig {
    /// Hard upper bound on the serialized markdown length, in chars. Edits
    /// that would exceed it are fully undone, never truncated. `None` means
    /// unbounded.
    pub max_length: Option<usize>,

    /// Shared, read-only emoji tables (names + literal aliases).
    pub emoji_map: Arc<EmojiMap>,

    /// Placeholder text shown by the host surface when the value is empty.
    /// Pass-through only — the composer never renders it.
    pub placeholder: String,

    /// When set, local edit events and commands are ignored.
    pub disabled: bool,

    /// Loop-break predicate: when set, an external value equal to the
    /// *previous* derived value is treated as a stale echo of this
    /// composer's own output and dropped.
    ///
    /// Off by default. Enable it only for the composer instance whose host
    /// actually feeds the change callback back into `set_value` — turning it
    /// on everywhere would silently swallow legitimate one-step-back
    /// external updates.
    pub suppress_value_echo: bool,
}

impl ComposerConfig {
    /// Configuration with the given emoji map and everything else default.
    #[must_use]
    pub fn new(emoji_map: Arc<EmojiMap>) -> Self {
        Self {
            emoji_map,
            ..Self::default()
        }
    }

    /// Set the maximum serialized length.
    #[must_use]
    pub const fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Set the placeholder pass-through.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Disable local editing.
    #[must_use]
    pub const fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Enable the stale-echo suppression rule.
    #[must_use]
    pub const fn with_value_echo_suppression(mut self) -> Self {
        self.suppress_value_echo = true;
        self
    }
}
