//! # md-compose — markdown ⇄ rich-document synchronization core
//!
//! Keeps two representations of one evolving value consistent without
//! feedback loops: the caller's plain markdown string and a structured
//! document of text runs and embedded emoji, mutated through deltas by an
//! editing surface. On top of every edit sit three coupled behaviors:
//!
//! - **trigger detection** — inline autocompletion: `:smile:` shortcodes
//!   and literal aliases like `:)` become embedded emoji as you type
//! - **[`guard`]** — hard length-limit enforcement that undoes disallowed
//!   edits transactionally (never truncates)
//! - **[`composer`]** — the reconciliation controller arbitrating external
//!   values against local edits with a two-slot echo-breaking memory, plus
//!   the caller command surface (insert text/emoji at caret, replace all)
//!
//! The document primitive itself (runs, deltas, caret math, serialization)
//! lives in the `md-doc` crate; emoji tables in `md-emoji`. Rendering,
//! keyboard delivery, and host-framework lifecycle are out of scope — this
//! crate is the logic between a surface and its caller.
//!
//! ```
//! use md_compose::{Composer, ComposerConfig};
//! use md_doc::Delta;
//! use md_emoji::{Emoji, EmojiMap};
//! use std::sync::Arc;
//!
//! let map: EmojiMap = [Emoji::new("smile", "emoji/smile.png")].into_iter().collect();
//! let mut composer = Composer::new(ComposerConfig::new(Arc::new(map)), "");
//!
//! // The surface reports a typed shortcode; the trigger embeds it.
//! composer.handle_edit(&Delta::new().insert_text("hi :smile:"));
//! assert_eq!(composer.value(), "hi :smile: ");
//! assert_eq!(composer.document().content().runs().len(), 3);
//! ```

pub mod composer;
pub mod config;
pub mod event;
pub mod guard;
mod trigger;

pub use composer::Composer;
pub use config::ComposerConfig;
pub use event::{ChangeEvent, ChangeHandler, CompositionHandler};
pub use guard::Verdict;

pub use md_doc::{Content, Delta, DeltaError, Document, EmbedObject, Leaf, Op, Run, to_markdown};
pub use md_emoji::{Emoji, EmojiMap};
