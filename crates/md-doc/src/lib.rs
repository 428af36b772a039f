//! # md-doc — Rich-document primitive for md-compose
//!
//! The structured side of the markdown ⇄ rich-document synchronization:
//!
//! - **[`run`]** — `Run` (plain text or embedded object) and the flattened
//!   char-offset coordinate space (an embed counts as one position)
//! - **[`content`]** — `Content`, an always-normalized run sequence
//! - **[`delta`]** — `Delta`, ordered retain/delete/insert ops with
//!   application, inversion, and caret transformation
//! - **[`caret`]** — global offset ⇄ (run, local offset) translation
//! - **[`markdown`]** — the pure content → markdown serializer
//! - **[`document`]** — `Document`, the owned content + caret the composer
//!   mutates through deltas
//!
//! This crate knows nothing about triggers, length limits, or value
//! reconciliation — that all lives in the `md-compose` root crate.

pub mod caret;
pub mod content;
pub mod delta;
pub mod document;
pub mod markdown;
pub mod run;

pub use caret::{Leaf, leaf_at};
pub use content::Content;
pub use delta::{Delta, DeltaError, Op};
pub use document::Document;
pub use markdown::to_markdown;
pub use run::{EmbedObject, Run};
