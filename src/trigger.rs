//! Trigger detection — auto-replacing typed patterns with embeds.
//!
//! Runs after every accepted local edit (never after commands — those are
//! already the result of an accepted suggestion). Two independent checks in
//! fixed order, each operating on fresh caret/leaf state queried from the
//! document — a replacement by the first check is fully visible to the
//! second:
//!
//! 1. **Colon trigger** — the user just typed `:` closing a `:name:` span
//!    (`:smile:` → 😊-embed + space).
//! 2. **Literal trigger** — the user just typed a space terminating a
//!    literal alias (`:) ` → 😊-embed, the typed space remains).
//!
//! Both gate on local caret ≥ 3 and leaf length ≥ 3: the shortest valid
//! trigger needs three chars of context (`:x:`, or `:)` plus its space), so
//! ordinary typing never pays for a scan. Unknown names and aliases are
//! no-ops — the typed text stays.

use std::sync::LazyLock;

use md_doc::{Delta, Document, EmbedObject};
use md_emoji::EmojiMap;
use regex::Regex;
use tracing::{debug, warn};

/// A `:name:` span ending exactly at the caret. Name chars match emoji
/// shortcode conventions (`smile`, `thumbsup`, `+1`); `:` itself is
/// excluded, so at most one span can end at the caret.
static COLON_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":[A-Za-z0-9_+-]+:\z").expect("colon span pattern is valid"));

/// Minimum local caret / leaf length before any scan fires.
const MIN_CONTEXT: usize = 3;

/// Run both trigger passes against the document.
///
/// `last_inserted` is the most recently inserted character of the accepted
/// edit (see [`Delta::last_inserted_char`]); each pattern fires only on its
/// own terminator char.
pub(crate) fn run_triggers(doc: &mut Document, map: &EmojiMap, last_inserted: Option<char>) {
    match last_inserted {
        Some(':') => {
            try_colon(doc, map);
        }
        Some(' ') => {
            try_literal(doc, map);
        }
        _ => {}
    }
}

/// Colon trigger: replace a `:name:` span ending at the caret with an embed
/// run plus one space. Returns whether a replacement happened.
fn try_colon(doc: &mut Document, map: &EmojiMap) -> bool {
    let leaf = doc.leaf();
    if leaf.offset < MIN_CONTEXT || leaf.text.chars().count() < MIN_CONTEXT {
        return false;
    }
    let prefix = leaf.text_before_caret();
    let Some(m) = COLON_SPAN.find(prefix) else {
        return false;
    };
    let name = &m.as_str()[1..m.as_str().len() - 1];
    let Some(emoji) = map.get(name) else {
        return false;
    };

    let span_chars = m.as_str().chars().count();
    let start = leaf.start + leaf.offset - span_chars;
    let replacement = Delta::new()
        .retain(start)
        .delete(span_chars)
        .insert_embed(EmbedObject::new(&emoji.name, &emoji.source))
        .insert_text(" ");
    debug!(name, "colon trigger fired");
    apply_replacement(doc, &replacement)
}

/// Literal trigger: the token between the previous whitespace and the
/// just-typed space, looked up in the alias table. The typed space stays and
/// serves as the trailing space. Returns whether a replacement happened.
fn try_literal(doc: &mut Document, map: &EmojiMap) -> bool {
    let leaf = doc.leaf();
    if leaf.offset < MIN_CONTEXT || leaf.text.chars().count() < MIN_CONTEXT {
        return false;
    }
    let prefix: Vec<char> = leaf.text_before_caret().chars().collect();
    if prefix.last() != Some(&' ') {
        return false;
    }
    let end = prefix.len() - 1;
    let start = prefix[..end]
        .iter()
        .rposition(|c| c.is_whitespace())
        .map_or(0, |i| i + 1);
    if start == end {
        return false;
    }
    let token: String = prefix[start..end].iter().collect();
    let Some(emoji) = map.resolve_literal(&token) else {
        return false;
    };

    let global_start = leaf.start + start;
    let replacement = Delta::new()
        .retain(global_start)
        .delete(end - start)
        .insert_embed(EmbedObject::new(&emoji.name, &emoji.source));
    debug!(token = %token, name = %emoji.name, "literal trigger fired");
    apply_replacement(doc, &replacement)
}

/// Apply a trigger replacement. Built from fresh document state, so this
/// cannot go out of bounds; a failure is logged and the text left as typed.
fn apply_replacement(doc: &mut Document, replacement: &Delta) -> bool {
    match doc.apply(replacement) {
        Ok(()) => true,
        Err(err) => {
            warn!(%err, "trigger replacement did not apply");
            false
        }
    }
}
