//! The composer — reconciliation controller and command surface.
//!
//! Arbitrates between two representations of one evolving value: the
//! caller's plain markdown string and the rich document the editing surface
//! mutates. Every path through here ends in the same place — content and
//! derived value consistent, `derived == to_markdown(content)` — but the two
//! directions are asymmetric:
//!
//! - **Caller → document** (`set_value`): whole-content replacement, lossy,
//!   no callback. Loop-free by an explicit two-slot memory: the current
//!   derived value and the previous one. A value equal to the current slot
//!   is already consistent; one equal to the previous slot is (for a
//!   composer configured as loop-prone) a stale echo of our own output.
//!   Everything else is new ground truth.
//!
//! - **Document → caller** (`handle_edit`, commands): delta application,
//!   length-guarded and trigger-processed, ending in the change callback.
//!
//! All comparisons are bit-exact string equality. There is no render-cycle
//! coupling anywhere in this module — surface mutation is whatever the host
//! does with the document it reads back.

use md_doc::{Content, Delta, Document, EmbedObject, to_markdown};
use tracing::{debug, trace, warn};

use crate::config::ComposerConfig;
use crate::event::{ChangeEvent, ChangeHandler, CompositionHandler};
use crate::guard::{self, Verdict};
use crate::trigger;

/// The markdown composer core.
///
/// Owns the [`Document`] exclusively; collaborators reach the content only
/// through this type's methods and the read-only [`document`](Self::document)
/// accessor. Single-threaded and purely reactive — every method runs to
/// completion before the next event.
pub struct Composer {
    document: Document,
    config: ComposerConfig,
    derived: String,
    previous_derived: String,
    focused: bool,
    on_change: Option<ChangeHandler>,
    on_composition: Option<CompositionHandler>,
}

impl Composer {
    /// Create a composer seeded with the caller's initial value.
    ///
    /// Seeding is lossy by design: the value becomes one plain-text run.
    /// Both derived-value slots start at the initial value, so redelivering
    /// it is a no-op from the first moment.
    #[must_use]
    pub fn new(config: ComposerConfig, initial_value: &str) -> Self {
        let document = Document::from_text(initial_value);
        let derived = to_markdown(document.content());
        Self {
            document,
            config,
            previous_derived: derived.clone(),
            derived,
            focused: false,
            on_change: None,
            on_composition: None,
        }
    }

    // -- Callbacks ----------------------------------------------------------

    /// Register the accepted-edit callback.
    pub fn on_change(&mut self, handler: impl FnMut(&ChangeEvent) + 'static) {
        self.on_change = Some(Box::new(handler));
    }

    /// Register the composition-update passthrough.
    pub fn on_composition(&mut self, handler: impl FnMut(&str, &str) + 'static) {
        self.on_composition = Some(Box::new(handler));
    }

    // -- Caller → document: external value updates ---------------------------

    /// Deliver a caller-supplied value.
    ///
    /// Already-consistent values and (when configured) stale echoes of this
    /// composer's own prior output are dropped; anything else replaces the
    /// entire content as new ground truth. Never fires the change callback —
    /// the caller already has this value.
    pub fn set_value(&mut self, value: &str) {
        if value == self.derived {
            trace!("external value already consistent");
            return;
        }
        if self.config.suppress_value_echo && value == self.previous_derived {
            debug!("dropping stale echo of prior output");
            return;
        }
        debug!(len = value.chars().count(), "accepting external value");
        let caret = self.document.caret();
        self.document.replace_with_text(value, Some(caret));
        self.previous_derived = std::mem::replace(&mut self.derived, value.to_owned());
    }

    // -- Document → caller: local edit events --------------------------------

    /// Process a raw edit delta from the editing surface.
    ///
    /// Guard first (a rejected edit is undone in full — no callback, no
    /// state shift, no triggers), then trigger detection, then the derived
    /// value shifts and the change callback fires.
    pub fn handle_edit(&mut self, delta: &Delta) {
        if self.config.disabled {
            return;
        }
        let prior = self.document.content().clone();
        let prior_caret = self.document.caret();
        if let Err(err) = self.document.apply(delta) {
            warn!(%err, "dropping edit that does not apply");
            return;
        }
        if !self.enforce_length(delta, prior, prior_caret) {
            return;
        }
        trigger::run_triggers(
            &mut self.document,
            &self.config.emoji_map,
            delta.last_inserted_char(),
        );
        self.finish_accepted_edit();
    }

    /// Composition-update passthrough: hand the raw composition data and the
    /// current leaf text to the caller. Mutates nothing.
    pub fn handle_composition(&mut self, data: &str) {
        let leaf = self.document.leaf();
        if let Some(handler) = self.on_composition.as_mut() {
            handler(data, &leaf.text);
        }
    }

    // -- Command surface -----------------------------------------------------

    /// Insert text at the caret, replacing suggestion context.
    ///
    /// Deletes one trailing `\t`/`\n` before the caret when
    /// `strip_control_char` is set (cleanup of the commit gesture's
    /// auto-inserted character), deletes `pretext_len` chars before the
    /// adjusted caret, inserts `text` plus one trailing space, and leaves
    /// the caret after the space. Returns the resulting markdown.
    ///
    /// Bypasses trigger detection — the insertion is already the result of
    /// an accepted suggestion.
    pub fn insert_text_at_caret(
        &mut self,
        text: &str,
        pretext_len: usize,
        strip_control_char: bool,
    ) -> String {
        let (start, delete_len) = self.replacement_span(pretext_len, strip_control_char);
        let delta = Delta::new()
            .retain(start)
            .delete(delete_len)
            .insert_text(text)
            .insert_text(" ");
        self.commit_command(&delta, None)
    }

    /// Insert an embedded emoji at the caret, replacing suggestion context.
    ///
    /// Same shape as [`insert_text_at_caret`](Self::insert_text_at_caret)
    /// but resolves `name` through the emoji map and inserts an embed run;
    /// the single trailing space is the one the replacement itself appends.
    /// An unknown name is a no-op. Returns the resulting markdown.
    pub fn insert_emoji_at_caret(
        &mut self,
        name: &str,
        pretext_len: usize,
        strip_control_char: bool,
    ) -> String {
        let Some(emoji) = self.config.emoji_map.get(name) else {
            debug!(name, "insert of unknown emoji ignored");
            return self.derived.clone();
        };
        let object = EmbedObject::new(&emoji.name, &emoji.source);
        let (start, delete_len) = self.replacement_span(pretext_len, strip_control_char);
        let delta = Delta::new()
            .retain(start)
            .delete(delete_len)
            .insert_embed(object)
            .insert_text(" ");
        self.commit_command(&delta, None)
    }

    /// Replace the entire content with `value` (one plain-text run),
    /// resetting the caret to the document start or to `caret`. Returns the
    /// resulting markdown.
    pub fn replace_content(&mut self, value: &str, caret: Option<usize>) -> String {
        let delta = Delta::new().delete(self.document.len()).insert_text(value);
        self.commit_command(&delta, Some(caret.unwrap_or(0)))
    }

    // -- Focus and caret bookkeeping -----------------------------------------

    /// Mark the surface focused.
    pub const fn focus(&mut self) {
        self.focused = true;
    }

    /// Mark the surface blurred.
    pub const fn blur(&mut self) {
        self.focused = false;
    }

    /// Whether the surface is currently focused.
    #[must_use]
    pub const fn has_focus(&self) -> bool {
        self.focused
    }

    /// Move the caret past the last run.
    pub fn set_caret_to_end(&mut self) {
        self.document.caret_to_end();
    }

    // -- Read-back -----------------------------------------------------------

    /// The current derived markdown value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.derived
    }

    /// The document, read-only.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The configured placeholder pass-through.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.config.placeholder
    }

    /// Whether local editing is disabled.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    // -- Internals -----------------------------------------------------------

    /// The span a command replaces: `(start, delete_len)` ending at the
    /// caret, covering an optional control char and the pretext. Clamped to
    /// the content start; the control char is only stripped when it really
    /// is a tab or newline.
    fn replacement_span(&self, pretext_len: usize, strip_control_char: bool) -> (usize, usize) {
        let caret = self.document.caret();
        let mut start = caret;
        if strip_control_char {
            let before = self.document.leaf();
            if matches!(before.text_before_caret().chars().last(), Some('\t' | '\n')) {
                start -= 1;
            }
        }
        start = start.saturating_sub(pretext_len);
        (start, caret - start)
    }

    /// Run a command delta with local-edit semantics minus triggers. Returns
    /// the (possibly unchanged) derived markdown.
    fn commit_command(&mut self, delta: &Delta, caret_after: Option<usize>) -> String {
        if self.config.disabled {
            return self.derived.clone();
        }
        let prior = self.document.content().clone();
        let prior_caret = self.document.caret();
        if let Err(err) = self.document.apply(delta) {
            warn!(%err, "dropping command that does not apply");
            return self.derived.clone();
        }
        if !self.enforce_length(delta, prior, prior_caret) {
            return self.derived.clone();
        }
        if let Some(caret) = caret_after {
            self.document.set_caret(caret);
        }
        self.finish_accepted_edit();
        self.derived.clone()
    }

    /// Guard the just-applied delta. On rejection the inverse is applied
    /// against the prior content, restoring it exactly, and the caret goes
    /// back where it was. Returns whether the edit stands.
    fn enforce_length(&mut self, delta: &Delta, prior: Content, prior_caret: usize) -> bool {
        match guard::check(self.document.content(), self.config.max_length) {
            Verdict::Accepted => true,
            Verdict::Rejected { .. } => {
                let inverse = delta.invert(&prior);
                if self.document.apply(&inverse).is_err() {
                    // Unreachable for a delta that just applied; restore
                    // from the snapshot rather than panic.
                    self.document.restore(prior, prior_caret);
                } else {
                    self.document.set_caret(prior_caret);
                }
                false
            }
        }
    }

    /// Shift the derived-value slots and fire the change callback.
    fn finish_accepted_edit(&mut self) {
        let markdown = to_markdown(self.document.content());
        self.previous_derived = std::mem::replace(&mut self.derived, markdown);
        let leaf = self.document.leaf();
        let event = ChangeEvent {
            markdown: self.derived.clone(),
            leaf_text: leaf.text,
            leaf_offset: leaf.offset,
        };
        if let Some(handler) = self.on_change.as_mut() {
            handler(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use md_doc::{Content, Run};
    use md_emoji::{Emoji, EmojiMap};
    use pretty_assertions::assert_eq;

    fn sample_config() -> ComposerConfig {
        let mut map: EmojiMap = [Emoji::new("smile", "s.png"), Emoji::new("x", "x.png")]
            .into_iter()
            .collect();
        map.alias(":)", "smile");
        ComposerConfig::new(std::sync::Arc::new(map))
    }

    /// A composer plus a captured log of every change event it fires.
    fn observed(config: ComposerConfig, initial: &str) -> (Composer, Rc<RefCell<Vec<ChangeEvent>>>) {
        let mut composer = Composer::new(config, initial);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        composer.on_change(move |ev| sink.borrow_mut().push(ev.clone()));
        (composer, events)
    }

    /// Type one character at the current caret.
    fn type_char(composer: &mut Composer, ch: char) {
        let caret = composer.document().caret();
        let delta = Delta::new().retain(caret).insert_text(&ch.to_string());
        composer.handle_edit(&delta);
    }

    fn type_str(composer: &mut Composer, s: &str) {
        for ch in s.chars() {
            type_char(composer, ch);
        }
    }

    // -- Construction --------------------------------------------------------

    #[test]
    fn seeds_from_initial_value() {
        let composer = Composer::new(sample_config(), "hello");
        assert_eq!(composer.value(), "hello");
        assert_eq!(composer.document().content(), &Content::from_text("hello"));
    }

    // -- External value arbitration -----------------------------------------

    #[test]
    fn equal_value_is_a_no_op() {
        let (mut composer, events) = observed(sample_config(), "abc");
        let before = composer.document().clone();
        composer.set_value("abc");
        assert_eq!(composer.document(), &before);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn new_value_replaces_content_losing_structure() {
        let (mut composer, events) = observed(sample_config(), "");
        type_str(&mut composer, ":x:");
        assert!(matches!(
            composer.document().content().runs()[0],
            Run::Embed(_)
        ));

        composer.set_value("plain");
        assert_eq!(composer.value(), "plain");
        assert_eq!(composer.document().content(), &Content::from_text("plain"));
        // Replacement never fires the callback — only the edits before did.
        assert_eq!(events.borrow().last().unwrap().markdown, ":x: ");
    }

    #[test]
    fn echo_is_dropped_when_configured() {
        let config = sample_config().with_value_echo_suppression();
        let (mut composer, _) = observed(config, "a");
        type_char(&mut composer, 'b');
        assert_eq!(composer.value(), "ab");

        // The caller redelivers our own prior output.
        composer.set_value("a");
        assert_eq!(composer.value(), "ab");
        assert_eq!(composer.document().content(), &Content::from_text("ab"));
    }

    #[test]
    fn echo_is_accepted_without_the_flag() {
        let (mut composer, _) = observed(sample_config(), "a");
        type_char(&mut composer, 'b');
        composer.set_value("a");
        assert_eq!(composer.value(), "a");
        assert_eq!(composer.document().content(), &Content::from_text("a"));
    }

    // -- Local edits ---------------------------------------------------------

    #[test]
    fn accepted_edit_updates_value_and_notifies() {
        let (mut composer, events) = observed(sample_config(), "");
        type_str(&mut composer, "hi");
        assert_eq!(composer.value(), "hi");

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(
            *events.last().unwrap(),
            ChangeEvent {
                markdown: "hi".into(),
                leaf_text: "hi".into(),
                leaf_offset: 2,
            }
        );
    }

    #[test]
    fn derived_always_matches_serialized_content() {
        let (mut composer, _) = observed(sample_config(), "start");
        type_str(&mut composer, " :smile:");
        composer.set_value("reset");
        type_str(&mut composer, "!");
        assert_eq!(
            composer.value(),
            to_markdown(composer.document().content())
        );
    }

    #[test]
    fn disabled_composer_ignores_edits() {
        let config = sample_config().with_disabled(true);
        let (mut composer, events) = observed(config, "abc");
        type_char(&mut composer, 'x');
        assert_eq!(composer.value(), "abc");
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn unappliable_edit_is_dropped() {
        let (mut composer, events) = observed(sample_config(), "ab");
        composer.handle_edit(&Delta::new().retain(10).insert_text("x"));
        assert_eq!(composer.value(), "ab");
        assert!(events.borrow().is_empty());
    }

    // -- Length guard --------------------------------------------------------

    #[test]
    fn edit_reaching_the_limit_is_accepted() {
        let config = sample_config().with_max_length(3);
        let (mut composer, _) = observed(config, "ab");
        type_char(&mut composer, 'c');
        assert_eq!(composer.value(), "abc");
    }

    #[test]
    fn edit_past_the_limit_is_fully_undone() {
        let config = sample_config().with_max_length(3);
        let (mut composer, events) = observed(config, "abc");
        let caret_before = composer.document().caret();

        type_char(&mut composer, 'd');
        assert_eq!(composer.value(), "abc");
        assert_eq!(composer.document().content(), &Content::from_text("abc"));
        assert_eq!(composer.document().caret(), caret_before);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn overflowing_paste_is_not_truncated() {
        let config = sample_config().with_max_length(5);
        let (mut composer, events) = observed(config, "ab");
        composer.handle_edit(&Delta::new().retain(2).insert_text("cdefgh"));
        assert_eq!(composer.value(), "ab");
        assert!(events.borrow().is_empty());
    }

    // -- Triggers through the edit path -------------------------------------

    #[test]
    fn typing_a_colon_shortcode_embeds_it() {
        let (mut composer, events) = observed(sample_config(), "");
        type_str(&mut composer, "hi :smile:");
        assert_eq!(composer.value(), "hi :smile: ");
        assert!(matches!(
            composer.document().content().runs()[1],
            Run::Embed(_)
        ));
        // The callback saw the post-replacement state.
        assert_eq!(events.borrow().last().unwrap().markdown, "hi :smile: ");
    }

    #[test]
    fn typing_a_literal_alias_embeds_it_on_space() {
        let (mut composer, _) = observed(sample_config(), "");
        type_str(&mut composer, "hey :) ");
        assert_eq!(composer.value(), "hey :smile: ");
    }

    #[test]
    fn unknown_shortcode_stays_plain_text() {
        let (mut composer, _) = observed(sample_config(), "");
        type_str(&mut composer, ":zz:");
        assert_eq!(composer.value(), ":zz:");
        assert_eq!(composer.document().content().runs().len(), 1);
    }

    // -- Commands ------------------------------------------------------------

    #[test]
    fn insert_text_replaces_pretext_and_advances_caret() {
        let (mut composer, _) = observed(sample_config(), "say :fo");
        let caret = composer.document().caret();
        assert_eq!(caret, 7);

        let markdown = composer.insert_text_at_caret("foo", 3, false);
        assert_eq!(markdown, "say foo ");
        // caret = P − pretext + len("foo ") = 7 − 3 + 4
        assert_eq!(composer.document().caret(), 8);
    }

    #[test]
    fn insert_text_strips_commit_gesture_newline() {
        let (mut composer, _) = observed(sample_config(), "go\n");
        let markdown = composer.insert_text_at_caret("now", 0, true);
        assert_eq!(markdown, "gonow ");
    }

    #[test]
    fn strip_flag_without_control_char_deletes_nothing_extra() {
        let (mut composer, _) = observed(sample_config(), "go");
        let markdown = composer.insert_text_at_caret("now", 0, true);
        assert_eq!(markdown, "gonow ");
    }

    #[test]
    fn insert_emoji_replaces_pretext_with_embed() {
        let (mut composer, events) = observed(sample_config(), "hi :smi");
        let markdown = composer.insert_emoji_at_caret("smile", 4, false);
        assert_eq!(markdown, "hi :smile: ");
        let expected: Content = [Run::text("hi "), Run::embed("smile", "s.png"), Run::text(" ")]
            .into_iter()
            .collect();
        assert_eq!(composer.document().content(), &expected);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn insert_unknown_emoji_is_a_no_op() {
        let (mut composer, events) = observed(sample_config(), "hi :gh");
        let markdown = composer.insert_emoji_at_caret("ghost", 3, false);
        assert_eq!(markdown, "hi :gh");
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn commands_do_not_re_trigger() {
        // The inserted text ends in ":smile:" but commands bypass detection.
        let (mut composer, _) = observed(sample_config(), "");
        let markdown = composer.insert_text_at_caret(":smile:", 0, false);
        assert_eq!(markdown, ":smile: ");
        assert_eq!(composer.document().content().runs().len(), 1);
    }

    #[test]
    fn replace_content_resets_caret_to_start() {
        let (mut composer, events) = observed(sample_config(), "old text");
        let markdown = composer.replace_content("new", None);
        assert_eq!(markdown, "new");
        assert_eq!(composer.document().caret(), 0);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn replace_content_honors_requested_caret() {
        let (mut composer, _) = observed(sample_config(), "old");
        composer.replace_content("fresh", Some(5));
        assert_eq!(composer.document().caret(), 5);
    }

    #[test]
    fn guarded_command_is_undone() {
        let config = sample_config().with_max_length(4);
        let (mut composer, events) = observed(config, "abcd");
        let markdown = composer.insert_text_at_caret("long", 0, false);
        assert_eq!(markdown, "abcd");
        assert_eq!(composer.document().content(), &Content::from_text("abcd"));
        assert!(events.borrow().is_empty());
    }

    // -- Composition passthrough ---------------------------------------------

    #[test]
    fn composition_passthrough_reports_leaf_text() {
        let mut composer = Composer::new(sample_config(), "héllo");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        composer.on_composition(move |data, leaf| {
            sink.borrow_mut().push((data.to_owned(), leaf.to_owned()));
        });

        composer.handle_composition("ˆ");
        assert_eq!(*seen.borrow(), vec![("ˆ".into(), "héllo".into())]);
        assert_eq!(composer.value(), "héllo");
    }

    // -- Focus ---------------------------------------------------------------

    #[test]
    fn focus_bookkeeping() {
        let mut composer = Composer::new(sample_config(), "abc");
        assert!(!composer.has_focus());
        composer.focus();
        assert!(composer.has_focus());
        composer.blur();
        assert!(!composer.has_focus());

        composer.document.set_caret(0);
        composer.set_caret_to_end();
        assert_eq!(composer.document().caret(), 3);
    }
}
