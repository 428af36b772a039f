//! Edit length guard — hard rejection of over-long edits.
//!
//! Runs before any other post-edit processing. The would-be derived value is
//! serialized from the just-edited content; if a maximum is configured and
//! the value's char length exceeds it, the verdict is `Rejected` and the
//! controller undoes the whole edit by applying the delta's inverse. This is
//! a transaction, not a truncation: a paste that would overflow by one char
//! is undone in full.

use md_doc::{Content, to_markdown};
use tracing::debug;

/// Outcome of the length check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The edit stands.
    Accepted,
    /// The edit must be fully undone.
    Rejected {
        /// Char length the derived value would have had.
        length: usize,
        /// The configured bound it exceeded.
        max: usize,
    },
}

impl Verdict {
    /// True for [`Verdict::Accepted`].
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Check the just-edited content against the configured bound.
///
/// A derived value of exactly `max` chars is accepted — only strictly
/// longer values are rejected. `None` accepts everything.
#[must_use]
pub fn check(next: &Content, max_length: Option<usize>) -> Verdict {
    let Some(max) = max_length else {
        return Verdict::Accepted;
    };
    let length = to_markdown(next).chars().count();
    if length > max {
        debug!(length, max, "rejecting edit past length bound");
        Verdict::Rejected { length, max }
    } else {
        Verdict::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unbounded_accepts_anything() {
        let content = Content::from_text(&"x".repeat(10_000));
        assert_eq!(check(&content, None), Verdict::Accepted);
    }

    #[test]
    fn exactly_at_limit_is_accepted() {
        let content = Content::from_text("12345");
        assert!(check(&content, Some(5)).is_accepted());
    }

    #[test]
    fn one_past_limit_is_rejected() {
        let content = Content::from_text("123456");
        assert_eq!(
            check(&content, Some(5)),
            Verdict::Rejected { length: 6, max: 5 }
        );
    }

    #[test]
    fn length_counts_serialized_shortcodes() {
        use md_doc::Run;
        // One embed serializes as ":smile:" — 7 chars, not 1.
        let content: Content = [Run::embed("smile", "s.png")].into_iter().collect();
        assert!(check(&content, Some(7)).is_accepted());
        assert!(!check(&content, Some(6)).is_accepted());
    }
}
