//! Document content — an ordered, normalized sequence of runs.
//!
//! `Content` maintains two invariants at all times:
//!
//! 1. No empty text runs.
//! 2. No two adjacent text runs (they are merged on insertion).
//!
//! Every mutator re-establishes these, so equality on `Content` is structural
//! equality on the canonical form — two contents that flatten to the same
//! sequence of chars and embeds always compare equal.

use ropey::Rope;

use crate::run::Run;

/// Ordered, normalized sequence of [`Run`]s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Content {
    runs: Vec<Run>,
}

impl Content {
    /// Empty content (no runs).
    #[must_use]
    pub const fn new() -> Self {
        Self { runs: Vec::new() }
    }

    /// Content holding a single plain-text run. An empty string produces
    /// empty content (no runs at all).
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut content = Self::new();
        content.push(Run::text(text));
        content
    }

    /// The runs, in document order.
    #[must_use]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Total flattened length: sum of run lengths (chars for text, 1 per
    /// embed).
    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.iter().map(Run::len).sum()
    }

    /// True when there are no runs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Append a run, maintaining normalization: empty text runs are dropped
    /// and a text run following a text run is merged into it.
    pub fn push(&mut self, run: Run) {
        if run.is_empty() {
            return;
        }
        if let (Some(Run::Text(last)), Run::Text(new)) = (self.runs.last_mut(), &run) {
            last.append(new.clone());
            return;
        }
        self.runs.push(run);
    }

    /// The runs covering the flattened range `[start, start + count)`,
    /// with text runs split at the range boundaries. Positions past the end
    /// of the content are ignored.
    #[must_use]
    pub fn slice_runs(&self, start: usize, count: usize) -> Vec<Run> {
        let end = start + count;
        let mut out = Vec::new();
        let mut pos = 0;
        for run in &self.runs {
            let run_end = pos + run.len();
            if run_end > start && pos < end {
                match run {
                    Run::Text(rope) => {
                        let from = start.saturating_sub(pos);
                        let to = (end - pos).min(rope.len_chars());
                        let text = rope.slice(from..to).to_string();
                        out.push(Run::Text(Rope::from_str(&text)));
                    }
                    Run::Embed(obj) => out.push(Run::Embed(obj.clone())),
                }
            }
            pos = run_end;
            if pos >= end {
                break;
            }
        }
        out
    }
}

impl Extend<Run> for Content {
    fn extend<I: IntoIterator<Item = Run>>(&mut self, runs: I) {
        for run in runs {
            self.push(run);
        }
    }
}

impl FromIterator<Run> for Content {
    fn from_iter<I: IntoIterator<Item = Run>>(iter: I) -> Self {
        let mut content = Self::new();
        content.extend(iter);
        content
    }
}
