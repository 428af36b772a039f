//! Deltas — composable, invertible document edits.
//!
//! A [`Delta`] is an ordered sequence of operations, each one of:
//!
//! - **retain N** — keep the next N positions unchanged
//! - **delete N** — remove the next N positions
//! - **insert**   — splice in a run (text or embed)
//!
//! Positions are flattened char positions (an embed counts as one, see
//! [`crate::run`]). Application walks the prior content left to right; any
//! remainder after the last op is implicitly retained.
//!
//! Deltas compose by sequential application, and invert: `invert` computed
//! against the pre-delta content produces the delta that restores it exactly,
//! including run structure:
//!
//! ```text
//! apply(apply(C, D), invert(D, C)) == C
//! ```

use thiserror::Error;

use crate::content::Content;
use crate::run::{EmbedObject, Run};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to apply a delta.
///
/// The only failure mode: a retain or delete addressing positions past the
/// end of the content. Application is atomic — on error the input content is
/// untouched (apply is non-destructive; it builds a new `Content`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeltaError {
    /// The delta retained or deleted `needed` more positions than the
    /// content holds.
    #[error("delta runs {needed} positions past the end of the content")]
    PastEnd { needed: usize },
}

// ---------------------------------------------------------------------------
// Ops
// ---------------------------------------------------------------------------

/// A single delta operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Keep the next N positions.
    Retain(usize),
    /// Remove the next N positions.
    Delete(usize),
    /// Splice in a run at the current position.
    Insert(Run),
}

// ---------------------------------------------------------------------------
// Delta
// ---------------------------------------------------------------------------

/// An ordered sequence of retain/delete/insert operations.
///
/// Built fluently; adjacent same-kind ops coalesce and zero-length ops are
/// dropped, so structurally different construction orders that mean the same
/// edit compare equal:
///
/// ```
/// use md_doc::Delta;
///
/// let d = Delta::new().retain(2).retain(3).delete(1);
/// assert_eq!(d, Delta::new().retain(5).delete(1));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Delta {
    ops: Vec<Op>,
}

impl Delta {
    /// The empty delta (applies as the identity).
    #[must_use]
    pub const fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// The operations, in order.
    #[must_use]
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// True when the delta contains no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Append a retain.
    #[must_use]
    pub fn retain(mut self, n: usize) -> Self {
        self.push(Op::Retain(n));
        self
    }

    /// Append a delete.
    #[must_use]
    pub fn delete(mut self, n: usize) -> Self {
        self.push(Op::Delete(n));
        self
    }

    /// Append a text insertion.
    #[must_use]
    pub fn insert_text(mut self, text: &str) -> Self {
        self.push(Op::Insert(Run::text(text)));
        self
    }

    /// Append an embed insertion.
    #[must_use]
    pub fn insert_embed(mut self, obj: EmbedObject) -> Self {
        self.push(Op::Insert(Run::Embed(obj)));
        self
    }

    /// Push an op, dropping zero-length ops and coalescing with the tail.
    fn push(&mut self, op: Op) {
        let len = match &op {
            Op::Retain(n) | Op::Delete(n) => *n,
            Op::Insert(run) => run.len(),
        };
        if len == 0 {
            return;
        }
        match (self.ops.last_mut(), op) {
            (Some(Op::Retain(a)), Op::Retain(b)) => *a += b,
            (Some(Op::Delete(a)), Op::Delete(b)) => *a += b,
            (Some(Op::Insert(Run::Text(a))), Op::Insert(Run::Text(b))) => a.append(b),
            (_, op) => self.ops.push(op),
        }
    }

    /// Apply this delta to `content`, producing the edited content.
    ///
    /// Any remainder past the last op is retained. The input is never
    /// modified.
    ///
    /// # Errors
    ///
    /// [`DeltaError::PastEnd`] when a retain or delete runs past the end of
    /// `content`.
    pub fn apply(&self, content: &Content) -> Result<Content, DeltaError> {
        let total = content.len();
        let mut out = Content::new();
        let mut pos = 0;
        for op in &self.ops {
            match op {
                Op::Retain(n) => {
                    Self::check_bounds(pos, *n, total)?;
                    out.extend(content.slice_runs(pos, *n));
                    pos += n;
                }
                Op::Delete(n) => {
                    Self::check_bounds(pos, *n, total)?;
                    pos += n;
                }
                Op::Insert(run) => out.push(run.clone()),
            }
        }
        out.extend(content.slice_runs(pos, total - pos));
        Ok(out)
    }

    const fn check_bounds(pos: usize, n: usize, total: usize) -> Result<(), DeltaError> {
        if pos + n > total {
            Err(DeltaError::PastEnd {
                needed: pos + n - total,
            })
        } else {
            Ok(())
        }
    }

    /// The delta that undoes this one, computed against the pre-delta
    /// content. Deleted spans are restored run-for-run from `prior`.
    #[must_use]
    pub fn invert(&self, prior: &Content) -> Self {
        let mut inv = Self::new();
        let mut pos = 0;
        for op in &self.ops {
            match op {
                Op::Retain(n) => {
                    inv = inv.retain(*n);
                    pos += n;
                }
                Op::Delete(n) => {
                    for run in prior.slice_runs(pos, *n) {
                        inv.push(Op::Insert(run));
                    }
                    pos += n;
                }
                Op::Insert(run) => inv = inv.delete(run.len()),
            }
        }
        inv
    }

    /// Where a caret at `caret` (pre-delta coordinates) lands after this
    /// delta. Deletions before the caret pull it left; insertions at or
    /// before it push it right — so an insertion exactly at the caret leaves
    /// the caret after the inserted content, which is what typing does.
    #[must_use]
    pub fn transform_caret(&self, caret: usize) -> usize {
        let mut new_caret = caret;
        let mut pos = 0;
        for op in &self.ops {
            match op {
                Op::Retain(n) => pos += n,
                Op::Delete(n) => {
                    if pos < caret {
                        new_caret -= (*n).min(caret - pos);
                    }
                    pos += n;
                }
                Op::Insert(run) => {
                    if pos <= caret {
                        new_caret += run.len();
                    }
                }
            }
        }
        new_caret
    }

    /// The most recently inserted character: the last char of the last
    /// insert op, or `None` if the delta inserts nothing (or its last insert
    /// is an embed). The trigger detector keys off this.
    #[must_use]
    pub fn last_inserted_char(&self) -> Option<char> {
        for op in self.ops.iter().rev() {
            if let Op::Insert(run) = op {
                return match run {
                    Run::Text(rope) if rope.len_chars() > 0 => {
                        Some(rope.char(rope.len_chars() - 1))
                    }
                    _ => None,
                };
            }
        }
        None
    }
}
