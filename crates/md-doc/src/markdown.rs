//! Markdown serialization — document content → canonical plain text.
//!
//! Pure and total: text runs pass through verbatim, embed runs render as
//! their `:name:` shortcode. There is no failure path and no inverse — the
//! external-value path overwrites content lossily by design.

use crate::content::Content;
use crate::run::Run;

/// Serialize content to its markdown string.
#[must_use]
pub fn to_markdown(content: &Content) -> String {
    let mut out = String::with_capacity(content.len());
    for run in content.runs() {
        match run {
            Run::Text(rope) => {
                for chunk in rope.chunks() {
                    out.push_str(chunk);
                }
            }
            Run::Embed(obj) => {
                out.push(':');
                out.push_str(&obj.name);
                out.push(':');
            }
        }
    }
    out
}
