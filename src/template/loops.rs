//! Bounded loop unrolling.
//!
//! ```text
//! for i < 3
//! <li>${i}</li>
//! endfor
//! ```
//!
//! becomes
//!
//! ```text
//! <li>0</li>
//! <li>1</li>
//! <li>2</li>
//! ```
//!
//! The body is repeated `bound` times with every `${i}` replaced by the
//! 0-based index, and each copy is parsed again so nested and sequential loops
//! are expanded too.
//!
//! | Bound                     | Copies | Diagnostic          |
//! |---------------------------|--------|---------------------|
//! | `0..=MAX_LOOP_BOUND`      | bound  |                     |
//! | negative                  | none   |                     |
//! | above `MAX_LOOP_BOUND`    | none   | `LoopBoundTooLarge` |
//! | not an integer            | none   | `InvalidLoopBound`  |

use super::diagnostic::{Diagnostic, Diagnostics};
use super::syntax::{self, LoopBlock, Node};

/// Largest bound a single loop may have.
pub const MAX_LOOP_BOUND: usize = 10_000;

impl LoopBlock<'_> {
    /// Number of copies to emit, recording a diagnostic for unusable bounds.
    fn copies(&self, diagnostics: &mut Diagnostics) -> usize {
        let (negative, digits) = match self.bound.as_bytes().first() {
            Some(b'-') => (true, &self.bound[1..]),
            Some(b'+') => (false, &self.bound[1..]),
            _ => (false, self.bound),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            diagnostics.push(Diagnostic::InvalidLoopBound {
                var: self.var.to_owned(),
                bound: self.bound.to_owned(),
            });
            return 0;
        }
        if negative {
            return 0;
        }

        match digits.parse::<usize>() {
            Ok(n) if n <= MAX_LOOP_BOUND => n,
            _ => {
                diagnostics.push(Diagnostic::LoopBoundTooLarge {
                    var: self.var.to_owned(),
                    bound: self.bound.to_owned(),
                    max: MAX_LOOP_BOUND,
                });
                0
            }
        }
    }

    /// Repeat the body with the loop variable substituted.
    ///
    /// Copies are joined with newlines; `None` when no copy is produced.
    pub fn unroll(&self, diagnostics: &mut Diagnostics) -> Option<String> {
        let count = self.copies(diagnostics);
        if count == 0 {
            return None;
        }

        let body = self.body.join("\n");
        let needle = format!("${{{}}}", self.var);
        let mut out = String::new();
        for index in 0..count {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&body.replace(&needle, &index.to_string()));
        }
        Some(out)
    }
}

/// Expand every loop in `source`, leaving include directives as written.
pub fn expand(source: &str, diagnostics: &mut Diagnostics) -> String {
    let mut lines: Vec<String> = Vec::new();
    for node in syntax::parse(source) {
        match node {
            Node::Text(line) => lines.push(line.to_owned()),
            Node::Loop(block) => {
                if let Some(unrolled) = block.unroll(diagnostics) {
                    lines.push(expand(&unrolled, diagnostics));
                }
            }
        }
    }
    lines.join("\n")
}
