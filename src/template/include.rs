//! Include resolution.
//!
//! `include <path>` lines are replaced by the expanded content of the file at
//! `<path>`, resolved against the template root (never against the including
//! file). Each document has its loops unrolled *before* its includes are
//! resolved, so a loop index can select the included file:
//!
//! ```text
//! for i < 3
//!   include cards/card-${i}.html
//! endfor
//! ```
//!
//! # Failure modes
//!
//! | Situation        | Output                         | Diagnostic          |
//! |------------------|--------------------------------|---------------------|
//! | missing file     | inline `include not found` stub | `MissingInclude`    |
//! | unreadable file  | inline stub                    | `UnreadableInclude` |
//! | include cycle    | empty text (silent truncation) | `IncludeCycle`      |
//!
//! Paths with `..` components are treated as missing, so an include never
//! reads outside the template root.
//!
//! Cycle detection tracks the chain of documents currently being expanded.
//! Including the same partial twice side by side is fine; only a document
//! that reaches itself again is cut off.

use super::diagnostic::{Diagnostic, Diagnostics};
use super::escape::escape_attr;
use super::{loops, syntax};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Whitespace policy for spliced content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IncludeIndent {
    /// Prefix every non-empty spliced line with the directive's indentation.
    #[default]
    Reindent,
    /// Replace the directive line with the content as-is.
    Raw,
}

impl IncludeIndent {
    fn apply(self, content: &str, indent: &str) -> String {
        match self {
            Self::Raw => content.to_owned(),
            Self::Reindent if indent.is_empty() => content.to_owned(),
            Self::Reindent => content
                .split('\n')
                .map(|line| {
                    if line.trim().is_empty() {
                        line.to_owned()
                    } else {
                        format!("{indent}{line}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Inline marker shown in place of an include that could not be loaded.
fn missing_stub(path: &str) -> String {
    format!(
        r#"<div class="trellis-missing-include" style="border:2px dashed #d00;color:#d00;padding:8px;font:14px monospace">include not found: {}</div>"#,
        escape_attr(path)
    )
}

/// Normalize a path for cycle comparison.
fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Expands one entry document: loops, then includes, recursively.
///
/// An `Expander` holds the state of a single top-level resolution; create a
/// new one per build.
pub struct Expander<'a> {
    root: &'a Path,
    indent: IncludeIndent,
    chain: FxHashSet<PathBuf>,
    diagnostics: Diagnostics,
}

impl<'a> Expander<'a> {
    pub fn new(root: &'a Path, indent: IncludeIndent) -> Self {
        Self {
            root,
            indent,
            chain: FxHashSet::default(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Expand the entry document at `entry` (absolute or root-relative).
    ///
    /// Only fails when the entry itself cannot be read; everything below it
    /// degrades to stubs and diagnostics.
    pub fn expand_entry(mut self, entry: &Path) -> std::io::Result<(String, Diagnostics)> {
        let path = self.root.join(entry);
        let source = fs::read_to_string(&path)?;
        let key = canonical(&path);

        self.chain.insert(key.clone());
        let text = self.expand_source(&source);
        self.chain.remove(&key);

        Ok((text, self.diagnostics))
    }

    /// Unroll the loops of one document, then splice its includes.
    fn expand_source(&mut self, source: &str) -> String {
        let unrolled = loops::expand(source, &mut self.diagnostics);
        unrolled
            .split('\n')
            .map(|line| match syntax::include_directive(line) {
                Some((indent, path)) => {
                    let content = self.resolve(path);
                    self.indent.apply(&content, indent)
                }
                None => line.to_owned(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Resolve one include path to its fully expanded text.
    pub fn resolve(&mut self, rel: &str) -> String {
        let rel_path = Path::new(rel.trim_start_matches(['/', '\\']));
        let escapes_root = rel_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        let path = self.root.join(rel_path);
        if escapes_root || !path.is_file() {
            self.diagnostics.push(Diagnostic::MissingInclude {
                path: rel.to_owned(),
            });
            return missing_stub(rel);
        }

        let key = canonical(&path);
        if self.chain.contains(&key) {
            self.diagnostics.push(Diagnostic::IncludeCycle { path: key });
            return String::new();
        }

        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) => {
                self.diagnostics.push(Diagnostic::UnreadableInclude {
                    path: rel.to_owned(),
                    reason: err.to_string(),
                });
                return missing_stub(rel);
            }
        };
        let source = source
            .strip_suffix("\r\n")
            .or_else(|| source.strip_suffix('\n'))
            .unwrap_or(&source);

        self.chain.insert(key.clone());
        let text = self.expand_source(source);
        self.chain.remove(&key);
        text
    }
}
