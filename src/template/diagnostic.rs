//! Non-fatal findings collected while expanding a template.
//!
//! Nothing in the expansion pipeline aborts a build. Every defect degrades to
//! visible output (a stub, a bracketed name, a dropped loop) and is recorded
//! here so the caller can report it.

use super::vars::VarType;
use std::path::PathBuf;
use thiserror::Error;

/// A single non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("include not found: `{path}`")]
    MissingInclude { path: String },

    #[error("include could not be read: `{path}` ({reason})")]
    UnreadableInclude { path: String, reason: String },

    /// The repeated reference expanded to empty text.
    #[error("include cycle at `{}`, repeated reference left empty", path.display())]
    IncludeCycle { path: PathBuf },

    #[error("unknown modifier `{modifier}` on `{name}`, treated as string")]
    UnknownModifier { name: String, modifier: String },

    #[error("`{name}` declared as {rejected} but already registered as {kept}, keeping {kept}")]
    TypeConflict {
        name: String,
        kept: VarType,
        rejected: VarType,
    },

    #[error("loop `{var}` has a non-numeric bound `{bound}`, body dropped")]
    InvalidLoopBound { var: String, bound: String },

    #[error("loop `{var}` bound `{bound}` exceeds the limit of {max}, body dropped")]
    LoopBoundTooLarge {
        var: String,
        bound: String,
        max: usize,
    },
}

/// Ordered collection of diagnostics for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
