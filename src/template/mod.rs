//! Template expansion pipeline.
//!
//! ```text
//! entry ──► Expander (loops, then includes, per document)
//!                │
//!                ▼
//!          expanded text ──► substitute(Preview) ──► preview
//!                │
//!                └─────────► substitute(Carrier) ──► meta::insert ──► carrier
//! ```
//!
//! Every stage is a pure function of its inputs plus the files under the
//! template root. Non-fatal problems are collected as [`Diagnostics`].

pub mod diagnostic;
pub mod escape;
pub mod include;
pub mod loops;
pub mod meta;
pub mod substitute;
pub mod syntax;
pub mod vars;

pub use diagnostic::Diagnostics;
pub use include::{Expander, IncludeIndent};
pub use substitute::{Mode, substitute};
pub use vars::Registry;

use crate::data::Dataset;
use std::path::Path;

/// Both output documents of one build, before asset injection.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub preview: String,
    pub carrier: String,
    pub registry: Registry,
    pub diagnostics: Diagnostics,
}

/// Substitute an already expanded document in both modes.
///
/// The carrier pass sees the same placeholders as the preview pass, so only
/// the preview diagnostics are kept.
pub fn render(expanded: &str, dataset: &Dataset) -> Rendered {
    let preview = substitute(expanded, dataset, Mode::Preview);
    let carrier = substitute(expanded, dataset, Mode::Carrier);

    let carrier_text = if carrier.registry.is_empty() {
        carrier.text
    } else {
        meta::insert(&carrier.text, &meta::emit(&carrier.registry, dataset))
    };

    Rendered {
        preview: preview.text,
        carrier: carrier_text,
        registry: carrier.registry,
        diagnostics: preview.diagnostics,
    }
}

/// Expand `entry` under `root` and render both documents.
///
/// Fails only when the entry template cannot be read.
pub fn compile(
    root: &Path,
    entry: &Path,
    indent: IncludeIndent,
    dataset: &Dataset,
) -> std::io::Result<Rendered> {
    let (expanded, mut diagnostics) = Expander::new(root, indent).expand_entry(entry)?;
    let mut rendered = render(&expanded, dataset);
    diagnostics.extend(rendered.diagnostics);
    rendered.diagnostics = diagnostics;
    Ok(rendered)
}
