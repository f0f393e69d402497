//! Stylesheet and script injection.
//!
//! Templates mark where assets go with HTML comments:
//!
//! | Marker                            | Replaced by                          |
//! |-----------------------------------|--------------------------------------|
//! | `<!-- trellis:styles -->`         | `<style>` or `<link rel="stylesheet">` |
//! | `<!-- trellis:scripts-head -->`   | one `<script>` bundling `[build.scripts] head` |
//! | `<!-- trellis:scripts-footer -->` | one `<script>` bundling `[build.scripts] footer` |
//!
//! A marker whose slot is empty is removed.

use crate::config::ProjectConfig;
use crate::utils::hash;
use anyhow::{Context, Result};
use std::{fs, path::Path};
use walkdir::WalkDir;

pub const STYLES_MARKER: &str = "<!-- trellis:styles -->";
pub const HEAD_SCRIPTS_MARKER: &str = "<!-- trellis:scripts-head -->";
pub const FOOTER_SCRIPTS_MARKER: &str = "<!-- trellis:scripts-footer -->";

/// Rendered asset fragments, one per marker.
#[derive(Debug, Clone, Default)]
pub struct Assets {
    pub styles: String,
    pub head_scripts: String,
    pub footer_scripts: String,
}

impl Assets {
    /// Build the fragments from compiled CSS and the configured script dirs.
    pub fn collect(config: &ProjectConfig, css: Option<&str>) -> Result<Self> {
        let styles_config = &config.build.styles;
        let styles = match css {
            None => String::new(),
            Some(css) if styles_config.inline => style_tag(css),
            Some(css) => link_tag(&styles_config.file, css),
        };

        Ok(Self {
            styles,
            head_scripts: bundle_scripts(config.build.scripts.head.as_deref())?,
            footer_scripts: bundle_scripts(config.build.scripts.footer.as_deref())?,
        })
    }

    /// Replace every marker in `document` with its fragment.
    pub fn inject(&self, document: &str) -> String {
        [
            (STYLES_MARKER, &self.styles),
            (HEAD_SCRIPTS_MARKER, &self.head_scripts),
            (FOOTER_SCRIPTS_MARKER, &self.footer_scripts),
        ]
        .into_iter()
        .fold(document.to_owned(), |doc, (marker, fragment)| {
            if doc.contains(marker) {
                doc.replace(marker, fragment)
            } else {
                doc
            }
        })
    }
}

fn style_tag(css: &str) -> String {
    format!("<style>\n{}\n</style>", css.trim_end())
}

/// `<link>` to the written stylesheet, versioned by content.
fn link_tag(file: &Path, css: &str) -> String {
    format!(
        r#"<link rel="stylesheet" href="{}?v={}">"#,
        file.display(),
        hash::fingerprint(css)
    )
}

/// Concatenate every `.js` file under `dir` (sorted by path) into one
/// `<script>` element. Empty when there is no directory or no script.
pub fn bundle_scripts(dir: Option<&Path>) -> Result<String> {
    let Some(dir) = dir else {
        return Ok(String::new());
    };

    let mut sources = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk `{}`", dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "js") {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read script `{}`", path.display()))?;
            sources.push(source.trim_end().to_owned());
        }
    }

    if sources.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("<script>\n{}\n</script>", sources.join("\n")))
}
