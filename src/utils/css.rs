//! Stylesheet compilation.
//!
//! `[build.styles] input` is either read as plain CSS or handed to an
//! external compiler (`command… <input>`) whose stdout is the stylesheet.

use crate::config::ProjectConfig;
use crate::exec;
use crate::utils::exec::FilterRule;
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Compiler filter: skip version banners and timing lines.
pub static STYLES_FILTER: FilterRule =
    FilterRule::new(&["≈ tailwindcss", "Browserslist:", "Done in", "Rebuilding..."]);

/// Compile the configured stylesheet.
///
/// Returns `Ok(None)` when no stylesheet is configured.
pub fn compile_styles(config: &ProjectConfig) -> Result<Option<String>> {
    let styles = &config.build.styles;
    let Some(input) = styles.input.as_ref() else {
        return Ok(None);
    };

    let css = if styles.command.is_empty() {
        fs::read_to_string(input)
            .with_context(|| format!("Failed to read stylesheet `{}`", input.display()))?
    } else {
        let output = exec!(
            filter=&STYLES_FILTER;
            config.get_root();
            &styles.command;
            input
        )?;
        String::from_utf8(output.stdout).context("Stylesheet compiler produced non-UTF-8 output")?
    };

    Ok(Some(css))
}

/// Check if a path is the stylesheet input file.
pub fn is_styles_input(path: &Path, config: &ProjectConfig) -> bool {
    config
        .build
        .styles
        .input
        .as_deref()
        .is_some_and(|input| path == input)
}
