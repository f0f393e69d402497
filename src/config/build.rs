//! `[build]` section configuration.
//!
//! Template locations, the content dataset, output names and the optional
//! stylesheet and script bundles.

use super::defaults;
use crate::template::IncludeIndent;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in trellis.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// templates = "templates"   # Include root
/// entry = "index.html"      # Relative to `templates`
/// content = "content.json"  # Dataset (.json or .toml)
/// output = "dist"
/// include_indent = "reindent"
///
/// [build.styles]
/// input = "styles/main.css"
/// command = ["tailwindcss", "--minify", "-i"]
///
/// [build.scripts]
/// head = "scripts/head"
/// footer = "scripts/footer"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root", skip_serializing)]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Template directory; every include path is resolved against it.
    #[serde(default = "defaults::build::templates")]
    #[educe(Default = defaults::build::templates())]
    pub templates: PathBuf,

    /// Entry template, relative to `templates`.
    #[serde(default = "defaults::build::entry")]
    #[educe(Default = defaults::build::entry())]
    pub entry: PathBuf,

    /// Content dataset file.
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// File name of the fully substituted document.
    #[serde(default = "defaults::build::preview")]
    #[educe(Default = defaults::build::preview())]
    pub preview: PathBuf,

    /// File name of the placeholder-carrying document.
    #[serde(default = "defaults::build::carrier")]
    #[educe(Default = defaults::build::carrier())]
    pub carrier: PathBuf,

    /// How included content is indented.
    #[serde(default)]
    pub include_indent: IncludeIndent,

    /// Minify the preview document.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub minify: bool,

    /// Remove the output directory before building (CLI only).
    #[serde(skip)]
    pub clean: bool,

    /// Stylesheet compilation.
    #[serde(default)]
    pub styles: StylesConfig,

    /// Script bundles.
    #[serde(default)]
    pub scripts: ScriptsConfig,
}

impl BuildConfig {
    /// Absolute path of the entry template.
    pub fn entry_path(&self) -> PathBuf {
        self.templates.join(&self.entry)
    }

    pub fn preview_path(&self) -> PathBuf {
        self.output.join(&self.preview)
    }

    pub fn carrier_path(&self) -> PathBuf {
        self.output.join(&self.carrier)
    }
}

/// `[build.styles]` section.
///
/// With an empty `command` the input is read as plain CSS; otherwise
/// `command… <input>` is run and its stdout is the stylesheet.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct StylesConfig {
    /// Stylesheet source file.
    #[serde(default = "defaults::build::styles::input")]
    #[educe(Default = defaults::build::styles::input())]
    pub input: Option<PathBuf>,

    /// Compiler command and arguments.
    #[serde(default = "defaults::build::styles::command")]
    #[educe(Default = defaults::build::styles::command())]
    pub command: Vec<String>,

    /// Inline as `<style>` instead of writing a linked file.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub inline: bool,

    /// File name used when `inline = false`.
    #[serde(default = "defaults::build::styles::file")]
    #[educe(Default = defaults::build::styles::file())]
    pub file: PathBuf,
}

/// `[build.scripts]` section: directories of `.js` files bundled per slot.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ScriptsConfig {
    #[serde(default = "defaults::build::scripts::head")]
    #[educe(Default = defaults::build::scripts::head())]
    pub head: Option<PathBuf>,

    #[serde(default = "defaults::build::scripts::footer")]
    #[educe(Default = defaults::build::scripts::footer())]
    pub footer: Option<PathBuf>,
}
