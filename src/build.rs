//! Project building orchestration.
//!
//! One build is one sequential pass; nothing is cached between builds.
//!
//! ```text
//! build_project()
//!     │
//!     ├── prepare_output()      clean / create the output directory
//!     ├── load_dataset()        content.json / content.toml
//!     ├── template::compile()   expand, substitute twice, metadata
//!     ├── css::compile_styles() failures are logged, not fatal
//!     ├── Assets::inject()      styles + script bundles, both documents
//!     └── write_output()        preview (maybe minified), carrier
//! ```

use crate::{
    config::ProjectConfig,
    data::Dataset,
    log,
    template::{self, Diagnostics},
    utils::{assets::Assets, css, minify::minify},
};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Summary of a finished build.
#[derive(Debug)]
pub struct BuildReport {
    pub preview: PathBuf,
    pub carrier: PathBuf,
    /// Number of distinct variables in the carrier.
    pub variables: usize,
    pub diagnostics: Diagnostics,
}

/// Build the preview and carrier documents.
///
/// Only a missing entry template or an I/O failure on the output directory
/// aborts the build; template defects are reported as diagnostics.
pub fn build_project(config: &ProjectConfig) -> Result<BuildReport> {
    let build = &config.build;
    prepare_output(&build.output, build.clean)?;

    let dataset = load_dataset(&build.content)?;

    let entry = build.entry_path();
    log!("build"; "expanding {}", rel_path(&entry, config.get_root()));
    let rendered = template::compile(&build.templates, &build.entry, build.include_indent, &dataset)
        .with_context(|| format!("Failed to read entry template `{}`", entry.display()))?;

    let css = css::compile_styles(config).unwrap_or_else(|e| {
        log!("error"; "styles: {e:#}");
        None
    });
    if let Some(css) = css.as_deref()
        && !build.styles.inline
    {
        write_output(&build.output.join(&build.styles.file), css.as_bytes())?;
    }
    let assets = Assets::collect(config, css.as_deref())?;

    let preview = assets.inject(&rendered.preview);
    let carrier = assets.inject(&rendered.carrier);

    let report = BuildReport {
        preview: build.preview_path(),
        carrier: build.carrier_path(),
        variables: rendered.registry.len(),
        diagnostics: rendered.diagnostics,
    };
    write_output(&report.preview, &minify(preview.as_bytes(), config))?;
    write_output(&report.carrier, carrier.as_bytes())?;

    log_build_result(&report, config.get_root());
    Ok(report)
}

/// Load the content dataset; a missing file yields an empty dataset.
fn load_dataset(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        log!("warn"; "content file `{}` not found, using an empty dataset", path.display());
        return Ok(Dataset::default());
    }
    let dataset = Dataset::from_path(path)
        .with_context(|| format!("Failed to load content `{}`", path.display()))?;
    if dataset.is_empty() {
        log!("warn"; "content file `{}` has no entries", path.display());
    } else {
        log!("content"; "{} entries", dataset.len());
    }
    Ok(dataset)
}

/// Ensure the output directory exists, removing it first when `clean`.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

/// Whole-file overwrite, creating parent directories as needed.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// Log diagnostics and the build summary.
fn log_build_result(report: &BuildReport, root: &Path) {
    for diagnostic in &report.diagnostics {
        log!("warn"; "{diagnostic}");
    }

    log!(
        "build";
        "wrote {} and {} ({} variables, {} warnings)",
        rel_path(&report.preview, root),
        rel_path(&report.carrier, root),
        report.variables,
        report.diagnostics.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::assets::STYLES_MARKER;
    use tempfile::{TempDir, tempdir};

    fn project(files: &[(&str, &str)]) -> (TempDir, ProjectConfig) {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for (name, content) in files {
            let path = root.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        let mut config = ProjectConfig::default();
        config.set_root(root);
        config.config_path = root.join("trellis.toml");
        config.build.templates = root.join("templates");
        config.build.content = root.join("content.json");
        config.build.output = root.join("dist");
        (dir, config)
    }

    #[test]
    fn test_build_writes_both_documents() {
        let (_dir, config) = project(&[
            (
                "templates/index.html",
                "<!DOCTYPE html>\n<html>\n<body>\n  include partials/hero.html\n</body>\n</html>\n",
            ),
            ("templates/partials/hero.html", "<h1>${heroHeading}</h1>\n"),
            ("content.json", r#"{ "heroHeading": "Try Falcon Free" }"#),
        ]);

        let report = build_project(&config).unwrap();
        let preview = fs::read_to_string(&report.preview).unwrap();
        let carrier = fs::read_to_string(&report.carrier).unwrap();

        assert!(preview.contains("  <h1>Try Falcon Free</h1>"));
        assert!(carrier.contains("  <h1>${heroHeading}</h1>"));
        assert!(carrier.contains(
            r#"<meta class="string" name="heroHeading" label="Hero Heading" default="Try Falcon Free">"#
        ));
        assert_eq!(report.variables, 1);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_missing_dataset_previews_names() {
        let (_dir, config) = project(&[("templates/index.html", "<p>${subtitle}</p>")]);
        let report = build_project(&config).unwrap();
        assert_eq!(fs::read_to_string(&report.preview).unwrap(), "<p>[subtitle]</p>");
    }

    #[test]
    fn test_toml_dataset() {
        let (_dir, mut config) = project(&[
            ("templates/index.html", "<p>${seats|number}</p>"),
            ("content.toml", "seats = 12\n"),
        ]);
        config.build.content = config.get_root().join("content.toml");
        let report = build_project(&config).unwrap();
        assert_eq!(fs::read_to_string(&report.preview).unwrap(), "<p>12</p>");
    }

    #[test]
    fn test_missing_entry_is_fatal() {
        let (_dir, config) = project(&[("content.json", "{}")]);
        let err = build_project(&config).unwrap_err();
        assert!(format!("{err}").contains("entry template"));
    }

    #[test]
    fn test_invalid_dataset_is_fatal() {
        let (_dir, config) = project(&[
            ("templates/index.html", "<p></p>"),
            ("content.json", "{ not json"),
        ]);
        assert!(build_project(&config).is_err());
    }

    #[test]
    fn test_diagnostics_are_reported() {
        let (_dir, config) = project(&[(
            "templates/index.html",
            "include nope.html\n${a|number} ${a|color}\nfor i < many\nx\nendfor",
        )]);
        let report = build_project(&config).unwrap();
        assert_eq!(report.diagnostics.len(), 3);
    }

    #[test]
    fn test_clean_removes_stale_output() {
        let (_dir, mut config) = project(&[
            ("templates/index.html", "<p></p>"),
            ("dist/stale.html", "old"),
        ]);
        config.build.clean = true;
        build_project(&config).unwrap();
        assert!(!config.build.output.join("stale.html").exists());
        assert!(config.build.preview_path().exists());
    }

    #[test]
    fn test_inline_styles_in_both_documents() {
        let index = format!("<html><head>{STYLES_MARKER}</head><body>${{x}}</body></html>");
        let (_dir, mut config) = project(&[
            ("templates/index.html", index.as_str()),
            ("styles/main.css", "h1 { color: red }\n"),
        ]);
        config.build.styles.input = Some(config.get_root().join("styles/main.css"));

        let report = build_project(&config).unwrap();
        for path in [&report.preview, &report.carrier] {
            let doc = fs::read_to_string(path).unwrap();
            assert!(doc.contains("<style>\nh1 { color: red }\n</style>"));
            assert!(!doc.contains(STYLES_MARKER));
        }
    }

    #[test]
    fn test_linked_styles_written() {
        let (_dir, mut config) = project(&[
            ("templates/index.html", STYLES_MARKER),
            ("styles/main.css", "p {}"),
        ]);
        config.build.styles.input = Some(config.get_root().join("styles/main.css"));
        config.build.styles.inline = false;

        let report = build_project(&config).unwrap();
        assert_eq!(
            fs::read_to_string(config.build.output.join("styles.css")).unwrap(),
            "p {}"
        );
        assert!(
            fs::read_to_string(&report.preview)
                .unwrap()
                .starts_with(r#"<link rel="stylesheet" href="styles.css?v="#)
        );
    }

    #[test]
    fn test_broken_styles_do_not_fail_build() {
        let (_dir, mut config) = project(&[("templates/index.html", STYLES_MARKER)]);
        config.build.styles.input = Some(config.get_root().join("styles/missing.css"));

        let report = build_project(&config).unwrap();
        assert_eq!(fs::read_to_string(&report.preview).unwrap(), "");
    }

    #[test]
    fn test_minify_applies_to_preview_only() {
        let (_dir, mut config) = project(&[(
            "templates/index.html",
            "<html>\n  <body>\n    <p>${x}</p>\n  </body>\n</html>",
        )]);
        config.build.minify = true;

        let report = build_project(&config).unwrap();
        let preview = fs::read_to_string(&report.preview).unwrap();
        let carrier = fs::read_to_string(&report.carrier).unwrap();
        assert!(!preview.contains("\n  "));
        assert!(carrier.contains("\n  <body>"));
    }
}
