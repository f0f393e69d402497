//! Project initialization module.
//!
//! Creates a new project with a default configuration and a small working
//! example: an entry template, one partial, a dataset, a stylesheet and a
//! footer script.

use crate::config::ProjectConfig;
use anyhow::{Context, Result, bail};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore", ".ignore"];

/// Default config filename
const CONFIG_FILE: &str = "trellis.toml";

/// Default project directory structure
const PROJECT_DIRS: &[&str] = &[
    "templates/partials",
    "styles",
    "scripts/head",
    "scripts/footer",
];

/// Starter files, relative to the project root.
const STARTER_FILES: &[(&str, &str)] = &[
    (
        "templates/index.html",
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>${pageTitle|attr}</title>
  <!-- trellis:styles -->
  <!-- trellis:scripts-head -->
</head>
<body>
  include partials/hero.html
  <ul class="features">
    for i < 3
    <li>${feature-${i}}</li>
    endfor
  </ul>
  <!-- trellis:scripts-footer -->
</body>
</html>
"#,
    ),
    (
        "templates/partials/hero.html",
        r#"<section class="hero" style="background: ${heroColor|color}">
  <h1>${heroHeading}</h1>
  <p>${heroText|html}</p>
  <img src="${heroImage|image}" alt="${heroHeading|attr}">
  <p class="banner">${showBanner|boolean}</p>
</section>
"#,
    ),
    (
        "content.json",
        r##"{
  "pageTitle": "Falcon",
  "heroHeading": "Try Falcon Free",
  "heroText": "No card <em>required</em>.",
  "heroColor": "#0b5fff",
  "heroImage": "/img/hero.png",
  "showBanner": { "default": true, "true_value": "shown", "false_value": "hidden" },
  "feature-0": "Fast",
  "feature-1": "Typed",
  "feature-2": "Deterministic"
}
"##,
    ),
    (
        "styles/main.css",
        "body { font-family: system-ui, sans-serif; margin: 0; }\n.hero { padding: 4rem 2rem; color: #fff; }\n",
    ),
    ("scripts/footer/main.js", "console.log(\"trellis\");\n"),
];

/// Create a new project with default structure
pub fn new_project(config: &ProjectConfig, has_name: bool) -> Result<()> {
    let root = config.get_root();

    // Without a name the project is created in place, which must be empty
    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `trellis init <NAME>` to create in a subdirectory."
        );
    }

    init_project_structure(root)?;
    init_default_config(root)?;
    init_starter_files(root)?;
    let output = config
        .build
        .output
        .strip_prefix(root)
        .unwrap_or(&config.build.output);
    init_ignored_files(root, &[output])?;

    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Configuration matching the starter files.
fn starter_config() -> ProjectConfig {
    let mut config = ProjectConfig::default();
    config.build.styles.input = Some(PathBuf::from("styles/main.css"));
    config.build.scripts.head = Some(PathBuf::from("scripts/head"));
    config.build.scripts.footer = Some(PathBuf::from("scripts/footer"));
    config
}

/// Write default configuration file
fn init_default_config(root: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&starter_config())?;
    fs::write(root.join(CONFIG_FILE), content)?;
    Ok(())
}

/// Create project directory structure
fn init_project_structure(root: &Path) -> Result<()> {
    for dir in PROJECT_DIRS {
        let path = root.join(dir);
        if path.exists() {
            bail!(
                "Path `{}` already exists. Try `trellis init <NAME>` instead.",
                path.display()
            );
        }
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    Ok(())
}

fn init_starter_files(root: &Path) -> Result<()> {
    for (name, content) in STARTER_FILES {
        let path = root.join(name);
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Initialize .gitignore and .ignore files with specified paths
fn init_ignored_files(root: &Path, paths: &[&Path]) -> Result<()> {
    let content = paths
        .iter()
        .filter_map(|p| p.to_str())
        .map(|p| format!("/{p}/"))
        .collect::<Vec<_>>()
        .join("\n");

    for filename in IGNORE_FILES {
        let path = root.join(filename);
        if !path.exists() {
            fs::write(&path, &content)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_project;
    use crate::data::Dataset;
    use tempfile::tempdir;

    fn config_at(root: &Path) -> ProjectConfig {
        let mut config = ProjectConfig::default();
        config.set_root(root);
        config.build.output = root.join("dist");
        config
    }

    #[test]
    fn test_new_project_layout() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("site");
        new_project(&config_at(&root), true).unwrap();

        for dir in PROJECT_DIRS {
            assert!(root.join(dir).is_dir(), "{dir}");
        }
        for (name, _) in STARTER_FILES {
            assert!(root.join(name).is_file(), "{name}");
        }
        assert_eq!(fs::read_to_string(root.join(".gitignore")).unwrap(), "/dist/");
    }

    #[test]
    fn test_written_config_round_trips() {
        let dir = tempdir().unwrap();
        new_project(&config_at(dir.path()), false).unwrap();

        let config = ProjectConfig::from_path(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.build.styles.input, Some(PathBuf::from("styles/main.css")));
        assert_eq!(config.build.entry, PathBuf::from("index.html"));
    }

    #[test]
    fn test_starter_dataset_parses() {
        let (_, json) = STARTER_FILES
            .iter()
            .find(|(name, _)| *name == "content.json")
            .unwrap();
        let dataset = Dataset::from_json_str(json).unwrap();
        assert!(dataset.get("showBanner").unwrap().as_config().is_some());
    }

    #[test]
    fn test_starter_project_builds_cleanly() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        new_project(&config_at(root), false).unwrap();

        let mut config = starter_config();
        config.set_root(root);
        config.config_path = root.join(CONFIG_FILE);
        config.build.templates = root.join("templates");
        config.build.content = root.join("content.json");
        config.build.output = root.join("dist");
        config.build.styles.input = Some(root.join("styles/main.css"));
        config.build.scripts.head = Some(root.join("scripts/head"));
        config.build.scripts.footer = Some(root.join("scripts/footer"));

        let report = build_project(&config).unwrap();
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);

        let preview = fs::read_to_string(&report.preview).unwrap();
        assert!(preview.contains("<h1>Try Falcon Free</h1>"));
        assert!(preview.contains("<li>Typed</li>"));
        assert!(preview.contains("shown"));
        assert!(preview.contains("console.log"));
        assert!(!preview.contains("trellis:styles"));
    }

    #[test]
    fn test_refuses_non_empty_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("keep.txt"), "").unwrap();
        assert!(new_project(&config_at(dir.path()), false).is_err());
    }
}
