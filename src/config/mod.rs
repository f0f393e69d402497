//! Project configuration management for `trellis.toml`.
//!
//! # Sections
//!
//! | Section            | Purpose                                         |
//! |--------------------|-------------------------------------------------|
//! | `[build]`          | Template root, entry, dataset, output names     |
//! | `[build.styles]`   | Stylesheet source and compiler command          |
//! | `[build.scripts]`  | Head / footer script directories                |
//! | `[serve]`          | Development server (port, interface, watch)     |
//!
//! # Example
//!
//! ```toml
//! [build]
//! templates = "templates"
//! entry = "index.html"
//! content = "content.json"
//! output = "dist"
//!
//! [serve]
//! port = 5277
//! ```

mod build;
pub mod defaults;
mod error;
mod handle;
mod serve;

pub use build::BuildConfig;
pub use error::ConfigError;
pub use handle::{cfg, init_config, reload_config};
pub use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Context, Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing trellis.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl ProjectConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content).with_context(|| format!("in `{}`", path.display()))
    }

    /// Load the config named on the command line, falling back to defaults
    /// when the file does not exist, and apply CLI overrides.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf());
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let base = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => base.join(name),
            _ => base,
        };
        self.update_path_with_root(&root, &cli.config);

        if let Some(args) = cli.build_args() {
            self.build.clean = args.clean;
            Self::update_option(&mut self.build.minify, args.minify.as_ref());
            Self::update_option(&mut self.build.include_indent, args.include_indent.as_ref());
        }

        if let Commands::Serve {
            interface,
            port,
            watch,
            ..
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            Self::update_option(&mut self.serve.watch, watch.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve every configured path against `root` and make it absolute.
    fn update_path_with_root(&mut self, root: &Path, config_name: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);
        self.config_path = Self::normalize_path(&root.join(config_name));

        let build = &mut self.build;
        build.templates = Self::normalize_path(&root.join(&build.templates));
        build.content = Self::normalize_path(&root.join(&build.content));
        build.output = Self::normalize_path(&root.join(&build.output));

        for path in [
            &mut build.styles.input,
            &mut build.scripts.head,
            &mut build.scripts.footer,
        ] {
            if let Some(p) = path.take() {
                *path = Some(Self::normalize_path(&root.join(p)));
            }
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration before building.
    pub fn validate(&self) -> Result<()> {
        if !self.config_path.exists() {
            bail!("Config file not found");
        }

        if !self.build.templates.is_dir() {
            bail!(ConfigError::Validation(format!(
                "[build.templates] `{}` is not a directory",
                self.build.templates.display()
            )));
        }

        if self.build.entry.is_absolute() {
            bail!(ConfigError::Validation(
                "[build.entry] must be relative to [build.templates]".into()
            ));
        }

        if self.build.output.starts_with(&self.build.templates) {
            bail!(ConfigError::Validation(
                "[build.output] must not be inside [build.templates]".into()
            ));
        }

        let styles = &self.build.styles;
        if !styles.command.is_empty() {
            Self::check_command_installed("[build.styles.command]", &styles.command)?;
            if styles.input.is_none() {
                bail!(ConfigError::Validation(
                    "[build.styles.command] requires [build.styles.input] to be set".into()
                ));
            }
        }
        match &styles.input {
            Some(path) if !path.exists() => {
                bail!(ConfigError::Validation(
                    "[build.styles.input] not found".into()
                ))
            }
            Some(path) if !path.is_file() => {
                bail!(ConfigError::Validation(
                    "[build.styles.input] is not a file".into()
                ))
            }
            _ => {}
        }

        for (field, dir) in [
            ("[build.scripts.head]", &self.build.scripts.head),
            ("[build.scripts.footer]", &self.build.scripts.footer),
        ] {
            if let Some(dir) = dir
                && !dir.is_dir()
            {
                bail!(ConfigError::Validation(format!("{field} is not a directory")));
            }
        }

        Ok(())
    }

    /// Check if a command is installed and available
    fn check_command_installed(field: &str, command: &[String]) -> Result<()> {
        let Some(cmd) = command.first() else {
            bail!(ConfigError::Validation(format!(
                "{field} must have at least one element"
            )));
        };

        which::which(cmd)
            .with_context(|| format!("`{cmd}` not found. Please install it first."))?;

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::IncludeIndent;
    use clap::Parser;
    use tempfile::{TempDir, tempdir};

    fn cli(args: &[&str]) -> &'static Cli {
        Box::leak(Box::new(Cli::parse_from(
            std::iter::once("trellis").chain(args.iter().copied()),
        )))
    }

    fn project(config: &str) -> TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("trellis.toml"), config).unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("templates/index.html"), "<html></html>").unwrap();
        dir
    }

    fn load(dir: &TempDir, args: &[&str]) -> ProjectConfig {
        let root = dir.path().to_str().unwrap();
        let mut full = vec!["--root", root];
        full.extend_from_slice(args);
        ProjectConfig::load(cli(&full)).unwrap()
    }

    #[test]
    fn test_from_str() {
        let config = ProjectConfig::from_str(
            r#"
            [build]
            entry = "landing.html"
        "#,
        )
        .unwrap();
        assert_eq!(config.build.entry, PathBuf::from("landing.html"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(ProjectConfig::from_str("[deploy]\nforce = true").is_err());
    }

    #[test]
    fn test_from_path_missing() {
        let err = ProjectConfig::from_path(Path::new("/nonexistent/trellis.toml")).unwrap_err();
        assert!(format!("{err}").contains("IO error"));
    }

    #[test]
    fn test_load_normalizes_paths() {
        let dir = project("[build]\ncontent = \"data/content.toml\"\n");
        let config = load(&dir, &["build"]);
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(config.get_root(), root);
        assert_eq!(config.config_path, root.join("trellis.toml"));
        assert_eq!(config.build.templates, root.join("templates"));
        assert_eq!(config.build.content, root.join("data/content.toml"));
        assert_eq!(config.build.output, root.join("dist"));
        assert_eq!(config.build.entry_path(), root.join("templates/index.html"));
    }

    #[test]
    fn test_cli_overrides() {
        let dir = project("[build]\nminify = false\n");
        let config = load(
            &dir,
            &["build", "--clean", "--minify", "--include-indent", "raw"],
        );

        assert!(config.build.clean);
        assert!(config.build.minify);
        assert_eq!(config.build.include_indent, IncludeIndent::Raw);
    }

    #[test]
    fn test_serve_overrides() {
        let dir = project("");
        let config = load(&dir, &["serve", "--port", "8080", "--watch", "false"]);

        assert_eq!(config.serve.port, 8080);
        assert!(!config.serve.watch);
        assert_eq!(config.serve.interface, "127.0.0.1");
    }

    #[test]
    fn test_init_name_joins_root() {
        let dir = tempdir().unwrap();
        let config = load_init(&dir, "site");
        assert!(config.get_root().ends_with("site"));
        assert!(config.config_path.ends_with("site/trellis.toml"));
    }

    fn load_init(dir: &TempDir, name: &str) -> ProjectConfig {
        let root = dir.path().to_str().unwrap();
        ProjectConfig::load(cli(&["--root", root, "init", name])).unwrap()
    }

    #[test]
    fn test_validate_ok() {
        let dir = project("");
        assert!(load(&dir, &["build"]).validate().is_ok());
    }

    #[test]
    fn test_validate_missing_templates() {
        let dir = project("[build]\ntemplates = \"nope\"\n");
        let err = load(&dir, &["build"]).validate().unwrap_err();
        assert!(format!("{err}").contains("[build.templates]"));
    }

    #[test]
    fn test_validate_styles_input_missing() {
        let dir = project("[build.styles]\ninput = \"missing.css\"\n");
        let err = load(&dir, &["build"]).validate().unwrap_err();
        assert!(format!("{err}").contains("[build.styles.input] not found"));
    }

    #[test]
    fn test_validate_scripts_dir() {
        let dir = project("[build.scripts]\nhead = \"scripts\"\n");
        assert!(load(&dir, &["build"]).validate().is_err());

        fs::create_dir_all(dir.path().join("scripts")).unwrap();
        assert!(load(&dir, &["build"]).validate().is_ok());
    }

    #[test]
    fn test_check_command_installed_empty() {
        let err = ProjectConfig::check_command_installed("[x]", &[]).unwrap_err();
        assert!(format!("{err}").contains("at least one element"));
    }

    #[test]
    fn test_check_command_not_found() {
        let cmd = vec!["trellis-definitely-not-installed".to_string()];
        assert!(ProjectConfig::check_command_installed("[x]", &cmd).is_err());
    }

    #[test]
    fn test_normalize_path_relative() {
        assert!(ProjectConfig::normalize_path(Path::new("relative/file.txt")).is_absolute());
    }
}
