//! File category classification for watch mode.
//!
//! | Category   | On change                     | Example Files             |
//! |------------|-------------------------------|---------------------------|
//! | Config     | Reload config, full rebuild   | `trellis.toml`            |
//! | Template   | Full rebuild                  | `templates/**`            |
//! | Content    | Full rebuild                  | `content.json`            |
//! | Styles     | Full rebuild                  | `styles/main.css`         |
//! | Scripts    | Full rebuild                  | `scripts/head/*.js`       |
//! | Unknown    | Ignored                       | output files, others      |
//!
//! Every build recomputes both documents from scratch, so the category only
//! decides whether a change matters and what the log line says.

use crate::config::ProjectConfig;
use crate::utils::css::is_styles_input;
use std::{
    env,
    path::{Path, PathBuf},
};

/// Category of a changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Config,
    Template,
    Content,
    Styles,
    Scripts,
    Unknown,
}

impl FileCategory {
    /// All categories that are watched.
    pub const WATCHED: [Self; 5] = [
        Self::Config,
        Self::Template,
        Self::Content,
        Self::Styles,
        Self::Scripts,
    ];

    /// Get the short name for this category (used in logs)
    pub const fn name(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Template => "templates",
            Self::Content => "content",
            Self::Styles => "styles",
            Self::Scripts => "scripts",
            Self::Unknown => "unknown",
        }
    }

    /// Paths to watch for this category.
    pub fn paths(self, config: &ProjectConfig) -> Vec<PathBuf> {
        let build = &config.build;
        match self {
            Self::Config => vec![config.config_path.clone()],
            Self::Template => vec![build.templates.clone()],
            Self::Content => vec![build.content.clone()],
            Self::Styles => build.styles.input.iter().cloned().collect(),
            Self::Scripts => build
                .scripts
                .head
                .iter()
                .chain(build.scripts.footer.iter())
                .cloned()
                .collect(),
            Self::Unknown => vec![],
        }
    }

    /// Returns true if this category represents directories (vs single files)
    pub const fn is_directory(self) -> bool {
        matches!(self, Self::Template | Self::Scripts)
    }
}

/// Categorize a file path to determine how a change is handled.
pub fn categorize_path(path: &Path, config: &ProjectConfig) -> FileCategory {
    let path = normalize_path(path);
    let build = &config.build;
    let in_scripts = [&build.scripts.head, &build.scripts.footer]
        .into_iter()
        .flatten()
        .any(|dir| path.starts_with(dir));

    if path == config.config_path {
        FileCategory::Config
    } else if path.starts_with(&build.output) {
        FileCategory::Unknown
    } else if path.starts_with(&build.templates) {
        FileCategory::Template
    } else if path == build.content {
        FileCategory::Content
    } else if is_styles_input(&path, config) {
        FileCategory::Styles
    } else if in_scripts {
        FileCategory::Scripts
    } else {
        FileCategory::Unknown
    }
}

/// Normalize a path to absolute form for reliable comparison.
///
/// Config paths are already canonicalized, so incoming watcher paths are
/// canonicalized too before comparison.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProjectConfig {
        let mut config = ProjectConfig::default();
        config.config_path = PathBuf::from("/site/trellis.toml");
        config.build.templates = PathBuf::from("/site/templates");
        config.build.content = PathBuf::from("/site/content.json");
        config.build.output = PathBuf::from("/site/dist");
        config.build.styles.input = Some(PathBuf::from("/site/styles/main.css"));
        config.build.scripts.footer = Some(PathBuf::from("/site/scripts"));
        config
    }

    #[test]
    fn test_category_name() {
        assert_eq!(FileCategory::Config.name(), "config");
        assert_eq!(FileCategory::Template.name(), "templates");
        assert_eq!(FileCategory::Scripts.name(), "scripts");
        assert_eq!(FileCategory::Unknown.name(), "unknown");
    }

    #[test]
    fn test_categorize_path() {
        let config = config();
        let cases = [
            ("/site/trellis.toml", FileCategory::Config),
            ("/site/templates/partials/hero.html", FileCategory::Template),
            ("/site/content.json", FileCategory::Content),
            ("/site/styles/main.css", FileCategory::Styles),
            ("/site/styles/other.css", FileCategory::Unknown),
            ("/site/scripts/app.js", FileCategory::Scripts),
            ("/site/dist/preview.html", FileCategory::Unknown),
            ("/elsewhere/file.html", FileCategory::Unknown),
        ];
        for (path, expected) in cases {
            assert_eq!(categorize_path(Path::new(path), &config), expected, "{path}");
        }
    }

    #[test]
    fn test_paths() {
        let config = config();
        assert_eq!(
            FileCategory::Scripts.paths(&config),
            vec![PathBuf::from("/site/scripts")]
        );
        assert_eq!(
            FileCategory::Styles.paths(&config),
            vec![PathBuf::from("/site/styles/main.css")]
        );
        assert!(FileCategory::Unknown.paths(&config).is_empty());
    }

    #[test]
    fn test_is_directory() {
        assert!(FileCategory::Template.is_directory());
        assert!(FileCategory::Scripts.is_directory());
        assert!(!FileCategory::Config.is_directory());
        assert!(!FileCategory::Content.is_directory());
    }

    #[test]
    fn test_normalize_path_relative() {
        assert!(normalize_path(Path::new("relative/path/file.txt")).is_absolute());
    }
}
