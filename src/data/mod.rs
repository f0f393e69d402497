//! Content dataset consumed by preview rendering and metadata emission.
//!
//! The dataset is a flat mapping from variable name to [`ContentValue`],
//! loaded once per build from a JSON or TOML file and never mutated while the
//! build runs.
//!
//! | Extension | Parser       |
//! |-----------|--------------|
//! | `.json`   | `serde_json` |
//! | `.toml`   | `toml`       |

pub mod types;

pub use types::ContentValue;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Dataset loading errors
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid JSON content data")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML content data")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported content data format `{0}` (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),
}

/// Variable name → value mapping.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    values: FxHashMap<String, ContentValue>,
}

impl Dataset {
    pub fn from_json_str(content: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DataError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a dataset file, choosing the parser from its extension.
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let parse = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str,
            Some("toml") => Self::from_toml_str,
            _ => return Err(DataError::UnsupportedFormat(path.to_path_buf())),
        };
        let content =
            fs::read_to_string(path).map_err(|err| DataError::Io(path.to_path_buf(), err))?;
        parse(&content)
    }

    pub fn get(&self, name: &str) -> Option<&ContentValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<ContentValue>> FromIterator<(K, V)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::types::Scalar;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_from_json_scalars_and_config() {
        let data = Dataset::from_json_str(
            r#"{
                "heroHeading": "Try Falcon Free",
                "seats": 12,
                "ratio": 0.5,
                "visible": true,
                "flag": { "default": true, "true_value": "on", "false_value": "off", "label": "x" }
            }"#,
        )
        .unwrap();

        assert_eq!(data.len(), 5);
        assert_eq!(data.get("heroHeading").unwrap().text(), "Try Falcon Free");
        assert_eq!(data.get("seats"), Some(&ContentValue::Scalar(Scalar::Integer(12))));
        assert_eq!(data.get("ratio").unwrap().text(), "0.5");
        assert_eq!(data.get("visible").unwrap().text(), "true");

        let flag = data.get("flag").unwrap().as_config().unwrap();
        assert_eq!(flag.default, Some(Scalar::Bool(true)));
        assert_eq!(flag.true_value, Some(Scalar::from("on")));
    }

    #[test]
    fn test_from_toml() {
        let data = Dataset::from_toml_str(
            r#"
                title = "Hello"
                count = 3

                [flag]
                default = false
                false_value = "hidden"
            "#,
        )
        .unwrap();

        assert_eq!(data.get("title").unwrap().text(), "Hello");
        assert_eq!(data.get("count").unwrap().text(), "3");
        assert_eq!(data.get("flag").unwrap().boolean_text(), "hidden");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Dataset::from_json_str("{ not json"),
            Err(DataError::Json(_))
        ));
    }

    #[test]
    fn test_from_path_by_extension() {
        let dir = tempdir().unwrap();
        let json = dir.path().join("content.json");
        fs::write(&json, r#"{"a": "1"}"#).unwrap();
        let toml_path = dir.path().join("content.toml");
        fs::write(&toml_path, "a = \"2\"").unwrap();

        assert_eq!(Dataset::from_path(&json).unwrap().get("a").unwrap().text(), "1");
        assert_eq!(Dataset::from_path(&toml_path).unwrap().get("a").unwrap().text(), "2");
    }

    #[test]
    fn test_from_path_errors() {
        let dir = tempdir().unwrap();
        let yaml = dir.path().join("content.yaml");
        fs::write(&yaml, "a: 1").unwrap();

        assert!(matches!(
            Dataset::from_path(&yaml),
            Err(DataError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            Dataset::from_path(&dir.path().join("missing.json")),
            Err(DataError::Io(..))
        ));
    }

    #[test]
    fn test_from_iter() {
        let data: Dataset = [("a", "x"), ("b", "y")].into_iter().collect();
        assert_eq!(data.get("b").unwrap().text(), "y");
        assert!(data.get("c").is_none());
    }
}
