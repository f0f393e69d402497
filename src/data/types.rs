//! Value types of the content dataset.
//!
//! A dataset entry is either a plain scalar or a configuration table used by
//! typed (mostly boolean) variables:
//!
//! ```json
//! {
//!   "heroHeading": "Try Falcon Free",
//!   "seats": 12,
//!   "showBanner": { "default": true, "true_value": "on", "false_value": "off" }
//! }
//! ```

use serde::Deserialize;
use std::fmt;

/// A scalar dataset value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Loose truthiness: booleans as-is, numbers non-zero, text non-empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Integer(n) => *n != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

/// Configuration table attached to a variable.
///
/// Unknown keys are ignored so datasets exported by other tools still load.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ValueConfig {
    pub default: Option<Scalar>,
    pub value: Option<Scalar>,
    pub true_value: Option<Scalar>,
    pub false_value: Option<Scalar>,
    pub true_value_name: Option<Scalar>,
    pub false_value_name: Option<Scalar>,
}

impl ValueConfig {
    /// The value this entry stands for: `default`, then `value`.
    pub fn primary(&self) -> Option<&Scalar> {
        self.default.as_ref().or(self.value.as_ref())
    }

    /// Resolve the boolean display text.
    ///
    /// `true_value` (or `"true"`) when `default` is truthy, `false_value`
    /// (or `"false"`) otherwise. A missing `default` counts as false.
    pub fn boolean_text(&self) -> String {
        let on = self.default.as_ref().is_some_and(Scalar::is_truthy);
        let (chosen, fallback) = if on {
            (&self.true_value, "true")
        } else {
            (&self.false_value, "false")
        };
        chosen
            .as_ref()
            .map_or_else(|| fallback.to_owned(), ToString::to_string)
    }

    /// Boolean side labels present in this table, in emission order.
    pub fn side_labels(&self) -> impl Iterator<Item = (&'static str, &Scalar)> {
        [
            ("true_value", &self.true_value),
            ("false_value", &self.false_value),
            ("true_value_name", &self.true_value_name),
            ("false_value_name", &self.false_value_name),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key, v)))
    }
}

/// One dataset entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ContentValue {
    Scalar(Scalar),
    Config(ValueConfig),
}

impl ContentValue {
    /// Plain text of this entry.
    ///
    /// Scalars are stringified; a config table yields its primary value or
    /// nothing.
    pub fn text(&self) -> String {
        match self {
            Self::Scalar(s) => s.to_string(),
            Self::Config(c) => c.primary().map(ToString::to_string).unwrap_or_default(),
        }
    }

    /// Text for a `|boolean` placeholder.
    ///
    /// Config tables follow [`ValueConfig::boolean_text`]; plain scalars are
    /// stringified unchanged.
    pub fn boolean_text(&self) -> String {
        match self {
            Self::Scalar(s) => s.to_string(),
            Self::Config(c) => c.boolean_text(),
        }
    }

    pub const fn as_config(&self) -> Option<&ValueConfig> {
        match self {
            Self::Config(c) => Some(c),
            Self::Scalar(_) => None,
        }
    }
}

impl From<Scalar> for ContentValue {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<&str> for ContentValue {
    fn from(s: &str) -> Self {
        Self::Scalar(s.into())
    }
}

impl From<bool> for ContentValue {
    fn from(b: bool) -> Self {
        Self::Scalar(b.into())
    }
}

impl From<i64> for ContentValue {
    fn from(n: i64) -> Self {
        Self::Scalar(n.into())
    }
}

impl From<ValueConfig> for ContentValue {
    fn from(config: ValueConfig) -> Self {
        Self::Config(config)
    }
}
