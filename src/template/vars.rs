//! Variable typing: modifiers, descriptors and the registry.
//!
//! Every placeholder occurrence declares a type through its modifier. The
//! [`Registry`] merges all occurrences of a name into one [`Descriptor`]:
//!
//! - a `string` occurrence never overrides a non-string type;
//! - a non-string occurrence upgrades a `string` descriptor;
//! - a *different* non-string type is rejected, the first one wins;
//! - `allow_html` only ever turns on.
//!
//! Descriptors keep first-registration order, which is the order metadata is
//! emitted in.

use rustc_hash::FxHashMap;
use std::fmt;

/// Variable type as exposed to the content-management system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    String,
    Number,
    Boolean,
    Color,
    Image,
}

impl VarType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Color => "color",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placeholder modifier (`${name|modifier}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// No modifier: plain string.
    Plain,
    Html,
    Attr,
    Number,
    Boolean,
    Color,
    Image,
}

impl Modifier {
    /// Parse a modifier name, case-insensitively.
    ///
    /// `None` (no `|` at all) is [`Modifier::Plain`]. An unrecognised name is
    /// returned as the error so the caller can report it.
    pub fn parse(raw: Option<&str>) -> Result<Self, &str> {
        let Some(raw) = raw else {
            return Ok(Self::Plain);
        };
        match raw.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "attr" => Ok(Self::Attr),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "color" => Ok(Self::Color),
            "image" => Ok(Self::Image),
            _ => Err(raw),
        }
    }

    pub const fn var_type(self) -> VarType {
        match self {
            Self::Plain | Self::Html | Self::Attr => VarType::String,
            Self::Number => VarType::Number,
            Self::Boolean => VarType::Boolean,
            Self::Color => VarType::Color,
            Self::Image => VarType::Image,
        }
    }

    pub const fn allows_html(self) -> bool {
        matches!(self, Self::Html)
    }
}

/// Merged record for one variable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub name: String,
    pub var_type: VarType,
    pub allow_html: bool,
}

/// A rejected type declaration, returned by [`Registry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub kept: VarType,
    pub rejected: VarType,
}

/// Insertion-ordered set of descriptors keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    descriptors: Vec<Descriptor>,
    index: FxHashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one occurrence of `name`.
    pub fn register(&mut self, name: &str, var_type: VarType, allow_html: bool) -> Option<Conflict> {
        let Some(&idx) = self.index.get(name) else {
            self.index.insert(name.to_owned(), self.descriptors.len());
            self.descriptors.push(Descriptor {
                name: name.to_owned(),
                var_type,
                allow_html,
            });
            return None;
        };

        let descriptor = &mut self.descriptors[idx];
        descriptor.allow_html |= allow_html;

        match (descriptor.var_type, var_type) {
            (_, VarType::String) => None,
            (VarType::String, new) => {
                descriptor.var_type = new;
                None
            }
            (kept, rejected) if kept != rejected => Some(Conflict { kept, rejected }),
            _ => None,
        }
    }

    #[allow(dead_code)] // Reserved API
    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.index.get(name).map(|&idx| &self.descriptors[idx])
    }

    /// Descriptors in first-registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Descriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
