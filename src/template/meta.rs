//! Metadata tags for the carrier document.
//!
//! Each registered variable becomes one self-describing tag:
//!
//! ```html
//! <meta class="boolean" name="showBanner" label="Show Banner" true_value="on" false_value="off" default="true">
//! ```
//!
//! Tags follow registry order (first occurrence in the document), so the
//! block is reproducible regardless of dataset key order.

use super::escape::{collapse_whitespace, escape_attr};
use super::vars::{Descriptor, Registry, VarType};
use crate::data::{ContentValue, Dataset};
use regex::Regex;
use std::sync::OnceLock;

/// Human-readable label for a variable name.
///
/// `heroHeading` → `Hero Heading`, `cta-button_text` → `Cta Button Text`.
pub fn label(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in name.chars() {
        if c == '-' || c == '_' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        let boundary = c.is_uppercase()
            && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Default value shown to the content editor.
fn default_value(value: Option<&ContentValue>) -> String {
    let raw = value.map(ContentValue::text).unwrap_or_default();
    collapse_whitespace(&escape_attr(&raw))
}

fn emit_tag(descriptor: &Descriptor, dataset: &Dataset) -> String {
    let value = dataset.get(&descriptor.name);
    let mut tag = format!(
        r#"<meta class="{}" name="{}" label="{}""#,
        descriptor.var_type,
        escape_attr(&descriptor.name),
        escape_attr(&label(&descriptor.name)),
    );

    if descriptor.allow_html {
        tag.push_str(r#" allowHTML="true""#);
    }

    if descriptor.var_type == VarType::Boolean
        && let Some(config) = value.and_then(ContentValue::as_config)
    {
        for (key, side) in config.side_labels() {
            tag.push_str(&format!(r#" {key}="{}""#, escape_attr(&side.to_string())));
        }
    }

    tag.push_str(&format!(r#" default="{}">"#, default_value(value)));
    tag
}

/// Build the metadata block, one tag per line.
pub fn emit(registry: &Registry, dataset: &Dataset) -> String {
    registry
        .iter()
        .map(|descriptor| emit_tag(descriptor, dataset))
        .collect::<Vec<_>>()
        .join("\n")
}

fn html_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<html\b[^>]*>").unwrap())
}

fn doctype_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*<!doctype\b[^>]*>").unwrap())
}

/// Place the metadata block into a document.
///
/// First match wins: after the opening `<html>` tag, after a leading
/// `<!DOCTYPE>`, or at the very start.
pub fn insert(document: &str, block: &str) -> String {
    if block.is_empty() {
        return document.to_owned();
    }

    let anchor = html_open_re()
        .find(document)
        .or_else(|| doctype_re().find(document))
        .map(|m| m.end());

    match anchor {
        Some(end) => format!("{}\n{block}{}", &document[..end], &document[end..]),
        None => format!("{block}\n{document}"),
    }
}
