//! Directive syntax: line tokenizer and placeholder scanner.
//!
//! Templates carry two kinds of syntax:
//!
//! - **Line directives**, recognised only when they make up a whole line:
//!   `include <path>`, `for <var> < <bound>` and `endfor`.
//! - **Placeholders** inside any text: `${name}` or `${name|modifier}`.
//!
//! [`parse`] splits a document into text lines and loop blocks. Loop bodies
//! are kept as raw lines because the loop variable has to be substituted
//! before the body is parsed again. Include lines are plain text to the loop
//! pass; [`include_directive`] recognises them afterwards.

use regex::Regex;
use std::sync::OnceLock;

fn include_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)include\s+(.+)$").unwrap())
}

fn for_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)for\s+([A-Za-z0-9_-]+)\s*<\s*(\S+)\s*$").unwrap())
}

fn endfor_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)endfor\s*$").unwrap())
}

// ============================================================================
// Line Directives
// ============================================================================

/// A top-level element of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a> {
    /// A literal line, without its line terminator.
    Text(&'a str),
    /// `for <var> < <bound>` ... `endfor`.
    Loop(LoopBlock<'a>),
}

/// A bounded loop with its unparsed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopBlock<'a> {
    pub var: &'a str,
    pub bound: &'a str,
    pub body: Vec<&'a str>,
}

/// Match an `include <path>` line, returning its indentation and path.
///
/// A trailing `\r` is ignored.
pub fn include_directive(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.strip_suffix('\r').unwrap_or(line);
    let caps = include_re().captures(trimmed)?;
    let indent = caps.get(1).map_or("", |m| m.as_str());
    let path = caps.get(2).map_or("", |m| m.as_str()).trim();
    Some((indent, path))
}

/// Split a document into directive nodes.
///
/// Lines are split on `\n`; a trailing `\r` is ignored when matching
/// directives but kept in text lines. A `for` header without a matching
/// `endfor` at the same indentation is treated as text.
pub fn parse(source: &str) -> Vec<Node<'_>> {
    let lines: Vec<&str> = source.split('\n').collect();
    let mut nodes = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some((indent, var, bound)) = loop_header(line)
            && let Some(end) = find_endfor(&lines[i + 1..], indent)
        {
            nodes.push(Node::Loop(LoopBlock {
                var,
                bound,
                body: lines[i + 1..i + 1 + end].to_vec(),
            }));
            i += end + 2;
            continue;
        }

        nodes.push(Node::Text(line));
        i += 1;
    }

    nodes
}

/// Match a `for <var> < <bound>` line: `(indent, var, bound)`.
fn loop_header(line: &str) -> Option<(&str, &str, &str)> {
    let trimmed = line.strip_suffix('\r').unwrap_or(line);
    let caps = for_re().captures(trimmed)?;
    let get = |i| caps.get(i).map_or("", |m| m.as_str());
    Some((get(1), get(2), get(3)))
}

/// Indentation of an `endfor` line.
fn endfor_indent(line: &str) -> Option<&str> {
    let trimmed = line.strip_suffix('\r').unwrap_or(line);
    let caps = endfor_re().captures(trimmed)?;
    Some(caps.get(1).map_or("", |m| m.as_str()))
}

/// Index of the `endfor` closing a header with the given indentation.
///
/// Headers opened at the same indentation in between nest, so each needs
/// its own `endfor` first.
fn find_endfor(lines: &[&str], indent: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, line) in lines.iter().enumerate() {
        if loop_header(line).is_some_and(|(inner, _, _)| inner == indent) {
            depth += 1;
        } else if endfor_indent(line) == Some(indent) {
            if depth == 0 {
                return Some(idx);
            }
            depth -= 1;
        }
    }
    None
}

// ============================================================================
// Placeholders
// ============================================================================

/// A `${name}` or `${name|modifier}` occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub name: &'a str,
    pub modifier: Option<&'a str>,
}

/// Inline piece of text produced by [`scan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Var(Placeholder<'a>),
}

const fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Try to read a placeholder starting at `start` (which points at `$`).
///
/// Returns the placeholder and the index just past its closing brace.
fn read_placeholder(text: &str, start: usize) -> Option<(Placeholder<'_>, usize)> {
    let bytes = text.as_bytes();
    let name_start = start + 2;
    let mut i = name_start;
    while i < bytes.len() && is_ident_byte(bytes[i]) {
        i += 1;
    }
    if i == name_start {
        return None;
    }
    let name = &text[name_start..i];

    let modifier = if bytes.get(i) == Some(&b'|') {
        let mod_start = i + 1;
        i = mod_start;
        while i < bytes.len() && is_ident_byte(bytes[i]) {
            i += 1;
        }
        Some(&text[mod_start..i])
    } else {
        None
    };

    (bytes.get(i) == Some(&b'}')).then_some((Placeholder { name, modifier }, i + 1))
}

/// Split text into literal runs and placeholders.
///
/// Anything that does not form a complete placeholder stays literal.
pub fn scan(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find("${") {
        let start = cursor + offset;
        match read_placeholder(text, start) {
            Some((placeholder, end)) => {
                if literal_start < start {
                    segments.push(Segment::Text(&text[literal_start..start]));
                }
                segments.push(Segment::Var(placeholder));
                literal_start = end;
                cursor = end;
            }
            None => cursor = start + 1,
        }
    }

    if literal_start < text.len() {
        segments.push(Segment::Text(&text[literal_start..]));
    }
    segments
}
