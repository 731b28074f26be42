//! Minimal helpers for reading and patching OOXML parts.
//!
//! Presentation parts are machine-written and regular, so tags are located
//! with regular expressions instead of a full XML tree.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});

/// Attributes of one start (or empty-element) tag, keyed by qualified name.
#[derive(Debug, Clone, Default)]
pub(crate) struct Attrs(HashMap<String, String>);

impl Attrs {
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// All start tags with the given local name, in document order. Any
/// namespace prefix is accepted.
pub(crate) fn tags(xml: &str, local_name: &str) -> Vec<Attrs> {
    tag_regex(local_name)
        .captures_iter(xml)
        .map(|caps| parse_attrs(caps.get(1).map_or("", |m| m.as_str())))
        .collect()
}

fn tag_regex(local_name: &str) -> Regex {
    // Names come from this crate only; escaping keeps the pattern literal.
    let pattern = format!(
        r"<(?:[A-Za-z][\w.-]*:)?{}\b([^>]*?)/?>",
        regex::escape(local_name)
    );
    Regex::new(&pattern).expect("valid tag regex")
}

fn parse_attrs(raw: &str) -> Attrs {
    let map = ATTR_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_string();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
            Some((name, unescape(value)))
        })
        .collect();
    Attrs(map)
}

/// A package relationship entry.
#[derive(Debug, Clone)]
pub(crate) struct Relationship {
    pub id: String,
    pub kind: String,
    pub target: String,
}

pub(crate) fn relationships(xml: &str) -> Vec<Relationship> {
    tags(xml, "Relationship")
        .into_iter()
        .filter_map(|attrs| {
            Some(Relationship {
                id: attrs.get("Id")?.to_string(),
                kind: attrs.get("Type").unwrap_or_default().to_string(),
                target: attrs.get("Target")?.to_string(),
            })
        })
        .collect()
}

/// Largest numeric suffix among values like `rId7` with the given prefix.
pub(crate) fn max_numbered<'a>(values: impl Iterator<Item = &'a str>, prefix: &str) -> u32 {
    values
        .filter_map(|v| v.strip_prefix(prefix)?.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

/// Insert `content` right before the first occurrence of `marker`.
pub(crate) fn insert_before(xml: &str, marker: &str, content: &str) -> Option<String> {
    let pos = xml.find(marker)?;
    let mut out = String::with_capacity(xml.len() + content.len());
    out.push_str(&xml[..pos]);
    out.push_str(content);
    out.push_str(&xml[pos..]);
    Some(out)
}

/// Path of the relationships part belonging to `part`.
pub(crate) fn rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolve a relationship target against the part that owns it.
pub(crate) fn resolve_target(owner: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = owner.split('/').collect();
    segments.pop();
    for segment in target.split('/') {
        match segment {
            "." | "" => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Express `to` relative to the folder holding `from`.
pub(crate) fn relative_target(from: &str, to: &str) -> String {
    let from_dir: Vec<&str> = match from.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let to_parts: Vec<&str> = to.split('/').collect();
    let common = from_dir
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();
    let mut out: Vec<&str> = vec![".."; from_dir.len() - common];
    out.extend(&to_parts[common..]);
    out.join("/")
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
