//! YAML frontmatter extraction.
//!
//! A document may open with a block delimited by `---` lines:
//!
//! ```text
//! ---
//! title: Installation
//! description: Getting the tool onto your machine
//! keywords: [install, setup]
//! order: 2
//! ---
//! # Installation
//! ```
//!
//! Malformed blocks are treated as absent metadata, never as an error.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use tracing::debug;

/// Metadata read from a document's frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Keywords as a single string; YAML lists are joined with `", "`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// Sidebar ordering hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Split a document into its raw frontmatter block (if any) and body.
pub fn split(text: &str) -> (Option<&str>, &str) {
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == "---" {
            let block = rest[..offset].trim_end_matches(['\n', '\r']);
            return (Some(block), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, text)
}

/// Parse a document into frontmatter and body.
///
/// A missing or malformed block yields [`Frontmatter::default`] and, when the
/// block is missing, the full text as body.
pub fn parse(text: &str) -> (Frontmatter, &str) {
    match split(text) {
        (Some(block), body) => (parse_block(block), body),
        (None, body) => (Frontmatter::default(), body),
    }
}

fn parse_block(block: &str) -> Frontmatter {
    let value: Value = match serde_yaml::from_str(block) {
        Ok(value) => value,
        Err(e) => {
            debug!("Ignoring malformed frontmatter: {}", e);
            return Frontmatter::default();
        },
    };

    let Value::Mapping(map) = value else {
        return Frontmatter::default();
    };

    let field = |key: &str| map.get(key).and_then(scalar_text);

    Frontmatter {
        title: field("title"),
        description: field("description"),
        keywords: map.get("keywords").and_then(keywords_text),
        order: map.get("order").and_then(order_value),
        author: field("author"),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn keywords_text(value: &Value) -> Option<String> {
    match value {
        Value::Sequence(items) => {
            let joined = items
                .iter()
                .filter_map(scalar_text)
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        },
        other => scalar_text(other),
    }
}

fn order_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
