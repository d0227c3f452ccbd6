use crate::heading::{self, Slugger};
use crate::{Error, Frontmatter, Heading, Result, frontmatter};
use regex::Regex;
use std::sync::LazyLock;
use tree_sitter::{Node, Parser, TreeCursor};

/// Fenced code blocks, removed entirely.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static FENCED_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(```|~~~).*?(```|~~~)").unwrap());

/// Images `![alt](src)`, removed entirely.
#[allow(clippy::unwrap_used)]
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());

/// Links `[label](href)`, reduced to their label.
#[allow(clippy::unwrap_used)]
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());

/// ATX heading markers at line start.
#[allow(clippy::unwrap_used)]
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{1,6}[ \t]+").unwrap());

#[allow(clippy::unwrap_used)]
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").unwrap());

#[allow(clippy::unwrap_used)]
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());

#[allow(clippy::unwrap_used)]
static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// Remove markdown syntax, keeping the readable text.
///
/// Fenced code and images disappear; links keep their label; heading markers,
/// emphasis markers and inline code backticks are dropped.
pub fn strip_markdown(text: &str) -> String {
    let text = FENCED_CODE_RE.replace_all(text, "");
    let text = IMAGE_RE.replace_all(&text, "");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = HEADER_RE.replace_all(&text, "");
    let text = BOLD_RE.replace_all(&text, "$1$2");
    let text = ITALIC_RE.replace_all(&text, "$1");
    let text = INLINE_CODE_RE.replace_all(&text, "$1");
    text.trim().to_string()
}

/// A document split into metadata, body and heading outline.
pub struct ParsedDocument<'a> {
    pub frontmatter: Frontmatter,
    /// Body without the frontmatter block, markdown intact.
    pub body: &'a str,
    pub headings: Vec<Heading>,
}

/// Tree-sitter backed markdown parser used for heading extraction.
///
/// Headings inside fenced code blocks are not reported.
pub struct MarkdownParser {
    parser: Parser,
}

impl MarkdownParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_md::LANGUAGE.into())
            .map_err(|e| Error::Parse(format!("Failed to set language: {e}")))?;

        Ok(Self { parser })
    }

    /// Split frontmatter off and extract the heading outline of the body.
    pub fn parse<'a>(&mut self, text: &'a str) -> Result<ParsedDocument<'a>> {
        let (frontmatter, body) = frontmatter::parse(text);
        let headings = self.headings(body)?;

        Ok(ParsedDocument {
            frontmatter,
            body,
            headings,
        })
    }

    /// Extract ATX headings in document order with per-document unique ids.
    pub fn headings(&mut self, body: &str) -> Result<Vec<Heading>> {
        let tree = self
            .parser
            .parse(body, None)
            .ok_or_else(|| Error::Parse("Failed to parse markdown".into()))?;

        let mut slugger = Slugger::new();
        let mut headings = Vec::new();
        let mut cursor = tree.root_node().walk();

        walk_tree(&mut cursor, |node| {
            if node.kind() != "atx_heading" {
                return;
            }

            let text = heading::display_text(&heading_text(node, body));
            if text.is_empty() {
                return;
            }

            headings.push(Heading {
                level: heading_level(node),
                id: slugger.slug(&text),
                text,
            });
        });

        Ok(headings)
    }
}

fn walk_tree<F>(cursor: &mut TreeCursor, mut callback: F)
where
    F: FnMut(Node),
{
    loop {
        callback(cursor.node());

        if cursor.goto_first_child() || cursor.goto_next_sibling() {
            continue;
        }

        loop {
            if !cursor.goto_parent() {
                return;
            }
            if cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

fn heading_level(node: Node) -> u8 {
    for child in node.children(&mut node.walk()) {
        match child.kind() {
            "atx_h1_marker" => return 1,
            "atx_h2_marker" => return 2,
            "atx_h3_marker" => return 3,
            "atx_h4_marker" => return 4,
            "atx_h5_marker" => return 5,
            "atx_h6_marker" => return 6,
            _ => {},
        }
    }
    1
}

fn heading_text(node: Node, text: &str) -> String {
    for child in node.children(&mut node.walk()) {
        if child.kind() == "inline" {
            return text[child.byte_range()].trim().to_string();
        }
    }

    text[node.byte_range()]
        .trim()
        .trim_start_matches('#')
        .trim()
        .to_string()
}
