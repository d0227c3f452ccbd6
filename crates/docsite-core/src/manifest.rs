//! The sidebar manifest: a read-only tree of folders and documents.
//!
//! The manifest is produced ahead of time (see [`crate::generate`]) and
//! loaded once at runtime. Its depth-first file order is the single source
//! of truth for previous/next navigation and for index build order.

use crate::{Error, ManifestNode, NodeKind, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered top-level nodes of the documentation tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    nodes: Vec<ManifestNode>,
}

impl Manifest {
    pub const fn new(nodes: Vec<ManifestNode>) -> Self {
        Self { nodes }
    }

    /// Parse the JSON manifest shape: an array of `{type, title, path, children?}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Parse(format!("Invalid manifest: {e}")))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn nodes(&self) -> &[ManifestNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every file node, depth first: a folder's children come before the
    /// folder's later siblings.
    pub fn flatten_files(&self) -> Vec<&ManifestNode> {
        let mut files = Vec::new();
        collect_files(&self.nodes, &mut files);
        files
    }

    pub fn file_count(&self) -> usize {
        self.flatten_files().len()
    }

    /// Find a folder with this exact path anywhere in the tree.
    pub fn find_folder(&self, path: &str) -> Option<&ManifestNode> {
        find_node(&self.nodes, path, NodeKind::Folder)
    }

    pub fn find_file(&self, path: &str) -> Option<&ManifestNode> {
        find_node(&self.nodes, path, NodeKind::File)
    }

    pub fn top_level_folders(&self) -> impl Iterator<Item = &ManifestNode> {
        self.nodes.iter().filter(|node| node.is_folder())
    }

    /// Check the structural invariants: unique paths across the whole tree,
    /// and every folder holding at least one file somewhere below it.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        validate_nodes(&self.nodes, &mut seen)
    }
}

impl From<Vec<ManifestNode>> for Manifest {
    fn from(nodes: Vec<ManifestNode>) -> Self {
        Self::new(nodes)
    }
}

fn collect_files<'a>(nodes: &'a [ManifestNode], out: &mut Vec<&'a ManifestNode>) {
    for node in nodes {
        match node.kind {
            NodeKind::File => out.push(node),
            NodeKind::Folder => collect_files(&node.children, out),
        }
    }
}

fn find_node<'a>(nodes: &'a [ManifestNode], path: &str, kind: NodeKind) -> Option<&'a ManifestNode> {
    for node in nodes {
        if node.kind == kind && node.path == path {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, path, kind) {
            return Some(found);
        }
    }
    None
}

fn validate_nodes<'a>(nodes: &'a [ManifestNode], seen: &mut HashSet<&'a str>) -> Result<()> {
    for node in nodes {
        if !seen.insert(node.path.as_str()) {
            return Err(Error::Parse(format!(
                "Duplicate manifest path '{}'",
                node.path
            )));
        }

        match node.kind {
            NodeKind::File if !node.children.is_empty() => {
                return Err(Error::Parse(format!(
                    "File '{}' must not have children",
                    node.path
                )));
            },
            NodeKind::Folder => {
                let mut files = Vec::new();
                collect_files(&node.children, &mut files);
                if files.is_empty() {
                    return Err(Error::Parse(format!(
                        "Folder '{}' contains no documents",
                        node.path
                    )));
                }
                validate_nodes(&node.children, seen)?;
            },
            NodeKind::File => {},
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::{Manifest, ManifestNode};

    /// A small two-level documentation tree used across tests.
    pub fn sample() -> Manifest {
        Manifest::new(vec![
            ManifestNode::folder(
                "Getting Started",
                "/docs/getting-started",
                vec![
                    ManifestNode::file("Introduction", "/docs/getting-started/introduction"),
                    ManifestNode::file("Installation", "/docs/getting-started/installation"),
                ],
            ),
            ManifestNode::folder(
                "Guides",
                "/docs/guides",
                vec![
                    ManifestNode::folder(
                        "Advanced",
                        "/docs/guides/advanced",
                        vec![ManifestNode::file("Plugins", "/docs/guides/advanced/plugins")
                            .with_description("Extending the site")],
                    ),
                    ManifestNode::file("Theming", "/docs/guides/theming"),
                ],
            )
            .with_description("Step-by-step walkthroughs"),
            ManifestNode::file("Changelog", "/docs/changelog"),
        ])
    }
}
