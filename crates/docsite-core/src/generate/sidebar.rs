use super::{file_name, sorted_entries};
use crate::utils::humanize_segment;
use crate::{Error, Manifest, ManifestNode, NodeKind, Result, frontmatter};
use serde::Deserialize;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Sidecar file in the docs directory that orders top-level folders.
pub const ORDER_FILE: &str = "_sidebar-order.json";

/// Sort key for documents and folders without an explicit order.
pub const DEFAULT_ORDER: u32 = 999;

#[derive(Deserialize)]
struct FolderOrder {
    #[serde(default)]
    order: Vec<String>,
}

/// Builds the sidebar manifest by scanning a docs directory.
///
/// - folders come before files at every level, root included, and only
///   appear if they hold markdown
/// - nested folders sort by title, not directory-read order
/// - files sort by frontmatter `order`, then title
/// - titles come from frontmatter, else from the humanized file name
/// - top-level folders follow `_sidebar-order.json`, then title; root files
///   are never interleaved with them
pub struct SidebarGenerator {
    docs_dir: PathBuf,
    route_root: String,
}

struct Entry {
    node: ManifestNode,
    order: u32,
}

impl SidebarGenerator {
    pub fn new(docs_dir: impl Into<PathBuf>, route_root: &str) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            route_root: route_root.trim_end_matches('/').to_string(),
        }
    }

    /// Scan the docs directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the docs directory cannot be read.
    pub fn generate(&self) -> Result<Manifest> {
        if !self.docs_dir.is_dir() {
            return Err(Error::NotFound(format!(
                "Docs directory {} does not exist",
                self.docs_dir.display()
            )));
        }

        let folder_order = self.load_folder_order();
        let mut entries = self.scan(&self.docs_dir, &self.route_root)?;

        if let Some(order) = folder_order {
            let rank = |entry: &Entry| {
                let name = entry.node.path.rsplit('/').next().unwrap_or_default();
                order.iter().position(|o| o == name).unwrap_or(usize::MAX)
            };
            let split = entries.partition_point(|e| e.node.is_folder());
            entries[..split].sort_by(|a, b| {
                rank(a)
                    .cmp(&rank(b))
                    .then_with(|| compare_titles(&a.node.title, &b.node.title))
            });
        }

        Ok(Manifest::new(entries.into_iter().map(|e| e.node).collect()))
    }

    /// Generate and write pretty JSON to `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if scanning fails or the file cannot be written.
    pub fn write(&self, output: &Path) -> Result<Manifest> {
        let manifest = self.generate()?;

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, manifest.to_json_pretty()?)?;

        info!(
            "Sidebar written to {}: {} top-level entries, {} documents",
            output.display(),
            manifest.nodes().len(),
            manifest.file_count()
        );
        Ok(manifest)
    }

    fn load_folder_order(&self) -> Option<Vec<String>> {
        let path = self.docs_dir.join(ORDER_FILE);
        let text = fs::read_to_string(&path).ok()?;

        match serde_json::from_str::<FolderOrder>(&text) {
            Ok(config) => {
                info!("Using custom folder order from {}", ORDER_FILE);
                Some(config.order)
            },
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                None
            },
        }
    }

    fn scan(&self, dir: &Path, route: &str) -> Result<Vec<Entry>> {
        let mut folders = Vec::new();
        let mut files = Vec::new();

        for (path, file_type) in sorted_entries(dir)? {
            let name = file_name(&path);

            if file_type.is_dir() {
                let child_route = format!("{route}/{name}");
                let children = self.scan(&path, &child_route)?;
                if children.is_empty() {
                    continue;
                }
                folders.push(Entry {
                    node: ManifestNode::folder(
                        &humanize_segment(name),
                        &child_route,
                        children.into_iter().map(|e| e.node).collect(),
                    ),
                    order: DEFAULT_ORDER,
                });
            } else if file_type.is_file() {
                let Some(stem) = name
                    .strip_suffix(".md")
                    .or_else(|| name.strip_suffix(".mdx"))
                else {
                    continue;
                };
                files.push(Self::file_entry(&path, stem, route));
            }
        }

        folders.sort_by(|a, b| compare_titles(&a.node.title, &b.node.title));
        files.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| compare_titles(&a.node.title, &b.node.title))
        });

        folders.extend(files);
        Ok(folders)
    }

    fn file_entry(path: &Path, stem: &str, route: &str) -> Entry {
        let meta = match fs::read_to_string(path) {
            Ok(text) => frontmatter::parse(&text).0,
            Err(e) => {
                warn!("Could not read frontmatter from {}: {}", path.display(), e);
                frontmatter::Frontmatter::default()
            },
        };

        let title = meta.title.unwrap_or_else(|| humanize_segment(stem));
        Entry {
            node: ManifestNode {
                kind: NodeKind::File,
                title,
                path: format!("{route}/{stem}"),
                description: None,
                children: Vec::new(),
            },
            order: meta.order.unwrap_or(DEFAULT_ORDER),
        }
    }
}

/// Case-insensitive title order with a case-sensitive tiebreak.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}
