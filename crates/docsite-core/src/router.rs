//! Path classification against the manifest.
//!
//! A requested path is one of three things:
//!
//! - the docs root: an index of the top-level folders
//! - a folder anywhere in the tree: an index of its direct children
//! - anything else: a document candidate, fetched and shown or not found
//!
//! Classification is synchronous against the in-memory manifest; only the
//! document branch touches the [`DocumentSource`].

use crate::fetcher::{DocumentSource, load_document};
use crate::utils::{humanize_segment, normalize_path};
use crate::{
    Adjacent, Breadcrumb, CategoryIndex, CategoryItem, Manifest, ManifestNode, NavLink,
    RouteDecision,
};
use std::sync::Arc;
use tracing::debug;

const ROOT_TITLE: &str = "Documentation";
const ROOT_DESCRIPTION: &str = "Browse every section of the documentation";

/// Result of the synchronous classification step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteKind {
    CategoryIndex(CategoryIndex),
    /// Not a folder; the normalized path should be loaded as a document.
    Document(String),
}

/// Resolves paths for one manifest.
pub struct RouteResolver {
    manifest: Arc<Manifest>,
    docs_root: String,
    source: Arc<dyn DocumentSource>,
}

impl RouteResolver {
    pub fn new(manifest: Arc<Manifest>, docs_root: &str, source: Arc<dyn DocumentSource>) -> Self {
        Self {
            manifest,
            docs_root: normalize_path(docs_root).to_string(),
            source,
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn docs_root(&self) -> &str {
        &self.docs_root
    }

    pub(crate) fn source(&self) -> &Arc<dyn DocumentSource> {
        &self.source
    }

    /// Decide what a path denotes without fetching anything.
    pub fn classify(&self, path: &str) -> RouteKind {
        let path = normalize_path(path);
        match self.category_index(path) {
            Some(index) => RouteKind::CategoryIndex(index),
            None => RouteKind::Document(path.to_string()),
        }
    }

    /// The generated index for the docs root or a folder path.
    pub fn category_index(&self, path: &str) -> Option<CategoryIndex> {
        let path = normalize_path(path);

        if path == self.docs_root {
            return Some(root_index(&self.manifest));
        }

        self.manifest.find_folder(path).map(folder_index)
    }

    /// Classify and, for document paths, load the document.
    pub async fn resolve(&self, path: &str) -> RouteDecision {
        match self.classify(path) {
            RouteKind::CategoryIndex(index) => RouteDecision::CategoryIndex(index),
            RouteKind::Document(path) => match load_document(self.source.as_ref(), &path).await {
                Ok(page) => RouteDecision::Document(page),
                Err(e) => {
                    debug!("Document {} not found: {}", path, e);
                    RouteDecision::NotFound { path }
                },
            },
        }
    }

    pub fn find_adjacent(&self, path: &str) -> Adjacent {
        find_adjacent(&self.manifest, path)
    }
}

fn root_index(manifest: &Manifest) -> CategoryIndex {
    CategoryIndex {
        title: ROOT_TITLE.to_string(),
        description: ROOT_DESCRIPTION.to_string(),
        items: manifest
            .top_level_folders()
            .map(|node| CategoryItem {
                title: node.title.clone(),
                path: node.path.clone(),
                kind: node.kind,
                description: node
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("Documentation about {}", node.title)),
            })
            .collect(),
    }
}

fn folder_index(folder: &ManifestNode) -> CategoryIndex {
    CategoryIndex {
        title: folder.title.clone(),
        description: folder
            .description
            .clone()
            .unwrap_or_else(|| format!("Contents of {}", folder.title)),
        items: folder
            .children
            .iter()
            .map(|child| CategoryItem {
                title: child.title.clone(),
                path: child.path.clone(),
                kind: child.kind,
                description: child.description.clone().unwrap_or_else(|| child.title.clone()),
            })
            .collect(),
    }
}

/// Previous and next documents in depth-first manifest order.
///
/// Folders are skipped. An unknown path has neither neighbour.
pub fn find_adjacent(manifest: &Manifest, path: &str) -> Adjacent {
    let path = normalize_path(path);
    let files = manifest.flatten_files();

    let Some(i) = files.iter().position(|node| node.path == path) else {
        return Adjacent::default();
    };

    Adjacent {
        previous: i.checked_sub(1).map(|p| NavLink::from(files[p])),
        next: files.get(i + 1).map(|node| NavLink::from(*node)),
    }
}

/// Home followed by one crumb per path segment.
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut crumbs = Vec::with_capacity(segments.len() + 1);
    crumbs.push(Breadcrumb {
        label: "Home".to_string(),
        path: "/".to_string(),
        is_last: segments.is_empty(),
    });

    let mut current = String::new();
    for (i, segment) in segments.iter().enumerate() {
        current.push('/');
        current.push_str(segment);
        crumbs.push(Breadcrumb {
            label: humanize_segment(segment),
            path: current.clone(),
            is_last: i + 1 == segments.len(),
        });
    }

    crumbs
}
