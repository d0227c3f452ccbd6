use crate::Frontmatter;
use serde::{Deserialize, Serialize};

/// Kind of a manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    File,
}

/// One entry of the sidebar manifest.
///
/// Files carry no children; folders always have at least one descendant file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub title: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ManifestNode>,
}

impl ManifestNode {
    pub fn file(title: &str, path: &str) -> Self {
        Self {
            kind: NodeKind::File,
            title: title.to_string(),
            path: path.to_string(),
            description: None,
            children: Vec::new(),
        }
    }

    pub fn folder(title: &str, path: &str, children: Vec<Self>) -> Self {
        Self {
            kind: NodeKind::Folder,
            title: title.to_string(),
            path: path.to_string(),
            description: None,
            children,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }
}

/// A heading extracted from a document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    /// Anchor slug, unique within its document.
    pub id: String,
}

/// One indexed unit, derived from a file entry of the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub path: String,
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub section: String,
    /// Plain text body, markdown stripped and length-bounded.
    pub content: String,
    pub headings: Vec<Heading>,
}

/// Searchable fields of a [`SearchDocument`] and their rank weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchField {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "description")]
    Description,
    #[serde(rename = "keywords")]
    Keywords,
    #[serde(rename = "headings.text")]
    Headings,
    #[serde(rename = "content")]
    Content,
}

impl SearchField {
    pub const ALL: [Self; 5] = [
        Self::Title,
        Self::Description,
        Self::Keywords,
        Self::Headings,
        Self::Content,
    ];

    /// Higher weight means more influence on rank.
    pub const fn weight(self) -> f64 {
        match self {
            Self::Title => 3.0,
            Self::Description | Self::Keywords => 2.0,
            Self::Headings => 1.5,
            Self::Content => 1.0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Keywords => "keywords",
            Self::Headings => "headings.text",
            Self::Content => "content",
        }
    }

    pub fn total_weight() -> f64 {
        Self::ALL.iter().map(|field| field.weight()).sum()
    }
}

impl std::fmt::Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ranked match for a query. Lower scores are better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(flatten)]
    pub document: SearchDocument,
    pub score: f64,
    pub matched_fields: Vec<SearchField>,
    pub snippet: String,
}

/// Results sharing a section label, in ranked order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionGroup {
    pub section: String,
    pub results: Vec<QueryResult>,
}

/// A card shown on a category index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub title: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub description: String,
}

/// A generated listing for the docs root or a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryIndex {
    pub title: String,
    pub description: String,
    pub items: Vec<CategoryItem>,
}

/// A loaded markdown document ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPage {
    pub path: String,
    pub frontmatter: Frontmatter,
    /// Markdown body without the frontmatter block.
    pub content: String,
    /// Heading outline used for the table of contents.
    pub headings: Vec<Heading>,
}

/// Outcome of classifying a requested path against the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteDecision {
    CategoryIndex(CategoryIndex),
    Document(DocumentPage),
    NotFound { path: String },
}

/// Title and path of a neighbouring document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub title: String,
    pub path: String,
}

impl From<&ManifestNode> for NavLink {
    fn from(node: &ManifestNode) -> Self {
        Self {
            title: node.title.clone(),
            path: node.path.clone(),
        }
    }
}

/// Previous/next documents in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjacent {
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
    pub is_last: bool,
}
