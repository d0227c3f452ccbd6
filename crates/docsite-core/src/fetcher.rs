//! Document store adapters.
//!
//! A [`DocumentSource`] hands out the sidebar manifest and raw markdown for a
//! document path. Two adapters exist: [`HttpDocumentStore`] for a deployed
//! site and [`FsDocumentStore`] for a content directory on disk.

use crate::config::SiteConfig;
use crate::parser::MarkdownParser;
use crate::{DocumentPage, Error, Manifest, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Source of the manifest and of raw document text.
///
/// Failures are ordinary errors; callers decide how to degrade.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Identifies the site this source serves. A cached index is only reused
    /// by a source with the same origin.
    fn origin(&self) -> String;

    async fn fetch_manifest(&self) -> Result<Manifest>;

    /// Raw markdown (frontmatter included) for a route path like
    /// `/docs/guides/theming`.
    async fn fetch_document(&self, path: &str) -> Result<String>;
}

/// Fetch and parse a document into a renderable page.
///
/// # Errors
///
/// Propagates the source's fetch error, or a parse error if the markdown
/// grammar cannot be loaded.
pub async fn load_document(source: &dyn DocumentSource, path: &str) -> Result<DocumentPage> {
    let raw = source.fetch_document(path).await?;
    let mut parser = MarkdownParser::new()?;
    let parsed = parser.parse(&raw)?;

    Ok(DocumentPage {
        path: path.to_string(),
        frontmatter: parsed.frontmatter,
        content: parsed.body.to_string(),
        headings: parsed.headings,
    })
}

/// Fetches documents from a deployed site over HTTP.
pub struct HttpDocumentStore {
    client: Client,
    base_url: String,
    manifest_path: String,
}

impl HttpDocumentStore {
    pub fn new(site: &SiteConfig) -> Result<Self> {
        Self::with_timeout(site, Duration::from_secs(30))
    }

    /// Creates a store with a custom request timeout (primarily for tests)
    pub fn with_timeout(site: &SiteConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("docsite/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            client,
            base_url: site.base_url.trim_end_matches('/').to_string(),
            manifest_path: site.manifest_path(),
        })
    }

    fn document_url(&self, path: &str) -> String {
        format!("{}{}.md", self.base_url, path)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("Resource not found at '{url}'")));
        }

        let content = response.error_for_status()?.text().await?;
        debug!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentStore {
    fn origin(&self) -> String {
        self.base_url.clone()
    }

    async fn fetch_manifest(&self) -> Result<Manifest> {
        let url = format!("{}{}", self.base_url, self.manifest_path);
        let manifest = Manifest::from_json(&self.get_text(&url).await?)?;
        info!("Loaded manifest from {} ({} documents)", url, manifest.file_count());
        Ok(manifest)
    }

    async fn fetch_document(&self, path: &str) -> Result<String> {
        validate_route_path(path)?;
        self.get_text(&self.document_url(path)).await
    }
}

/// Reads documents from a site directory on disk.
///
/// A route path `/docs/guides/theming` maps to
/// `{content_root}/docs/guides/theming.md`.
pub struct FsDocumentStore {
    content_root: PathBuf,
    manifest_path: String,
}

impl FsDocumentStore {
    pub fn new(content_root: impl Into<PathBuf>, site: &SiteConfig) -> Self {
        Self {
            content_root: content_root.into(),
            manifest_path: site.manifest_path(),
        }
    }

    #[must_use]
    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    fn resolve(&self, route: &str) -> PathBuf {
        self.content_root.join(route.trim_start_matches('/'))
    }

    async fn read(&self, file: &Path, route: &str) -> Result<String> {
        match tokio::fs::read_to_string(file).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("No document at '{route}'")))
            },
            Err(e) => Err(Error::Io(e)),
        }
    }
}

#[async_trait]
impl DocumentSource for FsDocumentStore {
    fn origin(&self) -> String {
        let root = std::fs::canonicalize(&self.content_root)
            .unwrap_or_else(|_| self.content_root.clone());
        format!("file://{}", root.display())
    }

    async fn fetch_manifest(&self) -> Result<Manifest> {
        let file = self.resolve(&self.manifest_path);
        let text = self.read(&file, &self.manifest_path).await?;
        Manifest::from_json(&text)
    }

    async fn fetch_document(&self, path: &str) -> Result<String> {
        validate_route_path(path)?;
        let file = self.resolve(&format!("{path}.md"));
        self.read(&file, path).await
    }
}

/// Route paths must be absolute and free of `.`/`..` segments.
fn validate_route_path(path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(Error::InvalidPath(format!("'{path}' is not an absolute route")));
    }

    let escapes = path
        .split('/')
        .skip(1)
        .any(|segment| segment == "." || segment == "..");
    if escapes || path.contains('\\') {
        return Err(Error::InvalidPath(format!("'{path}' is not a plain route")));
    }

    Ok(())
}
