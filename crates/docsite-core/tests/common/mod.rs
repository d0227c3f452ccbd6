#![allow(dead_code, clippy::unwrap_used)]

use async_trait::async_trait;
use docsite_core::{DocumentSource, Error, Manifest, ManifestNode, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// In-memory site that counts every fetch it serves.
pub struct StubSite {
    manifest: Option<Manifest>,
    documents: Mutex<HashMap<String, String>>,
    manifest_fetches: AtomicUsize,
    document_fetches: AtomicUsize,
}

impl StubSite {
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest: Some(manifest),
            documents: Mutex::new(HashMap::new()),
            manifest_fetches: AtomicUsize::new(0),
            document_fetches: AtomicUsize::new(0),
        }
    }

    /// A site whose manifest cannot be loaded.
    pub fn without_manifest() -> Self {
        Self {
            manifest: None,
            ..Self::new(Manifest::default())
        }
    }

    pub fn with_document(self, path: &str, text: &str) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert(path.to_string(), text.to_string());
        self
    }

    pub fn document_fetches(&self) -> usize {
        self.document_fetches.load(Ordering::SeqCst)
    }

    pub fn manifest_fetches(&self) -> usize {
        self.manifest_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSource for StubSite {
    fn origin(&self) -> String {
        "memory://stub-site".to_string()
    }

    async fn fetch_manifest(&self) -> Result<Manifest> {
        self.manifest_fetches.fetch_add(1, Ordering::SeqCst);
        self.manifest
            .clone()
            .ok_or_else(|| Error::NotFound("sidebar.json".to_string()))
    }

    async fn fetch_document(&self, path: &str) -> Result<String> {
        self.document_fetches.fetch_add(1, Ordering::SeqCst);
        self.documents
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }
}

/// Wraps a [`StubSite`]; the manifest fetch signals `entered` and then
/// waits for `release`.
pub struct GatedSite {
    pub inner: StubSite,
    pub entered: Notify,
    pub release: Notify,
}

impl GatedSite {
    pub fn new(inner: StubSite) -> Self {
        Self {
            inner,
            entered: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl DocumentSource for GatedSite {
    fn origin(&self) -> String {
        self.inner.origin()
    }

    async fn fetch_manifest(&self) -> Result<Manifest> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.fetch_manifest().await
    }

    async fn fetch_document(&self, path: &str) -> Result<String> {
        self.inner.fetch_document(path).await
    }
}

/// Three levels deep, one top-level file, one described folder.
pub fn site_manifest() -> Manifest {
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
                    vec![ManifestNode::folder(
                        "Internals",
                        "/docs/guides/advanced/internals",
                        vec![ManifestNode::file(
                            "Render Pipeline",
                            "/docs/guides/advanced/internals/render-pipeline",
                        )],
                    )],
                ),
                ManifestNode::file("Theming", "/docs/guides/theming"),
            ],
        )
        .with_description("Step-by-step walkthroughs"),
        ManifestNode::file("Changelog", "/docs/changelog"),
    ])
}

/// A site serving every document in [`site_manifest`].
pub fn full_site() -> StubSite {
    StubSite::new(site_manifest())
        .with_document(
            "/docs/getting-started/introduction",
            "---\ntitle: Introduction\ndescription: Start here\n---\n# Introduction\n\nWelcome to the documentation.\n",
        )
        .with_document(
            "/docs/getting-started/installation",
            "---\ntitle: Installation\nkeywords: [install, setup]\n---\n# Installation\n\n## Requirements\n\nRun the installer and follow the prompts.\n",
        )
        .with_document(
            "/docs/guides/advanced/internals/render-pipeline",
            "# Render Pipeline\n\nHow pages move from markdown to HTML.\n",
        )
        .with_document(
            "/docs/guides/theming",
            "---\ntitle: Theming\n---\n# Theming\n\n## Colors\n\nChange the palette, then install the theme package to apply it.\n",
        )
        .with_document(
            "/docs/changelog",
            "# Changelog\n\n## Overview\n\nRelease notes.\n\n## Overview\n\nOlder notes.\n",
        )
}
