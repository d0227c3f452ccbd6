//! # docsite-core
//!
//! Core functionality for docsite - search and content routing for a static
//! documentation site driven by a sidebar manifest.
//!
//! The site publishes a tree of markdown documents plus a JSON manifest
//! (`sidebar.json`) describing folders and files. This crate builds a fuzzy
//! search index over those documents, resolves request paths to a category
//! index, a document, or not-found, and generates the manifest and sitemap
//! ahead of time.
//!
//! ## Architecture
//!
//! - **Manifest**: the folder/file tree every other component walks
//! - **Sources**: [`DocumentSource`] adapters for HTTP and the filesystem
//! - **Parsing**: frontmatter, tree-sitter headings and plain-text stripping
//! - **Search**: [`SearchIndex`] with a TTL cache in a [`CacheStore`], ranked
//!   by [`QueryEngine`]
//! - **Routing**: [`RouteResolver`], [`ContentLoader`], adjacency and
//!   breadcrumbs
//! - **Generation**: [`generate::SidebarGenerator`] and
//!   [`generate::SitemapGenerator`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docsite_core::{Config, FileCacheStore, FsDocumentStore, SearchIndex};
//! use std::sync::Arc;
//!
//! # async fn run() -> docsite_core::Result<()> {
//! let config = Config::load()?;
//! let source = FsDocumentStore::new(&config.paths.content_root, &config.site);
//! let cache = FileCacheStore::new(&config.paths.cache_dir)?;
//!
//! let index = SearchIndex::new(Arc::new(source), Arc::new(cache), config.search_options());
//! let report = index.build_index().await;
//! println!("{} documents indexed", report.documents);
//!
//! for result in index.search("install").await.into_results() {
//!     println!("{:.3} {} {}", result.score, result.document.path, result.snippet);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T, Error>`]. Index builds and route
//! resolution degrade instead of failing; the error types surface from the
//! adapters and generators:
//!
//! ```rust
//! use docsite_core::{Error, Manifest};
//!
//! match Manifest::from_json("{ not a manifest") {
//!     Ok(manifest) => println!("{} documents", manifest.file_count()),
//!     Err(Error::Parse(msg)) => eprintln!("bad manifest: {msg}"),
//!     Err(e) => eprintln!("[{}] {e}", e.category()),
//! }
//! ```

/// Configuration loading and defaults
pub mod config;
/// Error types and result aliases
pub mod error;
/// Document sources over HTTP and the filesystem
pub mod fetcher;
/// YAML frontmatter extraction
pub mod frontmatter;
/// Sidebar manifest and sitemap generators
pub mod generate;
/// Heading text cleanup and anchor slugs
pub mod heading;
/// Search index lifecycle and caching
pub mod index;
/// Content loading state for a document viewer
pub mod loader;
/// The sidebar manifest tree
pub mod manifest;
/// Tree-sitter based markdown parsing
pub mod parser;
/// Fuzzy ranking, snippets and grouping
pub mod query;
/// Latest-request tracking
pub mod request;
/// Path classification and navigation helpers
pub mod router;
/// Caller-side search state
pub mod session;
/// Cache stores for index snapshots
pub mod storage;
/// Core data types
pub mod types;
/// String and path helpers
pub mod utils;

pub use config::{Config, PathsConfig, SearchConfig, SearchOptions, SiteConfig};
pub use error::{Error, Result};
pub use fetcher::{DocumentSource, FsDocumentStore, HttpDocumentStore, load_document};
pub use frontmatter::Frontmatter;
pub use index::{BuildReport, BuildSource, IndexStatus, SearchIndex, SearchOutcome};
pub use loader::{ContentLoader, LoadState};
pub use manifest::Manifest;
pub use parser::{MarkdownParser, ParsedDocument, strip_markdown};
pub use query::{Corpus, QueryEngine, QueryOptions, extract_snippet, group_by_section};
pub use request::{RequestTicket, RequestTracker};
pub use router::{RouteKind, RouteResolver, breadcrumbs, find_adjacent};
pub use session::{SearchBackend, SearchSession, SearchView};
pub use storage::{CacheStore, FileCacheStore, MemoryCacheStore};
pub use types::*;
