//! The search index service.
//!
//! A [`SearchIndex`] is constructed explicitly with its document source, cache
//! store and options, then driven through `build_index` → `search` →
//! `dispose`. Building never fails from the caller's point of view: manifest
//! and document fetch failures degrade to a smaller (or empty) corpus and
//! are logged.
//!
//! ## Cache layout
//!
//! Two keys in the [`CacheStore`]:
//!
//! - [`CACHE_VERSION_KEY`] holds the index format version
//! - [`CACHE_KEY`] holds `{"version", "origin", "timestamp", "documents"}`
//!   with the timestamp in milliseconds since the Unix epoch
//!
//! A snapshot is reused only if the version key matches
//! [`INDEX_FORMAT_VERSION`], the timestamp is within the TTL, the origin is
//! the source's [`DocumentSource::origin`], and the payload parses, checked
//! in that order. The in-memory corpus ages the same way: once it is older
//! than the TTL, the next `build_index` rebuilds it.

use crate::config::SearchOptions;
use crate::fetcher::DocumentSource;
use crate::parser::{MarkdownParser, strip_markdown};
use crate::query::{Corpus, QueryEngine, QueryOptions};
use crate::storage::CacheStore;
use crate::utils::{section_label, truncate_chars};
use crate::{ManifestNode, QueryResult, Result, SearchDocument};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Cache key of the serialized index payload.
pub const CACHE_KEY: &str = "docsite_search_index";

/// Cache key of the index format version.
pub const CACHE_VERSION_KEY: &str = "docsite_search_version";

/// Bump whenever [`SearchDocument`] changes shape.
pub const INDEX_FORMAT_VERSION: &str = "1.0.0";

/// Lifecycle state of a [`SearchIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexStatus {
    Idle,
    Indexing,
    Ready,
}

/// Where the corpus of a build came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSource {
    /// Already built; nothing was loaded.
    Memory,
    /// Restored from a valid cache snapshot.
    Cache,
    /// Rebuilt from the document source.
    Fresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub documents: usize,
    /// Documents listed in the manifest that could not be fetched or parsed.
    pub skipped: usize,
    pub source: BuildSource,
}

/// Answer to a search request.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A build is in flight; no partial results are served.
    Indexing,
    Results(Vec<QueryResult>),
}

impl SearchOutcome {
    /// Results, treating an in-flight build as no results.
    pub fn into_results(self) -> Vec<QueryResult> {
        match self {
            Self::Indexing => Vec::new(),
            Self::Results(results) => results,
        }
    }

    pub const fn is_indexing(&self) -> bool {
        matches!(self, Self::Indexing)
    }
}

#[derive(Serialize, Deserialize)]
struct CachedIndex {
    version: String,
    origin: String,
    timestamp: i64,
    documents: Vec<SearchDocument>,
}

/// Just enough of the payload to check freshness before a full parse.
#[derive(Deserialize)]
struct CacheHeader {
    timestamp: i64,
    #[serde(default)]
    origin: String,
}

struct IndexState {
    status: IndexStatus,
    corpus: Option<Arc<Corpus>>,
    skipped: usize,
    /// Milliseconds since the epoch; a cache hit keeps the snapshot's time.
    built_at: i64,
}

impl IndexState {
    const fn idle() -> Self {
        Self {
            status: IndexStatus::Idle,
            corpus: None,
            skipped: 0,
            built_at: 0,
        }
    }
}

/// Puts the status back if a build future is dropped before it finishes.
struct BuildGuard<'a> {
    state: &'a RwLock<IndexState>,
    finished: bool,
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.status = if state.corpus.is_some() {
            IndexStatus::Ready
        } else {
            IndexStatus::Idle
        };
        warn!("Search index build cancelled");
    }
}

struct Rebuilt {
    documents: Vec<SearchDocument>,
    skipped: usize,
    /// False when the manifest could not be loaded; such builds are not cached.
    complete: bool,
}

/// Fuzzy search over every document listed in the manifest.
pub struct SearchIndex {
    source: Arc<dyn DocumentSource>,
    cache: Arc<dyn CacheStore>,
    options: SearchOptions,
    engine: QueryEngine,
    state: RwLock<IndexState>,
    build_lock: Mutex<()>,
}

impl SearchIndex {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        cache: Arc<dyn CacheStore>,
        options: SearchOptions,
    ) -> Self {
        let engine = QueryEngine::new(QueryOptions {
            threshold: options.threshold,
            min_query_chars: options.min_query_chars,
        });

        Self {
            source,
            cache,
            options,
            engine,
            state: RwLock::new(IndexState::idle()),
            build_lock: Mutex::new(()),
        }
    }

    pub const fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn status(&self) -> IndexStatus {
        self.read_state().status
    }

    /// Documents dropped during the last fresh build.
    pub fn skipped_count(&self) -> usize {
        self.read_state().skipped
    }

    pub fn document_count(&self) -> usize {
        self.read_state()
            .corpus
            .as_ref()
            .map_or(0, |corpus| corpus.len())
    }

    fn read_state(&self) -> RwLockReadGuard<'_, IndexState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, IndexState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn ttl_ms(&self) -> i64 {
        i64::try_from(self.options.cache_ttl.as_millis()).unwrap_or(i64::MAX)
    }

    /// Populate the corpus from the cache or the document source.
    ///
    /// Calling this again while the corpus is ready and younger than the TTL
    /// is a no-op. Concurrent callers are serialized; the later ones observe
    /// the finished build.
    pub async fn build_index(&self) -> BuildReport {
        let _build = self.build_lock.lock().await;

        {
            let state = self.read_state();
            if let (IndexStatus::Ready, Some(corpus)) = (state.status, &state.corpus) {
                let age_ms = Utc::now().timestamp_millis() - state.built_at;
                if age_ms <= self.ttl_ms() {
                    debug!("Search index already built ({} documents)", corpus.len());
                    return BuildReport {
                        documents: corpus.len(),
                        skipped: state.skipped,
                        source: BuildSource::Memory,
                    };
                }
                debug!("Search index expired ({} ms old), rebuilding", age_ms);
            }
        }

        self.write_state().status = IndexStatus::Indexing;
        let mut guard = BuildGuard {
            state: &self.state,
            finished: false,
        };
        let start = Instant::now();

        let (documents, skipped, source, built_at) = if let Some(cached) = self.load_from_cache()
        {
            info!(
                "Search index loaded from cache: {} documents",
                cached.documents.len()
            );
            (cached.documents, 0, BuildSource::Cache, cached.timestamp)
        } else {
            let rebuilt = self.rebuild().await;
            let built_at = Utc::now().timestamp_millis();
            if rebuilt.complete {
                self.save_to_cache(&rebuilt.documents, built_at);
            }
            info!(
                "Search index built: {} documents, {} skipped in {:?}",
                rebuilt.documents.len(),
                rebuilt.skipped,
                start.elapsed()
            );
            (rebuilt.documents, rebuilt.skipped, BuildSource::Fresh, built_at)
        };

        let corpus = Corpus::new(documents);
        let report = BuildReport {
            documents: corpus.len(),
            skipped,
            source,
        };

        {
            let mut state = self.write_state();
            state.corpus = Some(Arc::new(corpus));
            state.skipped = skipped;
            state.built_at = built_at;
            state.status = IndexStatus::Ready;
        }
        guard.finished = true;

        report
    }

    /// Rank documents against `query`, best first.
    ///
    /// Before any build this yields empty results; during a build it yields
    /// [`SearchOutcome::Indexing`].
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let corpus = {
            let state = self.read_state();
            match (state.status, &state.corpus) {
                (IndexStatus::Indexing, _) => return SearchOutcome::Indexing,
                (IndexStatus::Ready, Some(corpus)) => Arc::clone(corpus),
                _ => {
                    debug!("Search requested before the index was built");
                    return SearchOutcome::Results(Vec::new());
                },
            }
        };

        SearchOutcome::Results(self.engine.search(&corpus, query))
    }

    /// Drop the in-memory corpus. The cache is left untouched.
    pub async fn dispose(&self) {
        let _build = self.build_lock.lock().await;
        *self.write_state() = IndexState::idle();
        debug!("Search index disposed");
    }

    /// Remove the cached snapshot so the next build starts fresh.
    ///
    /// # Errors
    ///
    /// Returns the cache store's error if either key cannot be removed.
    pub fn clear_cache(&self) -> Result<()> {
        self.cache.remove(CACHE_KEY)?;
        self.cache.remove(CACHE_VERSION_KEY)?;
        info!("Search index cache cleared");
        Ok(())
    }

    fn load_from_cache(&self) -> Option<CachedIndex> {
        let version = match self.cache.get(CACHE_VERSION_KEY) {
            Ok(version) => version,
            Err(e) => {
                warn!("Failed to read cache version: {}", e);
                return None;
            },
        };
        if version.as_deref() != Some(INDEX_FORMAT_VERSION) {
            debug!(
                "Cache version mismatch ({:?} != {}), rebuilding index",
                version, INDEX_FORMAT_VERSION
            );
            return None;
        }

        let raw = match self.cache.get(CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache payload missing, rebuilding index");
                return None;
            },
            Err(e) => {
                warn!("Failed to read cache payload: {}", e);
                return None;
            },
        };

        let Ok(header) = serde_json::from_str::<CacheHeader>(&raw) else {
            debug!("Cache payload has no timestamp, rebuilding index");
            return None;
        };
        let age_ms = Utc::now().timestamp_millis() - header.timestamp;
        if age_ms > self.ttl_ms() {
            debug!("Cache expired ({} ms old), rebuilding index", age_ms);
            return None;
        }

        let origin = self.source.origin();
        if header.origin != origin {
            debug!(
                "Cache belongs to {:?}, not {}, rebuilding index",
                header.origin, origin
            );
            return None;
        }

        match serde_json::from_str::<CachedIndex>(&raw) {
            Ok(cached) => Some(cached),
            Err(e) => {
                debug!("Cache payload malformed ({}), rebuilding index", e);
                None
            },
        }
    }

    fn save_to_cache(&self, documents: &[SearchDocument], timestamp: i64) {
        let payload = CachedIndex {
            version: INDEX_FORMAT_VERSION.to_string(),
            origin: self.source.origin(),
            timestamp,
            documents: documents.to_vec(),
        };

        let result = serde_json::to_string(&payload)
            .map_err(crate::Error::from)
            .and_then(|json| self.cache.set(CACHE_KEY, &json))
            .and_then(|()| self.cache.set(CACHE_VERSION_KEY, INDEX_FORMAT_VERSION));

        match result {
            Ok(()) => debug!("Search index cached ({} documents)", documents.len()),
            Err(e) => warn!(category = e.category(), "Failed to cache search index: {}", e),
        }
    }

    async fn rebuild(&self) -> Rebuilt {
        let manifest = match self.source.fetch_manifest().await {
            Ok(manifest) => manifest,
            Err(e) => {
                error!("Failed to load manifest, search index is empty: {}", e);
                return Rebuilt {
                    documents: Vec::new(),
                    skipped: 0,
                    complete: false,
                };
            },
        };

        let source = &self.source;
        let fetched: Vec<(&ManifestNode, Result<String>)> =
            stream::iter(manifest.flatten_files())
                .map(|node| async move { (node, source.fetch_document(&node.path).await) })
                .buffered(self.options.fetch_concurrency.max(1))
                .collect()
                .await;

        let mut parser = match MarkdownParser::new() {
            Ok(parser) => parser,
            Err(e) => {
                error!("Markdown parser unavailable, search index is empty: {}", e);
                return Rebuilt {
                    documents: Vec::new(),
                    skipped: fetched.len(),
                    complete: false,
                };
            },
        };

        let mut documents = Vec::with_capacity(fetched.len());
        let mut skipped = 0;
        for (node, result) in fetched {
            match result.and_then(|text| self.to_search_document(&mut parser, node, &text)) {
                Ok(document) => documents.push(document),
                Err(e) => {
                    warn!("Skipping {} in search index: {}", node.path, e);
                    skipped += 1;
                },
            }
        }

        Rebuilt {
            documents,
            skipped,
            complete: true,
        }
    }

    fn to_search_document(
        &self,
        parser: &mut MarkdownParser,
        node: &ManifestNode,
        text: &str,
    ) -> Result<SearchDocument> {
        let parsed = parser.parse(text)?;
        let plain = strip_markdown(parsed.body);
        let frontmatter = parsed.frontmatter;

        Ok(SearchDocument {
            path: node.path.clone(),
            title: frontmatter.title.unwrap_or_else(|| node.title.clone()),
            description: frontmatter.description.unwrap_or_default(),
            keywords: frontmatter.keywords.unwrap_or_default(),
            section: section_label(&node.path),
            content: truncate_chars(&plain, self.options.content_limit).to_string(),
            headings: parsed.headings,
        })
    }
}
