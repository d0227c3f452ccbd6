//! Caller-side search state: result cap, section grouping and stale
//! response handling for type-ahead search.

use crate::index::{SearchIndex, SearchOutcome};
use crate::query::group_by_section;
use crate::request::RequestTracker;
use crate::{QueryResult, SectionGroup};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Anything that can answer a search query.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> SearchOutcome;
}

#[async_trait]
impl SearchBackend for SearchIndex {
    async fn search(&self, query: &str) -> SearchOutcome {
        Self::search(self, query).await
    }
}

/// What a search box shows for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchView {
    pub query: String,
    /// The index is still building; nothing to show yet.
    pub indexing: bool,
    /// Matches before the display cap.
    pub total_matches: usize,
    /// Top results, capped.
    pub results: Vec<QueryResult>,
    /// `results` grouped by section in first-occurrence order.
    pub groups: Vec<SectionGroup>,
}

impl SearchView {
    fn from_outcome(query: &str, outcome: SearchOutcome, max_results: usize) -> Self {
        match outcome {
            SearchOutcome::Indexing => Self {
                query: query.to_string(),
                indexing: true,
                total_matches: 0,
                results: Vec::new(),
                groups: Vec::new(),
            },
            SearchOutcome::Results(mut results) => {
                let total_matches = results.len();
                results.truncate(max_results);
                let groups = group_by_section(&results);
                Self {
                    query: query.to_string(),
                    indexing: false,
                    total_matches,
                    results,
                    groups,
                }
            },
        }
    }
}

/// One user's search box.
pub struct SearchSession {
    backend: Arc<dyn SearchBackend>,
    tracker: RequestTracker,
    max_results: usize,
    current: Mutex<Option<SearchView>>,
}

impl SearchSession {
    pub fn new(backend: Arc<dyn SearchBackend>, max_results: usize) -> Self {
        Self {
            backend,
            tracker: RequestTracker::new(),
            max_results,
            current: Mutex::new(None),
        }
    }

    /// Run a query and apply its view unless a newer query was issued
    /// meanwhile, in which case `None` is returned and nothing changes.
    pub async fn query(&self, query: &str) -> Option<SearchView> {
        let ticket = self.tracker.begin();
        let outcome = self.backend.search(query).await;

        if !self.tracker.is_current(ticket) {
            debug!("Discarding stale results for {:?}", query);
            return None;
        }

        let view = SearchView::from_outcome(query, outcome, self.max_results);
        if let Ok(mut current) = self.current.lock() {
            *current = Some(view.clone());
        }
        Some(view)
    }

    /// The most recently applied view.
    pub fn current(&self) -> Option<SearchView> {
        self.current.lock().ok().and_then(|current| current.clone())
    }

    /// Forget the current view and drop any in-flight responses.
    pub fn clear(&self) {
        self.tracker.invalidate();
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
    }
}
