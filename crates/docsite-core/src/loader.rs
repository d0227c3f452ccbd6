//! Content loading state for a document viewer.
//!
//! ```text
//! Idle ──navigate──▶ Loading ──▶ CategoryIndex
//!                       │    ──▶ DocumentLoaded
//!                       │    ──▶ NotFound
//!                       ▲
//!          every navigation re-enters Loading
//! ```
//!
//! Folder paths resolve without a fetch. A document response that arrives
//! after a newer navigation started is dropped.

use crate::fetcher::load_document;
use crate::request::RequestTracker;
use crate::router::{RouteKind, RouteResolver};
use crate::{CategoryIndex, DocumentPage};
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading { path: String },
    CategoryIndex(CategoryIndex),
    DocumentLoaded(DocumentPage),
    NotFound { path: String },
}

impl LoadState {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

pub struct ContentLoader {
    resolver: Arc<RouteResolver>,
    tracker: RequestTracker,
    state: Mutex<LoadState>,
}

impl ContentLoader {
    pub fn new(resolver: Arc<RouteResolver>) -> Self {
        Self {
            resolver,
            tracker: RequestTracker::new(),
            state: Mutex::new(LoadState::Idle),
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
            .lock()
            .map_or(LoadState::Idle, |state| state.clone())
    }

    /// Move to `path`. Returns the state it settled in, or `None` if a later
    /// navigation superseded this one before its document arrived.
    pub async fn navigate(&self, path: &str) -> Option<LoadState> {
        let ticket = self.tracker.begin();
        self.set_state(LoadState::Loading {
            path: path.to_string(),
        });

        let settled = match self.resolver.classify(path) {
            RouteKind::CategoryIndex(index) => LoadState::CategoryIndex(index),
            RouteKind::Document(path) => {
                let loaded = load_document(self.resolver.source().as_ref(), &path).await;
                if !self.tracker.is_current(ticket) {
                    debug!("Discarding stale document response for {}", path);
                    return None;
                }
                match loaded {
                    Ok(page) => LoadState::DocumentLoaded(page),
                    Err(e) => {
                        debug!("Document {} not found: {}", path, e);
                        LoadState::NotFound { path }
                    },
                }
            },
        };

        self.set_state(settled.clone());
        Some(settled)
    }

    fn set_state(&self, next: LoadState) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
    }
}
