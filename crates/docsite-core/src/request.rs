use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one request issued through a [`RequestTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

/// Latest-wins guard for overlapping async requests.
///
/// Every new request supersedes the previous ones. A response is applied only
/// if its ticket is still current, so a slow early response can never
/// overwrite a fast later one.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding every earlier ticket.
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Supersede all outstanding tickets without starting a request.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let tracker = RequestTracker::new();

        let first = tracker.begin();
        assert!(tracker.is_current(first));

        let second = tracker.begin();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[test]
    fn test_invalidate_supersedes_everything() {
        let tracker = RequestTracker::new();
        let ticket = tracker.begin();

        tracker.invalidate();
        assert!(!tracker.is_current(ticket));
    }
}
