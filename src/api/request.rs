//! Loading state and stale-result guarding for list fetches.
//!
//! Each fetch takes a [`Ticket`]. Starting a newer fetch or cancelling
//! (view unmounted, filters changed) invalidates older tickets, and results
//! carrying a stale ticket are dropped instead of overwriting newer state.

use crate::api::ApiError;

/// Identifies one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Per-section request generation counter.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    generation: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a request, superseding any in flight.
    pub fn start(&mut self) -> Ticket {
        self.generation += 1;
        Ticket(self.generation)
    }

    /// Invalidate whatever is in flight.
    pub fn cancel(&mut self) {
        self.generation += 1;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }
}

/// What a section of the UI shows for its data.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// A tracker paired with the state it guards.
#[derive(Debug, Clone, Default)]
pub struct Section<T> {
    tracker: RequestTracker,
    state: LoadState<T>,
}

impl<T> Section<T> {
    pub fn new() -> Self {
        Self {
            tracker: RequestTracker::new(),
            state: LoadState::Idle,
        }
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// Enter the loading state and hand out a ticket for the fetch.
    pub fn begin(&mut self) -> Ticket {
        self.state = LoadState::Loading;
        self.tracker.start()
    }

    /// Abort the in-flight fetch; the section returns to idle unless data
    /// was already loaded.
    pub fn cancel(&mut self) {
        self.tracker.cancel();
        if self.state.is_loading() {
            self.state = LoadState::Idle;
        }
    }

    /// Commit a finished fetch. Returns `false` (and changes nothing) when
    /// the ticket is stale.
    pub fn finish(&mut self, ticket: Ticket, result: Result<T, ApiError>) -> bool {
        if !self.tracker.is_current(ticket) {
            log::warn!("Dropping stale response for ticket {:?}", ticket);
            return false;
        }
        self.state = match result {
            Ok(data) => LoadState::Loaded(data),
            Err(ApiError::Cancelled) => LoadState::Idle,
            Err(e) => {
                log::warn!("Fetch failed: {}", e);
                LoadState::Failed(e.to_string())
            }
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_request_supersedes_older() {
        let mut section: Section<Vec<u32>> = Section::new();
        let first = section.begin();
        let second = section.begin();

        assert!(section.finish(second, Ok(vec![2])));
        assert!(!section.finish(first, Ok(vec![1])));
        assert_eq!(section.state().data(), Some(&vec![2]));
    }

    #[test]
    fn test_cancel_drops_late_result() {
        let mut section: Section<u32> = Section::new();
        let ticket = section.begin();
        section.cancel();
        assert_eq!(section.state(), &LoadState::Idle);
        assert!(!section.finish(ticket, Ok(7)));
        assert_eq!(section.state(), &LoadState::Idle);
    }

    #[test]
    fn test_failure_is_reported() {
        let mut section: Section<u32> = Section::new();
        let ticket = section.begin();
        assert!(section.state().is_loading());
        section.finish(ticket, Err(ApiError::Network("offline".into())));
        assert_eq!(section.state().error(), Some("Network error: offline"));
    }

    #[test]
    fn test_sections_are_independent() {
        let mut stats: Section<u32> = Section::new();
        let mut board: Section<u32> = Section::new();
        let s = stats.begin();
        let b = board.begin();
        stats.finish(s, Err(ApiError::status(500, "boom")));
        board.finish(b, Ok(3));
        assert!(stats.state().error().is_some());
        assert_eq!(board.state().data(), Some(&3));
    }
}
