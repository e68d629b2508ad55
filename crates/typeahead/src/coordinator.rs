//! Query-to-suggestions lifecycle.
//!
//! [`SuggestionCoordinator`] owns the path from a keystroke to a displayed
//! suggestion list: it gates on a minimum query length, debounces bursts,
//! spawns the asynchronous fetch, and guards against stale responses so the
//! displayed items always belong to the most recent query.
//!
//! Fetches run on a Tokio runtime; their results come back over a channel
//! and are applied only inside [`poll`](SuggestionCoordinator::poll), on the
//! controller thread. Each issued fetch carries a monotonically increasing
//! [`RequestId`]; a completion whose id is no longer current is discarded
//! without touching state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use tokio::runtime::Handle;

use typeahead_core::{Debouncer, Signal};

use crate::source::{FetchResult, Suggestion, SuggestionSource};

// ============================================================================
// Request Tagging
// ============================================================================

/// Identifier of one issued fetch, increasing per coordinator.
///
/// The stale-response guard compares a completion's id against the most
/// recently issued one; only the current request may write state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

/// A completed fetch crossing back to the controller thread.
struct FetchOutcome {
    id: RequestId,
    result: FetchResult,
}

/// Where the coordinator currently is in a query lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// Query below the minimum length; nothing pending or in flight.
    Idle,
    /// A fetch is debounce-scheduled but not yet started.
    Scheduled,
    /// A fetch is in flight.
    Fetching,
}

/// State transitions surfaced to the composition root by one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    /// The debounce quiet period elapsed and a fetch was issued.
    FetchStarted,
    /// The current fetch resolved; `count` items are now held.
    Resolved {
        /// Number of suggestions received.
        count: usize,
    },
    /// The current fetch failed; the list is empty.
    Failed,
}

// ============================================================================
// Coordinator
// ============================================================================

/// Owns the query→suggestions lifecycle and exposes `{is_loading, items}`.
///
/// Every query change re-enters [`FetchPhase::Idle`] or
/// [`FetchPhase::Scheduled`] depending on length; scheduling supersedes any
/// earlier scheduled or in-flight request, so at most one request is current
/// at any time.
pub struct SuggestionCoordinator {
    /// Minimum query length (in chars) before any fetch is scheduled.
    min_chars: usize,
    /// Single-slot quiet-period scheduler holding the pending query.
    debouncer: Debouncer<String>,
    /// The injected data source.
    source: Arc<dyn SuggestionSource>,
    /// Runtime the fetch futures run on.
    runtime: Handle,

    /// Current suggestion list.
    items: Vec<Suggestion>,
    /// Whether a fetch is in flight.
    is_loading: bool,
    /// Monotonic id for the next fetch.
    next_request: u64,
    /// The only request allowed to write state, if any.
    current_request: Option<RequestId>,

    /// Completion queue from fetch tasks back to the controller thread.
    completion_tx: Sender<FetchOutcome>,
    completion_rx: Receiver<FetchOutcome>,

    /// Signal emitted with the new item count whenever the list changes.
    pub suggestions_changed: Signal<usize>,
}

impl SuggestionCoordinator {
    /// Create a coordinator over `source`.
    pub fn new(
        min_chars: usize,
        debounce_interval: Duration,
        source: Arc<dyn SuggestionSource>,
        runtime: Handle,
    ) -> Self {
        let (completion_tx, completion_rx) = crossbeam_channel::unbounded();
        Self {
            min_chars,
            debouncer: Debouncer::new(debounce_interval),
            source,
            runtime,
            items: Vec::new(),
            is_loading: false,
            next_request: 0,
            current_request: None,
            completion_tx,
            completion_rx,
            suggestions_changed: Signal::new(),
        }
    }

    /// Minimum query length before fetching.
    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Change the minimum query length.
    pub fn set_min_chars(&mut self, count: usize) {
        self.min_chars = count;
    }

    /// Change the debounce quiet period. Cancels a pending schedule.
    pub fn set_debounce_interval(&mut self, interval: Duration) {
        self.debouncer = Debouncer::new(interval);
    }

    /// The suggestions for the most recent completed, current fetch.
    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether there is anything worth opening a list for.
    pub fn has_candidates(&self) -> bool {
        self.is_loading || !self.items.is_empty()
    }

    /// Where the coordinator is in the current query lifecycle.
    pub fn phase(&self) -> FetchPhase {
        if self.debouncer.is_pending() {
            FetchPhase::Scheduled
        } else if self.current_request.is_some() {
            FetchPhase::Fetching
        } else {
            FetchPhase::Idle
        }
    }

    /// Fire time of the pending debounce, for event-loop sleeping.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// React to a query change.
    ///
    /// Below `min_chars` the coordinator resets to Idle (pending debounce
    /// cancelled, in-flight request invalidated, items cleared); at or above
    /// it, a fetch for `query` is debounce-scheduled, superseding any
    /// earlier pending one.
    pub fn on_query_changed(&mut self, query: &str, now: Instant) {
        if query.chars().count() < self.min_chars {
            self.reset();
            return;
        }
        self.debouncer.schedule(query.to_string(), now);
    }

    /// Drop all suggestion state and invalidate anything pending or in
    /// flight. Used when the query shrinks below the gate and when a
    /// selection is committed or cleared.
    pub fn reset(&mut self) {
        self.debouncer.cancel();
        self.current_request = None;
        self.is_loading = false;
        if !self.items.is_empty() {
            self.items.clear();
            self.suggestions_changed.emit(0);
        }
    }

    /// Drive the lifecycle: fire a due debounce and apply completed fetches.
    ///
    /// Returns the transitions that happened, in order.
    pub fn poll(&mut self, now: Instant) -> Vec<CoordinatorEvent> {
        let mut events = Vec::new();

        if let Some(query) = self.debouncer.poll(now) {
            self.issue_fetch(query);
            events.push(CoordinatorEvent::FetchStarted);
        }

        while let Ok(outcome) = self.completion_rx.try_recv() {
            if self.current_request != Some(outcome.id) {
                tracing::trace!(
                    target: "typeahead::coordinator",
                    id = outcome.id.0,
                    "stale fetch response discarded"
                );
                continue;
            }
            self.current_request = None;
            self.is_loading = false;
            match outcome.result {
                Ok(items) => {
                    let count = items.len();
                    tracing::trace!(
                        target: "typeahead::coordinator",
                        id = outcome.id.0,
                        count,
                        "fetch resolved"
                    );
                    self.items = items;
                    self.suggestions_changed.emit(count);
                    events.push(CoordinatorEvent::Resolved { count });
                }
                Err(error) => {
                    tracing::warn!(
                        target: "typeahead::coordinator",
                        id = outcome.id.0,
                        %error,
                        "suggestion fetch failed"
                    );
                    if !self.items.is_empty() {
                        self.items.clear();
                        self.suggestions_changed.emit(0);
                    }
                    events.push(CoordinatorEvent::Failed);
                }
            }
        }

        events
    }

    /// Start the fetch for `query`, superseding any in-flight request.
    fn issue_fetch(&mut self, query: String) {
        let id = RequestId(self.next_request);
        self.next_request += 1;
        self.current_request = Some(id);
        self.is_loading = true;

        tracing::trace!(
            target: "typeahead::coordinator",
            id = id.0,
            query = %query,
            "fetch issued"
        );

        let future = self.source.fetch_matches(&query);
        let completion_tx = self.completion_tx.clone();
        self.runtime.spawn(async move {
            let result = future.await;
            // A send failure means the coordinator is gone; the result
            // is simply dropped.
            let _ = completion_tx.send(FetchOutcome { id, result });
        });
    }
}

impl std::fmt::Debug for SuggestionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionCoordinator")
            .field("min_chars", &self.min_chars)
            .field("phase", &self.phase())
            .field("items", &self.items.len())
            .field("is_loading", &self.is_loading)
            .finish()
    }
}
