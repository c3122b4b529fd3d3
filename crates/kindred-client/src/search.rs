//! Debounced, cancellation-safe user search.
//!
//! Each keystroke bumps a generation token and replaces the pending
//! debounce task.  A task checks the token after its quiet period and again
//! after the remote call resolves, so the results applied to the state
//! always belong to the most recently issued query regardless of response
//! arrival order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use kindred_net::RemoteGateway;
use kindred_shared::constants::{MIN_SEARCH_LEN, SEARCH_DEBOUNCE_MS};
use kindred_shared::types::SearchResult;

/// Observable search state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResult>,
    /// Whether the dropdown is shown.  `true` with empty `results` is the
    /// "searched, found nothing" state, distinct from "never searched".
    pub visible: bool,
    /// A search is scheduled or in flight.
    pub pending: bool,
}

/// Debounces queries and races at most one logical search at a time.
pub struct SearchCoordinator<G> {
    gateway: Arc<G>,
    state: Arc<Mutex<SearchState>>,
    generation: Arc<AtomicU64>,
    debounce: Duration,
    task: Option<JoinHandle<()>>,
}

fn lock(state: &Mutex<SearchState>) -> MutexGuard<'_, SearchState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<G: RemoteGateway + 'static> SearchCoordinator<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self::with_debounce(gateway, Duration::from_millis(SEARCH_DEBOUNCE_MS))
    }

    /// Explicit quiet period; tests shorten it.
    pub fn with_debounce(gateway: Arc<G>, debounce: Duration) -> Self {
        Self {
            gateway,
            state: Arc::new(Mutex::new(SearchState::default())),
            generation: Arc::new(AtomicU64::new(0)),
            debounce,
            task: None,
        }
    }

    /// Handle a new value of the search box.
    ///
    /// Below the minimum length this clears results and hides the dropdown
    /// with no remote call; otherwise it schedules a search after the quiet
    /// period, superseding whatever was scheduled before.
    pub fn input(&mut self, query: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(task) = self.task.take() {
            task.abort();
        }

        {
            let mut state = lock(&self.state);
            state.query = query.to_string();

            if query.chars().count() < MIN_SEARCH_LEN {
                state.results.clear();
                state.visible = false;
                state.pending = false;
                return;
            }
            state.pending = true;
        }

        let gateway = Arc::clone(&self.gateway);
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);
        let debounce = self.debounce;
        let query = query.to_string();

        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if current.load(Ordering::SeqCst) != generation {
                return;
            }

            debug!(query, "issuing user search");
            let outcome = gateway.search_users(&query).await;

            // Re-check at resolution time: a newer query may have been
            // issued while this one was in flight.
            if current.load(Ordering::SeqCst) != generation {
                debug!(query, "discarding stale search response");
                return;
            }

            let mut state = lock(&state);
            state.pending = false;
            match outcome {
                Ok(results) => {
                    state.results = results;
                    state.visible = true;
                }
                Err(err) => {
                    // Show the empty state: the user must see the search ran.
                    warn!(query, error = %err, "user search failed");
                    state.results.clear();
                    state.visible = true;
                }
            }
        }));
    }

    /// Hide the dropdown without clearing the query or a still-useful
    /// result set (outside click).
    pub fn dismiss(&mut self) {
        lock(&self.state).visible = false;
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        lock(&self.state).clone()
    }
}

impl<G> Drop for SearchCoordinator<G> {
    fn drop(&mut self) {
        // Clear the timer so nothing acts on a torn-down view.
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::FakeGateway;

    const DEBOUNCE: Duration = Duration::from_millis(30);

    fn results_named(names: &[&str]) -> Vec<SearchResult> {
        names
            .iter()
            .map(|n| SearchResult {
                username: n.to_string(),
                first_name: None,
                last_name: None,
                avatar_url: None,
                compatibility: None,
            })
            .collect()
    }

    fn coordinator(gateway: &Arc<FakeGateway>) -> SearchCoordinator<FakeGateway> {
        SearchCoordinator::with_debounce(Arc::clone(gateway), DEBOUNCE)
    }

    #[tokio::test]
    async fn rapid_typing_issues_exactly_one_search() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.set_search_results("abc", results_named(&["abcuser"]));

        let mut search = coordinator(&gateway);
        search.input("a");
        search.input("ab");
        search.input("abc");

        tokio::time::sleep(DEBOUNCE * 4).await;

        assert_eq!(gateway.calls_for("search"), vec!["search:abc"]);
        let state = search.state();
        assert_eq!(state.results, results_named(&["abcuser"]));
        assert!(state.visible);
        assert!(!state.pending);
    }

    #[tokio::test]
    async fn short_query_clears_without_calling_remote() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.set_search_results("ab", results_named(&["abuser"]));

        let mut search = coordinator(&gateway);
        search.input("ab");
        tokio::time::sleep(DEBOUNCE * 3).await;
        assert!(!search.state().results.is_empty());

        search.input("a");
        tokio::time::sleep(DEBOUNCE * 3).await;

        let state = search.state();
        assert!(state.results.is_empty());
        assert!(!state.visible);
        assert_eq!(gateway.calls_for("search"), vec!["search:ab"]);
    }

    #[tokio::test]
    async fn late_response_for_superseded_query_never_lands() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.set_search_results("ab", results_named(&["older"]));
        gateway.set_search_results("abc", results_named(&["newer"]));
        gateway.set_search_delay("ab", DEBOUNCE * 6);

        let mut search = coordinator(&gateway);
        search.input("ab");
        // Let the quiet period elapse so the slow "ab" search is in flight.
        tokio::time::sleep(DEBOUNCE * 2).await;
        search.input("abc");

        tokio::time::sleep(DEBOUNCE * 10).await;

        let state = search.state();
        assert_eq!(state.query, "abc");
        assert_eq!(state.results, results_named(&["newer"]));
    }

    #[tokio::test]
    async fn failure_shows_the_empty_state() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.fail_transient("search");

        let mut search = coordinator(&gateway);
        search.input("ghost");
        tokio::time::sleep(DEBOUNCE * 4).await;

        let state = search.state();
        assert!(state.results.is_empty());
        assert!(state.visible);
        assert!(!state.pending);
    }

    #[tokio::test]
    async fn dismiss_keeps_query_and_results() {
        let gateway = Arc::new(FakeGateway::new());
        gateway.set_search_results("ana", results_named(&["ana"]));

        let mut search = coordinator(&gateway);
        search.input("ana");
        tokio::time::sleep(DEBOUNCE * 4).await;

        search.dismiss();
        let state = search.state();
        assert!(!state.visible);
        assert_eq!(state.query, "ana");
        assert_eq!(state.results, results_named(&["ana"]));
    }
}
