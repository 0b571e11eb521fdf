//! Debounced search-as-you-type.
//!
//! `QueryController` records every input immediately but only searches once
//! the input has been quiet for the debounce window. Each search is tagged
//! with a sequence number when issued; a response is applied only if no newer
//! search has been issued since, so a slow early response can never overwrite
//! the results for a later query.
//!
//! ```text
//! on_input("r") on_input("re") on_input("redux")
//!      |              |              |<-- debounce -->| search("redux")
//!   (timer)      (re-armed)     (re-armed)            |--> results
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::search::RepositorySearch;
use crate::types::{normalize_query, Repository};

/// What a failed search does to the visible state.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log it and keep showing the previous results.
    #[default]
    Silent,
    /// Same, but also record the message in `QueryState::error`.
    Surface,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub query: String,
    pub results: Vec<Repository>,
    pub in_flight: bool,
    pub error: Option<String>,
}

struct Shared<S> {
    search: S,
    policy: FailurePolicy,
    state: watch::Sender<QueryState>,
    issued: AtomicU64,
    /// Generation of the armed timer, 0 when none. Whoever swaps it out (the
    /// timer or `flush`) is the only one that fires.
    armed: AtomicU64,
    generations: AtomicU64,
}

impl<S: RepositorySearch> Shared<S> {
    /// Clears results for an empty query, otherwise marks a search as in
    /// flight and returns its sequence number.
    fn begin(&self, text: &str) -> Option<u64> {
        if normalize_query(text).is_empty() {
            // Anything still outstanding is now stale.
            self.issued.fetch_add(1, Ordering::SeqCst);
            self.state.send_modify(|s| {
                s.results.clear();
                s.in_flight = false;
                s.error = None;
            });
            debug!("empty query, results cleared");
            return None;
        }

        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| s.in_flight = true);
        Some(seq)
    }

    async fn finish(&self, seq: u64, text: String) {
        let query = normalize_query(&text);
        debug!(seq, query, "search issued");

        let outcome = self.search.search(query).await;

        if self.issued.load(Ordering::SeqCst) != seq {
            debug!(seq, query, "discarding stale search response");
            return;
        }

        match outcome {
            Ok(resp) => {
                let total = resp.items.len();
                let items: Vec<Repository> = resp
                    .items
                    .into_iter()
                    .filter(|repo| match repo.validate() {
                        Ok(()) => true,
                        Err(e) => {
                            debug!(error = %e, "dropping invalid search result");
                            false
                        }
                    })
                    .collect();
                debug!(seq, count = items.len(), dropped = total - items.len(), "search applied");
                self.state.send_modify(|s| {
                    s.results = items;
                    s.in_flight = false;
                    s.error = None;
                });
            }
            Err(e) => {
                warn!(query, error = %e, "search failed");
                let message = match self.policy {
                    FailurePolicy::Silent => None,
                    FailurePolicy::Surface => Some(e.to_string()),
                };
                self.state.send_modify(|s| {
                    s.in_flight = false;
                    if message.is_some() {
                        s.error = message;
                    }
                });
            }
        }
    }

    async fn fire(&self, text: String) {
        if let Some(seq) = self.begin(&text) {
            self.finish(seq, text).await;
        }
    }
}

/// Owns the query state and the pending debounce timer.
///
/// Dropping the controller cancels a pending timer. Searches already issued
/// run to completion.
pub struct QueryController<S> {
    shared: Arc<Shared<S>>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<S: RepositorySearch + 'static> QueryController<S> {
    pub fn new(search: S, delay: Duration) -> Self {
        Self::with_policy(search, delay, FailurePolicy::Silent)
    }

    pub fn with_policy(search: S, delay: Duration, policy: FailurePolicy) -> Self {
        let (state, _) = watch::channel(QueryState::default());
        Self {
            shared: Arc::new(Shared {
                search,
                policy,
                state,
                issued: AtomicU64::new(0),
                armed: AtomicU64::new(0),
                generations: AtomicU64::new(0),
            }),
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Records `text` as the current query and re-arms the debounce timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.shared.state.send_modify(|s| s.query = text.clone());

        let generation = self.shared.generations.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.armed.store(generation, Ordering::SeqCst);

        let shared = Arc::clone(&self.shared);
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if shared
                .armed
                .compare_exchange(generation, 0, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return;
            }
            if let Some(seq) = shared.begin(&text) {
                // Detached so re-arming the timer never cancels a running search.
                tokio::spawn(async move { shared.finish(seq, text).await });
            }
        });

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.replace(timer) {
            previous.abort();
        }
    }

    /// Fires a pending debounce right away, then waits until no search is
    /// in flight.
    ///
    /// If the timer already fired, this only waits for the search it started.
    pub async fn flush(&self) {
        let timer = self
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        if self.shared.armed.swap(0, Ordering::SeqCst) != 0 {
            if let Some(timer) = timer {
                timer.abort();
            }
            let text = self.shared.state.borrow().query.clone();
            self.shared.fire(text).await;
            return;
        }

        let mut rx = self.shared.state.subscribe();
        while rx.borrow_and_update().in_flight {
            if rx.changed().await.is_err() {
                break;
            }
        }
    }

    pub fn state(&self) -> QueryState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.shared.state.subscribe()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<S> Drop for QueryController<S> {
    fn drop(&mut self) {
        if let Some(timer) = self
            .pending
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            timer.abort();
        }
    }
}
