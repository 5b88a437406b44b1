//! Debounced, single-flight search session.
//!
//! Every input change runs the dispatch policy: empty queries reset the
//! session, a missing credential fails it, short queries are ignored, and
//! anything else arms a debounce timer. When the timer fires the previous
//! request is canceled and a new one is tagged with a fresh id; only the
//! request holding the current id may write its outcome.

use std::sync::Arc;
use std::time::Duration;

use moodreel_api::openai::{SuggestError, SuggestOutcome, SuggestionApi};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::display::to_display_movie;
use crate::mood::Mood;
use crate::prompt::build_prompt;
use crate::state::{
    CONFIG_ERROR_MESSAGE, GENERIC_ERROR_MESSAGE, QUOTA_ERROR_MESSAGE, SearchState,
};

/// Quiet period after the last input change before a request is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);

/// The request whose outcome is allowed to reach the state.
#[derive(Debug)]
struct ActiveRequest {
    id: u64,
    cancel: CancellationToken,
}

/// Mutable bookkeeping guarded by the session lock.
#[derive(Debug, Default)]
struct Session {
    /// Armed debounce timer, detached once it fires.
    pending: Option<JoinHandle<()>>,
    /// Bumped whenever the armed timer is replaced or dropped.
    timer_generation: u64,
    active: Option<ActiveRequest>,
    next_id: u64,
}

impl Session {
    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.timer_generation = self.timer_generation.wrapping_add(1);
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            debug!(id = active.id, "canceling active request");
            active.cancel.cancel();
        }
    }

    fn begin_request(&mut self) -> (u64, CancellationToken) {
        self.cancel_active();
        self.next_id = self.next_id.wrapping_add(1);
        let cancel = CancellationToken::new();
        self.active = Some(ActiveRequest {
            id: self.next_id,
            cancel: cancel.clone(),
        });
        (self.next_id, cancel)
    }

    fn is_active(&self, id: u64) -> bool {
        self.active.as_ref().is_some_and(|active| active.id == id)
    }
}

struct Shared<A> {
    api: A,
    credential: Option<String>,
    debounce: Duration,
    session: Mutex<Session>,
    view: watch::Sender<SearchState>,
}

/// Builder for [`SearchOrchestrator`].
#[derive(Debug)]
pub struct SearchOrchestratorBuilder<A> {
    api: A,
    credential: Option<String>,
    debounce: Duration,
}

impl<A> SearchOrchestratorBuilder<A>
where
    A: SuggestionApi + Send + Sync + 'static,
{
    /// Sets the provider credential. Blank values count as absent.
    #[must_use]
    pub fn credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Sets the debounce delay (default 600 ms).
    #[must_use]
    pub const fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Builds the orchestrator with an idle, empty state.
    #[must_use]
    pub fn build(self) -> SearchOrchestrator<A> {
        let credential = self
            .credential
            .filter(|credential| !credential.trim().is_empty());
        if credential.is_none() {
            warn!("no provider credential configured; searches will report a configuration error");
        }
        SearchOrchestrator {
            shared: Arc::new(Shared {
                api: self.api,
                credential,
                debounce: self.debounce,
                session: Mutex::new(Session::default()),
                view: watch::Sender::new(SearchState::default()),
            }),
        }
    }
}

/// Owns one search session and drives it from input changes.
///
/// Cloning yields another handle to the same session.
pub struct SearchOrchestrator<A> {
    shared: Arc<Shared<A>>,
}

impl<A> std::fmt::Debug for SearchOrchestrator<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("has_credential", &self.shared.credential.is_some())
            .field("debounce", &self.shared.debounce)
            .field("state", &*self.shared.view.borrow())
            .finish_non_exhaustive()
    }
}

impl<A> Clone for SearchOrchestrator<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A> SearchOrchestrator<A>
where
    A: SuggestionApi + Send + Sync + 'static,
{
    /// Starts building an orchestrator around `api`.
    pub const fn builder(api: A) -> SearchOrchestratorBuilder<A> {
        SearchOrchestratorBuilder {
            api,
            credential: None,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Replaces the query text verbatim and reruns the dispatch policy.
    pub async fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        let mut session = self.shared.session.lock().await;
        self.shared.view.send_modify(|state| state.query = text);
        Shared::on_input_changed(&self.shared, &mut session);
    }

    /// Selects `mood`, or deselects it when already selected, and reruns
    /// the dispatch policy.
    pub async fn toggle_mood(&self, mood: Mood) {
        let mut session = self.shared.session.lock().await;
        self.shared.view.send_modify(|state| {
            state.mood = if state.mood == Some(mood) {
                None
            } else {
                Some(mood)
            };
        });
        Shared::on_input_changed(&self.shared, &mut session);
    }

    /// Empties the query and results and cancels all outstanding work.
    ///
    /// The mood selection is kept.
    pub async fn clear(&self) {
        let mut session = self.shared.session.lock().await;
        session.cancel_pending();
        session.cancel_active();
        self.shared.view.send_modify(|state| {
            state.query.clear();
            state.reset_results();
        });
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.shared.view.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.view.subscribe()
    }

    /// Prompt derived from the current query and mood.
    #[must_use]
    pub fn prompt(&self) -> String {
        let state = self.shared.view.borrow();
        build_prompt(&state.query, state.mood)
    }
}

impl<A> Shared<A>
where
    A: SuggestionApi + Send + Sync + 'static,
{
    fn on_input_changed(this: &Arc<Self>, session: &mut Session) {
        session.cancel_pending();

        let (query_empty, prompt) = {
            let state = this.view.borrow();
            (
                state.query.trim().is_empty(),
                build_prompt(&state.query, state.mood),
            )
        };

        if query_empty {
            session.cancel_active();
            this.view.send_modify(SearchState::reset_results);
            return;
        }

        let Some(credential) = this.credential.clone() else {
            session.cancel_active();
            this.view.send_modify(|state| state.fail(CONFIG_ERROR_MESSAGE));
            return;
        };

        if prompt.is_empty() {
            debug!("query below threshold; keeping current results");
            return;
        }

        let generation = session.timer_generation;
        let shared = Arc::clone(this);
        session.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(shared.debounce).await;
            shared.dispatch(prompt, credential, generation).await;
        }));
    }

    async fn dispatch(&self, prompt: String, credential: String, generation: u64) {
        let (id, cancel) = {
            let mut session = self.session.lock().await;
            if session.timer_generation != generation {
                return;
            }
            // Detach so later input cannot abort an in-flight request.
            session.pending = None;
            let request = session.begin_request();
            self.view.send_modify(SearchState::start_loading);
            request
        };

        info!(id, "requesting suggestions");
        let result = self.api.suggest(&prompt, &credential, cancel).await;

        let mut session = self.session.lock().await;
        if !session.is_active(id) {
            debug!(id, "ignoring superseded response");
            return;
        }
        session.active = None;

        match result {
            Ok(SuggestOutcome::Completed(suggestions)) => {
                info!(id, count = suggestions.len(), "suggestions received");
                let movies: Vec<_> = suggestions.iter().map(to_display_movie).collect();
                self.view.send_modify(|state| state.show(movies));
            }
            Ok(SuggestOutcome::Canceled) => {
                debug!(id, "request canceled");
            }
            Err(error) => {
                warn!(id, %error, "suggestion request failed");
                let message = failure_message(&error);
                self.view.send_modify(|state| state.fail(message));
            }
        }
    }
}

fn failure_message(error: &SuggestError) -> String {
    match error {
        SuggestError::Provider(provider) if provider.is_quota_exhausted() => {
            String::from(QUOTA_ERROR_MESSAGE)
        }
        SuggestError::Provider(provider) => provider.message.clone(),
        SuggestError::Http(_) | SuggestError::Internal(_) => String::from(GENERIC_ERROR_MESSAGE),
    }
}
