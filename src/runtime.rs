//! Event loop glue between the pure application layer and the outside world.
//!
//! The [`Runtime`] owns the [`AppState`], the session storage and the API
//! worker. It feeds events to [`handle_event`] and executes the returned
//! actions: requests are spawned as tokio tasks whose replies come back on an
//! mpsc channel as [`Event::Api`], storage writes happen inline, and notices
//! are queued for the shell to print.
//!
//! ```text
//! ┌──────────────┐  Event   ┌───────────────┐  Action::Request  ┌────────────┐
//! │ Shell (main) │ ───────► │    Runtime    │ ────────────────► │ ApiWorker  │
//! └──────────────┘          │ handle_event  │   tokio::spawn    │ (CardApi)  │
//!        ▲                  └───────────────┘                   └────────────┘
//!        │ notices, view model     ▲        Event::Api { epoch, .. }    │
//!        └─────────────────────────┴────────────── mpsc ◄────────────────┘
//! ```

use crate::api::ApiWorker;
use crate::app::{handle_event, Action, AppState, Event, Notice, Route};
use crate::storage::SessionStorage;
use crate::ui::viewmodel::UIViewModel;
use tokio::sync::mpsc;

/// Drives the application: dispatches events and executes their actions.
pub struct Runtime {
    state: AppState,
    storage: Box<dyn SessionStorage>,
    worker: ApiWorker,

    replies_tx: mpsc::UnboundedSender<Event>,
    replies_rx: mpsc::UnboundedReceiver<Event>,

    /// Requests spawned whose reply has not been dispatched yet.
    in_flight: usize,

    notices: Vec<Notice>,

    /// Location last reported through `Action::Navigate`.
    location: Route,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("route", &self.state.route)
            .field("epoch", &self.state.epoch)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    #[must_use]
    pub fn new(state: AppState, storage: Box<dyn SessionStorage>, worker: ApiWorker) -> Self {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        let location = state.route;
        Self {
            state,
            storage,
            worker,
            replies_tx,
            replies_rx,
            in_flight: 0,
            notices: Vec::new(),
            location,
        }
    }

    /// Loads the persisted session and dispatches [`Event::Start`].
    ///
    /// Must be called from within a tokio runtime, since restoring a session
    /// spawns a verification request.
    pub fn start(&mut self) -> bool {
        let _span = tracing::debug_span!("runtime_start").entered();

        let persisted = match self.storage.load() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted session, discarding it");
                if let Err(e) = self.storage.clear() {
                    tracing::warn!(error = %e, "failed to clear unreadable session");
                }
                None
            }
        };

        tracing::debug!(found = persisted.is_some(), "persisted session loaded");
        self.dispatch(Event::Start { persisted })
    }

    /// Handles one event and executes the resulting actions.
    ///
    /// Returns whether the screen needs redrawing.
    pub fn dispatch(&mut self, event: Event) -> bool {
        match handle_event(&mut self.state, &event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled successfully"
                );
                let notified = actions.iter().any(|a| matches!(a, Action::Notify(_)));
                for action in actions {
                    self.execute_action(action);
                }
                should_render || notified
            }
            Err(e) => {
                tracing::error!(error = %e, event = event.kind(), "error handling event");
                self.notices.push(Notice::error(e.to_string()));
                true
            }
        }
    }

    /// Waits for the next reply from an in-flight request.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_reply(&mut self) -> Option<Event> {
        if self.in_flight == 0 {
            return None;
        }
        let event = self.replies_rx.recv().await?;
        self.in_flight -= 1;
        Some(event)
    }

    /// Dispatches replies until no request is in flight, including requests
    /// issued while handling those replies.
    pub async fn run_until_idle(&mut self) -> bool {
        let mut should_render = false;
        while let Some(event) = self.next_reply().await {
            should_render |= self.dispatch(event);
        }
        should_render
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn viewmodel(&self) -> UIViewModel {
        self.state.compute_viewmodel()
    }

    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    #[must_use]
    pub const fn location(&self) -> Route {
        self.location
    }

    /// Takes the notices queued since the last call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&mut self, action: Action) {
        match action {
            Action::Request(request) => {
                let worker = self.worker.clone();
                let replies = self.replies_tx.clone();
                let epoch = request.epoch();
                self.in_flight += 1;

                tokio::spawn(async move {
                    let response = worker.dispatch(request).await;
                    if replies.send(Event::Api { epoch, response }).is_err() {
                        tracing::debug!("runtime dropped before reply arrived");
                    }
                });
            }
            Action::PersistSession(record) => {
                if let Err(e) = self.storage.save(&record) {
                    tracing::warn!(error = %e, "failed to persist session");
                    self.notices
                        .push(Notice::error(format!("Could not save your login: {e}")));
                }
            }
            Action::ClearPersistedSession => {
                if let Err(e) = self.storage.clear() {
                    tracing::warn!(error = %e, "failed to clear persisted session");
                }
            }
            Action::Navigate { route, replace } => {
                tracing::debug!(route = %route, replace, "location changed");
                self.location = route;
            }
            Action::Notify(notice) => {
                tracing::info!(notice = %notice, "notice");
                self.notices.push(notice);
            }
        }
    }
}
