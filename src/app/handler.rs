//! Event handling and state transition logic.
//!
//! This module implements the event handler that processes user commands and
//! backend replies, translating them into state changes and action sequences.
//! It is the only place [`AppState`] is mutated.
//!
//! # Architecture
//!
//! 1. Events arrive from the shell (user commands) or the runtime (API replies)
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State is updated in place; session changes go through `Session::reduce`
//! 4. Actions are collected and returned for the runtime to execute
//!
//! The returned `bool` tells the shell whether the screen needs a redraw.
//!
//! # Event Types
//!
//! - **Lifecycle**: `Start` (restore the persisted session)
//! - **Navigation**: `Navigate`
//! - **Auth**: `SubmitLogin`, `SubmitRegister`, `Logout`
//! - **Search**: `SearchInput`, `SubmitSearch`, `ChangePage`
//! - **Collection**: `AddToCollection`, `RefreshCollections`, `RefreshCollection`
//! - **Backend**: `Api` replies tagged with the epoch of their request, `CheckHealth`

use crate::api::{ApiFailure, ApiRequest, ApiResponse, FailureKind, Operation};
use crate::app::actions::{Action, Notice};
use crate::app::guard::GuardDecision;
use crate::app::routes::{Access, Route};
use crate::app::session::SessionEvent;
use crate::app::state::{AppState, AuthFormState};
use crate::domain::error::{BinderError, Result};
use crate::domain::{CardId, Credentials, Registration};
use crate::storage::SessionRecord;

/// Message shown when a search request fails.
pub const SEARCH_FAILED: &str = "Failed to fetch cards. Please try again.";

/// Message shown when the search box is submitted empty.
pub const EMPTY_QUERY: &str = "Please enter a search term";

/// Message shown when the backend rejects the session token.
pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// Events triggered by user commands or backend replies.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// First event after startup, carrying whatever was found in storage.
    Start {
        persisted: Option<SessionRecord>,
    },

    /// The user asked for a route.
    Navigate(Route),

    SubmitLogin(Credentials),
    SubmitRegister(Registration),
    Logout,

    /// New contents of the search box.
    SearchInput(String),
    /// Submits the search box.
    SubmitSearch,
    /// Requests another page of the current results (1-based).
    ChangePage(u32),

    /// Adds a card from the current results to the default collection.
    AddToCollection {
        card_id: CardId,
    },
    /// Refetches the collection list.
    RefreshCollections,
    /// Reloads the open collection's cards.
    RefreshCollection,

    CheckHealth,

    /// Reply to a request issued under session `epoch`.
    Api {
        epoch: u64,
        response: ApiResponse,
    },
}

impl Event {
    /// Short name for spans and logs; never includes payloads.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Navigate(_) => "navigate",
            Self::SubmitLogin(_) => "submit_login",
            Self::SubmitRegister(_) => "submit_register",
            Self::Logout => "logout",
            Self::SearchInput(_) => "search_input",
            Self::SubmitSearch => "submit_search",
            Self::ChangePage(_) => "change_page",
            Self::AddToCollection { .. } => "add_to_collection",
            Self::RefreshCollections => "refresh_collections",
            Self::RefreshCollection => "refresh_collection",
            Self::CheckHealth => "check_health",
            Self::Api { .. } => "api_reply",
        }
    }
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Errors
///
/// Returns [`BinderError::StateInvariantViolation`] if the add control was
/// enabled without a token or default collection behind it.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!(
        "handle_event",
        event_type = event.kind(),
        epoch = state.epoch,
        route = %state.route
    )
    .entered();

    match event {
        Event::Start { persisted } => {
            if !state.session.is_loading() {
                tracing::debug!("start received after restore, ignoring");
                return Ok((false, vec![]));
            }

            let mut actions = vec![];

            let identity = match persisted.clone().map(SessionRecord::into_identity).transpose() {
                Ok(identity) => identity.flatten(),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding corrupt persisted session");
                    actions.push(Action::ClearPersistedSession);
                    None
                }
            };

            if let Some(identity) = identity {
                tracing::debug!(user = %identity.user.username, "verifying persisted session");
                state.session = state.session.reduce(&SessionEvent::RestoreStarted);
                actions.push(Action::Request(ApiRequest::verify_session(
                    state.epoch,
                    identity.token,
                )));
            } else {
                actions.extend(apply_session_event(state, &SessionEvent::RestoreFailed));
            }

            Ok((true, actions))
        }

        Event::Navigate(route) => {
            if *route != state.route {
                state.auth_form = AuthFormState::default();
            }
            if route.access() != Access::RequiresAnonymity {
                state.redirect_from = None;
            }

            tracing::debug!(from = %state.route, to = %route, "navigating");
            state.route = *route;

            let mut actions = vec![Action::Navigate {
                route: *route,
                replace: false,
            }];
            actions.extend(reconcile_route(state));
            Ok((true, actions))
        }

        Event::SubmitLogin(credentials) => {
            if !accepts_auth_submission(state) {
                return Ok((false, vec![]));
            }
            if credentials.username.trim().is_empty() || credentials.password.is_empty() {
                state.auth_form.error = Some("Please enter a username and password".to_string());
                return Ok((true, vec![]));
            }

            state.auth_form.submitting = true;
            state.auth_form.error = None;
            Ok((
                true,
                vec![Action::Request(ApiRequest::login(
                    state.epoch,
                    credentials.clone(),
                ))],
            ))
        }

        Event::SubmitRegister(registration) => {
            if !accepts_auth_submission(state) {
                return Ok((false, vec![]));
            }
            if registration.username.trim().is_empty() || registration.password.is_empty() {
                state.auth_form.error = Some("Please enter a username and password".to_string());
                return Ok((true, vec![]));
            }

            state.auth_form.submitting = true;
            state.auth_form.error = None;
            Ok((
                true,
                vec![Action::Request(ApiRequest::register(
                    state.epoch,
                    registration.clone(),
                ))],
            ))
        }

        Event::Logout => {
            let Some(token) = state.session.token().cloned() else {
                tracing::debug!("logout without session");
                return Ok((false, vec![]));
            };

            // Issued under the outgoing epoch; its reply is stale by design.
            let mut actions = vec![
                Action::ClearPersistedSession,
                Action::Request(ApiRequest::logout(state.epoch, token)),
            ];

            if state.route != Route::Home {
                state.route = Route::Home;
                actions.push(Action::Navigate {
                    route: Route::Home,
                    replace: true,
                });
            }
            state.redirect_from = None;

            actions.extend(apply_session_event(state, &SessionEvent::LoggedOut));
            actions.push(Action::Notify(Notice::info("You have been logged out.")));

            tracing::info!("logged out");
            Ok((true, actions))
        }

        Event::SearchInput(query) => {
            if state.search.is_searching() {
                tracing::trace!("search box disabled while searching");
                return Ok((false, vec![]));
            }
            state.search.query.clone_from(query);
            Ok((true, vec![]))
        }

        Event::SubmitSearch => {
            if state.search.is_searching() {
                return Ok((false, vec![]));
            }

            let query = state.search.query.trim().to_string();
            if query.is_empty() {
                state.search.error = Some(EMPTY_QUERY.to_string());
                return Ok((true, vec![]));
            }

            Ok((true, vec![start_search(state, query, 1)]))
        }

        Event::ChangePage(page) => {
            if state.search.is_searching() {
                return Ok((false, vec![]));
            }
            let Some(query) = state.search.shown_query.clone() else {
                return Ok((false, vec![]));
            };
            if *page == 0 || *page > state.search.total_pages || *page == state.search.page {
                tracing::debug!(page, total_pages = state.search.total_pages, "page out of range");
                return Ok((false, vec![]));
            }

            Ok((true, vec![start_search(state, query, *page)]))
        }

        Event::AddToCollection { card_id } => {
            let affordance = state.add_affordance(card_id);
            if !affordance.is_enabled() {
                tracing::debug!(card_id = %card_id, affordance = ?affordance, "add not offered");
                return Ok((false, vec![]));
            }

            let Some(card) = state.find_result(card_id).cloned() else {
                tracing::debug!(card_id = %card_id, "card not in current results");
                return Ok((false, vec![]));
            };

            let (Some(token), Some(collection_id)) =
                (state.session.token().cloned(), state.resolver.default_id())
            else {
                return Err(BinderError::StateInvariantViolation(
                    "add offered without token or default collection".to_string(),
                ));
            };

            if !state.pending.begin(card_id) {
                return Ok((false, vec![]));
            }

            tracing::debug!(card_id = %card_id, collection_id, "adding card");
            Ok((
                true,
                vec![Action::Request(ApiRequest::add_card(
                    state.epoch,
                    collection_id,
                    card,
                    token,
                ))],
            ))
        }

        Event::RefreshCollections => {
            let Some(token) = state.session.token().cloned() else {
                return Ok((false, vec![]));
            };
            state.resolver.on_refetch();
            Ok((
                true,
                vec![Action::Request(ApiRequest::list_collections(
                    state.epoch,
                    token,
                ))],
            ))
        }

        Event::RefreshCollection => {
            if state.route != Route::Collection || state.guard_decision() != GuardDecision::Render {
                return Ok((false, vec![]));
            }
            let actions = load_collection_detail(state);
            Ok((!actions.is_empty(), actions))
        }

        Event::CheckHealth => Ok((
            false,
            vec![Action::Request(ApiRequest::health(state.epoch))],
        )),

        Event::Api { epoch, response } => handle_api_response(state, *epoch, response),
    }
}

fn handle_api_response(
    state: &mut AppState,
    epoch: u64,
    response: &ApiResponse,
) -> Result<(bool, Vec<Action>)> {
    let stale = epoch != state.epoch;

    match response {
        // Add replies always release their pending mark, whatever the epoch.
        ApiResponse::CardAdded {
            card_id,
            card_name,
            receipt,
        } => {
            state.pending.finish(card_id);
            tracing::debug!(card_id = %card_id, row_id = receipt.card_id, "add completed");

            // The current default belongs to whoever is signed in now.
            let target = state
                .resolver
                .default_collection()
                .filter(|_| !stale)
                .map_or_else(|| "your collection".to_string(), |c| c.name.clone());
            Ok((
                true,
                vec![Action::Notify(Notice::info(format!(
                    "Added {card_name} to {target}!"
                )))],
            ))
        }

        ApiResponse::Failed {
            operation: Operation::AddCard { card_id, card_name },
            failure,
        } => {
            state.pending.finish(card_id);
            tracing::warn!(card_id = %card_id, error = %failure.message, "add failed");

            let mut actions = vec![Action::Notify(Notice::error(format!(
                "Failed to add {card_name} to collection: {}",
                failure.message
            )))];
            if failure.kind == FailureKind::Auth && !stale {
                actions.extend(expire_session(state));
            }
            Ok((true, actions))
        }

        // Search staleness is decided by the query, not the session.
        ApiResponse::SearchCompleted { query, page } => {
            if state.search.in_flight.as_deref() != Some(query.as_str()) {
                tracing::debug!(query = %query, "ignoring stale search reply");
                return Ok((false, vec![]));
            }
            tracing::debug!(query = %query, results = page.data.len(), "search results received");
            state.search.show(query.clone(), page.clone());
            Ok((true, vec![]))
        }

        ApiResponse::Failed {
            operation: Operation::Search { query },
            failure,
        } => {
            if state.search.in_flight.as_deref() != Some(query.as_str()) {
                return Ok((false, vec![]));
            }
            tracing::warn!(query = %query, error = %failure.message, "search failed");
            state.search.fail(SEARCH_FAILED);
            Ok((true, vec![]))
        }

        ApiResponse::Healthy { status, message } => Ok((
            false,
            vec![Action::Notify(Notice::info(format!(
                "Backend {status}: {message}"
            )))],
        )),

        ApiResponse::Failed {
            operation: Operation::Health,
            failure,
        } => Ok((
            false,
            vec![Action::Notify(Notice::error(format!(
                "Backend unreachable: {}",
                failure.message
            )))],
        )),

        _ if stale => {
            tracing::debug!(
                reply_epoch = epoch,
                current_epoch = state.epoch,
                "ignoring reply from previous session"
            );
            Ok((false, vec![]))
        }

        ApiResponse::Authenticated { identity } => {
            state.auth_form = AuthFormState::default();

            let mut actions = vec![Action::PersistSession(SessionRecord::from_identity(
                identity,
            ))];
            actions.extend(apply_session_event(
                state,
                &SessionEvent::LoggedIn(identity.clone()),
            ));
            actions.push(Action::Notify(Notice::info(format!(
                "Welcome, {}!",
                identity.user.username
            ))));

            tracing::info!(user = %identity.user.username, "logged in");
            Ok((true, actions))
        }

        ApiResponse::SessionVerified { identity } => {
            tracing::info!(user = %identity.user.username, "session restored");
            let actions = apply_session_event(state, &SessionEvent::Restored(identity.clone()));
            Ok((true, actions))
        }

        ApiResponse::LoggedOut => Ok((false, vec![])),

        ApiResponse::CollectionsLoaded { collections } => {
            state.resolver.on_loaded(collections.clone());

            let actions = if state.route == Route::Collection
                && state.guard_decision() == GuardDecision::Render
            {
                load_collection_detail(state)
            } else {
                vec![]
            };
            Ok((true, actions))
        }

        ApiResponse::CollectionLoaded { detail } => {
            if state.resolver.default_id() != Some(detail.collection_id) {
                tracing::debug!(collection_id = detail.collection_id, "ignoring detail for other collection");
                return Ok((false, vec![]));
            }
            state.collection_view.detail = Some(detail.clone());
            state.collection_view.loading = false;
            state.collection_view.error = None;
            Ok((true, vec![]))
        }

        ApiResponse::Failed { operation, failure } => {
            Ok((true, handle_failure(state, operation, failure)))
        }
    }
}

/// Handles a failed session-scoped request from the current epoch.
fn handle_failure(state: &mut AppState, operation: &Operation, failure: &ApiFailure) -> Vec<Action> {
    tracing::warn!(operation = %operation, kind = ?failure.kind, error = %failure.message, "request failed");

    match operation {
        Operation::Login | Operation::Register => {
            state.auth_form.submitting = false;
            state.auth_form.error = Some(match failure.kind {
                FailureKind::Auth => failure.message.clone(),
                FailureKind::Network => {
                    format!("Unable to reach the server: {}", failure.message)
                }
                FailureKind::Local => failure.message.clone(),
            });
            vec![]
        }

        Operation::VerifySession => {
            let mut actions = vec![];
            if failure.kind == FailureKind::Auth {
                actions.push(Action::ClearPersistedSession);
                actions.push(Action::Notify(Notice::info(SESSION_EXPIRED)));
            } else {
                actions.push(Action::Notify(Notice::error(format!(
                    "Could not restore your session: {}",
                    failure.message
                ))));
            }
            actions.extend(apply_session_event(state, &SessionEvent::RestoreFailed));
            actions
        }

        Operation::ListCollections => {
            state.resolver.on_failed();
            if failure.kind == FailureKind::Auth {
                return expire_session(state);
            }
            vec![Action::Notify(Notice::error(format!(
                "Failed to load your collections: {}",
                failure.message
            )))]
        }

        Operation::LoadCollection { .. } => {
            state.collection_view.loading = false;
            if failure.kind == FailureKind::Auth {
                return expire_session(state);
            }
            state.collection_view.error =
                Some(format!("Failed to load collection: {}", failure.message));
            vec![]
        }

        Operation::Logout
        | Operation::Search { .. }
        | Operation::AddCard { .. }
        | Operation::Health => vec![],
    }
}

/// Whether the login/register form may be submitted right now.
fn accepts_auth_submission(state: &AppState) -> bool {
    if state.session.is_loading() || state.session.is_authenticated() {
        tracing::debug!("auth submission while loading or signed in, ignoring");
        return false;
    }
    if state.auth_form.submitting {
        tracing::debug!("auth submission already in flight");
        return false;
    }
    true
}

fn start_search(state: &mut AppState, query: String, page: u32) -> Action {
    tracing::debug!(query = %query, page, "starting search");
    state.search.in_flight = Some(query.clone());
    state.search.error = None;
    Action::Request(ApiRequest::search(state.epoch, query, page, state.page_size))
}

/// Applies a session event and everything that hangs off it.
///
/// Bumps the epoch when the identity changes, drops per-session caches on the
/// way out, asks the resolver whether a collections fetch is due, and re-runs
/// the guard on the current route.
fn apply_session_event(state: &mut AppState, event: &SessionEvent) -> Vec<Action> {
    let was_authenticated = state.session.is_authenticated();
    let previous = state.session.identity().cloned();

    state.session = state.session.reduce(event);
    let is_authenticated = state.session.is_authenticated();

    if state.session.identity() != previous.as_ref() {
        state.epoch += 1;
        tracing::debug!(epoch = state.epoch, authenticated = is_authenticated, "session epoch advanced");
    }

    if was_authenticated && !is_authenticated {
        state.pending.clear();
        state.collection_view.clear();
    }

    let mut actions = vec![];

    if state.resolver.on_session_change(was_authenticated, is_authenticated) {
        if let Some(token) = state.session.token() {
            actions.push(Action::Request(ApiRequest::list_collections(
                state.epoch,
                token.clone(),
            )));
        }
    }

    actions.extend(reconcile_route(state));
    actions
}

/// Signs out after the backend rejected the token.
fn expire_session(state: &mut AppState) -> Vec<Action> {
    tracing::info!("token rejected by backend, signing out");

    let mut actions = vec![Action::ClearPersistedSession];
    actions.extend(apply_session_event(state, &SessionEvent::LoggedOut));
    actions.push(Action::Notify(Notice::error(SESSION_EXPIRED)));
    actions
}

/// Runs the guard on the current route and follows any redirect.
fn reconcile_route(state: &mut AppState) -> Vec<Action> {
    match state.guard_decision() {
        GuardDecision::Placeholder => vec![],
        GuardDecision::Render => enter_route(state),
        GuardDecision::Redirect { to, from } => {
            let target = if from.is_none() && to == Route::Home {
                state.redirect_from.take().unwrap_or(Route::Home)
            } else {
                if from.is_some() {
                    state.redirect_from = from;
                }
                to
            };

            tracing::debug!(from = %state.route, to = %target, "guard redirect");
            state.route = target;

            let mut actions = vec![Action::Navigate {
                route: target,
                replace: true,
            }];
            actions.extend(reconcile_route(state));
            actions
        }
    }
}

fn enter_route(state: &mut AppState) -> Vec<Action> {
    match state.route {
        Route::Collection => load_collection_detail(state),
        Route::Home | Route::Login | Route::Register => vec![],
    }
}

/// Requests the default collection's cards unless a load is already running.
fn load_collection_detail(state: &mut AppState) -> Vec<Action> {
    if state.collection_view.loading {
        return vec![];
    }
    let (Some(collection_id), Some(token)) =
        (state.resolver.default_id(), state.session.token().cloned())
    else {
        return vec![];
    };

    state.collection_view.loading = true;
    state.collection_view.error = None;
    vec![Action::Request(ApiRequest::load_collection(
        state.epoch,
        collection_id,
        token,
    ))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AddReceipt, BearerToken, Card, CollectionDetail, CollectionRef, Identity, SearchPage, User,
    };
    use crate::ui::theme::Theme;
    use crate::ui::viewmodel::{AddAffordance, Screen};

    fn identity() -> Identity {
        Identity::new(User::new(1, "ash"), BearerToken::new("tok"))
    }

    fn started() -> AppState {
        let mut state = AppState::new(20, Theme::plain());
        handle_event(&mut state, &Event::Start { persisted: None }).unwrap();
        state
    }

    fn reply(state: &mut AppState, response: ApiResponse) -> Vec<Action> {
        let epoch = state.epoch;
        handle_event(state, &Event::Api { epoch, response }).unwrap().1
    }

    fn logged_in(collections: Vec<CollectionRef>) -> AppState {
        let mut state = started();
        reply(&mut state, ApiResponse::Authenticated { identity: identity() });
        reply(&mut state, ApiResponse::CollectionsLoaded { collections });
        state
    }

    fn with_results(state: &mut AppState, cards: Vec<Card>) {
        state.search.in_flight = Some("pikachu".to_string());
        let count = u32::try_from(cards.len()).unwrap();
        reply(
            state,
            ApiResponse::SearchCompleted {
                query: "pikachu".to_string(),
                page: SearchPage {
                    data: cards,
                    page: 1,
                    page_size: 20,
                    count,
                    total_count: count,
                },
            },
        );
    }

    fn requests(actions: &[Action]) -> Vec<&ApiRequest> {
        actions
            .iter()
            .filter_map(|action| match action {
                Action::Request(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_without_record_ends_loading() {
        let state = started();
        assert!(!state.session.is_loading());
        assert!(!state.session.is_authenticated());
    }

    #[test]
    fn start_with_record_verifies_before_rendering() {
        let mut state = AppState::new(20, Theme::plain());
        let record = SessionRecord::from_identity(&identity());

        let (_, actions) =
            handle_event(&mut state, &Event::Start { persisted: Some(record) }).unwrap();

        assert!(state.session.is_loading());
        assert!(matches!(
            requests(&actions).as_slice(),
            [ApiRequest::VerifySession { .. }]
        ));
        assert_eq!(state.compute_viewmodel().screen, Screen::Loading);
    }

    #[test]
    fn orphaned_token_is_cleared_at_start() {
        let mut state = AppState::new(20, Theme::plain());
        let record = SessionRecord {
            user: None,
            token: Some(BearerToken::new("tok")),
            saved_at: 0,
        };

        let (_, actions) =
            handle_event(&mut state, &Event::Start { persisted: Some(record) }).unwrap();

        assert!(actions.contains(&Action::ClearPersistedSession));
        assert!(requests(&actions).is_empty());
        assert!(!state.session.is_loading());
        assert!(state.session.token().is_none());
    }

    #[test]
    fn login_fetches_collections_exactly_once() {
        let mut state = started();
        let actions = reply(&mut state, ApiResponse::Authenticated { identity: identity() });

        let list_requests = requests(&actions)
            .into_iter()
            .filter(|r| matches!(r, ApiRequest::ListCollections { .. }))
            .count();
        assert_eq!(list_requests, 1);
        assert!(actions
            .iter()
            .any(|a| matches!(a, Action::PersistSession(_))));
    }

    #[test]
    fn protected_route_redirects_and_returns_after_login() {
        let mut state = started();

        handle_event(&mut state, &Event::Navigate(Route::Collection)).unwrap();
        assert_eq!(state.route, Route::Login);
        assert_eq!(state.redirect_from, Some(Route::Collection));

        let actions = reply(&mut state, ApiResponse::Authenticated { identity: identity() });
        assert_eq!(state.route, Route::Collection);
        assert!(actions.contains(&Action::Navigate {
            route: Route::Collection,
            replace: true
        }));
        assert_eq!(state.guard_decision(), GuardDecision::Render);
    }

    #[test]
    fn anonymous_search_offers_login_to_add() {
        let mut state = started();
        with_results(&mut state, vec![Card::new("base1-58", "Pikachu")]);

        let Screen::Search(screen) = state.compute_viewmodel().screen else {
            panic!("expected search screen");
        };
        assert_eq!(screen.tiles.len(), 1);
        assert_eq!(screen.tiles[0].add, AddAffordance::LoginRequired);
        assert_eq!(screen.tiles[0].add.label(), "Login to Add");

        let (_, actions) = handle_event(
            &mut state,
            &Event::AddToCollection {
                card_id: "base1-58".to_string(),
            },
        )
        .unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn zero_collections_keep_add_disabled() {
        let mut state = logged_in(vec![]);
        with_results(&mut state, vec![Card::new("base1-58", "Pikachu")]);

        assert!(state.session.is_authenticated());
        assert_eq!(state.add_affordance("base1-58"), AddAffordance::NoCollection);

        let (_, actions) = handle_event(
            &mut state,
            &Event::AddToCollection {
                card_id: "base1-58".to_string(),
            },
        )
        .unwrap();
        assert!(actions.is_empty());
        assert!(state.pending.is_empty());
    }

    #[test]
    fn add_marks_pending_and_reply_releases_it() {
        let mut state = logged_in(vec![CollectionRef::new(5, "Main")]);
        with_results(&mut state, vec![Card::new("base1-58", "Pikachu")]);

        let add = Event::AddToCollection {
            card_id: "base1-58".to_string(),
        };
        let (_, actions) = handle_event(&mut state, &add).unwrap();
        assert!(state.pending.contains("base1-58"));
        assert!(matches!(
            requests(&actions).as_slice(),
            [ApiRequest::AddCard { collection_id: 5, .. }]
        ));

        let (_, repeat) = handle_event(&mut state, &add).unwrap();
        assert!(repeat.is_empty());

        let actions = reply(
            &mut state,
            ApiResponse::CardAdded {
                card_id: "base1-58".to_string(),
                card_name: "Pikachu".to_string(),
                receipt: AddReceipt {
                    message: "Card added".to_string(),
                    card_id: 1,
                },
            },
        );
        assert!(!state.pending.contains("base1-58"));
        assert!(actions.contains(&Action::Notify(Notice::info("Added Pikachu to Main!"))));
    }

    #[test]
    fn add_reply_after_relogin_does_not_name_the_new_binder() {
        let mut state = logged_in(vec![CollectionRef::new(5, "Main")]);
        with_results(&mut state, vec![Card::new("base1-58", "Pikachu")]);
        handle_event(
            &mut state,
            &Event::AddToCollection {
                card_id: "base1-58".to_string(),
            },
        )
        .unwrap();
        let old_epoch = state.epoch;

        handle_event(&mut state, &Event::Logout).unwrap();
        reply(
            &mut state,
            ApiResponse::Authenticated {
                identity: Identity::new(User::new(2, "misty"), BearerToken::new("tok2")),
            },
        );
        reply(
            &mut state,
            ApiResponse::CollectionsLoaded {
                collections: vec![CollectionRef::new(8, "Water Types")],
            },
        );

        let (_, actions) = handle_event(
            &mut state,
            &Event::Api {
                epoch: old_epoch,
                response: ApiResponse::CardAdded {
                    card_id: "base1-58".to_string(),
                    card_name: "Pikachu".to_string(),
                    receipt: AddReceipt {
                        message: "Card added".to_string(),
                        card_id: 1,
                    },
                },
            },
        )
        .unwrap();

        assert!(actions.contains(&Action::Notify(Notice::info(
            "Added Pikachu to your collection!"
        ))));
        assert!(state.pending.is_empty());
    }

    #[test]
    fn adds_for_different_cards_settle_independently() {
        let mut state = logged_in(vec![CollectionRef::new(5, "Main")]);
        with_results(
            &mut state,
            vec![Card::new("base1-58", "Pikachu"), Card::new("base1-4", "Charizard")],
        );

        for id in ["base1-58", "base1-4"] {
            let (_, actions) = handle_event(
                &mut state,
                &Event::AddToCollection {
                    card_id: id.to_string(),
                },
            )
            .unwrap();
            assert_eq!(requests(&actions).len(), 1);
        }
        assert_eq!(state.add_affordance("base1-58"), AddAffordance::Adding);
        assert_eq!(state.add_affordance("base1-4"), AddAffordance::Adding);

        reply(
            &mut state,
            ApiResponse::Failed {
                operation: Operation::AddCard {
                    card_id: "base1-4".to_string(),
                    card_name: "Charizard".to_string(),
                },
                failure: ApiFailure::new(FailureKind::Network, "HTTP 500"),
            },
        );

        assert_eq!(state.add_affordance("base1-4"), AddAffordance::Ready);
        assert_eq!(state.add_affordance("base1-58"), AddAffordance::Adding);
    }

    #[test]
    fn forbidden_add_signs_out() {
        let mut state = logged_in(vec![CollectionRef::new(5, "Main")]);
        with_results(&mut state, vec![Card::new("base1-58", "Pikachu")]);
        handle_event(
            &mut state,
            &Event::AddToCollection {
                card_id: "base1-58".to_string(),
            },
        )
        .unwrap();

        let err = BinderError::Auth("Not authenticated".to_string());
        let actions = reply(
            &mut state,
            ApiResponse::Failed {
                operation: Operation::AddCard {
                    card_id: "base1-58".to_string(),
                    card_name: "Pikachu".to_string(),
                },
                failure: ApiFailure::from(&err),
            },
        );

        assert!(!state.session.is_authenticated());
        assert!(state.pending.is_empty());
        assert!(actions.contains(&Action::ClearPersistedSession));
    }

    #[test]
    fn failed_add_releases_pending_and_reports() {
        let mut state = logged_in(vec![CollectionRef::new(5, "Main")]);
        with_results(&mut state, vec![Card::new("base1-58", "Pikachu")]);
        handle_event(
            &mut state,
            &Event::AddToCollection {
                card_id: "base1-58".to_string(),
            },
        )
        .unwrap();

        let actions = reply(
            &mut state,
            ApiResponse::Failed {
                operation: Operation::AddCard {
                    card_id: "base1-58".to_string(),
                    card_name: "Pikachu".to_string(),
                },
                failure: ApiFailure::new(FailureKind::Network, "HTTP 500"),
            },
        );

        assert!(state.pending.is_empty());
        assert!(matches!(actions.as_slice(), [Action::Notify(notice)] if notice.is_error()));
        assert!(state.session.is_authenticated());
    }

    #[test]
    fn logout_on_collection_view_clears_everything() {
        let mut state = logged_in(vec![CollectionRef::new(5, "Main")]);
        handle_event(&mut state, &Event::Navigate(Route::Collection)).unwrap();
        reply(
            &mut state,
            ApiResponse::CollectionLoaded {
                detail: CollectionDetail {
                    collection_id: 5,
                    cards: vec![],
                },
            },
        );
        state.pending.begin("base1-58");

        let (_, actions) = handle_event(&mut state, &Event::Logout).unwrap();

        assert!(state.resolver.collections().is_empty());
        assert_eq!(state.resolver.default_id(), None);
        assert!(state.collection_view.detail.is_none());
        assert!(state.pending.is_empty());
        assert_eq!(state.route, Route::Home);
        assert!(actions.contains(&Action::ClearPersistedSession));
    }

    #[test]
    fn collections_reply_from_previous_session_is_ignored() {
        let mut state = started();
        reply(&mut state, ApiResponse::Authenticated { identity: identity() });
        let old_epoch = state.epoch;

        handle_event(&mut state, &Event::Logout).unwrap();
        handle_event(
            &mut state,
            &Event::Api {
                epoch: old_epoch,
                response: ApiResponse::CollectionsLoaded {
                    collections: vec![CollectionRef::new(9, "Stale")],
                },
            },
        )
        .unwrap();

        assert_eq!(state.resolver.default_id(), None);
    }

    #[test]
    fn empty_search_is_rejected_locally() {
        let mut state = started();
        handle_event(&mut state, &Event::SearchInput("   ".to_string())).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::SubmitSearch).unwrap();

        assert!(actions.is_empty());
        assert_eq!(state.search.error.as_deref(), Some(EMPTY_QUERY));
    }

    #[test]
    fn failed_search_clears_results() {
        let mut state = started();
        with_results(&mut state, vec![Card::new("base1-58", "Pikachu")]);

        handle_event(&mut state, &Event::SearchInput("charizard".to_string())).unwrap();
        handle_event(&mut state, &Event::SubmitSearch).unwrap();
        reply(
            &mut state,
            ApiResponse::Failed {
                operation: Operation::Search {
                    query: "charizard".to_string(),
                },
                failure: ApiFailure::new(FailureKind::Network, "timeout"),
            },
        );

        assert!(state.search.results.is_empty());
        assert_eq!(state.search.error.as_deref(), Some(SEARCH_FAILED));
        assert!(!state.search.is_searching());
    }

    #[test]
    fn expired_token_signs_out() {
        let mut state = logged_in(vec![CollectionRef::new(5, "Main")]);
        handle_event(&mut state, &Event::Navigate(Route::Collection)).unwrap();

        let actions = reply(
            &mut state,
            ApiResponse::Failed {
                operation: Operation::LoadCollection { collection_id: 5 },
                failure: ApiFailure::new(FailureKind::Auth, "Invalid token"),
            },
        );

        assert!(!state.session.is_authenticated());
        assert_eq!(state.route, Route::Login);
        assert_eq!(state.redirect_from, Some(Route::Collection));
        assert!(actions.contains(&Action::Notify(Notice::error(SESSION_EXPIRED))));
    }

    #[test]
    fn rejected_restore_clears_record() {
        let mut state = AppState::new(20, Theme::plain());
        handle_event(
            &mut state,
            &Event::Start {
                persisted: Some(SessionRecord::from_identity(&identity())),
            },
        )
        .unwrap();

        let actions = reply(
            &mut state,
            ApiResponse::Failed {
                operation: Operation::VerifySession,
                failure: ApiFailure::new(FailureKind::Auth, "Invalid token"),
            },
        );

        assert!(!state.session.is_loading());
        assert!(state.session.user().is_none());
        assert!(actions.contains(&Action::ClearPersistedSession));
    }

    #[test]
    fn unreachable_backend_keeps_record_for_next_launch() {
        let mut state = AppState::new(20, Theme::plain());
        handle_event(
            &mut state,
            &Event::Start {
                persisted: Some(SessionRecord::from_identity(&identity())),
            },
        )
        .unwrap();

        let actions = reply(
            &mut state,
            ApiResponse::Failed {
                operation: Operation::VerifySession,
                failure: ApiFailure::new(FailureKind::Network, "connection refused"),
            },
        );

        assert!(!state.session.is_loading());
        assert!(!actions.contains(&Action::ClearPersistedSession));
    }
}
