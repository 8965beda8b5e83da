//! Route guard deciding whether a route may render.
//!
//! The guard reads exactly two things from the session: the loading flag and
//! whether a user is present. Loading wins over everything else, so nothing
//! protected is ever shown and no redirect is ever issued before the startup
//! restore has finished.

use super::routes::{Access, Route};
use super::session::Session;

/// Guard state derived from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Authorized,
    Unauthorized,
}

impl GuardState {
    #[must_use]
    pub const fn of(session: &Session) -> Self {
        if session.is_loading() {
            Self::Loading
        } else if session.is_authenticated() {
            Self::Authorized
        } else {
            Self::Unauthorized
        }
    }
}

/// What the shell should do with the requested route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show a neutral "Loading..." placeholder.
    Placeholder,
    /// Render the route.
    Render,
    /// Replace the route with `to`. `from` is the location to return to after
    /// login, set only for auth-required redirects.
    Redirect { to: Route, from: Option<Route> },
}

/// Evaluates the guard for `route` under `session`.
#[must_use]
pub fn evaluate(session: &Session, route: Route) -> GuardDecision {
    let state = GuardState::of(session);

    match (state, route.access()) {
        (GuardState::Loading, _) => GuardDecision::Placeholder,
        (_, Access::Public)
        | (GuardState::Authorized, Access::RequiresAuth)
        | (GuardState::Unauthorized, Access::RequiresAnonymity) => GuardDecision::Render,
        (GuardState::Unauthorized, Access::RequiresAuth) => GuardDecision::Redirect {
            to: Route::Login,
            from: Some(route),
        },
        (GuardState::Authorized, Access::RequiresAnonymity) => GuardDecision::Redirect {
            to: Route::Home,
            from: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::session::SessionEvent;
    use crate::domain::{BearerToken, Identity, User};

    fn authenticated() -> Session {
        Session::new().reduce(&SessionEvent::LoggedIn(Identity::new(
            User::new(1, "ash"),
            BearerToken::new("tok"),
        )))
    }

    const ALL_ROUTES: [Route; 4] = [Route::Home, Route::Collection, Route::Login, Route::Register];

    #[test]
    fn loading_always_shows_placeholder() {
        let anonymous_loading = Session::new().reduce(&SessionEvent::RestoreStarted);
        let authed_loading = authenticated().reduce(&SessionEvent::RestoreStarted);

        for session in [anonymous_loading, authed_loading] {
            for route in ALL_ROUTES {
                assert_eq!(evaluate(&session, route), GuardDecision::Placeholder);
            }
        }
    }

    #[test]
    fn anonymous_user_is_sent_to_login_with_origin() {
        assert_eq!(
            evaluate(&Session::new(), Route::Collection),
            GuardDecision::Redirect {
                to: Route::Login,
                from: Some(Route::Collection)
            }
        );
        assert_eq!(evaluate(&Session::new(), Route::Login), GuardDecision::Render);
        assert_eq!(evaluate(&Session::new(), Route::Home), GuardDecision::Render);
    }

    #[test]
    fn authenticated_user_skips_auth_pages() {
        let session = authenticated();
        assert_eq!(evaluate(&session, Route::Collection), GuardDecision::Render);
        for route in [Route::Login, Route::Register] {
            assert_eq!(
                evaluate(&session, route),
                GuardDecision::Redirect {
                    to: Route::Home,
                    from: None
                }
            );
        }
    }

    #[test]
    fn login_then_protected_route_renders() {
        let session = Session::new()
            .reduce(&SessionEvent::RestoreStarted)
            .reduce(&SessionEvent::RestoreFailed);
        assert!(matches!(
            evaluate(&session, Route::Collection),
            GuardDecision::Redirect { .. }
        ));

        let session = session.reduce(&SessionEvent::LoggedIn(Identity::new(
            User::new(1, "ash"),
            BearerToken::new("tok"),
        )));
        assert_eq!(evaluate(&session, Route::Collection), GuardDecision::Render);
    }
}
