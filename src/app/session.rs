//! Session store: who is logged in, with which token.
//!
//! [`Session`] is a plain value. Every change goes through [`Session::reduce`],
//! a pure function from the current session and a [`SessionEvent`] to the next
//! session. User and token are stored together as one [`Identity`], so a token
//! without a user (or the reverse) cannot be represented.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──RestoreStarted──► loading ──Restored──► authenticated ──LoggedOut──► anonymous
//!   │                          └──RestoreFailed──► anonymous ──LoggedIn──► authenticated
//!   └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The loading flag is only ever raised by `RestoreStarted`; any other event
//! lowers it.

use crate::domain::{BearerToken, Identity, User};

/// Current authentication state of the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
    loading: bool,
}

/// Inputs to the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Startup found a persisted token and is checking it with the backend.
    RestoreStarted,
    /// The persisted token was accepted.
    Restored(Identity),
    /// No usable persisted session (missing, rejected or unreachable).
    RestoreFailed,
    /// Login or registration succeeded.
    LoggedIn(Identity),
    /// The user logged out or the token was invalidated.
    LoggedOut,
}

impl Session {
    /// An anonymous, not-loading session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            identity: None,
            loading: false,
        }
    }

    /// Applies an event and returns the resulting session.
    ///
    /// A blank token in `Restored`/`LoggedIn` is unusable and yields an
    /// anonymous session instead of a half-populated one.
    #[must_use]
    pub fn reduce(&self, event: &SessionEvent) -> Self {
        match event {
            SessionEvent::RestoreStarted => Self {
                identity: self.identity.clone(),
                loading: true,
            },
            SessionEvent::Restored(identity) | SessionEvent::LoggedIn(identity) => {
                if identity.token.is_blank() {
                    tracing::warn!(user = %identity.user.username, "discarding identity with blank token");
                    return Self::new();
                }
                Self {
                    identity: Some(identity.clone()),
                    loading: false,
                }
            }
            SessionEvent::RestoreFailed | SessionEvent::LoggedOut => Self::new(),
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.identity.as_ref().map(|identity| &identity.user)
    }

    #[must_use]
    pub fn token(&self) -> Option<&BearerToken> {
        self.identity.as_ref().map(|identity| &identity.token)
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity::new(User::new(1, "ash"), BearerToken::new("tok-1"))
    }

    fn assert_consistent(session: &Session) {
        assert_eq!(session.user().is_some(), session.token().is_some());
    }

    #[test]
    fn restore_flow_raises_then_lowers_loading() {
        let start = Session::new();
        let loading = start.reduce(&SessionEvent::RestoreStarted);
        assert!(loading.is_loading());
        assert!(!loading.is_authenticated());
        assert_consistent(&loading);

        let restored = loading.reduce(&SessionEvent::Restored(identity()));
        assert!(!restored.is_loading());
        assert_eq!(restored.user().map(|u| u.username.as_str()), Some("ash"));
        assert_consistent(&restored);
    }

    #[test]
    fn failed_restore_is_anonymous() {
        let session = Session::new()
            .reduce(&SessionEvent::RestoreStarted)
            .reduce(&SessionEvent::RestoreFailed);
        assert_eq!(session, Session::new());
    }

    #[test]
    fn logout_clears_user_and_token_together() {
        let session = Session::new()
            .reduce(&SessionEvent::LoggedIn(identity()))
            .reduce(&SessionEvent::LoggedOut);
        assert!(session.user().is_none());
        assert!(session.token().is_none());
        assert!(!session.is_loading());
    }

    #[test]
    fn blank_token_never_yields_a_user() {
        let broken = Identity::new(User::new(2, "brock"), BearerToken::new(""));
        let session = Session::new().reduce(&SessionEvent::LoggedIn(broken));
        assert!(!session.is_authenticated());
        assert_consistent(&session);
    }

    #[test]
    fn every_transition_keeps_token_and_user_paired() {
        let events = [
            SessionEvent::RestoreStarted,
            SessionEvent::Restored(identity()),
            SessionEvent::LoggedOut,
            SessionEvent::LoggedIn(identity()),
            SessionEvent::RestoreStarted,
            SessionEvent::RestoreFailed,
        ];
        let mut session = Session::new();
        for event in &events {
            session = session.reduce(event);
            assert_consistent(&session);
        }
    }
}
