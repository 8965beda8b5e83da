//! Actions representing side effects to be executed by the runtime.
//!
//! The event handler never performs I/O itself. After each event it returns a
//! `Vec<Action>`, and the runtime executes them in order: spawning backend
//! requests, writing or clearing the persisted session, moving the shell to
//! another route and surfacing notifications.
//!
//! # Example
//!
//! ```rust
//! use binderbuilder::api::ApiRequest;
//! use binderbuilder::app::Action;
//!
//! let actions = vec![Action::Request(ApiRequest::health(0))];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::api::ApiRequest;
use crate::app::routes::Route;
use crate::storage::SessionRecord;
use std::fmt;

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Runs a backend request on the API worker.
    ///
    /// The reply comes back as [`Event::Api`](crate::app::Event::Api) tagged
    /// with the request's session epoch.
    Request(ApiRequest),

    /// Writes the login to persistent storage.
    PersistSession(SessionRecord),

    /// Removes any persisted login.
    ClearPersistedSession,

    /// Tells the shell the current location changed.
    ///
    /// `replace` is set for guard redirects, which replace the history entry
    /// instead of pushing a new one.
    Navigate {
        route: Route,
        replace: bool,
    },

    /// Shows a message to the user.
    Notify(Notice),
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    /// Must be acknowledged by the user.
    Error,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.level, NoticeLevel::Error)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Info => write!(f, "{}", self.message),
            NoticeLevel::Error => write!(f, "Error: {}", self.message),
        }
    }
}
