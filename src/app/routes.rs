//! Application routes and their access requirements.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A screen the user can navigate to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Card search, `/`.
    #[default]
    Home,
    /// The user's default collection, `/collection`.
    Collection,
    /// `/login`.
    Login,
    /// `/register`.
    Register,
}

/// Who may see a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Everyone.
    Public,
    /// Only authenticated users; others are sent to login.
    RequiresAuth,
    /// Only anonymous users; authenticated users are sent home.
    RequiresAnonymity,
}

impl Route {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Collection => "/collection",
            Self::Login => "/login",
            Self::Register => "/register",
        }
    }

    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::Home => Access::Public,
            Self::Collection => Access::RequiresAuth,
            Self::Login | Self::Register => Access::RequiresAnonymity,
        }
    }

    /// Parses a path, ignoring a trailing slash and any query string.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split('?').next().unwrap_or(path);
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Self::Home),
            "/collection" => Some(Self::Collection),
            "/login" => Some(Self::Login),
            "/register" => Some(Self::Register),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
