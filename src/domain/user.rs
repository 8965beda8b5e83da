//! User identity, credentials and bearer tokens.
//!
//! Secrets (passwords and tokens) never show up in `Debug` output, since
//! requests carrying them are logged in tracing spans.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An authenticated backend user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

impl User {
    #[must_use]
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

/// Opaque bearer token issued by the backend.
///
/// Serializes as a bare string. The `Debug` impl redacts the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token string for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// A blank token is unusable and treated as absent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// A user together with the token that authenticates them.
///
/// The session store only ever holds these two together, which is what keeps
/// "token present iff user present" true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user: User,
    pub token: BearerToken,
}

impl Identity {
    #[must_use]
    pub const fn new(user: User, token: BearerToken) -> Self {
        Self { user, token }
    }
}

/// Login form contents.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Registration form contents.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
}

impl Registration {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: Option<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.filter(|email| !email.trim().is_empty()),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Body returned by the login and register endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthGrant {
    pub user: User,
    pub token: BearerToken,
}

impl From<AuthGrant> for Identity {
    fn from(grant: AuthGrant) -> Self {
        Self::new(grant.user, grant.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let creds = Credentials::new("ash", "pikachu123");
        let token = BearerToken::new("abc.def.ghi");

        let rendered = format!("{creds:?} {token:?}");
        assert!(!rendered.contains("pikachu123"));
        assert!(!rendered.contains("abc.def.ghi"));
        assert!(rendered.contains("ash"));
    }

    #[test]
    fn auth_grant_parses_backend_shape() {
        let body = r#"{"user": {"id": 7, "username": "misty"}, "token": "tok"}"#;
        let grant: AuthGrant = serde_json::from_str(body).unwrap();
        let identity = Identity::from(grant);
        assert_eq!(identity.user, User::new(7, "misty"));
        assert_eq!(identity.token.expose(), "tok");
    }

    #[test]
    fn whitespace_token_is_blank() {
        assert!(BearerToken::new("  ").is_blank());
        assert!(!BearerToken::new("x").is_blank());
    }
}
