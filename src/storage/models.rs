//! Storage record models for the persistence layer.
//!
//! These types are what goes to disk. They are kept apart from the domain
//! [`Identity`] because a record read back from disk may be incomplete or
//! tampered with, while an `Identity` is always whole.

use crate::domain::{BearerToken, BinderError, Identity, Result, User};
use serde::{Deserialize, Serialize};

/// Persisted login, as written to the session file.
///
/// Both fields are optional on disk so that a half-written or hand-edited
/// file can still be parsed and then rejected by [`SessionRecord::into_identity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub user: Option<User>,

    #[serde(default)]
    pub token: Option<BearerToken>,

    /// Unix timestamp of the login that produced this record.
    pub saved_at: i64,
}

impl SessionRecord {
    /// Creates a record for `identity`, stamped with the current time.
    #[must_use]
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            user: Some(identity.user.clone()),
            token: Some(identity.token.clone()),
            saved_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Turns the record back into an identity.
    ///
    /// An empty record yields `Ok(None)`. A blank token is treated as missing.
    ///
    /// # Errors
    ///
    /// Returns [`BinderError::StateInvariantViolation`] when only one of user
    /// and token is present.
    pub fn into_identity(self) -> Result<Option<Identity>> {
        let token = self.token.filter(|token| !token.is_blank());

        match (self.user, token) {
            (Some(user), Some(token)) => Ok(Some(Identity::new(user, token))),
            (None, None) => Ok(None),
            (None, Some(_)) => Err(BinderError::StateInvariantViolation(
                "persisted token has no user".to_string(),
            )),
            (Some(user), None) => Err(BinderError::StateInvariantViolation(format!(
                "persisted user {} has no token",
                user.username
            ))),
        }
    }
}
