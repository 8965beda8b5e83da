//! Error types for the BinderBuilder client.
//!
//! This module defines the centralized error type [`BinderError`] and a type alias
//! [`Result`] used throughout the crate. Errors raised by collaborators (the card
//! search backend, the collection backend, the session file) are caught at the
//! component boundary and turned into user-visible messages; nothing here is
//! fatal to the process.

use thiserror::Error;

/// The main error type for BinderBuilder operations.
///
/// The first three variants form the taxonomy the UI reasons about:
/// network failures, authentication rejections and state invariant
/// violations. The remaining variants cover local concerns (storage,
/// filesystem, configuration).
///
/// # Examples
///
/// ```
/// use binderbuilder::BinderError;
///
/// let err = BinderError::Status { status: 502, message: "bad gateway".to_string() };
/// assert!(err.is_network());
/// assert!(!BinderError::Auth("expired".to_string()).is_network());
/// ```
#[derive(Debug, Error)]
pub enum BinderError {
    /// A request could not be sent or its response could not be read.
    ///
    /// Covers connection failures, timeouts and undecodable bodies.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    ///
    /// `message` holds the FastAPI `detail` field when the body carried one,
    /// otherwise the raw body text.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Error detail extracted from the response body.
        message: String,
    },

    /// Login, registration or session restore was rejected.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Local state broke an invariant, e.g. a persisted token without a user.
    ///
    /// Must never occur in normal operation. Callers clear the affected state
    /// and start over rather than continue with it.
    #[error("State invariant violated: {0}")]
    StateInvariantViolation(String),

    /// Reading or writing the persisted session record failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BinderError {
    /// Returns `true` for errors that belong to the network class.
    ///
    /// Transport failures and non-2xx statuses both count.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. })
    }

    /// Returns `true` when the backend rejected the credentials or token.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

/// A specialized `Result` type for BinderBuilder operations.
pub type Result<T> = std::result::Result<T, BinderError>;
