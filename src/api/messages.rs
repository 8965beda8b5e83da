//! Request and reply types exchanged between the event loop and the API worker.
//!
//! The event handler never talks to the network. It emits [`ApiRequest`]s; the
//! runtime hands them to the [`ApiWorker`](super::ApiWorker), and every
//! request produces exactly one [`ApiResponse`] that is fed back as an event.
//! Requests also carry the session epoch they were issued under and the trace
//! context of the span that issued them.

use crate::domain::{
    AddReceipt, BearerToken, BinderError, Card, CardId, CollectionDetail, CollectionId,
    CollectionRef, Credentials, Identity, Registration, SearchPage,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Distributed tracing context carried from the issuing span to the worker.
///
/// Captures the OpenTelemetry trace and span ids of the current span so the
/// request span can be parented to it even though it runs on another task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across tasks.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the context of the current tracing span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span is
    /// not sampled.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }

    /// Rebuilds a remote OpenTelemetry context from the captured ids.
    ///
    /// Returns `None` if either id is not valid hex.
    #[must_use]
    pub fn to_otel_context(&self) -> Option<opentelemetry::Context> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(opentelemetry::Context::new().with_remote_span_context(span_context))
    }
}

/// Generates constructors for [`ApiRequest`] variants.
///
/// Each constructor takes the session epoch first, then the variant's own
/// fields, and attaches the current trace context.
macro_rules! api_request_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl ApiRequest {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " request tagged with `epoch` and the current trace context")]
                #[must_use]
                pub fn $builder_name(epoch: u64, $($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        epoch,
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

api_request_builders! {
    search(Search { query: String, page: u32, page_size: u32 }),
    login(Login { credentials: Credentials }),
    register(Register { registration: Registration }),
    verify_session(VerifySession { token: BearerToken }),
    logout(Logout { token: BearerToken }),
    list_collections(ListCollections { token: BearerToken }),
    load_collection(LoadCollection { collection_id: CollectionId, token: BearerToken }),
    add_card(AddCard { collection_id: CollectionId, card: Card, token: BearerToken }),
    health(Health {}),
}

/// Backend calls the event handler can ask for.
///
/// Collection-scoped variants hold a [`BearerToken`] by value, so a request
/// without a token cannot be built.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    /// Search the card catalog. `query` is what the user typed.
    Search {
        query: String,
        page: u32,
        page_size: u32,
        epoch: u64,
        trace_context: Option<TraceContext>,
    },

    /// Exchange credentials for a token.
    Login {
        credentials: Credentials,
        epoch: u64,
        trace_context: Option<TraceContext>,
    },

    /// Create an account and receive a token.
    Register {
        registration: Registration,
        epoch: u64,
        trace_context: Option<TraceContext>,
    },

    /// Check a persisted token during startup restore.
    VerifySession {
        token: BearerToken,
        epoch: u64,
        trace_context: Option<TraceContext>,
    },

    /// Best-effort server-side token invalidation.
    Logout {
        token: BearerToken,
        epoch: u64,
        trace_context: Option<TraceContext>,
    },

    /// Fetch the user's collections, in backend order.
    ListCollections {
        token: BearerToken,
        epoch: u64,
        trace_context: Option<TraceContext>,
    },

    /// Fetch one collection with its cards.
    LoadCollection {
        collection_id: CollectionId,
        token: BearerToken,
        epoch: u64,
        trace_context: Option<TraceContext>,
    },

    /// Add a catalog card to a collection.
    AddCard {
        collection_id: CollectionId,
        card: Card,
        token: BearerToken,
        epoch: u64,
        trace_context: Option<TraceContext>,
    },

    /// Backend liveness probe.
    Health {
        epoch: u64,
        trace_context: Option<TraceContext>,
    },
}

impl ApiRequest {
    /// The session epoch this request was issued under.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        match self {
            Self::Search { epoch, .. }
            | Self::Login { epoch, .. }
            | Self::Register { epoch, .. }
            | Self::VerifySession { epoch, .. }
            | Self::Logout { epoch, .. }
            | Self::ListCollections { epoch, .. }
            | Self::LoadCollection { epoch, .. }
            | Self::AddCard { epoch, .. }
            | Self::Health { epoch, .. } => *epoch,
        }
    }

    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::Search { trace_context, .. }
            | Self::Login { trace_context, .. }
            | Self::Register { trace_context, .. }
            | Self::VerifySession { trace_context, .. }
            | Self::Logout { trace_context, .. }
            | Self::ListCollections { trace_context, .. }
            | Self::LoadCollection { trace_context, .. }
            | Self::AddCard { trace_context, .. }
            | Self::Health { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Describes the request without its payload, for failure replies.
    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            Self::Search { query, .. } => Operation::Search {
                query: query.clone(),
            },
            Self::Login { .. } => Operation::Login,
            Self::Register { .. } => Operation::Register,
            Self::VerifySession { .. } => Operation::VerifySession,
            Self::Logout { .. } => Operation::Logout,
            Self::ListCollections { .. } => Operation::ListCollections,
            Self::LoadCollection { collection_id, .. } => Operation::LoadCollection {
                collection_id: *collection_id,
            },
            Self::AddCard { card, .. } => Operation::AddCard {
                card_id: card.id.clone(),
                card_name: card.name.clone(),
            },
            Self::Health { .. } => Operation::Health,
        }
    }
}

/// Which request a reply answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Search { query: String },
    Login,
    Register,
    VerifySession,
    Logout,
    ListCollections,
    LoadCollection { collection_id: CollectionId },
    AddCard { card_id: CardId, card_name: String },
    Health,
}

impl Operation {
    /// Whether the request was made with the session's bearer token.
    #[must_use]
    pub const fn uses_token(&self) -> bool {
        matches!(
            self,
            Self::VerifySession
                | Self::Logout
                | Self::ListCollections
                | Self::LoadCollection { .. }
                | Self::AddCard { .. }
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search { .. } => f.write_str("search"),
            Self::Login => f.write_str("login"),
            Self::Register => f.write_str("register"),
            Self::VerifySession => f.write_str("verify session"),
            Self::Logout => f.write_str("logout"),
            Self::ListCollections => f.write_str("list collections"),
            Self::LoadCollection { .. } => f.write_str("load collection"),
            Self::AddCard { .. } => f.write_str("add card"),
            Self::Health => f.write_str("health"),
        }
    }
}

/// Error class of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport failure or non-2xx status.
    Network,
    /// Credentials or token rejected.
    Auth,
    /// Anything else, including a crashed request task.
    Local,
}

/// Cloneable summary of a [`BinderError`] carried in replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiFailure {
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&BinderError> for ApiFailure {
    fn from(error: &BinderError) -> Self {
        let kind = if error.is_auth() {
            FailureKind::Auth
        } else if error.is_network() {
            FailureKind::Network
        } else {
            FailureKind::Local
        };
        let message = match error {
            BinderError::Auth(message) | BinderError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self { kind, message }
    }
}

/// Replies from the worker, one per request.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    SearchCompleted {
        query: String,
        page: SearchPage,
    },
    /// Login or registration succeeded.
    Authenticated {
        identity: Identity,
    },
    /// A persisted token was accepted by the backend.
    SessionVerified {
        identity: Identity,
    },
    LoggedOut,
    CollectionsLoaded {
        collections: Vec<CollectionRef>,
    },
    CollectionLoaded {
        detail: CollectionDetail,
    },
    CardAdded {
        card_id: CardId,
        card_name: String,
        receipt: AddReceipt,
    },
    Healthy {
        status: String,
        message: String,
    },
    Failed {
        operation: Operation,
        failure: ApiFailure,
    },
}
