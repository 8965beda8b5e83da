//! API worker: turns [`ApiRequest`]s into [`ApiResponse`]s.
//!
//! The worker owns a [`CardApi`] and runs each request on whatever task the
//! runtime spawned for it. Every request yields exactly one reply. Errors become
//! `Failed` replies and a panicking request is caught and reported the same
//! way, so the event loop can always release whatever it reserved for the
//! request (pending adds in particular).

use super::client::CardApi;
use super::messages::{ApiFailure, ApiRequest, ApiResponse, FailureKind, Operation};
use crate::domain::{build_catalog_query, Identity, Result};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::Instrument;

/// Executes backend requests on behalf of the event loop.
#[derive(Clone)]
pub struct ApiWorker {
    client: Arc<dyn CardApi>,
}

impl std::fmt::Debug for ApiWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiWorker").finish_non_exhaustive()
    }
}

impl ApiWorker {
    #[must_use]
    pub fn new(client: Arc<dyn CardApi>) -> Self {
        Self { client }
    }

    /// Runs a request and always returns a reply.
    ///
    /// A panic inside the request is converted into a [`FailureKind::Local`]
    /// failure for the request's operation.
    pub async fn dispatch(&self, request: ApiRequest) -> ApiResponse {
        let operation = request.operation();

        match AssertUnwindSafe(self.handle_request(request))
            .catch_unwind()
            .await
        {
            Ok(response) => response,
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());

                tracing::error!(operation = %operation, reason = %reason, "api request panicked");

                let message = format!("{operation} crashed: {reason}");
                ApiResponse::Failed {
                    operation,
                    failure: ApiFailure::new(FailureKind::Local, message),
                }
            }
        }
    }

    /// Handles a request inside a span parented to the issuing span.
    pub async fn handle_request(&self, request: ApiRequest) -> ApiResponse {
        let span = tracing::debug_span!(
            "api_request",
            operation = %request.operation(),
            epoch = request.epoch()
        );

        if let Some(parent) = request.trace_context().and_then(|tc| tc.to_otel_context()) {
            use tracing_opentelemetry::OpenTelemetrySpanExt;
            span.set_parent(parent);
        }

        self.route(request).instrument(span).await
    }

    /// Maps a call result onto a reply with consistent logging.
    fn handle_result<T, F>(operation: Operation, result: Result<T>, on_success: F) -> ApiResponse
    where
        F: FnOnce(T) -> ApiResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = %operation, "api request successful");
                on_success(value)
            }
            Err(e) => {
                tracing::debug!(operation = %operation, error = %e, "api request failed");
                ApiResponse::Failed {
                    operation,
                    failure: ApiFailure::from(&e),
                }
            }
        }
    }

    async fn route(&self, request: ApiRequest) -> ApiResponse {
        let operation = request.operation();

        match request {
            ApiRequest::Search {
                query,
                page,
                page_size,
                ..
            } => {
                let catalog_query = build_catalog_query(&query);
                tracing::debug!(query = %query, catalog_query = %catalog_query, page, "searching catalog");

                let result = self.client.search(&catalog_query, page, page_size).await;
                Self::handle_result(operation, result, |page| {
                    tracing::debug!(result_count = page.data.len(), total = page.total_count, "search completed");
                    ApiResponse::SearchCompleted { query, page }
                })
            }

            ApiRequest::Login { credentials, .. } => {
                let result = self.client.login(&credentials).await;
                Self::handle_result(operation, result, |grant| ApiResponse::Authenticated {
                    identity: Identity::from(grant),
                })
            }

            ApiRequest::Register { registration, .. } => {
                let result = self.client.register(&registration).await;
                Self::handle_result(operation, result, |grant| ApiResponse::Authenticated {
                    identity: Identity::from(grant),
                })
            }

            ApiRequest::VerifySession { token, .. } => {
                let result = self.client.current_user(&token).await;
                Self::handle_result(operation, result, |user| ApiResponse::SessionVerified {
                    identity: Identity::new(user, token),
                })
            }

            ApiRequest::Logout { token, .. } => {
                let result = self.client.logout(&token).await;
                Self::handle_result(operation, result, |()| ApiResponse::LoggedOut)
            }

            ApiRequest::ListCollections { token, .. } => {
                let result = self.client.list_collections(&token).await;
                Self::handle_result(operation, result, |collections| {
                    ApiResponse::CollectionsLoaded { collections }
                })
            }

            ApiRequest::LoadCollection {
                collection_id,
                token,
                ..
            } => {
                let result = self.client.get_collection(collection_id, &token).await;
                Self::handle_result(operation, result, |detail| ApiResponse::CollectionLoaded {
                    detail,
                })
            }

            ApiRequest::AddCard {
                collection_id,
                card,
                token,
                ..
            } => {
                let result = self.client.add_card(collection_id, &card, &token).await;
                Self::handle_result(operation, result, |receipt| {
                    tracing::info!(card_id = %card.id, collection_id, "card added to collection");
                    ApiResponse::CardAdded {
                        card_id: card.id,
                        card_name: card.name,
                        receipt,
                    }
                })
            }

            ApiRequest::Health { .. } => {
                let result = self.client.health().await;
                Self::handle_result(operation, result, |health| ApiResponse::Healthy {
                    status: health.status,
                    message: health.message,
                })
            }
        }
    }
}
