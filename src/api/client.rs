//! HTTP client for the BinderBuilder backend.
//!
//! [`CardApi`] is the seam between the worker and the network; the worker only
//! sees the trait, and tests swap in an in-process fake. [`HttpCardApi`] is the
//! real implementation on top of `reqwest`.

use crate::domain::{
    AddReceipt, AuthGrant, BearerToken, BinderError, Card, CollectionDetail, CollectionId,
    CollectionRef, Credentials, Registration, Result, SearchPage, User,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest slice of a non-JSON error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Backend operations used by the client.
///
/// Collection-scoped methods require a [`BearerToken`]; there is no way to
/// call them without one.
#[async_trait]
pub trait CardApi: Send + Sync {
    /// `GET /api/search?q=&page=&pageSize=`. `query` is already in catalog syntax.
    async fn search(&self, query: &str, page: u32, page_size: u32) -> Result<SearchPage>;

    /// `POST /api/auth/login`.
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant>;

    /// `POST /api/auth/register`.
    async fn register(&self, registration: &Registration) -> Result<AuthGrant>;

    /// `GET /api/auth/me`, used to validate a persisted token.
    async fn current_user(&self, token: &BearerToken) -> Result<User>;

    /// `POST /api/auth/logout`.
    async fn logout(&self, token: &BearerToken) -> Result<()>;

    /// `GET /api/collections`.
    async fn list_collections(&self, token: &BearerToken) -> Result<Vec<CollectionRef>>;

    /// `GET /api/collection/{id}`.
    async fn get_collection(
        &self,
        collection_id: CollectionId,
        token: &BearerToken,
    ) -> Result<CollectionDetail>;

    /// `POST /api/collection/{id}/add-card` with the card JSON as body.
    async fn add_card(
        &self,
        collection_id: CollectionId,
        card: &Card,
        token: &BearerToken,
    ) -> Result<AddReceipt>;

    /// `GET /api/health`.
    async fn health(&self) -> Result<HealthStatus>;
}

/// FastAPI error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// How a non-2xx status should be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    /// Login/register: any 4xx means the credentials were refused.
    Credentials,
    /// Token-bearing call: 401 means the token is no longer valid.
    Authorized,
    Public,
}

/// `reqwest`-backed [`CardApi`].
#[derive(Debug, Clone)]
pub struct HttpCardApi {
    base_url: String,
    http: Client,
}

impl HttpCardApi {
    /// Creates a client for `base_url` (e.g. `http://localhost:5001`).
    ///
    /// # Errors
    ///
    /// Returns [`BinderError::Config`] if the URL is not http(s) or the TLS
    /// backend cannot be initialized.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(BinderError::Config(format!(
                "api_base_url must start with http:// or https://, got {base_url:?}"
            )));
        }

        let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

        let http = ClientBuilder::new()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| BinderError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, http })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a request and decodes a JSON body, mapping failures onto the
    /// error taxonomy.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: Endpoint,
    ) -> Result<T> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| BinderError::Network(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body, endpoint));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BinderError::Network(format!("failed to decode response: {e}")))
    }
}

/// Pulls a readable message out of an error body.
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return match parsed.detail {
            serde_json::Value::String(message) => message,
            other => other.to_string(),
        };
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
    }
}

fn classify_failure(status: StatusCode, body: &str, endpoint: Endpoint) -> BinderError {
    let message = error_detail(status, body);

    let is_auth = match endpoint {
        Endpoint::Credentials => status.is_client_error(),
        Endpoint::Authorized => {
            status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
        }
        Endpoint::Public => false,
    };

    if is_auth {
        BinderError::Auth(message)
    } else {
        BinderError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl CardApi for HttpCardApi {
    async fn search(&self, query: &str, page: u32, page_size: u32) -> Result<SearchPage> {
        let request = self.http.get(self.url("/api/search")).query(&[
            ("q", query.to_string()),
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
        ]);
        self.send_json(request, Endpoint::Public).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant> {
        let request = self.http.post(self.url("/api/auth/login")).json(credentials);
        self.send_json(request, Endpoint::Credentials).await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthGrant> {
        let request = self
            .http
            .post(self.url("/api/auth/register"))
            .json(registration);
        self.send_json(request, Endpoint::Credentials).await
    }

    async fn current_user(&self, token: &BearerToken) -> Result<User> {
        let request = self
            .http
            .get(self.url("/api/auth/me"))
            .bearer_auth(token.expose());
        self.send_json(request, Endpoint::Authorized).await
    }

    async fn logout(&self, token: &BearerToken) -> Result<()> {
        let response = self
            .http
            .post(self.url("/api/auth/logout"))
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| BinderError::Network(format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(classify_failure(status, &body, Endpoint::Authorized))
        }
    }

    async fn list_collections(&self, token: &BearerToken) -> Result<Vec<CollectionRef>> {
        let request = self
            .http
            .get(self.url("/api/collections"))
            .bearer_auth(token.expose());
        self.send_json(request, Endpoint::Authorized).await
    }

    async fn get_collection(
        &self,
        collection_id: CollectionId,
        token: &BearerToken,
    ) -> Result<CollectionDetail> {
        let request = self
            .http
            .get(self.url(&format!("/api/collection/{collection_id}")))
            .bearer_auth(token.expose());
        self.send_json(request, Endpoint::Authorized).await
    }

    async fn add_card(
        &self,
        collection_id: CollectionId,
        card: &Card,
        token: &BearerToken,
    ) -> Result<AddReceipt> {
        let request = self
            .http
            .post(self.url(&format!("/api/collection/{collection_id}/add-card")))
            .bearer_auth(token.expose())
            .json(card);
        self.send_json(request, Endpoint::Authorized).await
    }

    async fn health(&self) -> Result<HealthStatus> {
        let request = self.http.get(self.url("/api/health"));
        self.send_json(request, Endpoint::Public).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::messages::{ApiFailure, FailureKind};

    #[test]
    fn rejects_non_http_base_url() {
        let err = HttpCardApi::new("localhost:5001", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, BinderError::Config(_)));
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let api = HttpCardApi::new("http://localhost:5001/", Duration::from_secs(5)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:5001");
        assert_eq!(api.url("/api/health"), "http://localhost:5001/api/health");
    }

    #[test]
    fn fastapi_detail_is_unwrapped() {
        let err = classify_failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail": "Failed to add card to collection"}"#,
            Endpoint::Authorized,
        );
        match err {
            BinderError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Failed to add card to collection");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unauthorized_token_is_an_auth_error() {
        let err = classify_failure(StatusCode::UNAUTHORIZED, "", Endpoint::Authorized);
        assert!(err.is_auth());

        let err = classify_failure(StatusCode::NOT_FOUND, "", Endpoint::Authorized);
        assert!(err.is_network());
    }

    #[test]
    fn missing_bearer_is_an_auth_error() {
        let err = classify_failure(
            StatusCode::FORBIDDEN,
            r#"{"detail":"Not authenticated"}"#,
            Endpoint::Authorized,
        );
        match &err {
            BinderError::Auth(message) => assert_eq!(message, "Not authenticated"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(ApiFailure::from(&err).kind, FailureKind::Auth);
    }

    #[test]
    fn refused_credentials_are_auth_errors() {
        let err = classify_failure(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Invalid username or password"}"#,
            Endpoint::Credentials,
        );
        assert!(matches!(err, BinderError::Auth(ref m) if m == "Invalid username or password"));
    }

    #[test]
    fn empty_body_falls_back_to_reason_phrase() {
        assert_eq!(error_detail(StatusCode::BAD_GATEWAY, "  "), "Bad Gateway");
        let long = "x".repeat(500);
        assert_eq!(error_detail(StatusCode::BAD_GATEWAY, &long).len(), MAX_ERROR_BODY_CHARS);
    }
}
