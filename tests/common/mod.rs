//! In-process backend shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use binderbuilder::api::{ApiWorker, CardApi, HealthStatus};
use binderbuilder::domain::{
    AddReceipt, AuthGrant, BearerToken, BinderError, Card, CollectionCard, CollectionDetail,
    CollectionId, CollectionRef, Credentials, Registration, Result, SearchPage, User,
};
use binderbuilder::storage::SessionStorage;
use binderbuilder::{AppState, Runtime, Theme};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const PASSWORD: &str = "pikachu123";
pub const TOKEN: &str = "tok-ash";

/// What the backend does with an add request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Accept,
    Reject,
    Panic,
}

/// Backend double with one user, `ash`, and a fixed catalog.
pub struct FakeBackend {
    pub collections: Vec<CollectionRef>,
    pub catalog: Vec<Card>,
    pub add_outcome: AddOutcome,
    pub reachable: bool,
    revoked: AtomicBool,
    calls: Mutex<Vec<&'static str>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            collections: vec![CollectionRef::new(7, "Main Binder")],
            catalog: vec![
                Card::new("base1-58", "Pikachu")
                    .with_set("Base", "Base")
                    .with_price(3.5),
                Card::new("base1-14", "Raichu").with_set("Base", "Base"),
            ],
            add_outcome: AddOutcome::Accept,
            reachable: true,
            revoked: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn with_collections(collections: Vec<CollectionRef>) -> Self {
        Self {
            collections,
            ..Self::default()
        }
    }

    pub fn with_add_outcome(add_outcome: AddOutcome) -> Self {
        Self {
            add_outcome,
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::default()
        }
    }

    /// Makes every token-bearing call fail from now on, as a backend does
    /// after the token is revoked server-side.
    pub fn revoke_tokens(&self) {
        self.revoked.store(true, Ordering::SeqCst);
    }

    /// Number of calls made to `endpoint`.
    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == endpoint)
            .count()
    }

    fn record(&self, endpoint: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(endpoint);
        if self.reachable {
            Ok(())
        } else {
            Err(BinderError::Network("connection refused".to_string()))
        }
    }

    fn authorize(&self, token: &BearerToken) -> Result<()> {
        if token.expose() == TOKEN && !self.revoked.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BinderError::Auth("Not authenticated".to_string()))
        }
    }
}

#[async_trait]
impl CardApi for FakeBackend {
    async fn search(&self, query: &str, page: u32, page_size: u32) -> Result<SearchPage> {
        self.record("search")?;
        let needle = query
            .trim_start_matches("name:")
            .trim_end_matches('*')
            .to_lowercase();
        let data: Vec<Card> = self
            .catalog
            .iter()
            .filter(|card| card.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let count = u32::try_from(data.len()).unwrap();
        Ok(SearchPage {
            data,
            page,
            page_size,
            count,
            total_count: count,
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant> {
        self.record("login")?;
        if credentials.username == "ash" && credentials.password == PASSWORD {
            Ok(AuthGrant {
                user: User::new(1, "ash"),
                token: BearerToken::new(TOKEN),
            })
        } else {
            Err(BinderError::Auth("Invalid username or password".to_string()))
        }
    }

    async fn register(&self, registration: &Registration) -> Result<AuthGrant> {
        self.record("register")?;
        if registration.username == "ash" {
            return Err(BinderError::Status {
                status: 409,
                message: "Username already exists".to_string(),
            });
        }
        Ok(AuthGrant {
            user: User::new(2, registration.username.clone()),
            token: BearerToken::new(TOKEN),
        })
    }

    async fn current_user(&self, token: &BearerToken) -> Result<User> {
        self.record("current_user")?;
        self.authorize(token)?;
        Ok(User::new(1, "ash"))
    }

    async fn logout(&self, _token: &BearerToken) -> Result<()> {
        self.record("logout")
    }

    async fn list_collections(&self, token: &BearerToken) -> Result<Vec<CollectionRef>> {
        self.record("list_collections")?;
        self.authorize(token)?;
        Ok(self.collections.clone())
    }

    async fn get_collection(
        &self,
        collection_id: CollectionId,
        token: &BearerToken,
    ) -> Result<CollectionDetail> {
        self.record("get_collection")?;
        self.authorize(token)?;
        Ok(CollectionDetail {
            collection_id,
            cards: vec![CollectionCard {
                id: 1,
                pokemon_card_id: "base1-58".to_string(),
                name: "Pikachu".to_string(),
                set_name: Some("Base".to_string()),
                series: Some("Base".to_string()),
                image_url: None,
                price: Some(3.5),
                quantity: 2,
                collection_id,
                added_at: None,
                collection_name: None,
            }],
        })
    }

    async fn add_card(
        &self,
        _collection_id: CollectionId,
        card: &Card,
        token: &BearerToken,
    ) -> Result<AddReceipt> {
        self.record("add_card")?;
        self.authorize(token)?;
        match self.add_outcome {
            AddOutcome::Accept => Ok(AddReceipt {
                message: format!("{} added", card.name),
                card_id: 11,
            }),
            AddOutcome::Reject => Err(BinderError::Status {
                status: 500,
                message: "Failed to add card to collection".to_string(),
            }),
            AddOutcome::Panic => panic!("serializer blew up"),
        }
    }

    async fn health(&self) -> Result<HealthStatus> {
        self.record("health")?;
        Ok(HealthStatus {
            status: "healthy".to_string(),
            message: "Backend is running".to_string(),
        })
    }
}

/// Builds a runtime over `backend` and `storage`, without starting it.
pub fn runtime(backend: &Arc<FakeBackend>, storage: Box<dyn SessionStorage>) -> Runtime {
    let api: Arc<dyn CardApi> = backend.clone();
    Runtime::new(AppState::new(20, Theme::plain()), storage, ApiWorker::new(api))
}
