//! Domain layer for the BinderBuilder client.
//!
//! Core types shared by every other layer, independent of HTTP, storage and
//! rendering concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`user`]: Users, credentials and bearer tokens
//! - [`card`]: Catalog cards and search pages
//! - [`collection`]: Collections, collection cards and overview stats

pub mod card;
pub mod collection;
pub mod error;
pub mod user;

pub use card::{build_catalog_query, Card, CardId, SearchPage};
pub use collection::{
    AddReceipt, CollectionCard, CollectionDetail, CollectionId, CollectionRef, CollectionStats,
};
pub use error::{BinderError, Result};
pub use user::{AuthGrant, BearerToken, Credentials, Identity, Registration, User};
