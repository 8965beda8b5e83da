//! Storage layer for the persisted login.
//!
//! The client keeps exactly one thing between runs: the user and bearer token
//! of the last successful login, so the next launch can restore the session.
//!
//! # Modules
//!
//! - `backend`: [`SessionStorage`] trait and the in-memory implementation
//! - `json`: JSON file implementation with atomic writes
//! - `models`: on-disk record types separate from domain models

pub mod backend;
pub mod json;
pub mod models;

pub use backend::{MemoryStorage, SessionStorage};
pub use json::JsonStorage;
pub use models::SessionRecord;
