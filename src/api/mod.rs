//! Backend access for the client.
//!
//! The event handler never performs I/O. It describes what it needs as an
//! [`ApiRequest`]; the runtime spawns the request onto the [`ApiWorker`], and
//! the reply comes back as an [`ApiResponse`] event.
//!
//! # Architecture
//!
//! - `client`: the [`CardApi`] trait and its `reqwest` implementation
//! - `messages`: request/reply protocol types with trace context propagation
//! - `handler`: worker that executes requests and always produces one reply

pub mod client;
pub mod handler;
pub mod messages;

pub use client::{CardApi, HealthStatus, HttpCardApi};
pub use handler::ApiWorker;
pub use messages::{ApiFailure, ApiRequest, ApiResponse, FailureKind, Operation, TraceContext};
