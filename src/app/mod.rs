//! Application layer coordinating session, routing, and collection state.
//!
//! This module sits between the runtime (`runtime.rs`, driven by `main.rs`)
//! and the domain, storage and API layers. Everything here is synchronous and
//! free of I/O, so every transition can be tested by feeding events in and
//! looking at the state and actions that come out.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Command → Events → Event Handler → State Mutations → Actions → Side Effects
//!                              ↑                                  ↓
//!                              └────────── API Replies ───────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`collections`]: Default-collection resolver
//! - [`guard`]: Route guard decisions
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`pending`]: In-flight add tracking
//! - [`routes`]: Routes and their access rules
//! - [`session`]: Session state machine
//! - [`state`]: Central application state container and view model computation
//!
//! # Example
//!
//! ```rust
//! use binderbuilder::app::{handle_event, AppState, Event};
//! use binderbuilder::ui::theme::Theme;
//!
//! let mut state = AppState::new(20, Theme::plain());
//! let (_, actions) = handle_event(&mut state, &Event::Start { persisted: None })?;
//! assert!(actions.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod actions;
pub mod collections;
pub mod guard;
pub mod handler;
pub mod pending;
pub mod routes;
pub mod session;
pub mod state;

pub use actions::{Action, Notice, NoticeLevel};
pub use collections::{CollectionResolver, ResolverStatus};
pub use guard::{GuardDecision, GuardState};
pub use handler::{handle_event, Event};
pub use pending::PendingAdds;
pub use routes::{Access, Route};
pub use session::{Session, SessionEvent};
pub use state::AppState;
