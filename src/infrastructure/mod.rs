//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where the client keeps its files: the persisted session and the
//! trace log both live in one data directory.

pub mod paths;

pub use paths::{default_data_dir, expand_tilde, session_file, trace_file};
