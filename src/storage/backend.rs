//! Storage backend abstraction.
//!
//! This module defines the [`SessionStorage`] trait over the places a login
//! can be kept between runs. The trait is minimal: the client only ever loads
//! the record at startup, saves it after login and clears it on logout.

use crate::domain::error::{BinderError, Result};
use crate::storage::models::SessionRecord;
use std::sync::{Arc, Mutex};

/// Abstraction over persistent session storage.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes (default)
/// - [`MemoryStorage`]: process-local, used by tests and `--ephemeral`
///
/// # Examples
///
/// ```no_run
/// use binderbuilder::storage::{JsonStorage, SessionStorage};
/// use std::path::PathBuf;
///
/// let storage = JsonStorage::new(PathBuf::from("/tmp/session.json"))?;
/// let record = storage.load()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait SessionStorage: Send {
    /// Reads the persisted record, `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<SessionRecord>>;

    /// Replaces the persisted record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save(&mut self, record: &SessionRecord) -> Result<()>;

    /// Removes the persisted record. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be removed.
    fn clear(&mut self) -> Result<()>;
}

/// In-memory [`SessionStorage`].
///
/// Clones share the same slot, so a test can keep a handle and inspect what
/// the runtime persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<SessionRecord>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `record`.
    #[must_use]
    pub fn with_record(record: SessionRecord) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(record))),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<SessionRecord>>> {
        self.slot
            .lock()
            .map_err(|_| BinderError::Storage("session slot poisoned".to_string()))
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<SessionRecord>> {
        Ok(self.lock()?.clone())
    }

    fn save(&mut self, record: &SessionRecord) -> Result<()> {
        *self.lock()? = Some(record.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}
