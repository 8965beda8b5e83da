//! JSON file-based session storage.
//!
//! The record is kept in a small human-readable JSON file. Writes go to a
//! temporary file first and are then renamed over the target, so a crash
//! mid-write never leaves a truncated session file behind.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "user": { "id": 7, "username": "misty" },
//!   "token": "eyJhbGciOi...",
//!   "saved_at": 1718000000
//! }
//! ```

use crate::domain::error::{BinderError, Result};
use crate::storage::backend::SessionStorage;
use crate::storage::models::SessionRecord;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// Versioned envelope serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    #[serde(flatten)]
    record: SessionRecord,
}

/// JSON file session storage.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    /// Path to the JSON file on disk.
    file_path: PathBuf,
}

impl JsonStorage {
    /// Opens JSON storage at `file_path`, creating parent directories.
    ///
    /// The file itself is only created on the first [`save`](SessionStorage::save).
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON session storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self { file_path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| BinderError::Storage(format!("failed to parse session file: {e}")))?;

        if data.version > FORMAT_VERSION {
            return Err(BinderError::Storage(format!(
                "session file version {} is newer than supported version {FORMAT_VERSION}",
                data.version
            )));
        }

        Ok(data)
    }
}

/// Writes `contents` to `path`, readable only by the current user on Unix.
///
/// The file holds a bearer token.
fn write_owner_only(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(contents)?;
    file.sync_all()
}

impl SessionStorage for JsonStorage {
    fn load(&self) -> Result<Option<SessionRecord>> {
        let _span = tracing::debug_span!("json_load_session", path = ?self.file_path).entered();

        if !self.file_path.exists() {
            tracing::debug!("no persisted session");
            return Ok(None);
        }

        let data = Self::load_from_file(&self.file_path)?;
        tracing::debug!(
            version = data.version,
            has_user = data.record.user.is_some(),
            has_token = data.record.token.is_some(),
            "loaded persisted session"
        );
        Ok(Some(data.record))
    }

    fn save(&mut self, record: &SessionRecord) -> Result<()> {
        let _span = tracing::debug_span!("json_save_session", path = ?self.file_path).entered();

        let data = StorageData {
            version: FORMAT_VERSION,
            record: record.clone(),
        };
        let json = serde_json::to_string_pretty(&data)
            .map_err(|e| BinderError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        write_owner_only(&tmp_path, json.as_bytes())?;

        tracing::trace!("renaming temporary file to final location");
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!("session saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("json_clear_session", path = ?self.file_path).entered();

        match std::fs::remove_file(&self.file_path) {
            Ok(()) => {
                tracing::debug!("session file removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BearerToken, Identity, User};

    fn record() -> SessionRecord {
        SessionRecord::from_identity(&Identity::new(
            User::new(7, "misty"),
            BearerToken::new("tok-7"),
        ))
    }

    #[test]
    fn save_then_load_returns_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("nested").join("session.json")).unwrap();

        assert_eq!(storage.load().unwrap(), None);
        let saved = record();
        storage.save(&saved).unwrap();
        assert_eq!(storage.load().unwrap(), Some(saved));
        assert!(!storage.path().with_extension("tmp").exists());
    }

    #[test]
    fn file_carries_version_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut storage = JsonStorage::new(path.clone()).unwrap();
        storage.save(&record()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert_eq!(raw["user"]["username"], "misty");
        assert_eq!(raw["token"], "tok-7");
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private_to_the_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(path.with_extension("tmp"), "left over").unwrap();
        let mut storage = JsonStorage::new(path.clone()).unwrap();
        storage.save(&record()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("session.json")).unwrap();
        storage.save(&record()).unwrap();
        storage.clear().unwrap();
        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn garbage_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let storage = JsonStorage::new(path).unwrap();
        assert!(matches!(storage.load(), Err(BinderError::Storage(_))));
    }

    #[test]
    fn orphaned_token_on_disk_still_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"version": 1, "token": "tok", "saved_at": 0}"#).unwrap();
        let storage = JsonStorage::new(path).unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert!(loaded.user.is_none());
        assert!(loaded.into_identity().is_err());
    }
}
