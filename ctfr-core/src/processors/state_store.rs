//! Notification State Store.
//!
//! The record is a small JSON document that is rewritten as a whole after
//! every committed transition. Writes go to a sibling temp file which is
//! synced and then renamed over the target, so a reader sees either the
//! previous or the new record, never a partial one.

use crate::entities::NotificationRecord;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while loading or saving the record.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record could not be read or written.
    #[error("state file {path} I/O error: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted record exists but cannot be parsed.
    #[error("state file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The record could not be serialized.
    #[error("state serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}

/// Durable storage of the [`NotificationRecord`].
pub trait StateStore: Send + Sync {
    /// Load the record; the empty record when nothing was persisted yet.
    fn load(&self) -> Result<NotificationRecord, StoreError>;

    /// Atomically replace the persisted record.
    fn save(&self, record: &NotificationRecord) -> Result<(), StoreError>;
}

/// [`StateStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    path: PathBuf,
}

impl JsonFileStateStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl StateStore for JsonFileStateStore {
    fn load(&self) -> Result<NotificationRecord, StoreError> {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No state file yet, starting empty");
                return Ok(NotificationRecord::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let mut record: NotificationRecord =
            serde_json::from_slice(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        let repaired = record.repair();
        if !repaired.is_empty() {
            warn!(
                path = %self.path.display(),
                ?repaired,
                "Reminded events missing from the announced set, marking them announced"
            );
        }

        debug!(
            announced = record.new_announced().len(),
            reminded = record.reminder_sent().len(),
            "Loaded notification record"
        );

        Ok(record)
    }

    fn save(&self, record: &NotificationRecord) -> Result<(), StoreError> {
        let json = serde_json::to_vec(record).map_err(StoreError::Serialize)?;

        // Write atomically: write to temp file, then rename
        let temp_path = self.temp_path();
        let written = write_synced(&temp_path, &json)
            .and_then(|()| std::fs::rename(&temp_path, &self.path));
        if let Err(e) = written {
            match std::fs::remove_file(&temp_path) {
                Err(cleanup) if cleanup.kind() != ErrorKind::NotFound => {
                    debug!(path = %temp_path.display(), error = %cleanup, "Temp state file not removed");
                }
                _ => {}
            }
            return Err(self.io_error(e));
        }

        sync_dir(self.path.parent()).map_err(|e| self.io_error(e))
    }
}

fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

/// Make a completed rename durable.
#[cfg(unix)]
fn sync_dir(dir: Option<&Path>) -> std::io::Result<()> {
    let dir = match dir {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: Option<&Path>) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EventId, Transition};

    #[test]
    fn test_missing_file_loads_empty_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("db.json"));
        assert_eq!(store.load().unwrap(), NotificationRecord::new());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("db.json"));

        let mut record = NotificationRecord::new();
        record.apply(EventId(4), Transition::Announce);
        record.apply(EventId(2), Transition::Announce);
        record.apply(EventId(2), Transition::Remind);
        store.save(&record).unwrap();

        assert_eq!(store.load().unwrap(), record);
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            r#"{"mentioned_once":[2,4],"mentioned_twice":[2]}"#
        );
        assert!(!dir.path().join("db.json.tmp").exists());
    }

    #[test]
    fn test_save_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("db.json"));

        let mut record = NotificationRecord::new();
        record.apply(EventId(1), Transition::Announce);
        store.save(&record).unwrap();
        record.apply(EventId(1), Transition::Remind);
        store.save(&record).unwrap();

        assert!(store.load().unwrap().is_reminded(EventId(1)));
    }

    #[test]
    fn test_corrupt_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, b"{\"mentioned_once\": [1, 2").unwrap();

        let err = JsonFileStateStore::new(&path).load().unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_literal_syntax_is_not_accepted() {
        // Single-quoted keys are not JSON.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, b"{'mentioned_once': [1], 'mentioned_twice': []}").unwrap();

        assert!(JsonFileStateStore::new(&path).load().unwrap_err().is_corrupt());
    }

    #[test]
    fn test_load_repairs_inconsistent_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, br#"{"mentioned_once": [], "mentioned_twice": [8]}"#).unwrap();

        let record = JsonFileStateStore::new(&path).load().unwrap();
        assert!(record.is_consistent());
        assert!(record.is_announced(EventId(8)));
    }

    #[test]
    fn test_failed_save_keeps_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("db.json"));

        let mut first = NotificationRecord::new();
        first.apply(EventId(1), Transition::Announce);
        store.save(&first).unwrap();

        // A directory in the temp file's place makes the next write fail.
        std::fs::create_dir(dir.path().join("db.json.tmp")).unwrap();
        let mut second = first.clone();
        second.apply(EventId(1), Transition::Remind);
        assert!(matches!(store.save(&second), Err(StoreError::Io { .. })));

        assert_eq!(store.load().unwrap(), first);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("db.json");
        // A non-empty directory cannot be replaced by a file.
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), b"x").unwrap();

        let store = JsonFileStateStore::new(&target);
        assert!(store.save(&NotificationRecord::new()).is_err());
        assert!(!dir.path().join("db.json.tmp").exists());
        assert!(target.join("keep").exists());
    }

    #[test]
    fn test_save_into_missing_directory_fails_without_touching_target() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStateStore::new(dir.path().join("missing").join("db.json"));
        let err = store.save(&NotificationRecord::new()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
