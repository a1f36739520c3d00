use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use tracing::{debug, warn};

use crate::dao::storage::{StorageError, StorageResult};

use super::KeyValueStore;

/// Key-value store persisted as a single JSON object on disk.
///
/// The whole file is read on every access and rewritten on every update
/// through a sibling temporary file, so a crash mid-write leaves the previous
/// content intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_gate: Mutex<()>,
}

impl FileStore {
    /// Open a store backed by `path`. The file is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_gate: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> StorageResult<BTreeMap<String, String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => {
                return Err(StorageError::unavailable(
                    format!("failed to read `{}`", self.path.display()),
                    err,
                ));
            }
        };

        serde_json::from_str(&contents).map_err(|err| {
            StorageError::corrupted(format!("failed to parse `{}`", self.path.display()), err)
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let payload = serde_json::to_string_pretty(entries)
            .map_err(|err| StorageError::corrupted("failed to encode store entries".into(), err))?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload).map_err(|err| {
            StorageError::unavailable(format!("failed to write `{}`", tmp_path.display()), err)
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|err| {
            StorageError::unavailable(format!("failed to replace `{}`", self.path.display()), err)
        })?;

        debug!(path = %self.path.display(), keys = entries.len(), "store flushed");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let mut entries = self.read_entries()?;
        Ok(entries.remove(key))
    }

    fn set(&self, key: &str, value: String) -> StorageResult<()> {
        let _gate = self.write_gate.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StorageError::Corrupted { message, .. }) => {
                warn!(path = %self.path.display(), %message, "discarding unreadable store content");
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        entries.insert(key.to_owned(), value);
        self.write_entries(&entries)
    }
}
