//! JSON file storage backend.
//!
//! The whole store is one JSON object of string values. Every `get` reads the
//! file again so values written by another process (e.g. `toma login` while
//! the dashboard is open) are picked up on the next request.

use crate::{LocalStorage, StorageError, StorageResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

type Entries = BTreeMap<String, String>;

/// Unencrypted key/value file, e.g. `~/.toma/storage.json`.
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Create a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> StorageResult<Entries> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Entries::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                StorageError::Encoding(format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write via a sibling temp file and rename, so readers never observe a
    /// half-written file.
    fn write_entries(&self, entries: &Entries) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(entries)?;
        let written = std::fs::write(&tmp, content).and_then(|()| std::fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl LocalStorage for FileStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock();
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_entries()?.get(key).cloned())
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        let _guard = self.write_lock.lock();
        let mut entries = self.read_entries()?;
        let existed = entries.remove(key).is_some();
        if existed {
            self.write_entries(&entries)?;
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));

        assert_eq!(storage.get("toma_token").unwrap(), None);
        assert!(!storage.delete("toma_token").unwrap());
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_values_persist_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        FileStorage::new(&path).set("toma_token", "abc").unwrap();
        FileStorage::new(&path).set("business_name", "Acme").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("toma_token").unwrap(), Some("abc".into()));
        assert_eq!(reopened.get("business_name").unwrap(), Some("Acme".into()));

        assert!(reopened.delete("toma_token").unwrap());
        assert_eq!(FileStorage::new(&path).get("toma_token").unwrap(), None);
    }

    #[test]
    fn test_file_is_plain_json_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        FileStorage::new(&path).set("toma_token", "abc").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["toma_token"], "abc");
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        // a non-empty directory in the way makes the rename fail
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();

        let storage = FileStorage::new(&path);
        let mut entries = Entries::new();
        entries.insert("toma_token".into(), "abc".into());

        assert!(storage.write_entries(&entries).is_err());
        assert!(!dir.path().join("storage.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_encoding_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileStorage::new(&path).get("toma_token").unwrap_err();
        assert!(matches!(err, StorageError::Encoding(_)));
    }
}
