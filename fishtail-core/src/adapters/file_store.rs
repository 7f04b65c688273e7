//! JSON-file backed local storage
//!
//! All keys live in one `storage.json` object in the app directory. Writers
//! take an exclusive lock on the file for the whole read-modify-write so two
//! processes sharing the directory never interleave updates.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;

pub const STORAGE_FILE: &str = "storage.json";

type Entries = BTreeMap<String, String>;

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(app_dir: &Path) -> Self {
        Self { path: app_dir.join(STORAGE_FILE) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored entry
    pub fn entries(&self) -> Result<Entries> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        file.lock_shared().map_err(|e| self.lock_error(e))?;
        Self::read_entries(&mut file)
    }

    fn lock_error(&self, error: std::io::Error) -> Error {
        Error::storage(format!("Failed to lock {}: {}", self.path.display(), error))
    }

    /// A corrupt file reads as empty, like a cleared browser storage
    fn read_entries(file: &mut File) -> Result<Entries> {
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        Ok(serde_json::from_str(&content).unwrap_or_default())
    }

    fn update(&self, apply: impl FnOnce(&mut Entries)) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        file.lock_exclusive().map_err(|e| self.lock_error(e))?;

        let mut entries = Self::read_entries(&mut file)?;
        apply(&mut entries);

        let content = serde_json::to_string_pretty(&entries)?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert_eq!(store.get("user").unwrap(), None);
        store.remove("user").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_removed_after_write_reads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.set("user", "u").unwrap();
        std::fs::remove_file(store.path()).unwrap();
        assert!(store.entries().unwrap().is_empty());
        assert_eq!(store.get("user").unwrap(), None);
    }

    #[test]
    fn test_set_get_remove() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        store.set("user", r#"{"id":"1"}"#).unwrap();
        store.set("token", "abc").unwrap();
        assert_eq!(store.get("user").unwrap().as_deref(), Some(r#"{"id":"1"}"#));

        store.remove("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
        assert_eq!(store.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        JsonFileStore::new(dir.path()).set("session_token", "t1").unwrap();
        let store = JsonFileStore::new(dir.path());
        assert_eq!(store.get("session_token").unwrap().as_deref(), Some("t1"));
    }

    #[test]
    fn test_shorter_rewrite_leaves_no_trailing_bytes() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.set("a", &"x".repeat(200)).unwrap();
        store.set("a", "y").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("y"));
    }

    #[test]
    fn test_corrupt_file_reads_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(STORAGE_FILE), "{not json").unwrap();
        let store = JsonFileStore::new(dir.path());
        assert_eq!(store.get("user").unwrap(), None);
        store.set("user", "u").unwrap();
        assert_eq!(store.get("user").unwrap().as_deref(), Some("u"));
    }
}
