// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key-value storage substrate.
//!
//! Values are opaque strings stored under a key. Two backends:
//! - [`FileStore`]: one JSON file per key in a data directory
//! - [`MemoryStore`]: in-process map for tests and ephemeral sessions

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Get/set/remove of string blobs.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// File-backed store. Writes go to a temp file that is renamed into place
/// so a crash never leaves a half-written blob.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::Write(e.to_string()))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| StorageError::Write(e.to_string()))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::Write(e.to_string()))?;

        tracing::debug!(path = %path.display(), bytes = value.len(), "Blob written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Write(e.to_string())),
        }
    }
}

/// In-memory store.
///
/// Counts successful writes and can be told to fail them, so tests can
/// check that rejected transitions never touch storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `set` always fails (quota exceeded).
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Read("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::QuotaExceeded);
        }
        self.lock()?.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Errors from the storage substrate or blob decoding.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read storage: {0}")]
    Read(String),

    #[error("Failed to write storage: {0}")]
    Write(String),

    #[error("Storage quota exceeded")]
    QuotaExceeded,

    #[error("Stored workouts are corrupt: {0}")]
    Corrupt(String),

    #[error("Unsupported stored format version {0}")]
    UnsupportedVersion(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("workout-map-log-{name}-{nanos}"))
    }

    #[test]
    fn test_file_store_set_get_remove() {
        let dir = temp_dir("roundtrip");
        let store = FileStore::new(&dir);

        assert_eq!(store.get("workouts").unwrap(), None);
        store.set("workouts", "[1,2,3]").unwrap();
        assert_eq!(store.get("workouts").unwrap().as_deref(), Some("[1,2,3]"));

        store.set("workouts", "[]").unwrap();
        assert_eq!(store.get("workouts").unwrap().as_deref(), Some("[]"));
        assert!(!dir.join("workouts.json.tmp").exists());

        store.remove("workouts").unwrap();
        assert_eq!(store.get("workouts").unwrap(), None);
        // Removing an absent key is fine
        store.remove("workouts").unwrap();

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();

        assert_eq!(store.writes(), 2);
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_failing_store_rejects_writes() {
        let store = MemoryStore::failing_writes();
        assert!(matches!(
            store.set("a", "1"),
            Err(StorageError::QuotaExceeded)
        ));
        assert_eq!(store.writes(), 0);
        assert_eq!(store.get("a").unwrap(), None);
    }
}
