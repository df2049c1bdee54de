//! Durable key-value storage surface.
//!
//! The draft repository only needs string get/set/delete. Every call is
//! synchronous and fallible; callers contain the failures.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::StoreError;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store with an optional byte quota.
///
/// The quota covers the combined length of all stored values, which is how
/// browser local storage runs out when a large image is attached.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: Mutex::default(),
            quota: Some(limit),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.lock();
        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            let needed = others + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.lock().remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DirStore
// ---------------------------------------------------------------------------

/// One file per key under a directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open (and create if needed) the store directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.val", encode_key(key)))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if !self.root.is_dir() {
            return Err(StoreError::Unavailable(format!(
                "store directory {} is missing",
                self.root.display()
            )));
        }
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Map a key to a file-name-safe stem. ASCII alphanumerics, `-` and `_`
/// pass through; every other byte becomes `%XX`.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.delete("k").unwrap();
        assert!(store.is_empty());
        // Deleting twice is fine.
        store.delete("k").unwrap();
    }

    #[test]
    fn memory_store_enforces_quota() {
        let store = MemoryStore::with_quota(10);
        store.set("a", "12345").unwrap();
        store.set("b", "12345").unwrap();
        assert_matches!(
            store.set("c", "1"),
            Err(StoreError::QuotaExceeded { needed: 11, limit: 10, .. })
        );
        // Overwriting a key only counts the new value.
        store.set("a", "123").unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn dir_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::open(dir.path().join("drafts")).unwrap();

        assert_eq!(store.get("musicnbrain_draft").unwrap(), None);
        store.set("musicnbrain_draft", "{\"title\":\"x\"}").unwrap();
        assert_eq!(
            store.get("musicnbrain_draft").unwrap().as_deref(),
            Some("{\"title\":\"x\"}")
        );
        store.delete("musicnbrain_draft").unwrap();
        assert_eq!(store.get("musicnbrain_draft").unwrap(), None);
        store.delete("musicnbrain_draft").unwrap();
    }

    #[test]
    fn dir_store_encodes_unsafe_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::open(dir.path()).unwrap();
        store.set("../escape/key", "v").unwrap();
        assert!(store.root().join("%2E%2E%2Fescape%2Fkey.val").exists());
        assert_eq!(store.get("../escape/key").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn dir_store_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("gone");
        let store = DirStore::open(&root).unwrap();
        fs::remove_dir(&root).unwrap();
        assert_matches!(store.set("k", "v"), Err(StoreError::Unavailable(_)));
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn encode_key_passes_safe_characters() {
        assert_eq!(encode_key("musicnbrain_draft-1"), "musicnbrain_draft-1");
        assert_eq!(encode_key("a b"), "a%20b");
    }
}
