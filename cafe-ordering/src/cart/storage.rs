//! Local storage - durable client-side key/value store
//!
//! Each key is one JSON document. The file-backed store keeps them as
//! `<dir>/<key>.json`; the memory store is a shared map for tests and
//! embedded use.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Key under which the cart snapshot is stored
pub const CART_STORAGE_KEY: &str = "cafe_cart";

/// Durable client-local storage
pub trait LocalStorage {
    /// Read a value; `Ok(None)` when absent
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Write a full value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> io::Result<()>;

    /// Delete a value; absent keys are not an error
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// File-backed storage
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored documents
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl LocalStorage for FileStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        // Atomic replace via temp file
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-memory storage; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("nested"));

        assert_eq!(storage.get("k").unwrap(), None);
        storage.set("k", "{\"a\":1}").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(temp_dir.path().join("nested").join("k.json").exists());

        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
        // Removing twice is fine
        storage.remove("k").unwrap();
    }

    #[test]
    fn test_memory_storage_clones_share_state() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set(CART_STORAGE_KEY, "x").unwrap();
        assert_eq!(b.get(CART_STORAGE_KEY).unwrap().as_deref(), Some("x"));
    }
}
