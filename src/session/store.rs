//! Key/value stores backing the session
//!
//! The browser build plugs `localStorage` in through [`KeyValueStore`]; the
//! terminal build keeps the same keys in a JSON file.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{ClientError, ClientResult};

/// String key/value storage with `localStorage` semantics
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    fn remove(&self, key: &str) -> ClientResult<()>;
}

/// In-process store, used by tests and as a fallback when no storage exists
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        (**self).remove(key)
    }
}

#[cfg(feature = "native")]
pub use file::FileStore;

#[cfg(feature = "native")]
mod file {
    use super::*;
    use std::path::{Path, PathBuf};

    /// JSON-file store; every write rewrites the whole file
    #[derive(Debug)]
    pub struct FileStore {
        path: PathBuf,
        entries: Mutex<HashMap<String, String>>,
    }

    impl FileStore {
        /// Open the store, starting empty if the file does not exist yet
        pub fn open(path: impl AsRef<Path>) -> ClientResult<Self> {
            let path = path.as_ref().to_path_buf();

            let entries = match std::fs::read_to_string(&path) {
                Ok(content) if content.trim().is_empty() => HashMap::new(),
                Ok(content) => serde_json::from_str(&content).map_err(|e| {
                    ClientError::Storage(format!("{}: {}", path.display(), e))
                })?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
                Err(e) => return Err(ClientError::Storage(format!("{}: {}", path.display(), e))),
            };

            tracing::debug!("Opened session store {:?} ({} keys)", path, entries.len());

            Ok(Self {
                path,
                entries: Mutex::new(entries),
            })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn persist(&self, entries: &HashMap<String, String>) -> ClientResult<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ClientError::Storage(e.to_string()))?;
            }
            let json = serde_json::to_string_pretty(entries)?;
            std::fs::write(&self.path, json).map_err(|e| ClientError::Storage(e.to_string()))
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Option<String> {
            self.entries.lock().ok()?.get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) -> ClientResult<()> {
            let mut entries = self
                .entries
                .lock()
                .map_err(|e| ClientError::Storage(e.to_string()))?;
            entries.insert(key.to_string(), value.to_string());
            self.persist(&entries)
        }

        fn remove(&self, key: &str) -> ClientResult<()> {
            let mut entries = self
                .entries
                .lock()
                .map_err(|e| ClientError::Storage(e.to_string()))?;
            if entries.remove(key).is_some() {
                self.persist(&entries)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("auth_token", "abc").unwrap();
        assert_eq!(store.get("auth_token").as_deref(), Some("abc"));

        store.remove("auth_token").unwrap();
        assert_eq!(store.get("auth_token"), None);
        store.remove("missing").unwrap();
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set("auth_token", "abc").unwrap();
            store.set("darkMode", "true").unwrap();
            store.remove("darkMode").unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("auth_token").as_deref(), Some("abc"));
        assert_eq!(reopened.get("darkMode"), None);
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(FileStore::open(&path), Err(ClientError::Storage(_))));
    }
}
