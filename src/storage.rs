//! Durable key-value storage backing the like list.
//!
//! The browser build writes to `window.localStorage`; tests and headless
//! callers use [`MemoryStorage`]; native builds with the `native` feature can
//! use [`FileStorage`], which keeps every key in one JSON file.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// String-to-string store. Writes replace the whole value under a key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// In-process store, lost on drop
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// `window.localStorage`
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    /// Open the window's local storage. Fails outside a browser or when
    /// storage is disabled.
    pub fn open() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| Error::Storage("no window".to_string()))?;
        let inner = window
            .local_storage()
            .map_err(|e| Error::Storage(format!("{:?}", e)))?
            .ok_or_else(|| Error::Storage("localStorage unavailable".to_string()))?;
        Ok(LocalStorage { inner })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.inner
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("{:?}", e)))
    }
}

/// All keys in one JSON object file, rewritten on every `set`
#[cfg(feature = "native")]
pub struct FileStorage {
    path: std::path::PathBuf,
    entries: HashMap<String, String>,
}

#[cfg(feature = "native")]
impl FileStorage {
    /// Open `path`, starting empty when the file is missing or unreadable
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed storage file {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        FileStorage { path, entries }
    }
}

#[cfg(feature = "native")]
impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        let text = serde_json::to_string(&self.entries)?;
        std::fs::write(&self.path, text).map_err(|e| Error::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_overwrites() {
        let mut store = MemoryStorage::new();
        assert_eq!(store.get("likes"), None);
        store.set("likes", "[]").unwrap();
        store.set("likes", "[1]").unwrap();
        assert_eq!(store.get("likes").as_deref(), Some("[1]"));
    }

    #[cfg(feature = "native")]
    #[test]
    fn file_storage_survives_reopen() {
        let path = std::env::temp_dir().join(format!("forkify-{}.json", uuid::Uuid::new_v4()));

        let mut store = FileStorage::open(&path);
        store.set("likes", r#"[{"id":"r1"}]"#).unwrap();
        drop(store);

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get("likes").as_deref(), Some(r#"[{"id":"r1"}]"#));

        std::fs::remove_file(&path).unwrap();
    }

    #[cfg(feature = "native")]
    #[test]
    fn file_storage_tolerates_garbage() {
        let path = std::env::temp_dir().join(format!("forkify-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "not json").unwrap();

        let store = FileStorage::open(&path);
        assert_eq!(store.get("likes"), None);

        std::fs::remove_file(&path).unwrap();
    }
}
