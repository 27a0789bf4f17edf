//! Local key/value storage.
//!
//! The shopper's cart survives restarts through a small string-keyed store,
//! the same role browser local storage plays for a web page. Reads never
//! fail (a missing or unreadable value is simply absent); writes report
//! errors so the caller can log them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Storage keys used by the storefront.
pub mod keys {
    /// JSON array of cart lines.
    pub const SHOPPING_CART: &str = "shoppingCart";
}

/// Errors that can occur when writing local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// File could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Contents could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value store.
pub trait LocalStorage {
    /// Value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value could not be made durable.
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Storage that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value);
        Ok(())
    }
}

/// Storage persisted as one JSON object file.
///
/// The whole file is rewritten on every `set_item`.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the storage file at `path`.
    ///
    /// A missing file starts empty. An unreadable or corrupt file is logged
    /// and also starts empty; it is overwritten on the next write.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Local storage file is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Local storage file unreadable, starting empty");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), keys = items.len(), "Opened local storage");
        Self { path, items }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value);
        self.flush()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("valentina-storage-{}-{name}", std::process::id()))
            .join("storage.json")
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item(keys::SHOPPING_CART), None);

        storage.set_item(keys::SHOPPING_CART, "[]".to_string()).unwrap();
        assert_eq!(storage.get_item(keys::SHOPPING_CART).as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let path = temp_path("reopen");
        let _ = std::fs::remove_file(&path);

        let mut storage = FileStorage::open(&path);
        storage.set_item("a", "1".to_string()).unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get_item("a").as_deref(), Some("1"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_storage_corrupt_file_starts_empty() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::open(&path);
        assert_eq!(storage.get_item(keys::SHOPPING_CART), None);

        let _ = std::fs::remove_file(&path);
    }
}
