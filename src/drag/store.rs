//! Durable storage for surface positions.
//!
//! [`PositionStore`] is a small key-value capability injected into the
//! drag coordinator. [`FsPositionStore`] keeps one JSON file per key with
//! atomic writes (temp file + fsync + rename); [`MemoryPositionStore`] is
//! for tests and ephemeral use.
//!
//! # Examples
//!
//! ```
//! use tutor_chat::drag::geometry::Position;
//! use tutor_chat::drag::store::{MemoryPositionStore, PositionStore};
//!
//! let store = MemoryPositionStore::new();
//! store.save("anchor-position", Position::new(12, 34)).unwrap();
//! assert_eq!(store.load("anchor-position").unwrap(), Some(Position::new(12, 34)));
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::geometry::Position;
use crate::config::StorageConfig;
use crate::error::ChatError;

/// Key-value storage for positions.
///
/// Writes are best-effort from the caller's point of view: the coordinator
/// logs failures and carries on.
pub trait PositionStore: Send + Sync {
    /// Load the position stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<Position>, ChatError>;

    /// Store `position` under `key`, replacing any previous value.
    fn save(&self, key: &str, position: Position) -> Result<(), ChatError>;
}

impl<S: PositionStore + ?Sized> PositionStore for Arc<S> {
    fn load(&self, key: &str) -> Result<Option<Position>, ChatError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, position: Position) -> Result<(), ChatError> {
        (**self).save(key, position)
    }
}

/// In-memory position store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryPositionStore {
    positions: Arc<Mutex<HashMap<String, Position>>>,
}

impl MemoryPositionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved keys.
    pub fn len(&self) -> usize {
        self.positions.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Whether nothing has been saved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PositionStore for MemoryPositionStore {
    fn load(&self, key: &str) -> Result<Option<Position>, ChatError> {
        let positions = self
            .positions
            .lock()
            .map_err(|_| ChatError::StoreError("position map lock poisoned".into()))?;
        Ok(positions.get(key).copied())
    }

    fn save(&self, key: &str, position: Position) -> Result<(), ChatError> {
        let mut positions = self
            .positions
            .lock()
            .map_err(|_| ChatError::StoreError("position map lock poisoned".into()))?;
        positions.insert(key.to_string(), position);
        Ok(())
    }
}

/// Filesystem-backed position store: `{dir}/{key}.json`.
#[derive(Debug, Clone)]
pub struct FsPositionStore {
    dir: PathBuf,
}

impl FsPositionStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::StoreError`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ChatError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            ChatError::StoreError(format!(
                "failed to create position directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    /// Create a store from the `[storage]` config section.
    pub fn from_config(config: &StorageConfig) -> Result<Self, ChatError> {
        Self::new(config.resolved_dir()?)
    }

    /// The directory positions are stored in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ChatError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ChatError::StoreError(format!("invalid position key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl PositionStore for FsPositionStore {
    fn load(&self, key: &str) -> Result<Option<Position>, ChatError> {
        let path = self.path_for(key)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ChatError::StoreError(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };
        serde_json::from_str(&content).map(Some).map_err(|e| {
            ChatError::StoreError(format!("failed to parse {}: {e}", path.display()))
        })
    }

    fn save(&self, key: &str, position: Position) -> Result<(), ChatError> {
        let path = self.path_for(key)?;
        let json = serde_json::to_string(&position)
            .map_err(|e| ChatError::StoreError(format!("failed to serialize position: {e}")))?;

        let tmp_path = self.dir.join(format!(".{key}.tmp"));
        std::fs::write(&tmp_path, json.as_bytes()).map_err(|e| {
            ChatError::StoreError(format!(
                "failed to write temp file {}: {e}",
                tmp_path.display()
            ))
        })?;

        if let Ok(file) = std::fs::File::open(&tmp_path) {
            let _ = file.sync_all();
        }

        std::fs::rename(&tmp_path, &path).map_err(|e| {
            ChatError::StoreError(format!(
                "failed to rename temp file to {}: {e}",
                path.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_missing_key() {
        let store = MemoryPositionStore::new();
        assert!(matches!(store.load("nope"), Ok(None)));
        assert!(store.is_empty());
    }

    #[test]
    fn memory_store_clones_share_state() {
        let a = MemoryPositionStore::new();
        let b = a.clone();
        assert!(a.save("k", Position::new(1, 2)).is_ok());
        assert!(matches!(b.load("k"), Ok(Some(p)) if p == Position::new(1, 2)));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn fs_store_round_trip() {
        let dir = tempfile::tempdir();
        let Ok(dir) = dir else {
            unreachable!("tempdir");
        };
        let store = FsPositionStore::new(dir.path().join("positions"));
        let Ok(store) = store else {
            unreachable!("store dir");
        };
        assert!(matches!(store.load("anchor-position"), Ok(None)));
        assert!(store.save("anchor-position", Position::new(640, 320)).is_ok());
        assert!(matches!(
            store.load("anchor-position"),
            Ok(Some(p)) if p == Position::new(640, 320)
        ));
        // no temp file left behind
        assert!(!dir.path().join("positions/.anchor-position.tmp").exists());
    }

    #[test]
    fn fs_store_rejects_path_like_keys() {
        let Ok(dir) = tempfile::tempdir() else {
            unreachable!("tempdir");
        };
        let Ok(store) = FsPositionStore::new(dir.path()) else {
            unreachable!("store dir");
        };
        assert!(matches!(
            store.save("../escape", Position::default()),
            Err(ChatError::StoreError(_))
        ));
        assert!(store.load("").is_err());
    }

    #[test]
    fn fs_store_corrupt_file_is_error() {
        let Ok(dir) = tempfile::tempdir() else {
            unreachable!("tempdir");
        };
        let Ok(store) = FsPositionStore::new(dir.path()) else {
            unreachable!("store dir");
        };
        assert!(std::fs::write(dir.path().join("anchor-position.json"), "{oops").is_ok());
        assert!(store.load("anchor-position").is_err());
    }
}
