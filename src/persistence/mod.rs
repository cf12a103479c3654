//! JSON storage backends
//!
//! Features:
//! - `ScoreStore` seam so the leaderboard never touches the filesystem itself
//! - Atomic file writes (tmp → rename)
//! - In-memory store for tests and headless runs

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::highscores::ScoreRecord;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the leaderboard lives between sessions
pub trait ScoreStore {
    /// Stored records. An absent store is an empty table, not an error.
    fn load(&self) -> Result<Vec<ScoreRecord>, PersistenceError>;
    fn save(&self, records: &[ScoreRecord]) -> Result<(), PersistenceError>;
}

/// Leaderboard stored as a JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<Vec<ScoreRecord>, PersistenceError> {
        Ok(load_json::<Vec<ScoreRecord>>(&self.path)?.unwrap_or_default())
    }

    fn save(&self, records: &[ScoreRecord]) -> Result<(), PersistenceError> {
        save_json(&self.path, records)
    }
}

/// Keeps the serialized table in memory. Goes through JSON so it behaves
/// like the file store, corrupt contents included.
#[derive(Debug, Default)]
pub struct MemoryStore {
    json: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with raw contents, valid or not
    pub fn with_contents(json: impl Into<String>) -> Self {
        Self {
            json: RefCell::new(Some(json.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.json.borrow().clone()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Vec<ScoreRecord>, PersistenceError> {
        match self.json.borrow().as_deref() {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, records: &[ScoreRecord]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(records)?;
        *self.json.borrow_mut() = Some(json);
        Ok(())
    }
}

/// Read and parse `path`. `Ok(None)` when the file does not exist.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&text)?))
}

/// Write `value` to `path` via a temporary sibling and a rename
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<ScoreRecord> {
        vec![
            ScoreRecord::new("ada", 300),
            ScoreRecord::new("bob", 120),
        ]
    }

    #[test]
    fn test_file_store_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("scores.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("scores.json"));
        store.save(&records()).unwrap();
        assert_eq!(store.load().unwrap(), records());
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_file_store_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "{ not json").unwrap();
        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, PersistenceError::Json(_)));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());
        store.save(&records()).unwrap();
        assert_eq!(store.load().unwrap(), records());
        assert!(store.contents().unwrap().contains("ada"));

        let bad = MemoryStore::with_contents("[1, 2");
        assert!(bad.load().is_err());
    }
}
