//! Local persistence of the sequence library.
//!
//! The whole library is stored as one JSON document under a fixed key. A
//! corrupt document is logged and treated as an empty library.

use crate::error::StoreError;
use crate::models::Sequence;
use dashmap::DashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key the library document is stored under.
pub const LIBRARY_KEY: &str = "drone-light-sequences";

/// Minimal string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        // Atomic replace: readers see the old or the new document, never half.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Load the library, recovering to empty on missing or corrupt data.
pub fn load_library<S: KeyValueStore + ?Sized>(store: &S) -> Vec<Sequence> {
    let raw = match store.get(LIBRARY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!("Failed to read saved sequences: {}", err);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Sequence>>(&raw) {
        Ok(sequences) => {
            tracing::debug!("Loaded {} saved sequences", sequences.len());
            sequences.iter().map(Sequence::normalized).collect()
        }
        Err(err) => {
            tracing::warn!("Saved sequences are corrupt, starting empty: {}", err);
            Vec::new()
        }
    }
}

/// Store the whole library as one document.
pub fn save_library<S: KeyValueStore + ?Sized>(
    store: &S,
    sequences: &[Sequence],
) -> Result<(), StoreError> {
    let json = serde_json::to_string(sequences)?;
    store.set(LIBRARY_KEY, &json)
}
