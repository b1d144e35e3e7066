//! Durable key-value stores for serialized state.
//!
//! Values are raw strings (normally JSON documents), one per key.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::error::{DeckError, DeckResult};

/// A string key-value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> DeckResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> DeckResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> DeckResult<()>;

    /// Every stored key, sorted.
    fn keys(&self) -> DeckResult<Vec<String>>;

    /// Check that `key` can be stored. Accepts every key by default.
    fn check_key(&self, _key: &str) -> DeckResult<()> {
        Ok(())
    }

    /// Remove every key.
    fn clear(&mut self) -> DeckResult<()> {
        for key in self.keys()? {
            self.remove(&key)?;
        }
        Ok(())
    }
}

/// In-memory store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> DeckResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> DeckResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DeckResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> DeckResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn clear(&mut self) -> DeckResult<()> {
        self.entries.clear();
        Ok(())
    }
}

/// Directory-backed store: each key is a `<key>.json` file.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

const EXTENSION: &str = "json";

impl FileStore {
    /// Open a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve `key` to its file inside the store directory.
    fn path_for(&self, key: &str) -> DeckResult<PathBuf> {
        self.check_key(key)?;
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }

    fn ensure_dir(&self) -> DeckResult<()> {
        if !self.dir.exists() {
            log::info!("Creating store directory {:?}", self.dir);
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> DeckResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> DeckResult<()> {
        let path = self.path_for(key)?;
        self.ensure_dir()?;
        fs::write(path, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DeckResult<()> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn keys(&self) -> DeckResult<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut keys = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Keys become file names: no separators, no `.`/`..`, no NUL.
    fn check_key(&self, key: &str) -> DeckResult<()> {
        let bad = key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\', '\0'])
            || Path::new(key).is_absolute();
        if bad {
            return Err(DeckError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(())
    }
}
