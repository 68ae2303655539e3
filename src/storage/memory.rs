//! In-memory storage

use std::cell::Cell;

use rustc_hash::FxHashMap;

use super::{Storage, StorageError};

/// Process-local storage, used in tests and for carts that need not outlive the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: FxHashMap<String, String>,
    reads: Cell<usize>,
    writes: usize,
}

impl MemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-populated with a single entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = FxHashMap::default();
        entries.insert(key.into(), value.into());

        Self {
            entries,
            ..Self::default()
        }
    }

    /// Number of `get` calls made so far.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Number of `set` calls made so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Returns the raw value under `key`.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.reads.set(self.reads.get() + 1);

        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes += 1;
        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);

        Ok(())
    }
}
