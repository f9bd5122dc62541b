use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::backend::interface::{KeyValueStore, BackendError, Result};

/// Volatile store, mostly for tests. Writes can be made to fail on
/// demand to exercise the persistence error path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn with_entry(key: &str, value: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store.entries().insert(key.to_owned(), value.to_owned());
        return store;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // a panic while holding the lock cannot leave a map half-updated
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("writes disabled".to_owned()));
        }
        return Ok(());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.entries().insert(key.to_owned(), value.to_owned());
        return Ok(());
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.entries().remove(key);
        return Ok(());
    }
}
