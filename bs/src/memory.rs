//! In-memory store for tests and ephemeral boards

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tracing::debug;

use crate::error::{Result, StoreError};
use crate::{KvStore, validate_key};

/// Process-local store backed by a `HashMap`
///
/// Counts writes and can be switched into a failing mode so callers can
/// exercise their handling of storage errors.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail with `StoreError::Unavailable`
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn values(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.values()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.check_writable()?;
        self.values()?.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(%key, bytes = value.len(), "MemoryStore::put");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_put_get() {
        let store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());

        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert!(store.get("other").unwrap().is_none());
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_fail_writes() {
        let store = MemoryStore::new();
        store.put("k", "v").unwrap();

        store.set_fail_writes(true);
        assert!(matches!(store.put("k", "w"), Err(StoreError::Unavailable(_))));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.set_fail_writes(false);
        store.put("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
        assert_eq!(store.write_count(), 2);
    }
}
