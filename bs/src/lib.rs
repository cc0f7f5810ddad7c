//! BoardStore - durable key-value store for board snapshots
//!
//! Each key holds one JSON document. Writers replace the whole value; there
//! are no partial updates and no transactions across keys.
//!
//! # Architecture
//!
//! ```text
//! {store_dir}/
//! ├── .lock                  # advisory lock held during writes
//! ├── board-snapshot.json
//! └── bin-snapshot.json
//! ```
//!
//! # Example
//!
//! ```ignore
//! use boardstore::{FileStore, KvStore, read_json, write_json};
//!
//! let store = FileStore::open(".taskboard")?;
//! write_json(&store, "board-snapshot", &board)?;
//! let board: Option<Board> = read_json(&store, "board-snapshot")?;
//! ```

mod error;
mod file;
mod memory;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A durable string-valued key-value store
///
/// Implementations must be safe to share between the task that mutates state
/// and the background task that persists it.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn put(&self, key: &str, value: &str) -> Result<()>;
}

/// Read and deserialize the JSON document under `key`
///
/// Returns `Ok(None)` when the key is absent and `Err(StoreError::Json)` when
/// the stored value does not parse as `T`.
pub fn read_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize `value` as JSON and store it under `key`
pub fn write_json<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.put(key, &raw)
}

/// Keys are used as file names, so only a conservative character set is allowed
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
