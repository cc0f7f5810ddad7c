//! File-backed store: one JSON file per key

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::Result;
use crate::{KvStore, validate_key};

const LOCK_FILE: &str = ".lock";
const VALUE_EXT: &str = "json";

/// Store that keeps each key in `{base_path}/{key}.json`
///
/// Writes go to a temporary file that is renamed over the old value, so a
/// reader never observes a half-written document. An exclusive advisory lock
/// serializes writers from separate processes.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Open or create a store at the given directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        debug!(?base_path, "Opened board store");
        Ok(Self { base_path })
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.{}", key, VALUE_EXT))
    }

    fn lock(&self) -> Result<File> {
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.base_path.join(LOCK_FILE))?;
        FileExt::lock_exclusive(&lock)?;
        Ok(lock)
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let path = self.value_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!(%key, bytes = content.len(), "FileStore::get: hit");
                Ok(Some(content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(%key, "FileStore::get: miss");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let lock = self.lock()?;

        let path = self.value_path(key);
        let tmp_path = self.base_path.join(format!(".{}.{}.tmp", key, VALUE_EXT));
        {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(value.as_bytes())?;
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, &path)?;

        FileExt::unlock(&lock)?;
        debug!(%key, bytes = value.len(), "FileStore::put: written");
        Ok(())
    }
}
