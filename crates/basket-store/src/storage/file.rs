//! # File Storage
//!
//! Keeps each record in `<dir>/<key>.json`.
//!
//! ## Write Path
//! ```text
//! set_item("mangaCart", json)
//!      │
//!      ├── create <dir> if missing
//!      ├── write  <dir>/.mangaCart.json.tmp
//!      └── rename → <dir>/mangaCart.json   (readers never see half a file)
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::storage::Storage;

/// Directory-backed record store.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    /// Directory holding the record files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path of a record.
    ///
    /// Keys are limited to letters, digits, `-`, `_` and `.` (not leading)
    /// so a key can never point outside the directory.
    pub fn record_path(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.record_path(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(?path, "No stored record");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.record_path(key)?;
        let tmp = self.dir.join(format!(".{}.json.tmp", key));

        fs::create_dir_all(&self.dir)?;
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        debug!(?path, bytes = value.len(), "Record written");
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StoreResult<()> {
        let path = self.record_path(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
