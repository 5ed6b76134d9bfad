//! File-backed progress store.
//!
//! Each key maps to `<dir>/<key>.json`. Writes go through a temp file and a
//! rename so a crash never leaves a half-written blob behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::ProgressStore;

/// Error type for the file store.
#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    /// Key cannot be used as a file name.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
    /// Filesystem failure.
    #[error("Storage I/O failed for key {key}: {source}")]
    Io {
        /// Key being read or written.
        key: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Progress store writing one file per key into a directory.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    dir: PathBuf,
}

impl FileProgressStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, FileStoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(FileStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl ProgressStore for FileProgressStore {
    type Error = FileStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FileStoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key)?;
        let io_err = |source| FileStoreError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;

        tracing::debug!(key, path = %path.display(), bytes = value.len(), "Progress written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProgressStore::new(dir.path());
        assert_eq!(store.get("gloomhavenScenarioTree").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProgressStore::new(dir.path().join("nested"));

        store.set("gloomhavenScenarioTree", "{\"nodes\":[],\"version\":\"2\"}").unwrap();
        assert_eq!(
            store.get("gloomhavenScenarioTree").unwrap().as_deref(),
            Some("{\"nodes\":[],\"version\":\"2\"}")
        );
        assert!(dir.path().join("nested/gloomhavenScenarioTree.json").exists());
        assert!(!dir.path().join("nested/gloomhavenScenarioTree.json.tmp").exists());
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProgressStore::new(dir.path());
        for key in ["", "../escape", ".hidden", "a/b"] {
            assert!(matches!(store.set(key, "x"), Err(FileStoreError::InvalidKey(_))));
        }
    }
}
