//! Directory-backed key-value store, the local-storage tier.
//!
//! Each key is one `<key>.json` file. Writes go to a temporary sibling first
//! and are renamed into place, so a reader never sees a half-written table.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use tutorias_core::kv::{KeyValueStore, Result, StoreError};

const PROBE_FILE: &str = ".probe";

fn map_io_error(action: &str, path: &Path, err: std::io::Error) -> StoreError {
    StoreError::OperationFailed(format!("Failed to {action} {}: {err}", path.display()))
}

/// Key-value store keeping one JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Opens the store, creating the directory when needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ConnectionFailed` if the directory cannot be
    /// created or written to.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            StoreError::ConnectionFailed(format!("Cannot create {}: {e}", dir.display()))
        })?;

        let probe = dir.join(PROBE_FILE);
        tokio::fs::write(&probe, b"ok").await.map_err(|e| {
            StoreError::ConnectionFailed(format!("Cannot write to {}: {e}", dir.display()))
        })?;
        tokio::fs::remove_file(&probe)
            .await
            .map_err(|e| map_io_error("remove", &probe, e))?;

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::OperationFailed(format!("Invalid key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for LocalStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io_error("read", &path, e)),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        tokio::fs::write(&tmp, value.as_bytes())
            .await
            .map_err(|e| map_io_error("write", &tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| map_io_error("replace", &path, e))
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io_error("remove", &path, e)),
        }
    }
}
