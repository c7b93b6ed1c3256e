//! # File-backed Record Store
//!
//! One JSON file per record at `<base_dir>/<collection>/<id>.json`.
//! The file is the only source of truth: there is no index or manifest.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::errors::{StoreError, StoreResult};

const RECORD_EXTENSION: &str = "json";

/// Durable per-record storage scoped by (collection, id)
#[derive(Debug, Clone)]
pub struct RecordStore {
    base_dir: PathBuf,
}

impl RecordStore {
    /// Create a store rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Root directory of the store
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create the directory backing a collection if it is missing
    pub async fn ensure_collection(&self, collection: &str) -> StoreResult<()> {
        validate_key(collection)?;
        fs::create_dir_all(self.base_dir.join(collection))
            .await
            .map_err(|e| StoreError::Write(format!("Could not create collection {collection}: {e}")))
    }

    /// Write a new record, failing if one already exists at that address
    pub async fn create<T>(&self, collection: &str, id: &str, payload: &T) -> StoreResult<()>
    where
        T: Serialize + ?Sized,
    {
        let path = self.record_path(collection, id)?;
        let content = serialize(payload)?;
        self.ensure_collection(collection).await?;

        // create_new gives exclusive-create: concurrent creators race here and only one wins
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => StoreError::already_exists(collection, id),
                _ => StoreError::Write(format!(
                    "Could not create new file, it may already exist: {e}"
                )),
            })?;

        write_and_close(file, &content, "new").await
    }

    /// Read the raw JSON text of a record
    pub async fn read(&self, collection: &str, id: &str) -> StoreResult<String> {
        let path = self.record_path(collection, id)?;

        fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::not_found(collection, id)
            } else {
                StoreError::Read(e.to_string())
            }
        })
    }

    /// Replace the content of an existing record
    pub async fn update<T>(&self, collection: &str, id: &str, payload: &T) -> StoreResult<()>
    where
        T: Serialize + ?Sized,
    {
        let path = self.record_path(collection, id)?;
        let content = serialize(payload)?;

        let file = OpenOptions::new()
            .write(true)
            .open(&path)
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    StoreError::not_found(collection, id)
                } else {
                    StoreError::Write(format!("Could not open the file for updating: {e}"))
                }
            })?;

        file.set_len(0)
            .await
            .map_err(|e| StoreError::Write(format!("Error truncating file: {e}")))?;

        write_and_close(file, &content, "existing").await
    }

    /// Remove a record
    pub async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let path = self.record_path(collection, id)?;

        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::not_found(collection, id)
            } else {
                StoreError::Delete(e.to_string())
            }
        })
    }

    fn record_path(&self, collection: &str, id: &str) -> StoreResult<PathBuf> {
        validate_key(collection)?;
        validate_key(id)?;

        Ok(self
            .base_dir
            .join(collection)
            .join(format!("{id}.{RECORD_EXTENSION}")))
    }
}

/// Keys become path components, so only a conservative alphabet is allowed
fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

fn serialize<T: Serialize + ?Sized>(payload: &T) -> StoreResult<String> {
    serde_json::to_string(payload).map_err(|e| StoreError::Serialize(e.to_string()))
}

async fn write_and_close(mut file: File, content: &str, which: &str) -> StoreResult<()> {
    file.write_all(content.as_bytes())
        .await
        .map_err(|e| StoreError::Write(format!("Error writing to {which} file: {e}")))?;

    let close_error = |e: std::io::Error| StoreError::Write(format!("Error closing {which} file: {e}"));
    file.flush().await.map_err(close_error)?;
    file.sync_all().await.map_err(close_error)
}
