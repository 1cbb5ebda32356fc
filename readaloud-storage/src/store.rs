//! Asset store capability and implementations
//!
//! [`FsAssetStore`] is the durable backend. Writes go through a
//! uniquely named temporary file in the target directory and are
//! renamed into place, so a crashed or failed write never leaves a
//! partial asset visible; the temporary file is removed on every exit
//! path by its drop guard.

use crate::error::StorageError;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A durably stored audio asset.
#[derive(Debug, Clone)]
pub struct StoredAsset {
    /// Stable reference callers hand back to retrieve the asset, e.g.
    /// `audiobooks/<name>`.
    pub reference: String,
    pub path: PathBuf,
    pub bytes_written: usize,
}

/// Capability interface for durable audio storage.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn put(&self, name: &str, data: Bytes) -> Result<StoredAsset, StorageError>;
}

/// Filesystem-backed store rooted at a media directory.
pub struct FsAssetStore {
    root: PathBuf,
    subdir: String,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            subdir: "audiobooks".to_string(),
        }
    }

    fn asset_dir(&self) -> PathBuf {
        self.root.join(&self.subdir)
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn put(&self, name: &str, data: Bytes) -> Result<StoredAsset, StorageError> {
        let dir = self.asset_dir();
        let final_path = dir.join(name);
        let reference = format!("{}/{}", self.subdir, name);
        let len = data.len();

        let written_path = tokio::task::spawn_blocking(move || {
            write_via_temp(&dir, &final_path, &data)
        })
        .await
        .map_err(|e| StorageError::Unavailable(format!("storage task failed: {}", e)))??;

        debug!(path = %written_path.display(), bytes = len, "asset stored");
        Ok(StoredAsset {
            reference,
            path: written_path,
            bytes_written: len,
        })
    }
}

fn write_via_temp(dir: &Path, final_path: &Path, data: &[u8]) -> Result<PathBuf, StorageError> {
    let write_err = |reason: String| StorageError::Write {
        path: final_path.to_path_buf(),
        reason,
    };

    std::fs::create_dir_all(dir).map_err(|e| write_err(e.to_string()))?;

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
    temp.write_all(data).map_err(|e| write_err(e.to_string()))?;
    temp.flush().map_err(|e| write_err(e.to_string()))?;
    // On persist failure the temp file is handed back and its drop
    // guard removes it.
    temp.persist(final_path)
        .map_err(|e| write_err(e.error.to_string()))?;

    Ok(final_path.to_path_buf())
}

/// In-memory store for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryAssetStore {
    assets: RwLock<HashMap<String, Bytes>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, reference: &str) -> Option<Bytes> {
        self.assets.read().get(reference).cloned()
    }

    pub fn len(&self) -> usize {
        self.assets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.read().is_empty()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn put(&self, name: &str, data: Bytes) -> Result<StoredAsset, StorageError> {
        let reference = format!("audiobooks/{}", name);
        let len = data.len();
        self.assets.write().insert(reference.clone(), data);
        Ok(StoredAsset {
            reference,
            path: PathBuf::from(name),
            bytes_written: len,
        })
    }
}

/// Store that rejects every write, for exercising the delivery
/// fallback.
pub struct FailingAssetStore {
    reason: String,
}

impl FailingAssetStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl AssetStore for FailingAssetStore {
    async fn put(&self, name: &str, _data: Bytes) -> Result<StoredAsset, StorageError> {
        Err(StorageError::Write {
            path: PathBuf::from(name),
            reason: self.reason.clone(),
        })
    }
}
