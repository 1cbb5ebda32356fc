use readaloud_core::Error as CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Storage-side errors
///
/// A failed asset write is deliberately absent: it triggers the
/// delivery fallback inside [`crate::store_or_deliver`] and never
/// surfaces as an error to the caller.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Streamed synthesis produced no successful chunks at all, so
    /// there is nothing to store or deliver.
    #[error("no audio was produced: {0}")]
    NoAudio(String),

    #[error("failed to write asset {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("asset store unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        CoreError::Storage(err.to_string())
    }
}
