use readaloud_core::Error as CoreError;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Extraction errors
///
/// These are the request-fatal conditions only; per-page faults are
/// absorbed into [`crate::PageOutcome`] values.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("document file missing at {path}")]
    AssetMissing { path: PathBuf },

    #[error("failed to open document at {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("no readable text")]
    NoReadableText,
}

impl ExtractError {
    /// Attach the owning document id, producing the core taxonomy error.
    pub fn into_core(self, id: Uuid) -> CoreError {
        match self {
            ExtractError::AssetMissing { path } => CoreError::AssetMissing { id, path },
            ExtractError::Open { path, reason } => CoreError::OpenFailed { id, path, reason },
            ExtractError::NoReadableText => CoreError::NoReadableText { id },
        }
    }
}
