use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Unified error taxonomy for the conversion pipeline.
///
/// Per-page and per-chunk faults are never represented here: they are
/// absorbed into result values (`PageOutcome`, `ChunkOutcome`) by the
/// components that produce them. Only request-fatal conditions surface
/// as `Error`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("document not found: {id}")]
    NotFound { id: Uuid },

    #[error("document {id} has no backing file at {path}")]
    AssetMissing { id: Uuid, path: PathBuf },

    #[error("failed to open document {id} at {path}: {reason}")]
    OpenFailed {
        id: Uuid,
        path: PathBuf,
        reason: String,
    },

    #[error("no readable text in document {id}")]
    NoReadableText { id: Uuid },

    #[error("speech engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("synthesis failed (language {language}, speed {speed}, {text_len} chars): {reason}")]
    SynthesisFailed {
        language: String,
        speed: f32,
        text_len: usize,
        reason: String,
    },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
