//! Audio assembly and the store-or-deliver step
//!
//! Turns a synthesis result into one playable byte sequence, then
//! tries to make it durable. Storage failure downgrades durability,
//! never correctness: the caller always gets playable audio.

use crate::error::StorageError;
use crate::store::{AssetStore, StoredAsset};
use bytes::{Bytes, BytesMut};
use readaloud_core::{DocumentCatalog, Error as CoreError, Result as CoreResult};
use readaloud_speech::{ChunkOutcome, SynthesisResult};
use tracing::{info, warn};
use uuid::Uuid;

/// Where assembled audio should live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageTarget {
    /// Persist against a catalog document and update its metadata.
    Document(Uuid),
    /// No durable record; deliver the bytes directly.
    Ephemeral,
}

/// Outcome of the store-or-deliver step.
#[derive(Debug, Clone)]
pub enum StoreOutcome {
    Persisted { asset: StoredAsset },
    Delivered { audio: Bytes },
}

impl StoreOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self, StoreOutcome::Persisted { .. })
    }
}

/// Concatenate successful chunk audio in chunk-index order.
///
/// Failed chunks are skipped with a warning; they already carry their
/// reason in the synthesis result. Zero successful chunks is the one
/// unrecoverable case.
pub fn assemble_streamed(chunks: &[ChunkOutcome]) -> Result<Bytes, StorageError> {
    let mut audio = BytesMut::new();
    let mut skipped = 0usize;

    for outcome in chunks {
        match outcome {
            ChunkOutcome::Synthesized { audio: part, .. } => audio.extend_from_slice(part),
            ChunkOutcome::Failed { index, reason } => {
                warn!(index, %reason, "skipping failed chunk during assembly");
                skipped += 1;
            }
        }
    }

    if audio.is_empty() {
        return Err(StorageError::NoAudio(format!(
            "all {} chunks failed synthesis",
            chunks.len()
        )));
    }
    if skipped > 0 {
        warn!(
            skipped,
            total = chunks.len(),
            "assembled audio has gaps from failed chunks"
        );
    }
    Ok(audio.freeze())
}

/// Persist synthesized audio against its target, falling back to
/// direct delivery when storage fails.
///
/// On the fallback path the catalog entry is left untouched; the
/// failure is logged, not reported, and the caller still receives
/// playable audio.
pub async fn store_or_deliver<C: DocumentCatalog>(
    catalog: &C,
    store: &dyn AssetStore,
    target: StorageTarget,
    result: &SynthesisResult,
) -> CoreResult<StoreOutcome> {
    let language = result.language().to_string();
    let audio = match result {
        SynthesisResult::Merged(clip) => clip.audio.clone(),
        SynthesisResult::Streamed { chunks, .. } => {
            assemble_streamed(chunks).map_err(CoreError::from)?
        }
    };

    let document_id = match target {
        StorageTarget::Document(id) => id,
        StorageTarget::Ephemeral => {
            info!(bytes = audio.len(), "delivering ephemeral audio");
            return Ok(StoreOutcome::Delivered { audio });
        }
    };

    // Unique per request so concurrent runs against the same document
    // never collide on the asset name.
    let name = format!("{}_{}_audiobook.mp3", document_id, Uuid::new_v4().simple());

    match store.put(&name, audio.clone()).await {
        Ok(asset) => {
            let narrator = format!("synthesized ({})", language);
            catalog
                .update_audio(document_id, &asset.reference, &narrator)
                .await?;
            info!(
                document_id = %document_id,
                reference = %asset.reference,
                bytes = asset.bytes_written,
                "audio persisted and catalog updated"
            );
            Ok(StoreOutcome::Persisted { asset })
        }
        Err(e) => {
            warn!(
                document_id = %document_id,
                error = %e,
                "storage failed, falling back to direct delivery"
            );
            Ok(StoreOutcome::Delivered { audio })
        }
    }
}
