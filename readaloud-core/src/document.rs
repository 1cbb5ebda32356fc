//! Source document records and the external catalog seam

use crate::error::{Error, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

/// A catalog record for a paginated document.
///
/// Owned and persisted by the surrounding catalog service; the pipeline
/// only reads `file_path` and asks the catalog to update the audio
/// metadata after a successful synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    /// Byte-addressable backing file (the PDF on disk).
    pub file_path: PathBuf,
    /// Pointer to an existing audio asset, if one was generated before.
    pub audio_path: Option<String>,
    /// Narrator label shown to listeners.
    pub narrator: Option<String>,
    pub has_audio: bool,
}

impl SourceDocument {
    pub fn new(title: impl Into<String>, author: impl Into<String>, file_path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            author: author.into(),
            file_path,
            audio_path: None,
            narrator: None,
            has_audio: false,
        }
    }
}

/// External document catalog.
///
/// The pipeline never owns document records; it fetches them by id and
/// requests one metadata update per successful persistence. Concurrent
/// updates against the same record are last-writer-wins.
#[async_trait]
pub trait DocumentCatalog: Send + Sync {
    async fn fetch(&self, id: Uuid) -> Result<SourceDocument>;

    /// Record a generated audio asset on the document: sets the asset
    /// pointer, the narrator label, and the has-audio flag in one update.
    async fn update_audio(&self, id: Uuid, asset: &str, narrator: &str) -> Result<()>;
}

/// In-memory catalog used in tests and examples.
pub struct MemoryCatalog {
    docs: RwLock<HashMap<Uuid, SourceDocument>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, doc: SourceDocument) -> Uuid {
        let id = doc.id;
        self.docs.write().insert(id, doc);
        id
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentCatalog for MemoryCatalog {
    async fn fetch(&self, id: Uuid) -> Result<SourceDocument> {
        self.docs
            .read()
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound { id })
    }

    async fn update_audio(&self, id: Uuid, asset: &str, narrator: &str) -> Result<()> {
        let mut docs = self.docs.write();
        let doc = docs.get_mut(&id).ok_or(Error::NotFound { id })?;
        doc.audio_path = Some(asset.to_string());
        doc.narrator = Some(narrator.to_string());
        doc.has_audio = true;
        Ok(())
    }
}
