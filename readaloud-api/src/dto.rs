//! Response shapes handed back to transport layers.

use chrono::{DateTime, Utc};
use readaloud_extract::ExtractionResult;
use readaloud_speech::{StreamStats, TextChunk};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Extraction response: the result plus the document it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractReport {
    pub document_id: Uuid,
    pub title: String,
    pub result: ExtractionResult,
    pub extracted_at: DateTime<Utc>,
}

/// Chunked text ready for client-side playback scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamedText {
    pub document_id: Uuid,
    pub language: String,
    pub chunks: Vec<TextChunk>,
    pub stats: StreamStats,
}

/// Outcome of full audiobook generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudiobookReport {
    pub document_id: Uuid,
    pub language: String,
    /// Asset reference when storage succeeded.
    pub asset: Option<String>,
    /// Raw audio when storage failed and the bytes were delivered
    /// directly. Serialized as base64 by serde_bytes-free callers; kept
    /// out of the JSON body here.
    #[serde(skip)]
    pub delivered: Option<DeliveredAudio>,
    pub truncated: bool,
    pub text_chars: usize,
    pub generated_at: DateTime<Utc>,
}

impl AudiobookReport {
    pub fn is_persisted(&self) -> bool {
        self.asset.is_some()
    }
}

/// Audio returned on the delivery fallback path.
#[derive(Debug, Clone)]
pub struct DeliveredAudio {
    pub audio: bytes::Bytes,
    pub content_type: &'static str,
}

impl DeliveredAudio {
    pub fn mp3(audio: bytes::Bytes) -> Self {
        Self {
            audio,
            content_type: "audio/mpeg",
        }
    }
}
