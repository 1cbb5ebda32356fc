//! Pipeline facade
//!
//! Request-scoped orchestration of extract, chunk, synthesize and
//! store. No mutable state is shared between invocations; the only
//! cross-request state is the catalog record, whose audio metadata
//! update is last-writer-wins.

use crate::dto::{AudiobookReport, DeliveredAudio, ExtractReport, StreamedText};
use chrono::Utc;
use readaloud_core::{
    validate_accessibility_config, AccessibilityLimits, DocumentCatalog, Error as CoreError,
    Result as CoreResult, SanitizedAccessibility,
};
use readaloud_extract::{extract, extract_preview, ExtractionResult, PageRange, PdfPageReader};
use readaloud_speech::{
    chunk_text, SpeechAdapter, SpeechLimits, StreamStats, SynthesisResult, TextChunk, TtsEngine,
    VoiceParameters, DEFAULT_MAX_CHUNK_CHARS,
};
use readaloud_storage::{store_or_deliver, AssetStore, StorageTarget, StoreOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// The document-to-audio pipeline.
pub struct AudiobookPipeline<C: DocumentCatalog> {
    catalog: Arc<C>,
    adapter: SpeechAdapter,
    store: Arc<dyn AssetStore>,
    accessibility: AccessibilityLimits,
    max_chunk_chars: usize,
}

impl<C: DocumentCatalog> AudiobookPipeline<C> {
    pub fn new(catalog: Arc<C>, engine: Arc<dyn TtsEngine>, store: Arc<dyn AssetStore>) -> Self {
        Self {
            catalog,
            adapter: SpeechAdapter::new(engine, SpeechLimits::default()),
            store,
            accessibility: AccessibilityLimits::default(),
            max_chunk_chars: DEFAULT_MAX_CHUNK_CHARS,
        }
    }

    pub fn with_max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.max_chunk_chars = max_chunk_chars.max(1);
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Extract text from a cataloged document, full or ranged.
    #[instrument(skip(self))]
    pub async fn extract_text(
        &self,
        document_id: Uuid,
        range: Option<PageRange>,
    ) -> CoreResult<ExtractReport> {
        let doc = self.catalog.fetch(document_id).await?;
        let result =
            run_extraction(document_id, doc.file_path.clone(), move |reader| {
                extract(reader, range)
            })
            .await?;

        info!(
            document_id = %document_id,
            pages = result.pages.len(),
            words = result.word_count,
            "text extracted"
        );
        Ok(ExtractReport {
            document_id,
            title: doc.title,
            result,
            extracted_at: Utc::now(),
        })
    }

    /// First-pages preview extraction.
    #[instrument(skip(self))]
    pub async fn extract_text_preview(&self, document_id: Uuid) -> CoreResult<ExtractReport> {
        let doc = self.catalog.fetch(document_id).await?;
        let result =
            run_extraction(document_id, doc.file_path.clone(), |reader| {
                extract_preview(reader)
            })
            .await?;
        Ok(ExtractReport {
            document_id,
            title: doc.title,
            result,
            extracted_at: Utc::now(),
        })
    }

    /// Boundary-safe chunking with the pipeline's configured bound.
    pub fn chunk(&self, text: &str, max_chunk_chars: Option<usize>) -> Vec<TextChunk> {
        chunk_text(text, max_chunk_chars.unwrap_or(self.max_chunk_chars))
    }

    /// Extract, chunk and synthesize a document's text.
    #[instrument(skip(self, params))]
    pub async fn synthesize(
        &self,
        document_id: Uuid,
        params: &VoiceParameters,
        streaming: bool,
    ) -> CoreResult<SynthesisResult> {
        let range = params.page_range.map(|(s, e)| PageRange::new(s, e));
        let report = self.extract_text(document_id, range).await?;
        let chunks = self.chunk(&report.result.text, None);
        let result = self.adapter.synthesize(&chunks, params, streaming).await?;
        Ok(result)
    }

    /// Persist a synthesis result against its target, or fall back to
    /// direct delivery.
    pub async fn store_or_deliver(
        &self,
        result: &SynthesisResult,
        target: StorageTarget,
    ) -> CoreResult<StoreOutcome> {
        store_or_deliver(self.catalog.as_ref(), self.store.as_ref(), target, result).await
    }

    /// Full pipeline: extract, synthesize merged audio, persist it (or
    /// fall back to delivery) and report what happened.
    #[instrument(skip(self, params))]
    pub async fn generate_audiobook(
        &self,
        document_id: Uuid,
        params: &VoiceParameters,
    ) -> CoreResult<AudiobookReport> {
        let result = self.synthesize(document_id, params, false).await?;
        let SynthesisResult::Merged(ref clip) = result else {
            return Err(CoreError::Config(
                "audiobook generation requires merged synthesis".to_string(),
            ));
        };
        let (truncated, text_chars) = (clip.truncated, clip.text_len);

        let outcome = store_or_deliver(
            self.catalog.as_ref(),
            self.store.as_ref(),
            StorageTarget::Document(document_id),
            &result,
        )
        .await?;

        let (asset, delivered) = match outcome {
            StoreOutcome::Persisted { asset } => (Some(asset.reference), None),
            StoreOutcome::Delivered { audio } => (None, Some(DeliveredAudio::mp3(audio))),
        };

        Ok(AudiobookReport {
            document_id,
            language: result.language().to_string(),
            asset,
            delivered,
            truncated,
            text_chars,
            generated_at: Utc::now(),
        })
    }

    /// Extract and chunk a document for client-side streaming playback,
    /// without synthesizing anything.
    #[instrument(skip(self, params))]
    pub async fn stream_text(
        &self,
        document_id: Uuid,
        params: &VoiceParameters,
    ) -> CoreResult<StreamedText> {
        let range = params.page_range.map(|(s, e)| PageRange::new(s, e));
        let report = self.extract_text(document_id, range).await?;
        let chunks = self.chunk(&report.result.text, None);
        let stats = StreamStats::for_chunks(&chunks);
        let language = self.adapter.limits().resolve_language(&params.language);

        Ok(StreamedText {
            document_id,
            language,
            chunks,
            stats,
        })
    }

    /// Sanitize an untyped accessibility settings mapping.
    pub fn validate_accessibility(
        &self,
        settings: &serde_json::Value,
    ) -> CoreResult<SanitizedAccessibility> {
        validate_accessibility_config(settings, &self.accessibility)
    }
}

/// PDF parsing is CPU-bound and lopdf is synchronous, so extraction
/// runs on the blocking pool.
async fn run_extraction<F>(
    document_id: Uuid,
    path: PathBuf,
    op: F,
) -> CoreResult<ExtractionResult>
where
    F: FnOnce(&PdfPageReader) -> Result<ExtractionResult, readaloud_extract::ExtractError>
        + Send
        + 'static,
{
    tokio::task::spawn_blocking(move || {
        let reader = PdfPageReader::open(&path)?;
        op(&reader)
    })
    .await
    .map_err(|e| CoreError::Io(std::io::Error::other(e)))?
    .map_err(|e| e.into_core(document_id))
}
