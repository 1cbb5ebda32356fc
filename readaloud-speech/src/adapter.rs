//! Speech synthesis adapter
//!
//! Turns chunks plus voice parameters into audio. Two modes:
//! merged (one all-or-nothing call over concatenated, length-capped
//! text) and streamed (independent per-chunk calls whose failures are
//! absorbed into the result instead of aborting siblings).

use crate::chunker::TextChunk;
use crate::engines::{TtsEngine, VoiceSelection};
use crate::error::SpeechError;
use crate::params::{SpeechLimits, VoiceParameters};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Marker appended when merged-mode text is truncated at max_chars.
const TRUNCATION_MARKER: &str = "...";

/// Audio produced by one merged synthesis call.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub audio: Bytes,
    pub language: String,
    pub text_len: usize,
    pub truncated: bool,
}

/// Per-chunk outcome in streamed mode.
#[derive(Debug, Clone)]
pub enum ChunkOutcome {
    Synthesized { index: usize, audio: Bytes },
    Failed { index: usize, reason: String },
}

impl ChunkOutcome {
    pub fn index(&self) -> usize {
        match self {
            ChunkOutcome::Synthesized { index, .. } | ChunkOutcome::Failed { index, .. } => *index,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ChunkOutcome::Failed { .. })
    }
}

/// Result of a synthesis request.
#[derive(Debug, Clone)]
pub enum SynthesisResult {
    Merged(AudioClip),
    Streamed {
        language: String,
        chunks: Vec<ChunkOutcome>,
    },
}

impl SynthesisResult {
    pub fn language(&self) -> &str {
        match self {
            SynthesisResult::Merged(clip) => &clip.language,
            SynthesisResult::Streamed { language, .. } => language,
        }
    }
}

/// Stats describing a chunked streaming request, reported to callers
/// alongside the chunk list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamStats {
    pub total_chunks: usize,
    pub total_words: usize,
    pub estimated_total_duration_minutes: f64,
}

impl StreamStats {
    pub fn for_chunks(chunks: &[TextChunk]) -> Self {
        Self {
            total_chunks: chunks.len(),
            total_words: chunks
                .iter()
                .map(|c| c.text.split_whitespace().count())
                .sum(),
            estimated_total_duration_minutes: chunks
                .iter()
                .map(|c| c.estimated_duration_minutes)
                .sum(),
        }
    }
}

/// Synthesis adapter over a pluggable engine.
pub struct SpeechAdapter {
    engine: Arc<dyn TtsEngine>,
    limits: SpeechLimits,
}

impl SpeechAdapter {
    pub fn new(engine: Arc<dyn TtsEngine>, limits: SpeechLimits) -> Self {
        Self { engine, limits }
    }

    pub fn limits(&self) -> &SpeechLimits {
        &self.limits
    }

    /// Synthesize chunks with the given parameters.
    ///
    /// Speed clamping is normally the settings validator's job; it is
    /// repeated here for direct callers.
    pub async fn synthesize(
        &self,
        chunks: &[TextChunk],
        params: &VoiceParameters,
        streaming: bool,
    ) -> Result<SynthesisResult, SpeechError> {
        params.validate()?;

        if !self.engine.is_available() {
            return Err(SpeechError::EngineUnavailable(
                self.engine.name().to_string(),
            ));
        }

        let voice = self.resolve_voice(params);
        if streaming {
            Ok(self.synthesize_streamed(chunks, &voice).await)
        } else {
            self.synthesize_merged(chunks, params.max_chars, &voice)
                .await
        }
    }

    fn resolve_voice(&self, params: &VoiceParameters) -> VoiceSelection {
        let language = self.limits.resolve_language(&params.language);
        let speed = self.limits.clamp_speed(params.speed);
        VoiceSelection {
            language,
            speed,
            slow: speed < self.limits.slow_speed_threshold,
        }
    }

    async fn synthesize_merged(
        &self,
        chunks: &[TextChunk],
        max_chars: usize,
        voice: &VoiceSelection,
    ) -> Result<SynthesisResult, SpeechError> {
        let combined: String = chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        // Lossy governor for downstream service limits, not an error.
        let max_chars = max_chars.min(self.limits.max_text_len);
        let char_count = combined.chars().count();
        let (text, truncated) = if char_count > max_chars {
            debug!(char_count, max_chars, "truncating merged synthesis input");
            let mut text: String = combined.chars().take(max_chars).collect();
            text.push_str(TRUNCATION_MARKER);
            (text, true)
        } else {
            (combined, false)
        };

        if text.trim().is_empty() {
            return Err(self.synthesis_error(voice, 0, "no text to synthesize"));
        }

        let text_len = text.chars().count();
        let audio = self
            .engine
            .synthesize(&text, voice)
            .await
            .map_err(|e| self.synthesis_error(voice, text_len, &e.to_string()))?;

        info!(
            language = %voice.language,
            speed = voice.speed,
            text_len,
            audio_bytes = audio.len(),
            "merged synthesis complete"
        );

        Ok(SynthesisResult::Merged(AudioClip {
            audio,
            language: voice.language.clone(),
            text_len,
            truncated,
        }))
    }

    /// Streamed mode: chunks are synthesized concurrently; the result
    /// list is ordered by chunk index regardless of completion order,
    /// and a chunk's failure never aborts its siblings.
    async fn synthesize_streamed(
        &self,
        chunks: &[TextChunk],
        voice: &VoiceSelection,
    ) -> SynthesisResult {
        let tasks = chunks.iter().map(|chunk| {
            let engine = Arc::clone(&self.engine);
            let voice = voice.clone();
            let text = chunk.text.clone();
            let index = chunk.index;
            async move {
                match engine.synthesize(&text, &voice).await {
                    Ok(audio) => ChunkOutcome::Synthesized { index, audio },
                    Err(e) => {
                        warn!(index, error = %e, "chunk synthesis failed, continuing");
                        ChunkOutcome::Failed {
                            index,
                            reason: e.to_string(),
                        }
                    }
                }
            }
        });

        let mut outcomes = futures_util::future::join_all(tasks).await;
        outcomes.sort_by_key(|o| o.index());

        let failed = outcomes.iter().filter(|o| o.is_failed()).count();
        info!(
            total = outcomes.len(),
            failed,
            language = %voice.language,
            "streamed synthesis complete"
        );

        SynthesisResult::Streamed {
            language: voice.language.clone(),
            chunks: outcomes,
        }
    }

    fn synthesis_error(
        &self,
        voice: &VoiceSelection,
        text_len: usize,
        reason: &str,
    ) -> SpeechError {
        SpeechError::Synthesis {
            language: voice.language.clone(),
            speed: voice.speed,
            text_len,
            reason: reason.to_string(),
        }
    }
}
