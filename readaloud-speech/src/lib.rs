//! readaloud-speech: chunking and parameterized speech synthesis
//!
//! Provides text-to-speech for extracted document text:
//! - boundary-safe text chunking sized for single synthesis calls
//! - validated voice parameters with an allow-listed language set
//! - a pluggable [`TtsEngine`] capability interface with an HTTP-backed
//!   engine and a scriptable stub for tests
//! - a synthesis adapter with merged (all-or-nothing) and streamed
//!   (per-chunk fault isolation) modes

pub mod adapter;
pub mod chunker;
pub mod engines;
pub mod error;
pub mod params;

pub use adapter::{AudioClip, ChunkOutcome, SpeechAdapter, StreamStats, SynthesisResult};
pub use chunker::{chunk_text, TextChunk, DEFAULT_MAX_CHUNK_CHARS, LISTENING_WORDS_PER_MINUTE};
pub use engines::{HttpTtsEngine, StubTtsEngine, TtsEngine, VoiceSelection};
pub use error::SpeechError;
pub use params::{
    HttpEngineConfig, RetryConfig, SpeechLimits, VoiceParameters, DEFAULT_MAX_SYNTHESIS_CHARS,
};
