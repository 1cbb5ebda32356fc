//! TTS engine implementations

pub mod http;
pub mod stub;

use crate::error::SpeechError;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub use http::HttpTtsEngine;
pub use stub::{StubCall, StubTtsEngine};

/// Resolved voice for one engine call: the language after allow-list
/// fallback, the clamped speed, and whether the engine should use its
/// slow synthesis mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceSelection {
    pub language: String,
    pub speed: f32,
    pub slow: bool,
}

/// Capability interface for speech synthesis backends.
#[async_trait]
pub trait TtsEngine: Send + Sync {
    /// Synthesize text to audio bytes.
    async fn synthesize(&self, text: &str, voice: &VoiceSelection) -> Result<Bytes, SpeechError>;

    /// Check if the engine can be reached/used at all.
    fn is_available(&self) -> bool;

    /// Engine name for diagnostics.
    fn name(&self) -> &str;
}
