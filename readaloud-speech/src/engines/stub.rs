//! Scriptable stub engine
//!
//! Stands in for a real synthesis backend in tests: succeeds with
//! deterministic bytes, fails on selected inputs, or reports itself
//! unavailable. Records every call it receives.

use crate::engines::{TtsEngine, VoiceSelection};
use crate::error::SpeechError;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::sync::Arc;

type Responder = dyn Fn(&str, &VoiceSelection) -> Result<Bytes, SpeechError> + Send + Sync;

/// One recorded engine call.
#[derive(Debug, Clone)]
pub struct StubCall {
    pub text: String,
    pub voice: VoiceSelection,
}

pub struct StubTtsEngine {
    available: bool,
    responder: Arc<Responder>,
    calls: Arc<RwLock<Vec<StubCall>>>,
}

impl StubTtsEngine {
    /// Succeeds on every call with bytes derived from the input text.
    pub fn speaking() -> Self {
        Self::with_responder(|text, _| Ok(Bytes::from(format!("audio({})", text))))
    }

    /// Fails every call with the given reason.
    pub fn failing(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::with_responder(move |_, _| Err(SpeechError::Engine(reason.clone())))
    }

    /// Reports itself unavailable; never reaches the responder.
    pub fn unavailable() -> Self {
        let mut engine = Self::failing("engine not installed");
        engine.available = false;
        engine
    }

    /// Fails only for texts containing the given marker.
    pub fn failing_on(marker: impl Into<String>) -> Self {
        let marker = marker.into();
        Self::with_responder(move |text, _| {
            if text.contains(marker.as_str()) {
                Err(SpeechError::Engine(format!("rejected input: {}", marker)))
            } else {
                Ok(Bytes::from(format!("audio({})", text)))
            }
        })
    }

    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&str, &VoiceSelection) -> Result<Bytes, SpeechError> + Send + Sync + 'static,
    {
        Self {
            available: true,
            responder: Arc::new(responder),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.read().clone()
    }
}

#[async_trait]
impl TtsEngine for StubTtsEngine {
    async fn synthesize(&self, text: &str, voice: &VoiceSelection) -> Result<Bytes, SpeechError> {
        self.calls.write().push(StubCall {
            text: text.to_string(),
            voice: voice.clone(),
        });
        (self.responder)(text, voice)
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &str {
        "stub"
    }
}
