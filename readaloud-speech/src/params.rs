//! Voice parameters and speech limits

use crate::error::SpeechError;
use readaloud_core::accessibility::SUPPORTED_LANGUAGES;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default cap on text sent to a single merged synthesis call.
pub const DEFAULT_MAX_SYNTHESIS_CHARS: usize = 5000;

/// Allow-list, clamp ranges and mode thresholds for synthesis, passed
/// into the adapter as one immutable structure.
#[derive(Debug, Clone)]
pub struct SpeechLimits {
    pub languages: &'static [&'static str],
    /// Fallback when the requested language is not allow-listed.
    pub default_language: &'static str,
    pub speed_range: (f32, f32),
    /// Below this speed the engine is asked for its "slow" mode.
    /// Tunable; inherited from the original service behavior.
    pub slow_speed_threshold: f32,
    /// Hard cap on text length per engine call.
    pub max_text_len: usize,
}

impl Default for SpeechLimits {
    fn default() -> Self {
        Self {
            languages: SUPPORTED_LANGUAGES,
            default_language: "en",
            speed_range: (0.5, 2.0),
            slow_speed_threshold: 0.8,
            max_text_len: 100_000,
        }
    }
}

impl SpeechLimits {
    /// Resolve the requested language against the allow-list, falling
    /// back to the default instead of failing the request.
    pub fn resolve_language(&self, requested: &str) -> String {
        if self.languages.contains(&requested) {
            requested.to_string()
        } else {
            warn!(
                requested,
                fallback = self.default_language,
                "unsupported language, falling back to default"
            );
            self.default_language.to_string()
        }
    }

    pub fn clamp_speed(&self, speed: f32) -> f32 {
        speed.clamp(self.speed_range.0, self.speed_range.1)
    }
}

/// User-facing synthesis parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceParameters {
    pub language: String,
    pub speed: f32,
    /// Cap on combined text in merged mode; excess is truncated with a
    /// visible ellipsis marker, not rejected.
    pub max_chars: usize,
    /// Optional 1-based inclusive page range for extraction.
    pub page_range: Option<(u32, u32)>,
}

impl Default for VoiceParameters {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            speed: 1.0,
            max_chars: DEFAULT_MAX_SYNTHESIS_CHARS,
            page_range: None,
        }
    }
}

impl VoiceParameters {
    /// Reject structurally invalid parameters. Out-of-range speed is not
    /// invalid (it gets clamped); a zero max_chars is.
    pub fn validate(&self) -> Result<(), SpeechError> {
        if self.max_chars == 0 {
            return Err(SpeechError::Config(
                "max_chars must be greater than 0".to_string(),
            ));
        }
        if self.language.is_empty() || self.language.len() > 32 {
            return Err(SpeechError::Config(
                "language code must be 1-32 characters".to_string(),
            ));
        }
        if !self.speed.is_finite() {
            return Err(SpeechError::Config("speed must be finite".to_string()));
        }
        Ok(())
    }
}

/// HTTP TTS engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpEngineConfig {
    /// Synthesis endpoint URL (http or https).
    pub endpoint: String,
    /// Bearer token; falls back to the READALOUD_TTS_API_KEY variable.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub retry: RetryConfig,
}

impl HttpEngineConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration for engine API calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
        }
    }
}
