//! HTTP-based TTS engine
//!
//! Talks to a generic synthesis endpoint: JSON request in, audio bytes
//! (or base64-wrapped JSON) out. Works with gTTS-style proxy services
//! and most hosted TTS APIs that accept a text/language/speed payload.

use crate::engines::{TtsEngine, VoiceSelection};
use crate::error::SpeechError;
use crate::params::HttpEngineConfig;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB

#[derive(Debug)]
pub struct HttpTtsEngine {
    client: Client,
    config: HttpEngineConfig,
}

impl HttpTtsEngine {
    pub fn new(config: HttpEngineConfig) -> Result<Self, SpeechError> {
        let endpoint = url::Url::parse(&config.endpoint)
            .map_err(|e| SpeechError::Config(format!("invalid endpoint URL: {}", e)))?;
        match endpoint.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(SpeechError::Config(format!(
                    "unsupported URL scheme: {}",
                    scheme
                )))
            }
        }
        if config.timeout_secs == 0 {
            return Err(SpeechError::Config(
                "timeout must be greater than 0".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SpeechError::Engine(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn api_key(&self) -> Option<String> {
        self.config
            .api_key
            .clone()
            .or_else(|| std::env::var("READALOUD_TTS_API_KEY").ok())
    }

    async fn request_once(&self, text: &str, voice: &VoiceSelection) -> Result<Bytes, SpeechError> {
        let body = json!({
            "text": text,
            "language": voice.language,
            "speed": voice.speed,
            "slow": voice.slow,
            "format": "mp3",
        });

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json");
        if let Some(key) = self.api_key() {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Engine(format!("TTS API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .map(|s| s.chars().take(1000).collect::<String>())
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SpeechError::Engine(format!(
                "TTS API error ({}): {}",
                status, error_text
            )));
        }

        if let Some(len) = response.content_length() {
            if len > MAX_RESPONSE_SIZE as u64 {
                return Err(SpeechError::Engine(format!(
                    "response too large ({} bytes, max {})",
                    len, MAX_RESPONSE_SIZE
                )));
            }
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Engine(format!("failed to read audio response: {}", e)))?;

        if audio.len() > MAX_RESPONSE_SIZE {
            return Err(SpeechError::Engine(format!(
                "response too large ({} bytes, max {})",
                audio.len(),
                MAX_RESPONSE_SIZE
            )));
        }

        // Some services wrap the audio in a JSON envelope.
        if audio.first() == Some(&b'{') && audio.last() == Some(&b'}') {
            if let Ok(envelope) = serde_json::from_slice::<serde_json::Value>(&audio) {
                if let Some(encoded) = envelope
                    .get("audio")
                    .or_else(|| envelope.get("data"))
                    .or_else(|| envelope.get("audioContent"))
                    .and_then(|v| v.as_str())
                {
                    let decoded = general_purpose::STANDARD
                        .decode(encoded)
                        .map_err(|e| {
                            SpeechError::Engine(format!("failed to decode base64 audio: {}", e))
                        })?;
                    if decoded.len() > MAX_RESPONSE_SIZE {
                        return Err(SpeechError::Engine("decoded audio too large".to_string()));
                    }
                    return Ok(Bytes::from(decoded));
                }
            }
        }

        Ok(audio)
    }

    async fn retry_request(
        &self,
        text: &str,
        voice: &VoiceSelection,
    ) -> Result<Bytes, SpeechError> {
        let retry = &self.config.retry;
        let mut delay = retry.initial_delay_ms;
        let mut last_error = None;

        for attempt in 0..=retry.max_retries {
            match self.request_once(text, voice).await {
                Ok(audio) => return Ok(audio),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < retry.max_retries {
                        debug!(
                            delay_ms = delay,
                            attempt = attempt + 1,
                            max = retry.max_retries,
                            "TTS API request failed, retrying"
                        );
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        delay = delay
                            .checked_mul(2)
                            .map(|d| d.min(retry.max_delay_ms))
                            .unwrap_or(retry.max_delay_ms);
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SpeechError::Engine("unknown error".to_string())))
    }
}

#[async_trait]
impl TtsEngine for HttpTtsEngine {
    async fn synthesize(&self, text: &str, voice: &VoiceSelection) -> Result<Bytes, SpeechError> {
        if text.is_empty() {
            return Err(SpeechError::Engine("text cannot be empty".to_string()));
        }
        if text.contains('\0') {
            return Err(SpeechError::Engine("text contains null bytes".to_string()));
        }

        self.retry_request(text, voice).await
    }

    fn is_available(&self) -> bool {
        !self.config.endpoint.is_empty()
    }

    fn name(&self) -> &str {
        "HTTP TTS"
    }
}
