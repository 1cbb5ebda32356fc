use readaloud_core::Error as CoreError;
use thiserror::Error;

/// Speech synthesis errors
///
/// Chunk-level faults in streaming mode never appear here; they are
/// folded into [`crate::ChunkOutcome::Failed`] values.
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("speech engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("synthesis failed (language {language}, speed {speed}, {text_len} chars): {reason}")]
    Synthesis {
        language: String,
        speed: f32,
        text_len: usize,
        reason: String,
    },

    #[error("engine error: {0}")]
    Engine(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<SpeechError> for CoreError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::EngineUnavailable(s) => CoreError::EngineUnavailable(s),
            SpeechError::Synthesis {
                language,
                speed,
                text_len,
                reason,
            } => CoreError::SynthesisFailed {
                language,
                speed,
                text_len,
                reason,
            },
            SpeechError::Engine(s) => CoreError::EngineUnavailable(s),
            SpeechError::Config(s) => CoreError::Config(s),
        }
    }
}
