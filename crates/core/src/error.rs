//! Error types for the Tika domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each external collaborator has its own error variant.

use thiserror::Error;

/// The top-level error type for all Tika operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Knowledge base errors ---
    #[error("Knowledge base error: {0}")]
    Knowledge(#[from] KnowledgeError),

    // --- Speech errors ---
    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Utterance is empty")]
    EmptyUtterance,

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Collaborator errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Index error: {0}")]
    Index(String),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),

    #[error("Ingestion failed for {path}: {reason}")]
    Ingestion { path: String, reason: String },

    #[error("Query translation failed: {0}")]
    Translation(String),
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("No speech recognised in the recording")]
    EmptyTranscript,

    #[error("Speech service not configured: {0}")]
    NotConfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn speech_error_converts_into_top_level() {
        let err: Error = SpeechError::EmptyTranscript.into();
        assert!(matches!(err, Error::Speech(SpeechError::EmptyTranscript)));
        assert!(err.to_string().contains("No speech"));
    }

    #[test]
    fn unsupported_language_names_the_token() {
        let err = Error::UnsupportedLanguage("klingon".into());
        assert_eq!(err.to_string(), "Unsupported language: klingon");
    }
}
