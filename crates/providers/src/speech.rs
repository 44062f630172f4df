//! Speech recognition and synthesis over an OpenAI-compatible audio API.
//!
//! - `POST {base}/audio/transcriptions` (multipart) for speech-to-text
//! - `POST {base}/audio/speech` (JSON) for text-to-speech

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tika_config::AppConfig;
use tika_core::error::SpeechError;
use tika_core::{AudioClip, AudioFormat, SpeechToText, TextToSpeech};
use tracing::{debug, info};

const OPENAI_AUDIO_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiSpeechClient {
    base_url: String,
    api_key: String,
    stt_model: String,
    tts_model: String,
    voice: String,
    client: reqwest::Client,
}

impl OpenAiSpeechClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            stt_model: "whisper-1".into(),
            tts_model: "tts-1".into(),
            voice: "nova".into(),
            client,
        }
    }

    pub fn with_models(mut self, stt_model: impl Into<String>, tts_model: impl Into<String>) -> Self {
        self.stt_model = stt_model.into();
        self.tts_model = tts_model.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Build from `[speech]`. Returns `None` when speech is disabled.
    ///
    /// The API key comes from `[providers.openai]`, then the global key.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        if config.speech.provider != "openai" {
            return None;
        }
        let api_key = config
            .providers
            .get("openai")
            .and_then(|p| p.api_key.clone())
            .or_else(|| config.api_key.clone())
            .unwrap_or_default();
        let base_url = config
            .speech
            .api_url
            .clone()
            .unwrap_or_else(|| OPENAI_AUDIO_BASE_URL.into());

        Some(
            Self::new(base_url, api_key)
                .with_models(&config.speech.stt_model, &config.speech.tts_model)
                .with_voice(&config.speech.voice),
        )
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

#[async_trait]
impl SpeechToText for OpenAiSpeechClient {
    async fn transcribe(&self, audio: &AudioClip, language_code: &str) -> Result<String, SpeechError> {
        let url = format!("{}/audio/transcriptions", self.base_url);
        let file = reqwest::multipart::Part::bytes(audio.bytes.clone())
            .file_name(format!("question.{}", audio.format.extension()))
            .mime_str(audio.format.mime_type())
            .map_err(|e| SpeechError::TranscriptionFailed(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("model", self.stt_model.clone())
            .text("language", language_code.to_string());

        debug!(model = %self.stt_model, language = language_code, bytes = audio.bytes.len(), "Transcribing audio");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SpeechError::TranscriptionFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| SpeechError::TranscriptionFailed(e.to_string()))?;

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::TranscriptionFailed(format!("Failed to parse response: {e}")))?;
        Ok(body.text)
    }
}

#[async_trait]
impl TextToSpeech for OpenAiSpeechClient {
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<AudioClip, SpeechError> {
        let url = format!("{}/audio/speech", self.base_url);
        let body = SpeechBody {
            model: &self.tts_model,
            input: text,
            voice: &self.voice,
            response_format: AudioFormat::Mp3.extension(),
        };

        info!(model = %self.tts_model, language = language_code, "Synthesizing answer");

        let bytes = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::SynthesisFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| SpeechError::SynthesisFailed(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| SpeechError::SynthesisFailed(e.to_string()))?;

        Ok(AudioClip::new(bytes.to_vec(), AudioFormat::Mp3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tika_config::ProviderConfig;

    #[test]
    fn disabled_by_default() {
        assert!(OpenAiSpeechClient::from_config(&AppConfig::default()).is_none());
    }

    #[test]
    fn from_config_prefers_openai_provider_key() {
        let mut config = AppConfig::default();
        config.api_key = Some("hf_global".into());
        config.speech.provider = "openai".into();
        config.speech.voice = "alloy".into();
        config.providers.insert(
            "openai".into(),
            ProviderConfig {
                api_key: Some("sk-openai".into()),
                api_url: None,
                default_model: None,
            },
        );

        let client = OpenAiSpeechClient::from_config(&config).unwrap();
        assert_eq!(client.api_key, "sk-openai");
        assert_eq!(client.base_url, "https://api.openai.com/v1");
        assert_eq!(client.voice, "alloy");
        assert_eq!(client.stt_model, "whisper-1");
    }

    #[test]
    fn custom_audio_endpoint() {
        let mut config = AppConfig::default();
        config.speech.provider = "openai".into();
        config.speech.api_url = Some("http://localhost:8000/v1/".into());
        let client = OpenAiSpeechClient::from_config(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:8000/v1");
    }

    #[test]
    fn speech_body_serializes() {
        let body = SpeechBody {
            model: "tts-1",
            input: "नौ महीने पर।",
            voice: "nova",
            response_format: "mp3",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["response_format"], "mp3");
        assert_eq!(json["input"], "नौ महीने पर।");
    }

    #[test]
    fn parse_transcription() {
        let parsed: TranscriptionResponse =
            serde_json::from_str(r#"{"text": "खसरे का टीका कब लगता है?"}"#).unwrap();
        assert_eq!(parsed.text, "खसरे का टीका कब लगता है?");
    }
}
