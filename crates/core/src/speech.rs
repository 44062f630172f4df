//! Speech collaborator traits: speech-to-text and text-to-speech.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::SpeechError;

/// Audio container format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
    Ogg,
    Webm,
    Flac,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Ogg => "audio/ogg",
            Self::Webm => "audio/webm",
            Self::Flac => "audio/flac",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::Webm => "webm",
            Self::Flac => "flac",
        }
    }

    /// Guess the format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            "ogg" | "oga" => Some(Self::Ogg),
            "webm" => Some(Self::Webm),
            "flac" => Some(Self::Flac),
            _ => None,
        }
    }
}

/// A recorded or synthesized piece of audio.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, format: AudioFormat) -> Self {
        Self { bytes, format }
    }
}

/// Turns a recording into text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// `language_code` is an ISO-639-1 hint such as `"hi"`.
    async fn transcribe(
        &self,
        audio: &AudioClip,
        language_code: &str,
    ) -> std::result::Result<String, SpeechError>;
}

/// Turns text into audio.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        language_code: &str,
    ) -> std::result::Result<AudioClip, SpeechError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(AudioFormat::from_extension("WAV"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_extension("oga"), Some(AudioFormat::Ogg));
        assert_eq!(AudioFormat::from_extension("txt"), None);
    }

    #[test]
    fn mime_types() {
        assert_eq!(AudioFormat::Mp3.mime_type(), "audio/mpeg");
        assert_eq!(AudioFormat::default().extension(), "mp3");
    }
}
