//! Voice round trip: recorded question → transcript → answer → spoken answer.

use std::sync::Arc;
use tika_core::error::SpeechError;
use tika_core::{AudioClip, History, Language, Result, SpeechToText, TextToSpeech};
use tracing::{debug, warn};

use crate::orchestrator::{TurnOrchestrator, TurnOutcome};

/// Everything produced by one spoken turn.
#[derive(Debug, Clone)]
pub struct VoiceOutcome {
    pub transcript: String,
    pub turn: TurnOutcome,
    /// `None` when no synthesizer is configured or synthesis failed.
    pub audio: Option<AudioClip>,
}

pub struct VoicePipeline {
    orchestrator: TurnOrchestrator,
    stt: Arc<dyn SpeechToText>,
    tts: Option<Arc<dyn TextToSpeech>>,
}

impl VoicePipeline {
    pub fn new(orchestrator: TurnOrchestrator, stt: Arc<dyn SpeechToText>) -> Self {
        Self {
            orchestrator,
            stt,
            tts: None,
        }
    }

    pub fn with_tts(mut self, tts: Arc<dyn TextToSpeech>) -> Self {
        self.tts = Some(tts);
        self
    }

    pub fn orchestrator(&self) -> &TurnOrchestrator {
        &self.orchestrator
    }

    /// Process one recorded question. History is only touched when the
    /// turn itself succeeds; a failed synthesis still returns the answer.
    pub async fn process(
        &self,
        history: &mut History,
        audio: &AudioClip,
        language: &Language,
    ) -> Result<VoiceOutcome> {
        self.orchestrator.ensure_supported(language)?;
        let code = self.orchestrator.lexicon().speech_code(language).to_string();

        let transcript = self.stt.transcribe(audio, &code).await?.trim().to_string();
        if transcript.is_empty() {
            return Err(SpeechError::EmptyTranscript.into());
        }
        debug!(language = %code, transcript_len = transcript.len(), "Transcribed question");

        let turn = self
            .orchestrator
            .process_turn(history, &transcript, language)
            .await?;

        let audio = match &self.tts {
            Some(tts) => match tts.synthesize(&turn.answer, &code).await {
                Ok(clip) => Some(clip),
                Err(e) => {
                    warn!(error = %e, "Speech synthesis failed, returning text only");
                    None
                }
            },
            None => None,
        };

        Ok(VoiceOutcome {
            transcript,
            turn,
            audio,
        })
    }
}
