//! Shared scripted collaborators for orchestrator and voice tests.

use std::sync::Mutex;
use tika_core::error::{KnowledgeError, ProviderError, SpeechError};
use tika_core::provider::Usage;
use tika_core::{
    AudioClip, AudioFormat, KnowledgeChunk, KnowledgeRetriever, Provider, ProviderRequest,
    ProviderResponse, SpeechToText, TextToSpeech, Turn,
};

/// A provider that answers from a script and records every request.
///
/// Panics if more calls are made than answers provided.
pub struct ScriptedProvider {
    answers: Vec<String>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let call = requests.len();
        let answer = self.answers.get(call).unwrap_or_else(|| {
            panic!(
                "ScriptedProvider: no more answers (call #{call}, have {})",
                self.answers.len()
            )
        });
        let model = request.model.clone();
        requests.push(request);
        Ok(ProviderResponse {
            message: Turn::assistant(answer.clone()),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model,
        })
    }
}

/// A provider whose every call fails.
pub struct FailingProvider;

#[async_trait::async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(ProviderError::ApiError {
            status_code: 503,
            message: "model is loading".into(),
        })
    }
}

/// A retriever returning fixed chunks and recording queries.
pub struct StaticRetriever {
    chunks: Vec<KnowledgeChunk>,
    queries: Mutex<Vec<String>>,
}

impl StaticRetriever {
    pub fn new(chunks: Vec<KnowledgeChunk>) -> Self {
        Self {
            chunks,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl KnowledgeRetriever for StaticRetriever {
    fn name(&self) -> &str {
        "static"
    }

    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<KnowledgeChunk>, KnowledgeError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.chunks.iter().take(top_k).cloned().collect())
    }
}

pub struct FailingRetriever;

#[async_trait::async_trait]
impl KnowledgeRetriever for FailingRetriever {
    fn name(&self) -> &str {
        "failing"
    }

    async fn retrieve(&self, _query: &str, _top_k: usize) -> Result<Vec<KnowledgeChunk>, KnowledgeError> {
        Err(KnowledgeError::Index("index file missing".into()))
    }
}

/// Speech stand-in: transcribes to a fixed string and synthesizes the text
/// bytes as "audio". Records the language codes it was called with.
pub struct FakeSpeech {
    transcript: String,
    fail_synthesis: bool,
    language_codes: Mutex<Vec<String>>,
}

impl FakeSpeech {
    pub fn new(transcript: &str) -> Self {
        Self {
            transcript: transcript.into(),
            fail_synthesis: false,
            language_codes: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_synthesis(transcript: &str) -> Self {
        Self {
            fail_synthesis: true,
            ..Self::new(transcript)
        }
    }

    pub fn language_codes(&self) -> Vec<String> {
        self.language_codes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SpeechToText for FakeSpeech {
    async fn transcribe(&self, _audio: &AudioClip, language_code: &str) -> Result<String, SpeechError> {
        self.language_codes.lock().unwrap().push(language_code.to_string());
        Ok(self.transcript.clone())
    }
}

#[async_trait::async_trait]
impl TextToSpeech for FakeSpeech {
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<AudioClip, SpeechError> {
        self.language_codes.lock().unwrap().push(language_code.to_string());
        if self.fail_synthesis {
            return Err(SpeechError::SynthesisFailed("voice unavailable".into()));
        }
        Ok(AudioClip::new(text.as_bytes().to_vec(), AudioFormat::Mp3))
    }
}

pub fn chunk(source: &str, content: &str) -> KnowledgeChunk {
    KnowledgeChunk {
        document_id: source.into(),
        chunk_index: 0,
        content: content.into(),
        source: source.into(),
        similarity: 0.8,
    }
}
