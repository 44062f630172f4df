//! Query translation through the language model.
//!
//! The knowledge base is indexed in one language (English by default), so a
//! Hindi question is rendered in English before it is embedded or matched.

use async_trait::async_trait;
use std::sync::Arc;
use tika_core::error::KnowledgeError;
use tika_core::{Provider, ProviderRequest, QueryTranslator, Turn};
use tracing::debug;

/// Asks a chat model for a plain translation of the query.
pub struct LlmQueryTranslator {
    provider: Arc<dyn Provider>,
    model: String,
    max_tokens: u32,
}

impl LlmQueryTranslator {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: 128,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl QueryTranslator for LlmQueryTranslator {
    fn name(&self) -> &str {
        "llm"
    }

    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, KnowledgeError> {
        let instructions = format!(
            "Translate the user's text from {source_language} to {target_language}. \
             Reply with the translation only, without quotes or explanations."
        );
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: vec![Turn::system(instructions), Turn::user(text)],
            temperature: 0.0,
            max_tokens: Some(self.max_tokens),
        };

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| KnowledgeError::Translation(e.to_string()))?;

        let translated = response.message.content.trim().trim_matches('"').trim().to_string();
        if translated.is_empty() {
            return Err(KnowledgeError::Translation("empty translation".into()));
        }
        debug!(source = source_language, target = target_language, "Query translated");
        Ok(translated)
    }
}
