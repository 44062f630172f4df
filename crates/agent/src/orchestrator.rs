//! Turn orchestration — one utterance in, one answer out.
//!
//! # Flow
//!
//! 1. Check the language against the lexicon
//! 2. Build the topical context window from the session history
//! 3. Retrieve knowledge when the utterance is on-topic, translating it into
//!    the knowledge base language first
//! 4. Compose the prompt and call the provider once
//! 5. Append the user and assistant turns to the history (success only)

use serde::Serialize;
use std::sync::Arc;
use tika_config::{AppConfig, ConversationConfig, Lexicon};
use tika_core::{
    Error, History, KnowledgeChunk, KnowledgeRetriever, Language, Provider, ProviderRequest,
    QueryTranslator, Result, Turn,
};
use tracing::{debug, info, warn};

use crate::context::ContextWindowBuilder;
use crate::prompt::PromptBuilder;

/// Per-turn model and window settings.
#[derive(Debug, Clone)]
pub struct TurnSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub max_turn_pairs: usize,
    pub top_k: usize,
    /// Language the knowledge base is written in.
    pub knowledge_language: Language,
}

impl TurnSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.default_model.clone(),
            temperature: config.default_temperature,
            max_tokens: Some(config.default_max_tokens),
            max_turn_pairs: config.conversation.max_turn_pairs,
            top_k: config.knowledge.top_k,
            knowledge_language: Language::new(&config.knowledge.language),
        }
    }
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Result of one processed turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// The model's answer, trimmed.
    pub answer: String,
    /// Whether the answer is the canned off-topic rejection.
    pub rejected: bool,
    /// The topical context the prompt carried (may be empty).
    pub context: String,
    /// Knowledge chunks the prompt carried.
    pub knowledge: Vec<KnowledgeChunk>,
}

/// Drives a single question/answer turn against a provider.
pub struct TurnOrchestrator {
    provider: Arc<dyn Provider>,
    retriever: Option<Arc<dyn KnowledgeRetriever>>,
    translator: Option<Arc<dyn QueryTranslator>>,
    lexicon: Lexicon,
    window: ContextWindowBuilder,
    settings: TurnSettings,
}

impl TurnOrchestrator {
    pub fn new(
        provider: Arc<dyn Provider>,
        lexicon: Lexicon,
        conversation: &ConversationConfig,
        settings: TurnSettings,
    ) -> Result<Self> {
        let window = ContextWindowBuilder::from_lexicon(&lexicon, conversation)?;
        Ok(Self {
            provider,
            retriever: None,
            translator: None,
            lexicon,
            window,
            settings,
        })
    }

    /// Build from the loaded configuration, resolving its lexicon.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Result<Self> {
        let lexicon = config.lexicon()?;
        Self::new(
            provider,
            lexicon,
            &config.conversation,
            TurnSettings::from_config(config),
        )
    }

    /// Attach a knowledge retriever.
    pub fn with_retriever(mut self, retriever: Arc<dyn KnowledgeRetriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Translate retrieval queries that are not in the knowledge base language.
    pub fn with_translator(mut self, translator: Arc<dyn QueryTranslator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn settings(&self) -> &TurnSettings {
        &self.settings
    }

    pub fn window(&self) -> &ContextWindowBuilder {
        &self.window
    }

    /// Fail with [`Error::UnsupportedLanguage`] unless the lexicon knows `language`.
    pub fn ensure_supported(&self, language: &Language) -> Result<()> {
        if self.lexicon.supports(language) {
            Ok(())
        } else {
            Err(Error::UnsupportedLanguage(language.to_string()))
        }
    }

    /// Answer `utterance` in `language`, appending the exchange to `history`.
    ///
    /// On any error `history` is left exactly as it was.
    pub async fn process_turn(
        &self,
        history: &mut History,
        utterance: &str,
        language: &Language,
    ) -> Result<TurnOutcome> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(Error::EmptyUtterance);
        }
        self.ensure_supported(language)?;

        let context = self
            .window
            .build_context(history.turns(), self.settings.max_turn_pairs);
        let knowledge = self.retrieve_knowledge(utterance, &context, language).await;

        let classifier = self.window.classifier();
        let prompt = PromptBuilder::new(self.lexicon.display_name(language))
            .rejection_reply(self.lexicon.rejection_reply_for(language))
            .topic_terms(classifier.trigger_terms(), classifier.follow_up_terms())
            .knowledge(&knowledge)
            .context(&context)
            .build(utterance);

        let request = ProviderRequest {
            model: self.settings.model.clone(),
            messages: prompt.into_messages(),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        debug!(
            provider = self.provider.name(),
            model = %request.model,
            context_len = context.len(),
            chunks = knowledge.len(),
            "Sending turn to provider"
        );

        let response = self.provider.complete(request).await?;
        let answer = response.message.content.trim().to_string();
        let rejected = self.window.detector().is_rejection_reply(&answer);

        history.push(Turn::user(utterance));
        history.push(Turn::assistant(answer.clone()));

        info!(
            session = %history.id,
            language = %language,
            rejected,
            answer_len = answer.len(),
            "Turn completed"
        );

        Ok(TurnOutcome {
            answer,
            rejected,
            context,
            knowledge,
        })
    }

    /// An utterance is worth a lookup when it triggers the topic on its own,
    /// or follows up on a topical context.
    fn wants_knowledge(&self, utterance: &str, context: &str) -> bool {
        let classifier = self.window.classifier();
        classifier.is_topic_trigger(utterance)
            || (!context.is_empty() && classifier.is_follow_up_term(utterance))
    }

    /// Retrieval failures degrade to an answer without reference material.
    async fn retrieve_knowledge(
        &self,
        utterance: &str,
        context: &str,
        language: &Language,
    ) -> Vec<KnowledgeChunk> {
        let Some(retriever) = &self.retriever else {
            return Vec::new();
        };

        if !self.wants_knowledge(utterance, context) {
            debug!("Skipping knowledge retrieval for off-topic utterance");
            return Vec::new();
        }

        let query = self.retrieval_query(utterance, language).await;
        match retriever.retrieve(&query, self.settings.top_k).await {
            Ok(chunks) => {
                debug!(retriever = retriever.name(), chunks = chunks.len(), "Knowledge retrieved");
                chunks
            }
            Err(e) => {
                warn!(retriever = retriever.name(), error = %e, "Knowledge retrieval failed");
                Vec::new()
            }
        }
    }

    /// The utterance in the knowledge base language. Falls back to the
    /// utterance itself when no translator is set or translation fails.
    async fn retrieval_query(&self, utterance: &str, language: &Language) -> String {
        let target = &self.settings.knowledge_language;
        let Some(translator) = self.translator.as_ref().filter(|_| language != target) else {
            return utterance.to_string();
        };

        match translator.translate(utterance, language.as_str(), target.as_str()).await {
            Ok(query) => {
                debug!(translator = translator.name(), from = %language, to = %target, "Retrieval query translated");
                query
            }
            Err(e) => {
                warn!(translator = translator.name(), error = %e, "Query translation failed, retrieving with the original text");
                utterance.to_string()
            }
        }
    }
}
