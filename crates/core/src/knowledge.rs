//! Knowledge retrieval trait.
//!
//! The knowledge base is a small set of vaccination documents split into
//! chunks. A retriever returns the chunks most relevant to a question; the
//! orchestrator injects them into the prompt. Documents are written in one
//! language, so questions in other languages pass through a
//! [`QueryTranslator`] first.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::KnowledgeError;

/// A retrieved knowledge chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    /// Source document identifier.
    pub document_id: String,
    /// Sequential chunk index within the document.
    pub chunk_index: usize,
    /// The text content of this chunk.
    pub content: String,
    /// Human-readable source label (filename).
    pub source: String,
    /// Relevance score assigned by the retriever (higher is better).
    #[serde(default)]
    pub similarity: f32,
}

/// Anything that can answer "which chunks are relevant to this question?".
///
/// Implementations: embedding index (cosine similarity), keyword overlap.
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    /// A short name for logs (e.g. "embedding", "keyword").
    fn name(&self) -> &str;

    /// Return at most `top_k` chunks, most relevant first.
    async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> std::result::Result<Vec<KnowledgeChunk>, KnowledgeError>;
}

/// Renders a retrieval query in the language of the knowledge base.
#[async_trait]
pub trait QueryTranslator: Send + Sync {
    fn name(&self) -> &str;

    /// Translate `text` from `source_language` into `target_language`.
    /// Languages are lexicon tokens such as `"hindi"` or `"english"`.
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> std::result::Result<String, KnowledgeError>;
}
