//! Knowledge retrievers over a loaded [`KnowledgeIndex`].

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tika_core::error::KnowledgeError;
use tika_core::provider::{EmbeddingRequest, Provider};
use tika_core::{KnowledgeChunk, KnowledgeRetriever};
use tracing::debug;

use crate::index::KnowledgeIndex;
use crate::vector::rank_by_similarity;

/// Ranks chunks by cosine similarity between the query embedding and the
/// stored chunk embeddings.
pub struct EmbeddingRetriever {
    index: Arc<KnowledgeIndex>,
    provider: Arc<dyn Provider>,
    model: String,
    min_score: f32,
}

impl EmbeddingRetriever {
    pub fn new(
        index: Arc<KnowledgeIndex>,
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        min_score: f32,
    ) -> Self {
        Self {
            index,
            provider,
            model: model.into(),
            min_score,
        }
    }
}

#[async_trait]
impl KnowledgeRetriever for EmbeddingRetriever {
    fn name(&self) -> &str {
        "embedding"
    }

    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<KnowledgeChunk>, KnowledgeError> {
        let response = self
            .provider
            .embed(EmbeddingRequest {
                model: self.model.clone(),
                inputs: vec![query.to_string()],
            })
            .await
            .map_err(|e| KnowledgeError::EmbeddingFailed(e.to_string()))?;

        let query_embedding = response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| KnowledgeError::EmbeddingFailed("empty embedding response".into()))?;

        let results = rank_by_similarity(&self.index.chunks, &query_embedding, top_k, self.min_score);
        debug!(results = results.len(), "Embedding retrieval complete");
        Ok(results)
    }
}

/// Scores chunks by the share of distinct query words they contain.
///
/// Used when the index was built without embeddings.
pub struct KeywordRetriever {
    index: Arc<KnowledgeIndex>,
    min_score: f32,
}

impl KeywordRetriever {
    pub fn new(index: Arc<KnowledgeIndex>, min_score: f32) -> Self {
        Self { index, min_score }
    }
}

/// Case-folded query words of at least two characters.
fn query_terms(query: &str) -> BTreeSet<String> {
    query
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation() || matches!(c, '।' | '॥'))
        .filter(|w| w.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl KnowledgeRetriever for KeywordRetriever {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<KnowledgeChunk>, KnowledgeError> {
        let terms = query_terms(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(f32, usize)> = self
            .index
            .chunks
            .iter()
            .enumerate()
            .filter_map(|(i, chunk)| {
                let content = chunk.content.to_lowercase();
                let hits = terms.iter().filter(|t| content.contains(t.as_str())).count();
                let score = hits as f32 / terms.len() as f32;
                (hits > 0 && score >= self.min_score).then_some((score, i))
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        let results: Vec<KnowledgeChunk> = scored
            .into_iter()
            .map(|(score, i)| self.index.chunks[i].to_knowledge(score))
            .collect();
        debug!(terms = terms.len(), results = results.len(), "Keyword retrieval complete");
        Ok(results)
    }
}

/// Pick the retriever an index supports: embeddings when both the index and
/// an embedding provider have them, keyword overlap otherwise.
pub fn retriever_for_index(
    index: KnowledgeIndex,
    embedder: Option<Arc<dyn Provider>>,
    min_score: f32,
) -> Arc<dyn KnowledgeRetriever> {
    let model = index.embedding_model.clone();
    let index = Arc::new(index);
    match (index.has_embeddings(), embedder, model) {
        (true, Some(provider), Some(model)) => {
            Arc::new(EmbeddingRetriever::new(index, provider, model, min_score))
        }
        _ => Arc::new(KeywordRetriever::new(index, min_score)),
    }
}
