//! On-disk knowledge index — a single JSON file written by `tika ingest`.
//!
//! Storage location: `~/.tika/knowledge/index.json` unless configured.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tika_core::KnowledgeChunk;
use tika_core::error::KnowledgeError;
use tracing::{debug, info};

/// A stored chunk, optionally with its embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub document_id: String,
    pub chunk_index: usize,
    pub content: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl IndexedChunk {
    /// The retrieval view of this chunk with the given score.
    pub fn to_knowledge(&self, similarity: f32) -> KnowledgeChunk {
        KnowledgeChunk {
            document_id: self.document_id.clone(),
            chunk_index: self.chunk_index,
            content: self.content.clone(),
            source: self.source.clone(),
            similarity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeIndex {
    /// Model the embeddings were produced with; `None` for keyword-only indexes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub chunks: Vec<IndexedChunk>,
}

impl KnowledgeIndex {
    pub fn new(embedding_model: Option<String>) -> Self {
        Self {
            embedding_model,
            created_at: Utc::now(),
            chunks: Vec::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KnowledgeError::Index(format!("Failed to read {}: {e}", path.display()))
        })?;
        let index: Self = serde_json::from_str(&content).map_err(|e| {
            KnowledgeError::Index(format!("Failed to parse {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), chunks = index.chunks.len(), "Knowledge index loaded");
        Ok(index)
    }

    /// Write the index, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), KnowledgeError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                KnowledgeError::Index(format!("Failed to create index directory: {e}"))
            })?;
        }
        let content = serde_json::to_string(self)
            .map_err(|e| KnowledgeError::Index(format!("Failed to serialize index: {e}")))?;
        std::fs::write(path, content).map_err(|e| {
            KnowledgeError::Index(format!("Failed to write {}: {e}", path.display()))
        })?;
        info!(path = %path.display(), chunks = self.chunks.len(), "Knowledge index saved");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// True iff every chunk carries an embedding.
    pub fn has_embeddings(&self) -> bool {
        !self.chunks.is_empty() && self.chunks.iter().all(|c| c.embedding.is_some())
    }

    pub fn document_count(&self) -> usize {
        self.chunks
            .iter()
            .map(|c| c.document_id.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}
