//! Document ingestion — turn a folder of vaccination documents into a
//! [`KnowledgeIndex`].
//!
//! # Flow
//!
//! 1. Collect `*.txt` and `*.md` files (recursively, sorted by path)
//! 2. Split each into overlapping chunks
//! 3. Embed chunks in batches when an embedding provider is configured
//! 4. Return the index; the caller decides where to save it

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tika_config::KnowledgeConfig;
use tika_core::error::KnowledgeError;
use tika_core::provider::{EmbeddingRequest, Provider};
use tracing::{debug, info};

use crate::chunker::chunk_text;
use crate::index::{IndexedChunk, KnowledgeIndex};

const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "md"];

/// A source document read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Path relative to the ingestion root, with `/` separators.
    pub id: String,
    /// File name shown in citations.
    pub source: String,
    pub text: String,
}

pub struct Ingestor {
    chunk_size: usize,
    chunk_overlap: usize,
    batch_size: usize,
    embedder: Option<(Arc<dyn Provider>, String)>,
}

impl Ingestor {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            batch_size: 32,
            embedder: None,
        }
    }

    pub fn from_config(config: &KnowledgeConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Embed chunks with `model` through `provider`.
    pub fn with_embeddings(mut self, provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        self.embedder = Some((provider, model.into()));
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Ingest a single document file or every document under a directory.
    pub async fn ingest_path(&self, path: &Path) -> Result<KnowledgeIndex, KnowledgeError> {
        let documents = collect_documents(path)?;
        if documents.is_empty() {
            return Err(KnowledgeError::Ingestion {
                path: path.display().to_string(),
                reason: "no .txt or .md documents found".into(),
            });
        }
        self.build_index(&documents).await
    }

    pub async fn build_index(&self, documents: &[Document]) -> Result<KnowledgeIndex, KnowledgeError> {
        let model = self.embedder.as_ref().map(|(_, model)| model.clone());
        let mut index = KnowledgeIndex::new(model);

        for doc in documents {
            let pieces = chunk_text(&doc.text, self.chunk_size, self.chunk_overlap);
            debug!(document = %doc.id, chunks = pieces.len(), "Chunked document");
            index.chunks.extend(pieces.into_iter().enumerate().map(|(i, content)| IndexedChunk {
                document_id: doc.id.clone(),
                chunk_index: i,
                content,
                source: doc.source.clone(),
                embedding: None,
            }));
        }

        if let Some((provider, model)) = &self.embedder {
            self.embed_chunks(provider.as_ref(), model, &mut index.chunks).await?;
        }

        info!(
            documents = documents.len(),
            chunks = index.len(),
            embedded = index.has_embeddings(),
            "Knowledge index built"
        );
        Ok(index)
    }

    async fn embed_chunks(
        &self,
        provider: &dyn Provider,
        model: &str,
        chunks: &mut [IndexedChunk],
    ) -> Result<(), KnowledgeError> {
        for batch in chunks.chunks_mut(self.batch_size) {
            let request = EmbeddingRequest {
                model: model.to_string(),
                inputs: batch.iter().map(|c| c.content.clone()).collect(),
            };
            let response = provider
                .embed(request)
                .await
                .map_err(|e| KnowledgeError::EmbeddingFailed(e.to_string()))?;

            if response.embeddings.len() != batch.len() {
                return Err(KnowledgeError::EmbeddingFailed(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }
            for (chunk, embedding) in batch.iter_mut().zip(response.embeddings) {
                chunk.embedding = Some(embedding);
            }
            debug!(batch = batch.len(), "Embedded chunk batch");
        }
        Ok(())
    }
}

/// Read every document under `root` (or `root` itself when it is a file).
pub fn collect_documents(root: &Path) -> Result<Vec<Document>, KnowledgeError> {
    let ingestion_error = |path: &Path, reason: String| KnowledgeError::Ingestion {
        path: path.display().to_string(),
        reason,
    };

    let mut paths = Vec::new();
    if root.is_file() {
        paths.push(root.to_path_buf());
    } else {
        walk(root, &mut paths).map_err(|e| ingestion_error(root, e.to_string()))?;
    }
    paths.retain(|p| is_document(p));
    paths.sort();

    let base = if root.is_file() { root.parent().unwrap_or(root) } else { root };

    paths
        .into_iter()
        .map(|path| {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ingestion_error(&path, e.to_string()))?;
            let id = path
                .strip_prefix(base)
                .unwrap_or(&path)
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let source = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| id.clone());
            Ok(Document { id, source, text })
        })
        .collect()
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| DOCUMENT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tika_core::error::ProviderError;
    use tika_core::provider::{EmbeddingResponse, ProviderRequest, ProviderResponse};

    /// Embeds each text as `[len, 1.0]` and counts calls.
    struct LengthEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Provider for LengthEmbedder {
        fn name(&self) -> &str {
            "length"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::NotConfigured("embeddings only".into()))
        }

        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(EmbeddingResponse {
                embeddings: request.inputs.iter().map(|t| vec![t.len() as f32, 1.0]).collect(),
                model: request.model,
            })
        }
    }

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn collects_only_text_documents_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.md", "# Polio\nOPV at birth.");
        write(dir.path(), "a.txt", "MR vaccine at 9 months.");
        write(dir.path(), "nested/c.TXT", "Vitamin A supplements.");
        write(dir.path(), "skip.pdf", "binary");

        let docs = collect_documents(dir.path()).unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a.txt", "b.md", "nested/c.TXT"]);
        assert_eq!(docs[2].source, "c.TXT");
    }

    #[test]
    fn single_file_root() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "uip.txt", "BCG at birth.");
        let docs = collect_documents(&dir.path().join("uip.txt")).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "uip.txt");
    }

    #[tokio::test]
    async fn keyword_only_index_without_embedder() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", &"Measles vaccine schedule. ".repeat(40));

        let index = Ingestor::new(200, 20).ingest_path(dir.path()).await.unwrap();
        assert!(index.len() > 1);
        assert!(index.embedding_model.is_none());
        assert!(!index.has_embeddings());
        assert!(index.chunks.iter().enumerate().all(|(i, c)| c.chunk_index == i));
    }

    #[tokio::test]
    async fn embeddings_are_batched() {
        let docs: Vec<Document> = (0..5)
            .map(|i| Document {
                id: format!("d{i}.txt"),
                source: format!("d{i}.txt"),
                text: format!("Document {i} about rubella."),
            })
            .collect();
        let embedder = Arc::new(LengthEmbedder { calls: AtomicUsize::new(0) });

        let index = Ingestor::new(500, 50)
            .with_embeddings(embedder.clone(), "sentence-transformers/all-MiniLM-L6-v2")
            .with_batch_size(2)
            .build_index(&docs)
            .await
            .unwrap();

        assert_eq!(index.len(), 5);
        assert!(index.has_embeddings());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
        assert_eq!(index.document_count(), 5);
    }

    #[tokio::test]
    async fn empty_directory_is_an_ingestion_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Ingestor::new(500, 50).ingest_path(dir.path()).await.unwrap_err();
        assert!(matches!(err, KnowledgeError::Ingestion { .. }));
    }

    #[tokio::test]
    async fn missing_path_is_an_ingestion_error() {
        let err = Ingestor::new(500, 50)
            .ingest_path(Path::new("/nonexistent/docs"))
            .await
            .unwrap_err();
        assert!(matches!(err, KnowledgeError::Ingestion { .. }));
    }
}
