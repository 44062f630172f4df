//! Knowledge base for Tika: chunking, ingestion, a JSON index on disk, and
//! retrieval by embedding similarity or keyword overlap.

pub mod chunker;
pub mod index;
pub mod ingest;
pub mod retriever;
pub mod vector;

pub use chunker::chunk_text;
pub use index::{IndexedChunk, KnowledgeIndex};
pub use ingest::{Document, Ingestor, collect_documents};
pub use retriever::{EmbeddingRetriever, KeywordRetriever, retriever_for_index};
pub use vector::{cosine_similarity, rank_by_similarity};
