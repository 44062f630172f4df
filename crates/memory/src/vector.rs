//! Vector similarity over indexed knowledge chunks.

use tika_core::KnowledgeChunk;

use crate::index::IndexedChunk;

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if either vector is zero-length or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// Rank chunks by cosine similarity to a query embedding.
///
/// Chunks without an embedding are skipped. Results are sorted by
/// descending similarity (ties keep index order), filtered by `min_score`,
/// and truncated to `limit`.
pub fn rank_by_similarity(
    chunks: &[IndexedChunk],
    query_embedding: &[f32],
    limit: usize,
    min_score: f32,
) -> Vec<KnowledgeChunk> {
    let mut scored: Vec<(f32, &IndexedChunk)> = chunks
        .iter()
        .filter_map(|chunk| {
            let emb = chunk.embedding.as_ref()?;
            let sim = cosine_similarity(emb, query_embedding);
            (sim >= min_score).then_some((sim, chunk))
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored
        .into_iter()
        .map(|(sim, chunk)| chunk.to_knowledge(sim))
        .collect()
}
