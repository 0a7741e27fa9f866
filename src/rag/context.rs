//! Context building for RAG responses.

use super::ContextChunk;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::VectorStore;
use std::sync::Arc;
use tracing::debug;

/// Builds context from search results for RAG.
pub struct ContextBuilder {
    embedder: Arc<dyn Embedder>,
    max_chunks: usize,
    min_score: Option<f32>,
}

impl ContextBuilder {
    /// Create a new context builder.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            max_chunks: 4,
            min_score: None,
        }
    }

    /// Set the maximum number of context chunks.
    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    /// Set the minimum similarity score threshold. `None` disables it.
    pub fn with_min_score(mut self, min_score: Option<f32>) -> Self {
        self.min_score = min_score;
        self
    }

    /// Retrieve the segments of `store` closest to `query`.
    pub async fn build(&self, store: &dyn VectorStore, query: &str) -> Result<Vec<ContextChunk>> {
        let query_embedding = self.embedder.embed(query).await?;

        let results = match self.min_score {
            Some(min_score) => {
                store
                    .search_with_threshold(&query_embedding, self.max_chunks, min_score)
                    .await?
            }
            None => store.search(&query_embedding, self.max_chunks).await?,
        };

        for r in &results {
            debug!(order = r.document.chunk_order, score = r.score, "Retrieved segment");
        }

        Ok(results.into_iter().map(ContextChunk::from).collect())
    }
}

/// Join retrieved segments into the prompt context.
///
/// Segments are separated by single spaces and the result is trimmed, so an
/// empty or whitespace-only retrieval yields an empty string.
pub fn format_context_for_prompt(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
