//! In-memory vector store implementation.
//!
//! One store is built per processed video and lives as long as the session.

use super::{cosine_similarity, Document, SearchResult, VectorStore};
use crate::error::{Result, TubeQaError};
use async_trait::async_trait;
use std::sync::RwLock;

/// In-memory vector store with brute-force cosine search.
pub struct MemoryVectorStore {
    documents: RwLock<Vec<Document>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }
}

impl MemoryVectorStore {
    /// Score every document and keep the best `limit`, optionally dropping
    /// those below `min_score`.
    fn rank(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: Option<f32>,
    ) -> Result<Vec<SearchResult>> {
        let docs = self.documents.read().map_err(poisoned)?;

        let mut results: Vec<SearchResult> = docs
            .iter()
            .map(|doc| SearchResult {
                score: cosine_similarity(query_embedding, &doc.embedding),
                document: doc.clone(),
            })
            .filter(|r| min_score.map_or(true, |min| r.score >= min))
            .collect();

        // Stable sort keeps transcript order among equal scores; NaN ranks last
        let key = |score: f32| if score.is_nan() { f32::NEG_INFINITY } else { score };
        results.sort_by(|a, b| key(b.score).total_cmp(&key(a.score)));
        results.truncate(limit);

        Ok(results)
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> TubeQaError {
    TubeQaError::VectorStore("index lock poisoned".to_string())
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let mut store = self.documents.write().map_err(poisoned)?;
        for doc in docs {
            match store.iter_mut().find(|d| d.id == doc.id) {
                Some(existing) => *existing = doc.clone(),
                None => store.push(doc.clone()),
            }
        }
        Ok(docs.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        self.rank(query_embedding, limit, None)
    }

    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        self.rank(query_embedding, limit, Some(min_score))
    }

    async fn document_count(&self) -> Result<usize> {
        let docs = self.documents.read().map_err(poisoned)?;
        Ok(docs.len())
    }
}
