//! Question answering over a processed video's transcript.
//!
//! Retrieval finds the segments closest to the question; generation answers
//! from them, falling back to general knowledge when the transcript has
//! nothing to say.

pub mod context;
mod generator;
mod response;

pub use context::ContextBuilder;
pub use generator::{Generator, OpenAIGenerator};
pub use response::{AnswerSource, RagEngine, RagResponse, Verdict};

use crate::vector_store::SearchResult;
use serde::Serialize;

/// Reply the strict prompt asks for when the context lacks the answer.
pub const NOT_FOUND_SENTINEL: &str = "NOT_FOUND";

/// A retrieved transcript segment used as context.
#[derive(Debug, Clone, Serialize)]
pub struct ContextChunk {
    /// Text content.
    pub content: String,
    /// Position of the segment in the transcript.
    pub order: usize,
    /// Similarity score.
    pub score: f32,
}

impl From<SearchResult> for ContextChunk {
    fn from(result: SearchResult) -> Self {
        Self {
            content: result.document.content,
            order: result.document.chunk_order,
            score: result.score,
        }
    }
}
