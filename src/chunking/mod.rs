//! Splitting transcript text into overlapping, searchable segments.

mod recursive;

pub use recursive::RecursiveSplitter;

use crate::config::ChunkingSettings;
use serde::{Deserialize, Serialize};

/// A segment of transcript text, the unit that gets embedded and retrieved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentChunk {
    /// Text content of this chunk.
    pub content: String,
    /// Position of this chunk in the transcript.
    pub order: usize,
}

impl ContentChunk {
    pub fn new(content: String, order: usize) -> Self {
        Self { content, order }
    }
}

/// Configuration for chunking.
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters carried over from the end of one chunk into the next.
    pub chunk_overlap: usize,
    /// Separators tried in order. An empty string splits into characters.
    pub separators: Vec<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        ChunkingSettings::default().into()
    }
}

impl From<ChunkingSettings> for ChunkingConfig {
    fn from(settings: ChunkingSettings) -> Self {
        Self {
            chunk_size: settings.chunk_size,
            chunk_overlap: settings.chunk_overlap,
            separators: settings.separators,
        }
    }
}

/// Trait for text chunking implementations.
pub trait Chunker: Send + Sync {
    /// Split text into ordered chunks.
    fn chunk(&self, text: &str) -> Vec<ContentChunk>;
}
