//! Recursive character splitting.
//!
//! Splits on the coarsest separator present in the text, recursing into
//! finer separators only for pieces that are still too long, then merges
//! small pieces back into windows of at most `chunk_size` characters that
//! overlap by up to `chunk_overlap` characters.

use super::{Chunker, ChunkingConfig, ContentChunk};
use std::collections::VecDeque;
use tracing::warn;

/// Deterministic overlapping splitter.
pub struct RecursiveSplitter {
    config: ChunkingConfig,
}

impl RecursiveSplitter {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    /// Split text into trimmed, non-empty pieces.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_with(text, &self.config.separators)
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        // "" always matches; a missing separator falls back to the last one.
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut finer: &[String] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() {
                separator = "";
                break;
            }
            if text.contains(sep.as_str()) {
                separator = sep;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut pending: Vec<String> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.config.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                final_chunks.extend(self.merge_splits(&pending));
                pending.clear();
            }

            if finer.is_empty() {
                final_chunks.push(piece);
            } else {
                final_chunks.extend(self.split_with(&piece, finer));
            }
        }

        if !pending.is_empty() {
            final_chunks.extend(self.merge_splits(&pending));
        }

        final_chunks
    }

    /// Greedily pack pieces into windows, keeping a tail of each window as overlap.
    fn merge_splits(&self, splits: &[String]) -> Vec<String> {
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let mut docs = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in splits {
            let len = char_len(piece);

            if total + len > size {
                if total > size {
                    warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total, size
                    );
                }

                if !window.is_empty() {
                    if let Some(doc) = join_window(&window) {
                        docs.push(doc);
                    }

                    while total > overlap || (total + len > size && total > 0) {
                        match window.pop_front() {
                            Some(front) => total -= char_len(front),
                            None => break,
                        }
                    }
                }
            }

            window.push_back(piece);
            total += len;
        }

        if let Some(doc) = join_window(&window) {
            docs.push(doc);
        }

        docs
    }
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self::new(ChunkingConfig::default())
    }
}

impl Chunker for RecursiveSplitter {
    fn chunk(&self, text: &str) -> Vec<ContentChunk> {
        self.split_text(text)
            .into_iter()
            .enumerate()
            .map(|(order, content)| ContentChunk::new(content, order))
            .collect()
    }
}

/// Split on `separator`, attaching it to the start of each following piece.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut parts = text.split(separator);
    let mut pieces = Vec::new();
    if let Some(first) = parts.next() {
        pieces.push(first.to_string());
    }
    pieces.extend(parts.map(|p| format!("{}{}", separator, p)));

    pieces.retain(|p| !p.is_empty());
    pieces
}

fn join_window(window: &VecDeque<&str>) -> Option<String> {
    let joined: String = window.iter().copied().collect();
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(chunk_size: usize, chunk_overlap: usize) -> RecursiveSplitter {
        RecursiveSplitter::new(ChunkingConfig {
            chunk_size,
            chunk_overlap,
            ..ChunkingConfig::default()
        })
    }

    #[test]
    fn test_short_text_is_one_segment() {
        let chunks = RecursiveSplitter::default().chunk("hello world this is a test");
        assert_eq!(
            chunks,
            vec![ContentChunk::new("hello world this is a test".to_string(), 0)]
        );
    }

    #[test]
    fn test_blank_text_has_no_segments() {
        let splitter = RecursiveSplitter::default();
        assert!(splitter.chunk("").is_empty());
        assert!(splitter.chunk("   ").is_empty());
    }

    #[test]
    fn test_windows_respect_size_and_overlap() {
        let words: Vec<String> = (0..200).map(|i| format!("w{:03}", i)).collect();
        let text = words.join(" ");

        let chunks = splitter(300, 100).split_text(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 300, "chunk too long: {}", chunk.len());
        }

        // each window starts inside the previous one
        for pair in chunks.windows(2) {
            let first_word = pair[1].split(' ').next().unwrap();
            assert!(pair[0].contains(first_word));
        }

        for word in &words {
            assert!(chunks.iter().any(|c| c.contains(word.as_str())));
        }
    }

    #[test]
    fn test_prefers_paragraph_breaks() {
        let para1 = "alpha ".repeat(33).trim().to_string();
        let para2 = "beta ".repeat(40).trim().to_string();
        let text = format!("{}\n\n{}", para1, para2);

        let chunks = splitter(300, 100).split_text(&text);

        assert_eq!(chunks, vec![para1, para2]);
    }

    #[test]
    fn test_unbroken_text_splits_by_character() {
        let text = "x".repeat(650);

        let chunks = splitter(300, 100).split_text(&text);

        let lens: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(lens, vec![300, 300, 250]);
    }

    #[test]
    fn test_oversized_word_is_split_recursively() {
        let text = format!("short words {} more words", "y".repeat(400));

        let chunks = splitter(300, 100).split_text(&text);

        assert_eq!(chunks.first().map(String::as_str), Some("short words"));
        assert_eq!(chunks.last().map(String::as_str), Some("more words"));
        assert!(chunks.iter().all(|c| c.chars().count() <= 300));
    }

    #[test]
    fn test_chunk_order_is_sequential() {
        let text = "lorem ipsum ".repeat(100);
        let chunks = RecursiveSplitter::default().chunk(&text);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.order, i);
        }
    }
}
