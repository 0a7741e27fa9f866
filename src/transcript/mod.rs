//! Transcript retrieval for YouTube videos.
//!
//! Fetching is delegated to a [`TranscriptFetcher`]; the rest of the crate
//! only sees the [`Transcript`] model.

mod youtube;

pub use youtube::{extract_video_id, YoutubeTranscriptFetcher};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single timed line of a transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptSnippet {
    /// Caption text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl TranscriptSnippet {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// An ordered transcript for one video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    /// Language name as reported by YouTube.
    pub language: String,
    pub language_code: String,
    /// Auto-generated captions rather than uploaded ones.
    pub is_generated: bool,
    pub snippets: Vec<TranscriptSnippet>,
}

impl Transcript {
    /// Create a transcript with unknown language metadata.
    pub fn new(video_id: impl Into<String>, snippets: Vec<TranscriptSnippet>) -> Self {
        Self {
            video_id: video_id.into(),
            language: String::new(),
            language_code: String::new(),
            is_generated: false,
            snippets,
        }
    }

    /// All snippet texts joined with single spaces.
    pub fn full_text(&self) -> String {
        self.snippets
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// End of the last snippet, in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.snippets
            .last()
            .map(|s| s.start + s.duration)
            .unwrap_or(0.0)
    }
}

/// Source of video transcripts.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Fetch the transcript of `video_id` in the first available language of `languages`.
    ///
    /// Fails with `TranscriptsDisabled` or `NoTranscriptFound` when the video
    /// has no usable transcript.
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Transcript>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_text_joins_with_single_spaces() {
        let transcript = Transcript::new(
            "abc",
            vec![
                TranscriptSnippet::new("hello world", 0.0, 1.5),
                TranscriptSnippet::new("this is", 1.5, 1.0),
                TranscriptSnippet::new("a test", 2.5, 1.0),
            ],
        );

        assert_eq!(transcript.full_text(), "hello world this is a test");
        assert!((transcript.duration_seconds() - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_transcript() {
        let transcript = Transcript::new("abc", Vec::new());
        assert_eq!(transcript.full_text(), "");
        assert_eq!(transcript.duration_seconds(), 0.0);
    }
}
