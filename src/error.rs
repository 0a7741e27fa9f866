//! Error types for tubeqa.

use thiserror::Error;

/// Library-level error type for tubeqa operations.
#[derive(Error, Debug)]
pub enum TubeQaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transcripts are disabled for this video.")]
    TranscriptsDisabled { video_id: String },

    #[error("No transcript available in {}.", describe_languages(.languages))]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },

    #[error("Transcript error: {0}")]
    Transcript(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Please process a video first.")]
    NoVideoProcessed,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TubeQaError {
    /// The text shown to the user when an action fails.
    ///
    /// Transcript availability and precondition failures have their own
    /// wording; everything else is reported as `Error: <cause>`.
    pub fn user_message(&self) -> String {
        match self {
            TubeQaError::TranscriptsDisabled { .. }
            | TubeQaError::NoTranscriptFound { .. }
            | TubeQaError::NoVideoProcessed => self.to_string(),
            other => format!("Error: {}", other),
        }
    }

    /// Whether this error means the video has no usable transcript.
    pub fn is_transcript_unavailable(&self) -> bool {
        matches!(
            self,
            TubeQaError::TranscriptsDisabled { .. } | TubeQaError::NoTranscriptFound { .. }
        )
    }
}

/// Turn language codes into a human-readable list ("English or Hindi").
pub fn describe_languages(codes: &[String]) -> String {
    let names: Vec<&str> = codes.iter().map(|c| language_name(c)).collect();
    match names.as_slice() {
        [] => "any requested language".to_string(),
        [only] => only.to_string(),
        [rest @ .., last] => format!("{} or {}", rest.join(", "), last),
    }
}

fn language_name(code: &str) -> &str {
    match code {
        "en" => "English",
        "hi" => "Hindi",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "pt" => "Portuguese",
        "it" => "Italian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "ru" => "Russian",
        "zh" | "zh-Hans" | "zh-Hant" => "Chinese",
        "ar" => "Arabic",
        other => other,
    }
}

/// Result type alias for tubeqa operations.
pub type Result<T> = std::result::Result<T, TubeQaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_messages_are_distinct() {
        let disabled = TubeQaError::TranscriptsDisabled {
            video_id: "abc".to_string(),
        };
        let missing = TubeQaError::NoTranscriptFound {
            video_id: "abc".to_string(),
            languages: vec!["en".to_string(), "hi".to_string()],
        };

        assert_eq!(
            disabled.user_message(),
            "Transcripts are disabled for this video."
        );
        assert_eq!(
            missing.user_message(),
            "No transcript available in English or Hindi."
        );
        assert!(disabled.is_transcript_unavailable());
        assert!(missing.is_transcript_unavailable());
    }

    #[test]
    fn test_upstream_errors_are_generic() {
        let err = TubeQaError::OpenAI("quota exceeded".to_string());
        assert_eq!(err.user_message(), "Error: OpenAI API error: quota exceeded");
        assert!(!err.is_transcript_unavailable());
    }

    #[test]
    fn test_precondition_message() {
        assert_eq!(
            TubeQaError::NoVideoProcessed.user_message(),
            "Please process a video first."
        );
    }

    #[test]
    fn test_describe_languages() {
        assert_eq!(describe_languages(&[]), "any requested language");
        assert_eq!(describe_languages(&["fr".to_string()]), "French");
        assert_eq!(
            describe_languages(&["en".to_string(), "xx".to_string(), "hi".to_string()]),
            "English, xx or Hindi"
        );
    }
}
