//! YouTube transcript fetching via `yt-transcript-rs`.

use super::{Transcript, TranscriptFetcher, TranscriptSnippet};
use crate::error::{Result, TubeQaError};
use async_trait::async_trait;
use tracing::{debug, info, instrument};
use url::Url;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

/// Transcript fetcher backed by YouTube's caption tracks.
#[derive(Clone)]
pub struct YoutubeTranscriptFetcher {
    api: YouTubeTranscriptApi,
    preserve_formatting: bool,
}

impl YoutubeTranscriptFetcher {
    pub fn new(preserve_formatting: bool) -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None).map_err(|e| {
            TubeQaError::Transcript(format!("Failed to create transcript client: {}", e))
        })?;
        Ok(Self {
            api,
            preserve_formatting,
        })
    }
}

#[async_trait]
impl TranscriptFetcher for YoutubeTranscriptFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Transcript> {
        let codes: Vec<&str> = languages.iter().map(String::as_str).collect();

        let fetched = self
            .api
            .fetch_transcript(video_id, &codes, self.preserve_formatting)
            .await
            .map_err(|e| map_fetch_error(video_id, languages, e))?;

        info!(
            "Fetched {} transcript ({}) with {} snippets",
            fetched.language,
            fetched.language_code,
            fetched.snippets.len()
        );

        Ok(Transcript {
            video_id: fetched.video_id,
            language: fetched.language,
            language_code: fetched.language_code,
            is_generated: fetched.is_generated,
            snippets: fetched
                .snippets
                .into_iter()
                .map(|s| TranscriptSnippet::new(s.text, s.start, s.duration))
                .collect(),
        })
    }
}

/// Why a transcript could not be fetched, as far as the user is concerned.
#[derive(Debug, PartialEq)]
enum FetchFailure {
    Disabled,
    NotFound,
    Other(String),
}

impl FetchFailure {
    fn from_error(err: &CouldNotRetrieveTranscript) -> Self {
        match &err.reason {
            Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled) => FetchFailure::Disabled,
            Some(CouldNotRetrieveTranscriptReason::NoTranscriptFound { .. }) => {
                FetchFailure::NotFound
            }
            _ => FetchFailure::Other(err.to_string()),
        }
    }

    fn into_error(self, video_id: &str, languages: &[String]) -> TubeQaError {
        match self {
            FetchFailure::Disabled => TubeQaError::TranscriptsDisabled {
                video_id: video_id.to_string(),
            },
            FetchFailure::NotFound => TubeQaError::NoTranscriptFound {
                video_id: video_id.to_string(),
                languages: languages.to_vec(),
            },
            FetchFailure::Other(detail) => TubeQaError::Transcript(detail),
        }
    }
}

fn map_fetch_error(
    video_id: &str,
    languages: &[String],
    err: CouldNotRetrieveTranscript,
) -> TubeQaError {
    debug!("Transcript fetch failed: {}", err);
    FetchFailure::from_error(&err).into_error(video_id, languages)
}

/// Reduce user input to a video id.
///
/// Accepts watch, short, embed and youtu.be URLs. Anything that is not a
/// recognised URL is treated as an id and returned trimmed. Returns None for
/// blank input.
pub fn extract_video_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else if trimmed.starts_with("youtu.be/")
        || trimmed.starts_with("youtube.com/")
        || trimmed.starts_with("www.youtube.com/")
        || trimmed.starts_with("m.youtube.com/")
    {
        format!("https://{}", trimmed)
    } else {
        return Some(trimmed.to_string());
    };

    match Url::parse(&candidate) {
        Ok(url) => id_from_url(&url).or_else(|| Some(trimmed.to_string())),
        Err(_) => Some(trimmed.to_string()),
    }
}

fn id_from_url(url: &Url) -> Option<String> {
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    let id = match host {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" | "youtube-nocookie.com" => {
            let mut segments = url.path_segments()?;
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned()),
                Some("shorts") | Some("embed") | Some("live") | Some("v") => {
                    segments.next().map(str::to_string)
                }
                _ => None,
            }
        }
        _ => None,
    }?;

    (!id.is_empty()).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=10"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_plain_ids_pass_through_trimmed() {
        assert_eq!(
            extract_video_id("  dQw4w9WgXcQ \n"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(extract_video_id("not a url"), Some("not a url".to_string()));
    }

    fn languages() -> Vec<String> {
        vec!["en".to_string(), "hi".to_string()]
    }

    fn library_error(reason: Option<CouldNotRetrieveTranscriptReason>) -> CouldNotRetrieveTranscript {
        CouldNotRetrieveTranscript {
            video_id: "abc123".to_string(),
            reason,
        }
    }

    #[test]
    fn test_disabled_reason_maps_to_disabled_message() {
        let err = map_fetch_error(
            "abc123",
            &languages(),
            library_error(Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled)),
        );

        assert!(matches!(&err, TubeQaError::TranscriptsDisabled { video_id } if video_id == "abc123"));
        assert_eq!(err.user_message(), "Transcripts are disabled for this video.");
    }

    #[test]
    fn test_other_reasons_map_to_generic_message() {
        for reason in [Some(CouldNotRetrieveTranscriptReason::VideoUnavailable), None] {
            let err = map_fetch_error("abc123", &languages(), library_error(reason));

            assert!(matches!(err, TubeQaError::Transcript(_)));
            assert!(!err.is_transcript_unavailable());
            assert!(err.user_message().starts_with("Error: Transcript error: "));
        }
    }

    #[test]
    fn test_failure_kinds_have_distinct_messages() {
        let disabled = FetchFailure::Disabled.into_error("abc123", &languages());
        let missing = FetchFailure::NotFound.into_error("abc123", &languages());
        let other = FetchFailure::Other("video unavailable".to_string())
            .into_error("abc123", &languages());

        assert!(matches!(
            &missing,
            TubeQaError::NoTranscriptFound { languages, .. } if languages == &["en", "hi"]
        ));
        assert_eq!(
            missing.user_message(),
            "No transcript available in English or Hindi."
        );
        assert_eq!(other.user_message(), "Error: Transcript error: video unavailable");
        assert_ne!(disabled.user_message(), missing.user_message());
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("   "), None);
    }
}
