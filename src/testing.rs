//! In-crate fakes for the upstream services, used by unit tests.

use crate::embedding::Embedder;
use crate::error::{Result, TubeQaError};
use crate::rag::Generator;
use crate::transcript::{Transcript, TranscriptFetcher, TranscriptSnippet};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

const DIMENSIONS: usize = 64;

/// Bag-of-words embedder: each lowercase word bumps one hashed dimension.
pub struct FakeEmbedder;

fn word_slot(word: &str) -> usize {
    // FNV-1a
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in word.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    (hash % DIMENSIONS as u64) as usize
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0; DIMENSIONS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            vector[word_slot(&word.to_lowercase())] += 1.0;
        }
        Ok(vector)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

/// Embedder that returns the same vector for every text.
pub struct FixedEmbedder(pub Vec<f32>);

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(self.0.clone())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| self.0.clone()).collect())
    }
}

/// Embedder that always fails.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(TubeQaError::OpenAI("Embedding API error: quota exceeded".to_string()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(TubeQaError::OpenAI("Embedding API error: quota exceeded".to_string()))
    }
}

/// Generator that replays canned replies and records every call.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(String, f32)>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Prompts and temperatures seen so far.
    pub fn calls(&self) -> Vec<(String, f32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), temperature));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TubeQaError::OpenAI("no scripted reply left".to_string()))
    }
}

/// What the fake fetcher does for a given video id.
pub enum FakeVideo {
    Captions(Vec<&'static str>),
    Disabled,
    NoTranscript,
    Broken(&'static str),
}

/// Transcript fetcher driven by a table of video ids.
#[derive(Default)]
pub struct FakeFetcher {
    videos: HashMap<String, FakeVideo>,
    requested: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeFetcher {
    pub fn with(mut self, video_id: &str, video: FakeVideo) -> Self {
        self.videos.insert(video_id.to_string(), video);
        self
    }

    /// Video ids and language lists passed to `fetch`.
    pub fn requested(&self) -> Vec<(String, Vec<String>)> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptFetcher for FakeFetcher {
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Transcript> {
        self.requested
            .lock()
            .unwrap()
            .push((video_id.to_string(), languages.to_vec()));

        match self.videos.get(video_id) {
            Some(FakeVideo::Captions(lines)) => Ok(Transcript::new(
                video_id,
                lines
                    .iter()
                    .enumerate()
                    .map(|(i, line)| TranscriptSnippet::new(*line, i as f64, 1.0))
                    .collect(),
            )),
            Some(FakeVideo::Disabled) => Err(TubeQaError::TranscriptsDisabled {
                video_id: video_id.to_string(),
            }),
            Some(FakeVideo::NoTranscript) => Err(TubeQaError::NoTranscriptFound {
                video_id: video_id.to_string(),
                languages: languages.to_vec(),
            }),
            Some(FakeVideo::Broken(reason)) => Err(TubeQaError::Transcript(reason.to_string())),
            None => Err(TubeQaError::Transcript(format!(
                "video {} is unavailable",
                video_id
            ))),
        }
    }
}
