//! The two session actions: process a video, answer a question.

use super::{ProcessedVideo, SessionState};
use crate::chunking::{Chunker, ChunkingConfig, ContentChunk, RecursiveSplitter};
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, TubeQaError};
use crate::rag::{Generator, OpenAIGenerator, RagEngine, RagResponse};
use crate::transcript::{extract_video_id, TranscriptFetcher, YoutubeTranscriptFetcher};
use crate::vector_store::{Document, MemoryVectorStore, VectorStore};
use std::sync::Arc;
use tracing::{info, instrument};

/// Progress reported while a video is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStage {
    FetchingTranscript,
    TranscriptFetched,
    Splitting,
    Embedding,
    Done,
}

impl std::fmt::Display for ProcessStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessStage::FetchingTranscript => write!(f, "Fetching transcript..."),
            ProcessStage::TranscriptFetched => write!(f, "Transcript fetched successfully!"),
            ProcessStage::Splitting => write!(f, "Splitting transcript..."),
            ProcessStage::Embedding => write!(f, "Generating embeddings..."),
            ProcessStage::Done => write!(f, "Video processed! You can now ask questions."),
        }
    }
}

/// Summary of a processed video.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub video_id: String,
    /// Language code of the fetched transcript.
    pub language_code: String,
    /// Auto-generated captions rather than uploaded ones.
    pub is_generated: bool,
    /// Length of the video covered by the transcript, in seconds.
    pub duration_seconds: f64,
    pub transcript_chars: usize,
    pub segments_indexed: usize,
}

/// Orchestrates transcript fetching, indexing and question answering.
///
/// The controller holds only upstream clients; all per-user state lives in
/// the [`SessionState`] passed to each action.
pub struct SessionController {
    settings: Settings,
    fetcher: Arc<dyn TranscriptFetcher>,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn Embedder>,
    engine: RagEngine,
}

impl SessionController {
    /// Create a controller talking to YouTube and the configured API.
    pub fn new(settings: Settings, api_key: &str) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let fetcher = Arc::new(YoutubeTranscriptFetcher::new(
            settings.transcript.preserve_formatting,
        )?);
        let embedder = Arc::new(OpenAIEmbedder::new(
            &settings.api,
            api_key,
            &settings.embedding,
        )?);
        let generator = Arc::new(OpenAIGenerator::new(
            &settings.api,
            api_key,
            &settings.rag.model,
        )?);

        info!(
            "Using {} for answers and {} for embeddings via {}",
            settings.rag.model, settings.embedding.model, settings.api.base_url
        );

        Ok(Self::with_components(
            settings, prompts, fetcher, embedder, generator,
        ))
    }

    /// Create a controller with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        fetcher: Arc<dyn TranscriptFetcher>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        let chunker = Arc::new(RecursiveSplitter::new(ChunkingConfig::from(
            settings.chunking.clone(),
        )));
        let engine = RagEngine::new(embedder.clone(), generator, &settings.rag).with_prompts(prompts);

        Self {
            settings,
            fetcher,
            chunker,
            embedder,
            engine,
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Fetch, split and index a video's transcript into `session`.
    pub async fn process_video(
        &self,
        session: &mut SessionState,
        input: &str,
    ) -> Result<ProcessResult> {
        self.process_video_with_progress(session, input, |_| {})
            .await
    }

    /// Like [`process_video`](Self::process_video), reporting each stage to `on_stage`.
    ///
    /// On any failure `session` is left exactly as it was.
    #[instrument(skip(self, session, on_stage), fields(session = %session.id()))]
    pub async fn process_video_with_progress<F>(
        &self,
        session: &mut SessionState,
        input: &str,
        mut on_stage: F,
    ) -> Result<ProcessResult>
    where
        F: FnMut(ProcessStage) + Send,
    {
        let video_id = extract_video_id(input)
            .ok_or_else(|| TubeQaError::InvalidInput("Video ID cannot be empty".to_string()))?;

        on_stage(ProcessStage::FetchingTranscript);
        info!("Fetching transcript for {}", video_id);
        let transcript = self
            .fetcher
            .fetch(&video_id, &self.settings.transcript.languages)
            .await?;
        on_stage(ProcessStage::TranscriptFetched);

        let text = transcript.full_text();
        if text.trim().is_empty() {
            return Err(TubeQaError::Transcript(format!(
                "Transcript for {} is empty",
                video_id
            )));
        }

        on_stage(ProcessStage::Splitting);
        let chunks = self.chunker.chunk(&text);
        info!("Split {} characters into {} segments", text.len(), chunks.len());

        on_stage(ProcessStage::Embedding);
        let index = self.index_chunks(&video_id, chunks).await?;
        let segment_count = index.document_count().await?;
        info!("Indexed {} segments", segment_count);

        let result = ProcessResult {
            video_id: video_id.clone(),
            language_code: transcript.language_code.clone(),
            is_generated: transcript.is_generated,
            duration_seconds: transcript.duration_seconds(),
            transcript_chars: text.chars().count(),
            segments_indexed: segment_count,
        };

        session.replace_video(ProcessedVideo {
            video_id,
            transcript: text,
            index,
        });
        on_stage(ProcessStage::Done);

        Ok(result)
    }

    /// Embed chunks into a fresh index.
    async fn index_chunks(
        &self,
        video_id: &str,
        chunks: Vec<ContentChunk>,
    ) -> Result<Arc<dyn VectorStore>> {
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(TubeQaError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let documents: Vec<Document> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| {
                Document::new(video_id.to_string(), chunk.content, embedding, chunk.order)
            })
            .collect();

        let store = MemoryVectorStore::new();
        store.upsert_batch(&documents).await?;

        Ok(Arc::new(store))
    }

    /// Answer a question about the session's processed video.
    ///
    /// Fails with [`TubeQaError::NoVideoProcessed`] before doing anything
    /// else when no video has been processed. On success the question and
    /// answer are appended to the history.
    #[instrument(skip(self, session), fields(session = %session.id()))]
    pub async fn answer_question(
        &self,
        session: &mut SessionState,
        question: &str,
    ) -> Result<RagResponse> {
        let index = session
            .video()
            .map(|v| v.index.clone())
            .ok_or(TubeQaError::NoVideoProcessed)?;

        let question = question.trim();
        if question.is_empty() {
            return Err(TubeQaError::InvalidInput(
                "Question cannot be empty".to_string(),
            ));
        }

        let response = self.engine.ask(index.as_ref(), question).await?;

        session
            .history_mut()
            .push_exchange(question, &response.answer);

        Ok(response)
    }
}
