//! RAG response generation.

use super::context::{format_context_for_prompt, ContextBuilder};
use super::{ContextChunk, Generator, NOT_FOUND_SENTINEL};
use crate::config::{Prompts, RagSettings};
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::VectorStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Where the delivered answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// Answered from the retrieved transcript context.
    Transcript,
    /// Retrieval produced no context, answered from general knowledge.
    GeneralNoContext,
    /// The transcript did not contain the answer, answered from general knowledge.
    GeneralNotFound,
}

impl std::fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerSource::Transcript => write!(f, "transcript"),
            AnswerSource::GeneralNoContext => write!(f, "general knowledge (no context)"),
            AnswerSource::GeneralNotFound => write!(f, "general knowledge (not in video)"),
        }
    }
}

/// Outcome of inspecting a context-only reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The reply answers from the context and can be shown.
    Grounded(String),
    /// The reply carries the sentinel and must be replaced.
    NotFound,
}

impl Verdict {
    /// Judge a reply to the strict prompt.
    pub fn judge(reply: String) -> Self {
        if reply.contains(NOT_FOUND_SENTINEL) {
            Verdict::NotFound
        } else {
            Verdict::Grounded(reply)
        }
    }
}

/// RAG engine for question answering.
pub struct RagEngine {
    generator: Arc<dyn Generator>,
    context_builder: ContextBuilder,
    prompts: Prompts,
    strict_temperature: f32,
    fallback_temperature: f32,
}

impl RagEngine {
    /// Create a new RAG engine.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        settings: &RagSettings,
    ) -> Self {
        let context_builder = ContextBuilder::new(embedder)
            .with_max_chunks(settings.top_k)
            .with_min_score(settings.min_score);

        Self {
            generator,
            context_builder,
            prompts: Prompts::default(),
            strict_temperature: settings.strict_temperature,
            fallback_temperature: settings.fallback_temperature,
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Answer a question from the segments in `store`.
    ///
    /// With no context the general-knowledge prompt answers directly. With
    /// context the strict prompt answers first, and a sentinel reply is
    /// replaced by a general-knowledge answer.
    #[instrument(skip(self, store), fields(question = %question))]
    pub async fn ask(&self, store: &dyn VectorStore, question: &str) -> Result<RagResponse> {
        info!("Processing question");

        let context_chunks = self.context_builder.build(store, question).await?;
        let context_text = format_context_for_prompt(&context_chunks);

        if context_text.is_empty() {
            debug!("No context retrieved, answering from general knowledge");
            let answer = self.general_answer(question).await?;
            return Ok(RagResponse {
                answer,
                source: AnswerSource::GeneralNoContext,
                sources: context_chunks,
            });
        }

        let prompt = self.prompts.strict(question, &context_text);
        let reply = self
            .generator
            .generate(&prompt, self.strict_temperature)
            .await?;

        let (answer, source) = match Verdict::judge(reply) {
            Verdict::Grounded(answer) => (answer, AnswerSource::Transcript),
            Verdict::NotFound => {
                warn!("Answer not found in transcript, falling back to general knowledge");
                (
                    self.general_answer(question).await?,
                    AnswerSource::GeneralNotFound,
                )
            }
        };

        debug!(%source, "Generated response with {} sources", context_chunks.len());

        Ok(RagResponse {
            answer,
            source,
            sources: context_chunks,
        })
    }

    async fn general_answer(&self, question: &str) -> Result<String> {
        let prompt = self.prompts.fallback(question);
        self.generator
            .generate(&prompt, self.fallback_temperature)
            .await
    }
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone, Serialize)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// Which path produced the answer.
    pub source: AnswerSource,
    /// Segments retrieved for the question.
    pub sources: Vec<ContextChunk>,
}
