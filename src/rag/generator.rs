//! Text generation through a chat-completion API.

use crate::config::ApiSettings;
use crate::error::{Result, TubeQaError};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Maps a prompt to generated text.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a reply to `prompt` at the given sampling temperature.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String>;
}

/// Generator backed by the `/chat/completions` endpoint.
pub struct OpenAIGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIGenerator {
    pub fn new(api: &ApiSettings, api_key: &str, model: &str) -> Result<Self> {
        Ok(Self::with_client(create_client(api, api_key)?, model))
    }

    pub fn with_client(client: Client<OpenAIConfig>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Generator for OpenAIGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| TubeQaError::Generation(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![message.into()])
            .temperature(temperature)
            .build()
            .map_err(|e| TubeQaError::Generation(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            TubeQaError::OpenAI(format!("Failed to generate response: {}", e))
        })?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| TubeQaError::Generation("Empty response from LLM".to_string()))?
            .clone();

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }
}
