//! Configuration settings for tubeqa.

use crate::error::{Result, TubeQaError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One year, well inside what `chrono::Duration::minutes` accepts.
const MAX_SESSION_TTL_MINUTES: i64 = 525_600;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub api: ApiSettings,
    pub transcript: TranscriptSettings,
    pub chunking: ChunkingSettings,
    pub embedding: EmbeddingSettings,
    pub rag: RagSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level when no -v flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Upstream API endpoint settings.
///
/// Chat and embeddings go through an OpenAI-compatible endpoint. The default
/// is Google's Gemini compatibility layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            timeout_seconds: 300,
        }
    }
}

/// Transcript fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Language codes in order of preference.
    pub languages: Vec<String>,
    /// Keep HTML formatting tags in snippet text.
    pub preserve_formatting: bool,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string(), "hi".to_string()],
            preserve_formatting: false,
        }
    }
}

/// Transcript splitting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum segment length in characters.
    pub chunk_size: usize,
    /// Characters shared between neighbouring segments.
    pub chunk_overlap: usize,
    /// Separators tried in order; "" splits into characters.
    pub separators: Vec<String>,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 300,
            chunk_overlap: 100,
            separators: vec![
                "\n\n".to_string(),
                "\n".to_string(),
                " ".to_string(),
                String::new(),
            ],
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Requested output dimensions. None leaves the model default.
    pub dimensions: Option<u32>,
    /// Texts per embedding request.
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "gemini-embedding-001".to_string(),
            dimensions: None,
            batch_size: 100,
        }
    }
}

/// Question answering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// LLM model for answer generation.
    pub model: String,
    /// Number of segments retrieved per question.
    pub top_k: usize,
    /// Minimum similarity for a segment to count as context. Unset keeps
    /// the nearest `top_k` segments whatever their score.
    pub min_score: Option<f32>,
    /// Temperature for the context-only prompt.
    pub strict_temperature: f32,
    /// Temperature for the general-knowledge prompt.
    pub fallback_temperature: f32,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-pro".to_string(),
            top_k: 4,
            min_score: None,
            strict_temperature: 0.2,
            fallback_temperature: 0.7,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Idle minutes before a browser session is discarded.
    pub session_ttl_minutes: i64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            session_ttl_minutes: 60,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Settings>(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(TubeQaError::Config(
                "chunking.chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(TubeQaError::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.rag.top_k == 0 {
            return Err(TubeQaError::Config(
                "rag.top_k must be greater than zero".to_string(),
            ));
        }
        if self.transcript.languages.is_empty() {
            return Err(TubeQaError::Config(
                "transcript.languages must list at least one language".to_string(),
            ));
        }
        if self.embedding.batch_size == 0 {
            return Err(TubeQaError::Config(
                "embedding.batch_size must be greater than zero".to_string(),
            ));
        }
        if !(1..=MAX_SESSION_TTL_MINUTES).contains(&self.server.session_ttl_minutes) {
            return Err(TubeQaError::Config(format!(
                "server.session_ttl_minutes ({}) must be between 1 and {}",
                self.server.session_ttl_minutes, MAX_SESSION_TTL_MINUTES
            )));
        }
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tubeqa")
            .join("config.toml")
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        let var = &self.api.api_key_env;
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            Ok(_) => Err(TubeQaError::Config(format!(
                "{} is empty. Set it with: export {}='...'",
                var, var
            ))),
            Err(_) => Err(TubeQaError::Config(format!(
                "{} not set. Set it with: export {}='...'",
                var, var
            ))),
        }
    }
}
