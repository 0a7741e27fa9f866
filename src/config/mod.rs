//! Configuration module for tubeqa.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, QaPrompts};
pub use settings::{
    ApiSettings, ChunkingSettings, EmbeddingSettings, GeneralSettings, PromptSettings,
    RagSettings, ServerSettings, Settings, TranscriptSettings,
};
