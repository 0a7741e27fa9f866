//! tubeqa - Ask questions about a YouTube video
//!
//! Paste a video id, and tubeqa fetches its transcript, indexes it for
//! semantic retrieval and answers questions from it. When the transcript does
//! not contain the answer, a general-knowledge answer is given instead.
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `transcript` - Transcript fetching (YouTube captions)
//! - `chunking` - Overlapping text segments
//! - `embedding` - Embedding generation
//! - `vector_store` - In-memory similarity index
//! - `rag` - Retrieval and answer generation with fallback
//! - `session` - Per-user state and the controller driving it
//! - `cli` - Terminal and HTTP front ends
//!
//! # Example
//!
//! ```rust,no_run
//! use tubeqa::config::Settings;
//! use tubeqa::session::{SessionController, SessionState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let api_key = settings.api_key()?;
//!     let controller = SessionController::new(settings, &api_key)?;
//!
//!     let mut session = SessionState::new();
//!     controller.process_video(&mut session, "dQw4w9WgXcQ").await?;
//!     let response = controller.answer_question(&mut session, "What is this song about?").await?;
//!     println!("{}", response.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod rag;
pub mod session;
pub mod transcript;
pub mod vector_store;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Result, TubeQaError};
