//! Per-user session state and the controller that drives it.
//!
//! A [`SessionState`] is created empty when a user starts, is mutated only
//! by [`SessionController::process_video`] and
//! [`SessionController::answer_question`], and is dropped when the session
//! ends.

mod controller;
mod history;

pub use controller::{ProcessResult, ProcessStage, SessionController};
pub use history::{ChatEntry, ChatHistory, RenderedEntry, Role};

use crate::vector_store::VectorStore;
use std::sync::Arc;
use uuid::Uuid;

/// The index built for the currently processed video.
#[derive(Clone)]
pub struct ProcessedVideo {
    pub video_id: String,
    /// Full transcript text.
    pub transcript: String,
    pub index: Arc<dyn VectorStore>,
}

/// State for one user session.
pub struct SessionState {
    id: Uuid,
    video: Option<ProcessedVideo>,
    history: ChatHistory,
}

impl SessionState {
    /// An empty session: no index, no transcript, no history.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            video: None,
            history: ChatHistory::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The processed video, if any.
    pub fn video(&self) -> Option<&ProcessedVideo> {
        self.video.as_ref()
    }

    pub fn has_index(&self) -> bool {
        self.video.is_some()
    }

    pub fn transcript(&self) -> Option<&str> {
        self.video.as_ref().map(|v| v.transcript.as_str())
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// Install a newly processed video and start a fresh conversation.
    pub(crate) fn replace_video(&mut self, video: ProcessedVideo) {
        self.video = Some(video);
        self.history.clear();
    }

    pub(crate) fn history_mut(&mut self) -> &mut ChatHistory {
        &mut self.history
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("id", &self.id)
            .field("video_id", &self.video.as_ref().map(|v| &v.video_id))
            .field("history_len", &self.history.len())
            .finish()
    }
}
